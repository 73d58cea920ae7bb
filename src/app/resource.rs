macro_rules! resource_response {
    (struct $name:ident; $($field:ident: $field_ty:ty),+ ,) => {
		#[derive(core::fmt::Debug, core::clone::Clone, serde::Serialize)]
        pub struct $name {
            pub id: Uuid,
            pub created: DateTime<Utc>,
            pub updated: Option<DateTime<Utc>>,
            pub version: u32,
            $(pub $field: $field_ty),+
        }
    };
}

/// Limit/offset pagination.
pub mod page {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
    pub struct PageQuery {
        pub limit: Option<u32>,
        pub offset: Option<u32>,
    }

    impl PageQuery {
        pub const DEFAULT_LIMIT: u32 = 100;
        pub const MAX_LIMIT: u32 = 500;

        pub fn limit(&self) -> u32 {
            self.limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT)
        }

        pub fn offset(&self) -> u32 {
            self.offset.unwrap_or(0)
        }
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Page<T> {
        pub count: u64,
        pub limit: u32,
        pub offset: u32,
        pub results: Vec<T>,
    }
}

pub mod iam {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use super::event::ProfileInUserResponse;
    use crate::base::resource_id;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateUser {
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub password1: String,
        pub password2: String,
    }

    resource_id!(CreateUser, "iam::CreateUser");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserCredential {
        pub email: String,
        pub password: String,
    }

    resource_id!(UserCredential, "iam::UserCredential");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChangePassword {
        pub old_password: String,
        pub new_password1: String,
        pub new_password2: String,
    }

    resource_id!(ChangePassword, "iam::ChangePassword");

    resource_response! {
        struct UserResponse;
        email: String,
        first_name: String,
        last_name: String,
        is_staff: bool,
        profile: Option<ProfileInUserResponse>,
    }

    resource_id!(UserResponse, "iam::User");

    #[derive(Debug, Clone, Serialize)]
    pub struct AuthenticateUserResponse {
        pub user: UserResponse,
        pub token: String,
    }

    resource_id!(AuthenticateUserResponse, "iam::AuthenticateUser");

    /// User fields nested in other resources.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct UserInProfileResponse {
        pub id: Uuid,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct UserReviewStatusResponse {
        pub id: Uuid,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        /// `"None"` while the user has not been reviewed
        pub review_status: String,
    }
}

pub mod registration {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use url::Url;
    use uuid::Uuid;

    use crate::{
        base::resource_id,
        domain::datatype::choice::{
            Age, DietaryRestriction, DiscoveryMethod, Ethnicity, Gender, HackathonCount,
            HighestFormalEducation, Pronouns, ReviewStatus, SexualIdentity, StudyLevel,
            TshirtSize, UnderRepresentedGroup,
        },
    };

    /// Raw application form, every choice is checked by the validation.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SubmitApplication {
        pub age: Option<u32>,
        pub pronouns: String,
        pub free_response_pronouns: Option<String>,
        pub gender: String,
        pub free_response_gender: Option<String>,
        pub ethnicity: Option<String>,
        pub phone_number: String,
        pub city: String,
        pub country: String,
        pub tshirt_size: String,
        pub dietary_restrictions: String,
        pub free_response_dietary_restrictions: Option<String>,
        pub under_represented_group: String,
        pub sexual_identity: String,
        pub free_response_sexual_identity: Option<String>,
        pub highest_formal_education: String,
        pub free_response_highest_formal_education: Option<String>,
        pub school: String,
        pub study_level: String,
        pub graduation_year: Option<i32>,
        pub program: String,
        pub resume: String,
        pub linkedin: Option<String>,
        pub github: Option<String>,
        pub devpost: Option<String>,
        pub how_many_hackathons: String,
        pub past_hackathon_info: Option<String>,
        pub what_past_experience: String,
        pub why_participate: String,
        pub what_technical_experience: String,
        pub what_role_in_team_setting: String,
        pub discovery_method: String,
        pub conduct_agree: bool,
        pub logistics_agree: bool,
        pub email_agree: bool,
        pub resume_sharing: bool,
    }

    resource_id!(SubmitApplication, "registration::SubmitApplication");

    resource_response! {
        struct ApplicationResponse;
        user_id: Uuid,
        team_id: Uuid,
        age: Age,
        under_age: bool,
        pronouns: Pronouns,
        free_response_pronouns: Option<String>,
        gender: Gender,
        free_response_gender: Option<String>,
        ethnicity: Option<Ethnicity>,
        phone_number: String,
        city: String,
        country: String,
        tshirt_size: TshirtSize,
        dietary_restrictions: DietaryRestriction,
        free_response_dietary_restrictions: Option<String>,
        under_represented_group: UnderRepresentedGroup,
        sexual_identity: SexualIdentity,
        free_response_sexual_identity: Option<String>,
        highest_formal_education: HighestFormalEducation,
        free_response_highest_formal_education: Option<String>,
        school: String,
        study_level: StudyLevel,
        graduation_year: i32,
        program: String,
        resume: String,
        linkedin: Option<Url>,
        github: Option<Url>,
        devpost: Option<Url>,
        how_many_hackathons: HackathonCount,
        past_hackathon_info: Option<String>,
        what_past_experience: String,
        why_participate: String,
        what_technical_experience: String,
        what_role_in_team_setting: String,
        discovery_method: DiscoveryMethod,
        conduct_agree: bool,
        logistics_agree: bool,
        email_agree: bool,
        resume_sharing: bool,
        rsvp: Option<bool>,
    }

    resource_id!(ApplicationResponse, "registration::Application");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ResumeResponse {
        /// Path relative to the media root
        pub resume: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct JoinTeam {
        pub team_code: String,
    }

    resource_id!(JoinTeam, "registration::JoinTeam");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PutRsvp {
        pub rsvp: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct TeamMemberResponse {
        pub first_name: String,
        pub last_name: String,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct TeamResponse {
        pub id: Uuid,
        pub team_code: String,
        pub members: Vec<TeamMemberResponse>,
        pub spots_remaining: u32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DashboardState {
        ApplicationIncomplete,
        ApplicationsClosed,
        ApplicationComplete,
        Accepted,
        Waitlisted,
        Rejected,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct DashboardResponse {
        pub state: DashboardState,
        pub registration_open: bool,
        pub application_open: bool,
        pub can_change_team: bool,
        pub team_code: Option<String>,
        pub spots_remaining: Option<u32>,
        pub review_status: Option<ReviewStatus>,
        pub rsvp: Option<bool>,
        pub rsvp_deadline: Option<NaiveDate>,
        pub rsvp_passed: bool,
        pub final_review_response_date: DateTime<Utc>,
    }
}

pub mod review {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use crate::{base::resource_id, domain::datatype::choice::ReviewStatus};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PutReview {
        pub status: String,
        #[serde(default)]
        pub reviewer_comments: String,
    }

    resource_id!(PutReview, "review::PutReview");

    resource_response! {
        struct ReviewResponse;
        application_id: Uuid,
        reviewer_id: Option<Uuid>,
        status: ReviewStatus,
        reviewer_comments: String,
        decision_sent_date: Option<NaiveDate>,
    }

    resource_id!(ReviewResponse, "review::Review");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ApplicationSummaryResponse {
        pub id: Uuid,
        pub user_id: Uuid,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub team_code: String,
        pub review_status: String,
        pub decision_sent_date: Option<NaiveDate>,
        pub rsvp: Option<bool>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct SendDecisionsResponse {
        pub sent: u64,
    }
}

pub mod event {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use super::iam::UserInProfileResponse;
    use crate::{
        base::resource_id,
        domain::schedule::{Countdown, SignInTime},
    };

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateProfile {
        pub acknowledge_rules: bool,
        pub e_signature: String,
    }

    resource_id!(CreateProfile, "event::CreateProfile");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProfileCreateResponse {
        pub id_provided: bool,
        pub attended: bool,
        pub acknowledge_rules: bool,
        pub e_signature: Option<String>,
        /// Team code
        pub team: String,
        pub phone_number: String,
    }

    /// Participant view of their profile.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ProfileResponse {
        pub id: Uuid,
        pub id_provided: bool,
        pub attended: bool,
        pub acknowledge_rules: bool,
        pub e_signature: Option<String>,
        pub team: Uuid,
        pub phone_number: String,
    }

    resource_id!(ProfileResponse, "event::Profile");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ProfileInUserResponse {
        pub id: Uuid,
        pub id_provided: bool,
        pub attended: bool,
        pub acknowledge_rules: bool,
        pub e_signature: Option<String>,
        pub phone_number: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UpdateCurrentProfile {
        pub acknowledge_rules: bool,
        pub e_signature: Option<String>,
    }

    resource_id!(UpdateCurrentProfile, "event::UpdateCurrentProfile");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UpdateProfile {
        pub id_provided: bool,
        pub attended: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SignIn {
        pub email: String,
        pub event: String,
    }

    resource_id!(SignIn, "event::SignIn");

    #[derive(Debug, Clone, Serialize)]
    pub struct UserActivityResponse {
        pub id: Uuid,
        pub user: UserInProfileResponse,
        pub sign_in_event: String,
        pub description: String,
        pub created: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ChatRoomResponse {
        pub name: String,
        pub link: String,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct EventInfoResponse {
        pub hackathon_name: String,
        pub contact_email: String,
        pub participant_package_link: String,
        pub chat_room: ChatRoomResponse,
        pub registration_open_date: DateTime<Utc>,
        pub registration_close_date: DateTime<Utc>,
        pub application_open_date: DateTime<Utc>,
        pub event_start_date: DateTime<Utc>,
        pub event_end_date: DateTime<Utc>,
        pub hardware_sign_out_start_date: DateTime<Utc>,
        pub hardware_sign_out_end_date: DateTime<Utc>,
        pub final_review_response_date: DateTime<Utc>,
        pub registration_open: bool,
        pub application_open: bool,
        pub hackathon_happening: bool,
        pub hardware_sign_out_open: bool,
        pub countdown: Option<Countdown>,
        pub sign_in_times: Vec<SignInTime>,
        pub teams: bool,
        pub rsvp: bool,
        pub min_members: u32,
        pub max_members: u32,
        pub minimum_age: u32,
    }
}

pub mod hardware {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use url::Url;
    use uuid::Uuid;

    use crate::{base::resource_id, domain::datatype::choice::OrderStatus};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CreateHardware {
        pub name: String,
        pub model_number: String,
        pub manufacturer: String,
        pub datasheet: Option<String>,
        pub quantity_available: u32,
        pub max_per_team: Option<u32>,
        #[serde(default)]
        pub notes: String,
    }

    resource_id!(CreateHardware, "hardware::CreateHardware");

    resource_response! {
        struct HardwareResponse;
        name: String,
        model_number: String,
        manufacturer: String,
        datasheet: Option<Url>,
        quantity_available: u32,
        quantity_remaining: u32,
        max_per_team: Option<u32>,
        notes: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct OrderItemRequest {
        pub hardware_id: Uuid,
        pub quantity: u32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PlaceOrder {
        pub items: Vec<OrderItemRequest>,
    }

    resource_id!(PlaceOrder, "hardware::PlaceOrder");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PutOrderStatus {
        pub status: String,
    }

    resource_id!(PutOrderStatus, "hardware::PutOrderStatus");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct OrderItemResponse {
        pub hardware_id: Uuid,
        pub name: String,
        pub quantity: u32,
    }

    resource_response! {
        struct OrderResponse;
        team_id: Uuid,
        team_code: String,
        status: OrderStatus,
        items: Vec<OrderItemResponse>,
    }

    resource_id!(OrderResponse, "hardware::Order");
}
