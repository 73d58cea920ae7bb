use url::Url;
use uuid::Uuid;

use crate::domain::datatype::{
    choice::{
        Age, DietaryRestriction, DiscoveryMethod, Ethnicity, Gender, HackathonCount,
        HighestFormalEducation, Pronouns, SexualIdentity, StudyLevel, TshirtSize,
        UnderRepresentedGroup,
    },
    team_code::TeamCode,
};

use super::{impl_entity, state_copy, state_ref, EntityData, EntityState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamState {
    pub(in crate::domain) team_code: TeamCode,
}

/// Applicants sharing a join code.
#[derive(Debug, Clone)]
pub struct Team {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: TeamState,
}

impl EntityState for Team {
    type State = TeamState;
}

impl_entity!(Team);

impl Team {
    state_ref!(team_code, TeamCode);

    pub fn new(team_code: TeamCode) -> Self {
        Self::restore(EntityData::new(), TeamState { team_code })
    }
}

/// Validated answers of the application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    pub age: Age,
    pub pronouns: Pronouns,
    pub free_response_pronouns: Option<String>,
    pub gender: Gender,
    pub free_response_gender: Option<String>,
    pub ethnicity: Option<Ethnicity>,
    /// Digits only
    pub phone_number: String,
    pub city: String,
    pub country: String,
    pub tshirt_size: TshirtSize,
    pub dietary_restrictions: DietaryRestriction,
    pub free_response_dietary_restrictions: Option<String>,
    pub under_represented_group: UnderRepresentedGroup,
    pub sexual_identity: SexualIdentity,
    pub free_response_sexual_identity: Option<String>,
    pub highest_formal_education: HighestFormalEducation,
    pub free_response_highest_formal_education: Option<String>,
    pub school: String,
    pub study_level: StudyLevel,
    pub graduation_year: i32,
    pub program: String,
    /// Path of the uploaded resume, relative to the media root
    pub resume: String,
    pub linkedin: Option<Url>,
    pub github: Option<Url>,
    pub devpost: Option<Url>,
    pub how_many_hackathons: HackathonCount,
    pub past_hackathon_info: Option<String>,
    pub what_past_experience: String,
    pub why_participate: String,
    pub what_technical_experience: String,
    pub what_role_in_team_setting: String,
    pub discovery_method: DiscoveryMethod,
    pub conduct_agree: bool,
    pub logistics_agree: bool,
    pub email_agree: bool,
    pub resume_sharing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationState {
    pub(in crate::domain) user_id: Uuid,
    pub(in crate::domain) team_id: Uuid,
    pub(in crate::domain) under_age: bool,
    pub(in crate::domain) rsvp: Option<bool>,
    pub(in crate::domain) form: ApplicationForm,
}

/// Registration form submitted by a participant.
#[derive(Debug, Clone)]
pub struct Application {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: ApplicationState,
}

impl EntityState for Application {
    type State = ApplicationState;
}

impl_entity!(Application);

impl Application {
    pub const ADULT_AGE: u32 = 18;

    state_copy!(user_id, Uuid);
    state_copy!(team_id, Uuid);
    state_copy!(under_age, bool);
    state_copy!(rsvp, Option<bool>);
    state_ref!(form, ApplicationForm);

    pub fn new(user_id: Uuid, team_id: Uuid, form: ApplicationForm) -> Self {
        Self::restore(
            EntityData::new(),
            ApplicationState {
                user_id,
                team_id,
                under_age: form.age.value() < Self::ADULT_AGE,
                rsvp: None,
                form,
            },
        )
    }

    pub fn move_to_team(&mut self, team_id: Uuid) {
        self.state.team_id = team_id;
        self.data.touch();
    }

    pub fn set_rsvp(&mut self, rsvp: bool) {
        self.state.rsvp = Some(rsvp);
        self.data.touch();
    }
}
