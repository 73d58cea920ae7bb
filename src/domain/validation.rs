use std::str::FromStr;

use crate::error::resource::{ValidationErrorKind, ValidationFieldError};

/// Accumulates the field errors of a resource, so every invalid field is
/// reported at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<ValidationFieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, err: ValidationFieldError) {
        self.errors.push(err);
    }

    pub fn add(
        &mut self,
        type_id: &'static str,
        path: &str,
        value: impl ToString,
        kind: ValidationErrorKind,
        message: Option<&str>,
    ) {
        let err = ValidationFieldError::new(type_id, value.to_string(), path.into(), vec![kind]);
        self.errors.push(match message {
            Some(message) => err.with_message(message),
            None => err,
        });
    }

    pub fn into_vec(self) -> Vec<ValidationFieldError> {
        self.errors
    }

    /// Parse one of the choices of a field.
    pub fn choice<T>(&mut self, path: &str, value: &str) -> Option<T>
    where
        T: FromStr<Err = ValidationFieldError> + crate::base::ResourceID,
    {
        if value.is_empty() {
            self.push(ValidationFieldError::from_resource::<T>(
                String::new(),
                path.into(),
                vec![ValidationErrorKind::Required],
            ));
            return None;
        }

        match value.parse() {
            Ok(choice) => Some(choice),
            Err(mut err) => {
                err.path = path.into();
                self.push(err);
                None
            }
        }
    }

    /// Trimmed text that can not be blank.
    pub fn required_text(&mut self, path: &str, value: &str, max_length: usize) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            self.add("base::string", path, value, ValidationErrorKind::Required, None);
            return None;
        }
        if value.chars().count() > max_length {
            self.add(
                "base::string",
                path,
                value,
                ValidationErrorKind::MaxLength(max_length as u64),
                None,
            );
            return None;
        }
        Some(value.into())
    }

    /// Trimmed text where blank reads as absent.
    pub fn optional_text(
        &mut self,
        path: &str,
        value: Option<&str>,
        max_length: usize,
    ) -> Option<Option<String>> {
        match value.map(str::trim) {
            None | Some("") => Some(None),
            Some(value) => self.required_text(path, value, max_length).map(Some),
        }
    }
}

pub mod iam {
    use super::FieldErrors;
    use crate::{
        app::resource::iam::{ChangePassword, CreateUser},
        domain::datatype::{is_email, is_person_name, EMAIL_PATTERN, PERSON_NAME_PATTERN},
        error::resource::{ValidationErrorKind, ValidationFieldError},
    };

    pub const NAME_MAX_LENGTH: usize = 30;
    pub const EMAIL_MAX_LENGTH: usize = 254;
    pub const PASSWORD_MIN_LENGTH: usize = 8;

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "qwerty123",
        "qwertyuiop",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "welcome1",
        "abc12345",
        "letmein1",
        "trustno1",
        "superman",
        "starwars",
        "passw0rd",
        "hackathon",
    ];

    pub fn email(errors: &mut FieldErrors, path: &str, value: &str) {
        if value.is_empty() {
            errors.add("base::email", path, value, ValidationErrorKind::Required, None);
        } else if value.len() > EMAIL_MAX_LENGTH {
            errors.add(
                "base::email",
                path,
                value,
                ValidationErrorKind::MaxLength(EMAIL_MAX_LENGTH as u64),
                None,
            );
        } else if !is_email(value) {
            errors.add(
                "base::email",
                path,
                value,
                ValidationErrorKind::Pattern(EMAIL_PATTERN.into()),
                Some("Enter a valid email address."),
            );
        }
    }

    fn person_name(errors: &mut FieldErrors, path: &str, value: &str) {
        if value.trim().is_empty() {
            errors.add("base::person_name", path, value, ValidationErrorKind::Required, None);
        } else if !is_person_name(value) {
            errors.add(
                "base::person_name",
                path,
                value,
                ValidationErrorKind::Pattern(PERSON_NAME_PATTERN.into()),
                Some("This doesn't seem like a name, please enter a valid name (no special characters)"),
            );
        } else if value.chars().count() > NAME_MAX_LENGTH {
            errors.add(
                "base::person_name",
                path,
                value,
                ValidationErrorKind::MaxLength(NAME_MAX_LENGTH as u64),
                Some("This input seems too long to be a name, please enter a valid name"),
            );
        }
    }

    /// Strength rules of a new password.
    pub fn password(errors: &mut FieldErrors, path: &str, value: &str) {
        let mut push = |kind, message: String| {
            errors.push(
                ValidationFieldError::new("base::password", String::new(), path.into(), vec![kind])
                    .with_message(message),
            )
        };

        if value.chars().count() < PASSWORD_MIN_LENGTH {
            push(
                ValidationErrorKind::MinLength(PASSWORD_MIN_LENGTH as u64),
                format!(
                    "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
                ),
            );
        }
        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            push(
                ValidationErrorKind::Weak,
                "This password is entirely numeric.".into(),
            );
        }
        let lowercase = value.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowercase.as_str()) {
            push(
                ValidationErrorKind::Weak,
                "This password is too common.".into(),
            );
        }
    }

    fn password_confirmation(errors: &mut FieldErrors, path: &str, password: &str, confirm: &str) {
        if password != confirm {
            errors.push(
                ValidationFieldError::new(
                    "base::password",
                    String::new(),
                    path.into(),
                    vec![ValidationErrorKind::Mismatch],
                )
                .with_message("The two password fields didn't match."),
            );
        }
    }

    /// Field rules of a new account, uniqueness of the email excluded.
    pub fn sign_up(dto: &CreateUser) -> Vec<ValidationFieldError> {
        let mut errors = FieldErrors::new();

        email(&mut errors, "/email", &dto.email);
        person_name(&mut errors, "/first_name", &dto.first_name);
        person_name(&mut errors, "/last_name", &dto.last_name);
        password_confirmation(&mut errors, "/password2", &dto.password1, &dto.password2);
        password(&mut errors, "/password1", &dto.password1);

        errors.into_vec()
    }

    pub fn change_password(dto: &ChangePassword) -> Vec<ValidationFieldError> {
        let mut errors = FieldErrors::new();

        password_confirmation(
            &mut errors,
            "/new_password2",
            &dto.new_password1,
            &dto.new_password2,
        );
        password(&mut errors, "/new_password1", &dto.new_password1);

        errors.into_vec()
    }
}

pub mod registration {
    use std::ops::RangeInclusive;

    use url::Url;

    use super::FieldErrors;
    use crate::{
        app::resource::registration::SubmitApplication,
        domain::{
            datatype::{
                choice::{
                    Age, DietaryRestriction, Gender, HighestFormalEducation, Pronouns,
                    SexualIdentity,
                },
                is_phone_number, normalize_phone_number, PHONE_NUMBER_PATTERN,
            },
            entity::registration::ApplicationForm,
        },
        error::resource::{
            OperationCode, OperationError, ValidationErrorKind, ValidationFieldError,
        },
    };

    pub const SHORT_TEXT_MAX_LENGTH: usize = 255;
    pub const FREE_RESPONSE_MAX_LENGTH: usize = 100;
    pub const LONG_ANSWER_MAX_LENGTH: usize = 1000;
    pub const URL_MAX_LENGTH: usize = 200;
    pub const GRADUATION_YEARS: RangeInclusive<i32> = 2000..=2030;
    pub const RESUME_DIR: &str = "applications/resumes/";

    pub(super) fn url(
        errors: &mut FieldErrors,
        path: &str,
        value: Option<&str>,
    ) -> Option<Option<Url>> {
        let value = match value.map(str::trim) {
            None | Some("") => return Some(None),
            Some(value) => value,
        };

        match Url::parse(value) {
            // the normalised form is what gets stored
            Ok(url) if value.len() > URL_MAX_LENGTH || url.as_str().len() > URL_MAX_LENGTH => {
                errors.add(
                    "base::url",
                    path,
                    value,
                    ValidationErrorKind::MaxLength(URL_MAX_LENGTH as u64),
                    None,
                );
                None
            }
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(Some(url)),
            _ if value.len() > URL_MAX_LENGTH => {
                errors.add(
                    "base::url",
                    path,
                    value,
                    ValidationErrorKind::MaxLength(URL_MAX_LENGTH as u64),
                    None,
                );
                None
            }
            _ => {
                errors.add(
                    "base::url",
                    path,
                    value,
                    ValidationErrorKind::Invalid,
                    Some("Enter a valid URL."),
                );
                None
            }
        }
    }

    fn age(errors: &mut FieldErrors, value: Option<u32>, minimum_age: u32) -> Option<Age> {
        let value = match value {
            Some(value) => value,
            None => {
                errors.add("registration::age", "/age", "", ValidationErrorKind::Required, None);
                return None;
            }
        };

        let age = match Age::new(value) {
            Ok(age) => age,
            Err(mut err) => {
                err.path = "/age".into();
                errors.push(err);
                return None;
            }
        };

        // the last bracket reads as "22+" and is always old enough
        if age.value() != Age::MAX && age.value() < minimum_age {
            errors.add(
                "registration::age",
                "/age",
                value,
                ValidationErrorKind::Minimum(minimum_age.into()),
                Some(&format!("You must be {minimum_age} to participate.")),
            );
            return None;
        }

        Some(age)
    }

    fn phone_number(errors: &mut FieldErrors, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            errors.add(
                "base::phone_number",
                "/phone_number",
                value,
                ValidationErrorKind::Required,
                None,
            );
            return None;
        }
        if !is_phone_number(value) {
            errors.add(
                "base::phone_number",
                "/phone_number",
                value,
                ValidationErrorKind::Pattern(PHONE_NUMBER_PATTERN.into()),
                Some("Enter a valid phone number."),
            );
            return None;
        }
        Some(normalize_phone_number(value))
    }

    fn graduation_year(errors: &mut FieldErrors, value: Option<i32>) -> Option<i32> {
        match value {
            None => {
                errors.add(
                    "base::i32",
                    "/graduation_year",
                    "",
                    ValidationErrorKind::Required,
                    None,
                );
                None
            }
            Some(year) if GRADUATION_YEARS.contains(&year) => Some(year),
            Some(year) => {
                let kind = if year < *GRADUATION_YEARS.start() {
                    ValidationErrorKind::Minimum((*GRADUATION_YEARS.start()).into())
                } else {
                    ValidationErrorKind::Maximum((*GRADUATION_YEARS.end()).into())
                };
                errors.add(
                    "base::i32",
                    "/graduation_year",
                    year,
                    kind,
                    Some("Enter a realistic graduation year."),
                );
                None
            }
        }
    }

    /// Uploaded resumes are the only accepted files.
    pub fn is_resume_path(value: &str) -> bool {
        value
            .strip_prefix(RESUME_DIR)
            .map(|name| {
                name.len() > ".pdf".len()
                    && name.ends_with(".pdf")
                    && !name.contains('/')
                    && !name.contains("..")
            })
            .unwrap_or(false)
    }

    fn resume(errors: &mut FieldErrors, value: &str) -> Option<String> {
        if value.is_empty() {
            errors.add("registration::resume", "/resume", value, ValidationErrorKind::Required, None);
            return None;
        }
        if !is_resume_path(value) {
            errors.add(
                "registration::resume",
                "/resume",
                value,
                ValidationErrorKind::NotFound,
                Some("Upload your resume before submitting the application."),
            );
            return None;
        }
        Some(value.into())
    }

    fn agreement(errors: &mut FieldErrors, path: &str, value: bool) -> bool {
        if !value {
            errors.add("base::bool", path, value, ValidationErrorKind::Required, None);
        }
        value
    }

    fn free_response(
        errors: &mut FieldErrors,
        path: &str,
        required: bool,
        value: &Option<String>,
        message: &str,
    ) {
        if required && value.is_none() {
            errors.add(
                "base::string",
                path,
                "",
                ValidationErrorKind::Required,
                Some(message),
            );
        }
    }

    /// Free text fields that become required by the choice of another field.
    pub fn free_responses(form: &ApplicationForm) -> Vec<ValidationFieldError> {
        let mut errors = FieldErrors::new();

        free_response(
            &mut errors,
            "/free_response_pronouns",
            form.pronouns == Pronouns::Other,
            &form.free_response_pronouns,
            "Since you've selected 'Other' for pronouns, please state what pronouns you go by.",
        );
        free_response(
            &mut errors,
            "/free_response_gender",
            form.gender == Gender::SelfDescribe,
            &form.free_response_gender,
            "Since you've selected 'Prefer to Self Describe' for gender, please state how you would like to be addressed",
        );
        free_response(
            &mut errors,
            "/free_response_sexual_identity",
            form.sexual_identity == SexualIdentity::DifferentIdentity,
            &form.free_response_sexual_identity,
            "You've selected 'Different Identity', please state how you would like to identify yourself",
        );
        free_response(
            &mut errors,
            "/free_response_dietary_restrictions",
            matches!(
                form.dietary_restrictions,
                DietaryRestriction::Allergies | DietaryRestriction::Other
            ),
            &form.free_response_dietary_restrictions,
            "Please provide more information about your dietary restrictions.",
        );
        free_response(
            &mut errors,
            "/free_response_highest_formal_education",
            form.highest_formal_education == HighestFormalEducation::Other,
            &form.free_response_highest_formal_education,
            "You've selected 'Other' for highest formal education, please elaborate in the corresponding field.",
        );

        errors.into_vec()
    }

    /// Check every field of a submitted application.
    pub fn application(
        dto: &SubmitApplication,
        minimum_age: u32,
    ) -> Result<ApplicationForm, Vec<ValidationFieldError>> {
        let mut errors = FieldErrors::new();
        let e = &mut errors;

        let age = age(e, dto.age, minimum_age);
        let pronouns = e.choice("/pronouns", &dto.pronouns);
        let free_response_pronouns = e.optional_text(
            "/free_response_pronouns",
            dto.free_response_pronouns.as_deref(),
            FREE_RESPONSE_MAX_LENGTH,
        );
        let gender = e.choice("/gender", &dto.gender);
        let free_response_gender = e.optional_text(
            "/free_response_gender",
            dto.free_response_gender.as_deref(),
            FREE_RESPONSE_MAX_LENGTH,
        );
        let ethnicity = match dto.ethnicity.as_deref() {
            None | Some("") => Some(None),
            Some(value) => e.choice("/ethnicity", value).map(Some),
        };
        let phone_number = phone_number(e, &dto.phone_number);
        let city = e.required_text("/city", &dto.city, SHORT_TEXT_MAX_LENGTH);
        let country = e.required_text("/country", &dto.country, SHORT_TEXT_MAX_LENGTH);
        let tshirt_size = e.choice("/tshirt_size", &dto.tshirt_size);
        let dietary_restrictions = e.choice("/dietary_restrictions", &dto.dietary_restrictions);
        let free_response_dietary_restrictions = e.optional_text(
            "/free_response_dietary_restrictions",
            dto.free_response_dietary_restrictions.as_deref(),
            FREE_RESPONSE_MAX_LENGTH,
        );
        let under_represented_group =
            e.choice("/under_represented_group", &dto.under_represented_group);
        let sexual_identity = e.choice("/sexual_identity", &dto.sexual_identity);
        let free_response_sexual_identity = e.optional_text(
            "/free_response_sexual_identity",
            dto.free_response_sexual_identity.as_deref(),
            FREE_RESPONSE_MAX_LENGTH,
        );
        let highest_formal_education =
            e.choice("/highest_formal_education", &dto.highest_formal_education);
        let free_response_highest_formal_education = e.optional_text(
            "/free_response_highest_formal_education",
            dto.free_response_highest_formal_education.as_deref(),
            FREE_RESPONSE_MAX_LENGTH,
        );
        let school = e.required_text("/school", &dto.school, SHORT_TEXT_MAX_LENGTH);
        let study_level = e.choice("/study_level", &dto.study_level);
        let graduation_year = graduation_year(e, dto.graduation_year);
        let program = e.required_text("/program", &dto.program, SHORT_TEXT_MAX_LENGTH);
        let resume = resume(e, &dto.resume);
        let linkedin = url(e, "/linkedin", dto.linkedin.as_deref());
        let github = url(e, "/github", dto.github.as_deref());
        let devpost = url(e, "/devpost", dto.devpost.as_deref());
        let how_many_hackathons = e.choice("/how_many_hackathons", &dto.how_many_hackathons);
        let past_hackathon_info = e.optional_text(
            "/past_hackathon_info",
            dto.past_hackathon_info.as_deref(),
            LONG_ANSWER_MAX_LENGTH,
        );
        let what_past_experience = e.required_text(
            "/what_past_experience",
            &dto.what_past_experience,
            LONG_ANSWER_MAX_LENGTH,
        );
        let why_participate =
            e.required_text("/why_participate", &dto.why_participate, LONG_ANSWER_MAX_LENGTH);
        let what_technical_experience = e.required_text(
            "/what_technical_experience",
            &dto.what_technical_experience,
            LONG_ANSWER_MAX_LENGTH,
        );
        let what_role_in_team_setting = e.required_text(
            "/what_role_in_team_setting",
            &dto.what_role_in_team_setting,
            LONG_ANSWER_MAX_LENGTH,
        );
        let discovery_method = e.choice("/discovery_method", &dto.discovery_method);
        let conduct_agree = agreement(e, "/conduct_agree", dto.conduct_agree);
        let logistics_agree = agreement(e, "/logistics_agree", dto.logistics_agree);

        let form = (|| {
            Some(ApplicationForm {
                age: age?,
                pronouns: pronouns?,
                free_response_pronouns: free_response_pronouns?,
                gender: gender?,
                free_response_gender: free_response_gender?,
                ethnicity: ethnicity?,
                phone_number: phone_number?,
                city: city?,
                country: country?,
                tshirt_size: tshirt_size?,
                dietary_restrictions: dietary_restrictions?,
                free_response_dietary_restrictions: free_response_dietary_restrictions?,
                under_represented_group: under_represented_group?,
                sexual_identity: sexual_identity?,
                free_response_sexual_identity: free_response_sexual_identity?,
                highest_formal_education: highest_formal_education?,
                free_response_highest_formal_education: free_response_highest_formal_education?,
                school: school?,
                study_level: study_level?,
                graduation_year: graduation_year?,
                program: program?,
                resume: resume?,
                linkedin: linkedin?,
                github: github?,
                devpost: devpost?,
                how_many_hackathons: how_many_hackathons?,
                past_hackathon_info: past_hackathon_info?,
                what_past_experience: what_past_experience?,
                why_participate: why_participate?,
                what_technical_experience: what_technical_experience?,
                what_role_in_team_setting: what_role_in_team_setting?,
                discovery_method: discovery_method?,
                conduct_agree,
                logistics_agree,
                email_agree: dto.email_agree,
                resume_sharing: dto.resume_sharing,
            })
        })();

        match form {
            Some(form) if errors.is_empty() => {
                let free_response_errors = free_responses(&form);
                if free_response_errors.is_empty() {
                    Ok(form)
                } else {
                    Err(free_response_errors)
                }
            }
            _ => Err(errors.into_vec()),
        }
    }

    /// A team can receive one more member.
    pub fn team_capacity(
        team_code: &str,
        members: u32,
        max_members: u32,
    ) -> Result<(), OperationError> {
        if members >= max_members {
            return Err(OperationError::new(
                OperationCode::TeamFull,
                format!("Team {team_code} is full."),
            ));
        }
        Ok(())
    }
}

pub mod review {
    use chrono::NaiveDate;

    use crate::{
        domain::{datatype::choice::ReviewStatus, schedule::EventSchedule},
        error::resource::{OperationCode, OperationError},
    };

    /// Decision of a review, as seen by the applicant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Decision {
        pub status: ReviewStatus,
        pub decision_sent_date: Option<NaiveDate>,
    }

    /// Only accepted applicants that received the decision can RSVP, until
    /// the deadline has passed.
    pub fn rsvp(
        rsvp_enabled: bool,
        schedule: &EventSchedule,
        decision: Option<Decision>,
        today: NaiveDate,
    ) -> Result<(), OperationError> {
        if !rsvp_enabled {
            return Err(OperationError::new(
                OperationCode::RsvpDisabled,
                "RSVP is not required for this event.",
            ));
        }

        match decision {
            Some(Decision {
                status: ReviewStatus::Accepted,
                decision_sent_date: Some(sent),
            }) => {
                if schedule.is_rsvp_passed(sent, today) {
                    Err(OperationError::new(
                        OperationCode::RsvpClosed,
                        format!(
                            "The RSVP deadline of {} has passed.",
                            schedule.rsvp_deadline(sent)
                        ),
                    ))
                } else {
                    Ok(())
                }
            }
            _ => Err(OperationError::new(
                OperationCode::NotAccepted,
                "You have not been accepted to the hackathon.",
            )),
        }
    }
}

pub mod event {
    use super::FieldErrors;
    use crate::{
        domain::datatype::choice::ReviewStatus,
        error::resource::{OperationCode, OperationError, ValidationErrorKind, ValidationFieldError},
    };

    pub const E_SIGNATURE_MAX_LENGTH: usize = 255;

    /// Rules acknowledgement of a profile, returns the trimmed signature.
    pub fn rules_agreement(
        acknowledge_rules: bool,
        e_signature: Option<&str>,
        signature_required: bool,
    ) -> Result<Option<String>, Vec<ValidationFieldError>> {
        let mut errors = FieldErrors::new();

        if !acknowledge_rules {
            errors.add(
                "base::bool",
                "/acknowledge_rules",
                acknowledge_rules,
                ValidationErrorKind::Required,
                Some("You must acknowledge the rules."),
            );
        }

        let e_signature = if signature_required {
            errors
                .required_text(
                    "/e_signature",
                    e_signature.unwrap_or_default(),
                    E_SIGNATURE_MAX_LENGTH,
                )
                .map(Some)
        } else {
            errors.optional_text("/e_signature", e_signature, E_SIGNATURE_MAX_LENGTH)
        };

        match e_signature {
            Some(e_signature) if errors.is_empty() => Ok(e_signature),
            _ => Err(errors.into_vec()),
        }
    }

    /// Registration record of a participant at the time of an event
    /// operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Participation {
        pub review_status: Option<ReviewStatus>,
        pub rsvp: Option<bool>,
    }

    /// Who may create an event profile.
    pub fn profile(
        rsvp_enabled: bool,
        waitlisted_acceptance_open: bool,
        participation: Option<Participation>,
    ) -> Result<(), OperationError> {
        let participation = participation.ok_or_else(|| {
            OperationError::new(
                OperationCode::ApplicationRequired,
                "You must submit an application first.",
            )
        })?;

        match participation.review_status {
            Some(ReviewStatus::Accepted) => {
                if rsvp_enabled && participation.rsvp != Some(true) {
                    Err(OperationError::new(
                        OperationCode::NotRsvped,
                        "You must RSVP to the hackathon before creating a profile.",
                    ))
                } else {
                    Ok(())
                }
            }
            Some(ReviewStatus::Waitlisted) if waitlisted_acceptance_open => Ok(()),
            _ => Err(OperationError::new(
                OperationCode::NotAccepted,
                "You have not been accepted to the hackathon.",
            )),
        }
    }

    /// Whether a participant can be signed in to an event by an organizer.
    pub fn sign_in(
        email: &str,
        hackathon_name: &str,
        rsvp_enabled: bool,
        participation: Option<Participation>,
    ) -> Result<(), OperationError> {
        let participation = participation.ok_or_else(|| {
            OperationError::new(
                OperationCode::NotApplied,
                format!("User {email} has not applied to {hackathon_name}"),
            )
        })?;

        match participation.review_status {
            Some(ReviewStatus::Accepted) if rsvp_enabled && participation.rsvp.is_none() => {
                Err(OperationError::new(
                    OperationCode::NotRsvped,
                    format!("User {email} has not RSVP'd to the hackathon"),
                ))
            }
            Some(ReviewStatus::Accepted) => Ok(()),
            _ => Err(OperationError::new(
                OperationCode::NotAccepted,
                format!("User {email} has not been Accepted to attend {hackathon_name}"),
            )),
        }
    }
}

pub mod hardware {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::FieldErrors;
    use crate::{
        app::resource::hardware::{CreateHardware, OrderItemRequest},
        domain::entity::hardware::Hardware,
        error::resource::{OperationCode, OperationError, ValidationErrorKind, ValidationFieldError},
    };

    pub const TEXT_MAX_LENGTH: usize = 255;
    /// Quantities are stored as INTEGER columns.
    pub const QUANTITY_MAX: u32 = i32::MAX as u32;

    fn quantity(errors: &mut Vec<ValidationFieldError>, path: String, value: u32) -> bool {
        if value > QUANTITY_MAX {
            errors.push(ValidationFieldError::new(
                "base::u32",
                value.to_string(),
                path,
                vec![ValidationErrorKind::Maximum(QUANTITY_MAX.into())],
            ));
            return false;
        }
        true
    }

    /// Availability of a hardware item for the ordering team.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Stock {
        pub name: String,
        pub quantity_remaining: u32,
        pub max_per_team: Option<u32>,
        /// Units already held by the team
        pub team_holding: u32,
    }

    /// New item of the hardware inventory.
    pub fn hardware(dto: &CreateHardware) -> Result<Hardware, Vec<ValidationFieldError>> {
        let mut errors = FieldErrors::new();
        let name = errors.required_text("/name", &dto.name, TEXT_MAX_LENGTH);
        let model_number = errors.required_text("/model_number", &dto.model_number, TEXT_MAX_LENGTH);
        let manufacturer = errors.required_text("/manufacturer", &dto.manufacturer, TEXT_MAX_LENGTH);
        let datasheet =
            super::registration::url(&mut errors, "/datasheet", dto.datasheet.as_deref());
        let mut bounds = Vec::new();
        quantity(&mut bounds, "/quantity_available".into(), dto.quantity_available);
        if let Some(max) = dto.max_per_team {
            quantity(&mut bounds, "/max_per_team".into(), max);
        }
        for err in bounds {
            errors.push(err);
        }

        match (name, model_number, manufacturer, datasheet) {
            (Some(name), Some(model_number), Some(manufacturer), Some(datasheet))
                if errors.is_empty() =>
            {
                Ok(Hardware::new(
                    name,
                    model_number,
                    manufacturer,
                    datasheet,
                    dto.quantity_available,
                    dto.max_per_team,
                    dto.notes.trim().into(),
                ))
            }
            _ => Err(errors.into_vec()),
        }
    }

    pub fn team_size(members: u32, min: u32, max: u32) -> Result<(), OperationError> {
        if !(min..=max).contains(&members) {
            return Err(OperationError::new(
                OperationCode::TeamSize,
                format!("A team must have between {min} and {max} members to order hardware."),
            ));
        }
        Ok(())
    }

    /// Merge the requested quantities per hardware item.
    pub fn order_items(
        items: &[OrderItemRequest],
    ) -> Result<Vec<(Uuid, u32)>, Vec<ValidationFieldError>> {
        let mut errors = Vec::new();
        let mut merged: Vec<(Uuid, u32)> = Vec::new();

        if items.is_empty() {
            errors.push(ValidationFieldError::new(
                "hardware::order_items",
                String::new(),
                "/items".into(),
                vec![ValidationErrorKind::Required],
            ));
        }

        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                errors.push(ValidationFieldError::new(
                    "base::u32",
                    item.quantity.to_string(),
                    format!("/items/{index}/quantity"),
                    vec![ValidationErrorKind::Positive],
                ));
                continue;
            }
            let path = format!("/items/{index}/quantity");
            if !quantity(&mut errors, path.clone(), item.quantity) {
                continue;
            }
            match merged.iter_mut().find(|(id, _)| *id == item.hardware_id) {
                Some((_, total)) => match total.checked_add(item.quantity) {
                    Some(sum) if sum <= QUANTITY_MAX => *total = sum,
                    _ => {
                        errors.push(ValidationFieldError::new(
                            "base::u32",
                            item.quantity.to_string(),
                            path,
                            vec![ValidationErrorKind::Maximum(QUANTITY_MAX.into())],
                        ));
                    }
                },
                None => merged.push((item.hardware_id, item.quantity)),
            }
        }

        if errors.is_empty() {
            Ok(merged)
        } else {
            Err(errors)
        }
    }

    /// Stock and per team limit of every requested item.
    pub fn availability(
        requested: &[(Uuid, u32)],
        stock: &HashMap<Uuid, Stock>,
    ) -> Result<(), OperationError> {
        for (hardware_id, quantity) in requested {
            let item = stock.get(hardware_id).ok_or_else(|| {
                OperationError::new(
                    OperationCode::InsufficientStock,
                    format!("Hardware {hardware_id} does not exist."),
                )
            })?;

            if *quantity > item.quantity_remaining {
                return Err(OperationError::new(
                    OperationCode::InsufficientStock,
                    format!(
                        "Only {} of {} remaining.",
                        item.quantity_remaining, item.name
                    ),
                ));
            }

            if let Some(max) = item.max_per_team {
                if item.team_holding.saturating_add(*quantity) > max {
                    return Err(OperationError::new(
                        OperationCode::TeamLimitExceeded,
                        format!("A team can hold at most {max} of {}.", item.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::{
        app::resource::{
            hardware::OrderItemRequest,
            iam::CreateUser,
            registration::SubmitApplication,
        },
        domain::{datatype::choice::ReviewStatus, schedule::EventSchedule},
        error::resource::OperationCode,
    };

    fn application_dto() -> SubmitApplication {
        SubmitApplication {
            age: Some(20),
            pronouns: "she-her".into(),
            gender: "woman".into(),
            ethnicity: Some("no-answer".into()),
            phone_number: "+1 (123) 456-7890".into(),
            city: "Toronto".into(),
            country: "Canada".into(),
            tshirt_size: "M".into(),
            dietary_restrictions: "none".into(),
            under_represented_group: "no".into(),
            sexual_identity: "prefer-to-not-answer".into(),
            highest_formal_education: "secondary-or-high-school".into(),
            school: "UofT".into(),
            study_level: "undergraduate-3-year".into(),
            graduation_year: Some(2026),
            program: "Engineering".into(),
            resume: "applications/resumes/4f1e.pdf".into(),
            linkedin: Some("https://linkedin.com/in/someone".into()),
            github: Some(String::new()),
            devpost: None,
            how_many_hackathons: "1".into(),
            past_hackathon_info: None,
            what_past_experience: "Built a robot".into(),
            why_participate: "To learn".into(),
            what_technical_experience: "Rust".into(),
            what_role_in_team_setting: "Backend".into(),
            discovery_method: "word-of-mouth".into(),
            conduct_agree: true,
            logistics_agree: true,
            email_agree: false,
            resume_sharing: true,
            ..Default::default()
        }
    }

    fn paths(errors: &[crate::error::resource::ValidationFieldError]) -> Vec<&str> {
        errors.iter().map(|err| err.path.as_str()).collect()
    }

    #[test]
    fn sign_up_fields() {
        let dto = CreateUser {
            email: "not-an-email".into(),
            first_name: "Robert');".into(),
            last_name: "A name that is way too long to be a real one".into(),
            password1: "12345678".into(),
            password2: "12345679".into(),
        };

        let errors = iam::sign_up(&dto);

        assert_eq!(
            paths(&errors),
            vec![
                "/email",
                "/first_name",
                "/last_name",
                "/password2",
                "/password1",
                "/password1"
            ]
        );
        assert_eq!(
            errors[5].message.as_deref(),
            Some("This password is too common.")
        );
    }

    #[test]
    fn valid_sign_up() {
        let dto = CreateUser {
            email: "Foo@Bar.com".into(),
            first_name: "Mary-Jane".into(),
            last_name: "Watson".into(),
            password1: "correct horse battery".into(),
            password2: "correct horse battery".into(),
        };

        assert_eq!(iam::sign_up(&dto), vec![]);
    }

    #[test]
    fn valid_application_normalizes_fields() {
        let form = registration::application(&application_dto(), 18).unwrap();

        assert_eq!(form.phone_number, "11234567890");
        assert_eq!(form.github, None);
        assert_eq!(
            form.linkedin.map(String::from).as_deref(),
            Some("https://linkedin.com/in/someone")
        );
        assert_eq!(form.free_response_pronouns, None);
    }

    #[test]
    fn application_collects_every_field_error() {
        let dto = SubmitApplication {
            age: Some(17),
            pronouns: "it-its".into(),
            phone_number: "12345".into(),
            graduation_year: Some(1990),
            devpost: Some("not a url".into()),
            resume: "../../etc/passwd".into(),
            logistics_agree: false,
            ..application_dto()
        };

        let errors = registration::application(&dto, 18).unwrap_err();

        assert_eq!(
            paths(&errors),
            vec![
                "/age",
                "/pronouns",
                "/phone_number",
                "/graduation_year",
                "/resume",
                "/devpost",
                "/logistics_agree"
            ]
        );
        assert_eq!(
            errors[0].message.as_deref(),
            Some("You must be 18 to participate.")
        );
        assert_eq!(
            errors[3].message.as_deref(),
            Some("Enter a realistic graduation year.")
        );
    }

    #[test]
    fn oldest_age_bracket_is_never_too_young() {
        let dto = SubmitApplication {
            age: Some(23),
            ..application_dto()
        };

        assert!(registration::application(&dto, 30).is_ok());
    }

    #[test]
    fn free_response_requirements() {
        let cases = [
            ("/free_response_pronouns", SubmitApplication {
                pronouns: "other".into(),
                ..application_dto()
            }),
            ("/free_response_gender", SubmitApplication {
                gender: "prefer-to-self-describe".into(),
                ..application_dto()
            }),
            ("/free_response_dietary_restrictions", SubmitApplication {
                dietary_restrictions: "allergies".into(),
                free_response_dietary_restrictions: Some("   ".into()),
                ..application_dto()
            }),
            ("/free_response_dietary_restrictions", SubmitApplication {
                dietary_restrictions: "other".into(),
                ..application_dto()
            }),
            ("/free_response_sexual_identity", SubmitApplication {
                sexual_identity: "different-identity".into(),
                ..application_dto()
            }),
            ("/free_response_highest_formal_education", SubmitApplication {
                highest_formal_education: "other".into(),
                ..application_dto()
            }),
        ];

        for (path, dto) in cases {
            let errors = registration::application(&dto, 18).unwrap_err();
            assert_eq!(paths(&errors), vec![path]);
        }

        let answered = SubmitApplication {
            pronouns: "other".into(),
            free_response_pronouns: Some("xe/xem".into()),
            ..application_dto()
        };
        assert!(registration::application(&answered, 18).is_ok());
    }

    #[test]
    fn resume_paths() {
        assert!(registration::is_resume_path("applications/resumes/abc.pdf"));
        assert!(!registration::is_resume_path("applications/resumes/.pdf"));
        assert!(!registration::is_resume_path("applications/resumes/abc.docx"));
        assert!(!registration::is_resume_path("applications/resumes/../abc.pdf"));
        assert!(!registration::is_resume_path("resumes/abc.pdf"));
    }

    #[test]
    fn team_capacity() {
        assert!(registration::team_capacity("ABCDE", 3, 4).is_ok());
        let err = registration::team_capacity("ABCDE", 4, 4).unwrap_err();
        assert_eq!(err.code, OperationCode::TeamFull);
        assert_eq!(err.message, "Team ABCDE is full.");
    }

    fn schedule() -> EventSchedule {
        let start = Utc.with_ymd_and_hms(2024, 10, 26, 12, 0, 0).unwrap();
        EventSchedule {
            registration_open: start - Duration::days(200),
            registration_close: start - Duration::days(14),
            application_open: start - Duration::days(30),
            event_start: start,
            event_end: start + Duration::hours(33),
            hardware_sign_out_start: start,
            hardware_sign_out_end: start + Duration::hours(33),
            waitlisted_acceptance_start: start + Duration::hours(1),
            final_review_response_date: start - Duration::days(7),
            rsvp_days: 10,
        }
    }

    #[test]
    fn rsvp_rules() {
        let schedule = schedule();
        let sent = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let accepted = review::Decision {
            status: ReviewStatus::Accepted,
            decision_sent_date: Some(sent),
        };

        assert!(review::rsvp(true, &schedule, Some(accepted), sent + Duration::days(10)).is_ok());
        assert_eq!(
            review::rsvp(true, &schedule, Some(accepted), sent + Duration::days(11))
                .unwrap_err()
                .code,
            OperationCode::RsvpClosed
        );
        assert_eq!(
            review::rsvp(false, &schedule, Some(accepted), sent).unwrap_err().code,
            OperationCode::RsvpDisabled
        );

        let unsent = review::Decision {
            decision_sent_date: None,
            ..accepted
        };
        let waitlisted = review::Decision {
            status: ReviewStatus::Waitlisted,
            ..accepted
        };
        for decision in [None, Some(unsent), Some(waitlisted)] {
            assert_eq!(
                review::rsvp(true, &schedule, decision, sent).unwrap_err().code,
                OperationCode::NotAccepted
            );
        }
    }

    fn participation(
        review_status: Option<ReviewStatus>,
        rsvp: Option<bool>,
    ) -> Option<event::Participation> {
        Some(event::Participation { review_status, rsvp })
    }

    #[test]
    fn sign_in_eligibility() {
        let email = "foo@bar.com";
        let sign_in = |rsvp_enabled, participation| {
            event::sign_in(email, "NewHacks", rsvp_enabled, participation)
        };

        assert!(sign_in(true, participation(Some(ReviewStatus::Accepted), Some(true))).is_ok());
        assert!(sign_in(true, participation(Some(ReviewStatus::Accepted), Some(false))).is_ok());
        assert!(sign_in(false, participation(Some(ReviewStatus::Accepted), None)).is_ok());

        let err = sign_in(true, None).unwrap_err();
        assert_eq!(err.code, OperationCode::NotApplied);
        assert_eq!(err.message, "User foo@bar.com has not applied to NewHacks");

        let err = sign_in(true, participation(Some(ReviewStatus::Accepted), None)).unwrap_err();
        assert_eq!(err.code, OperationCode::NotRsvped);
        assert_eq!(err.message, "User foo@bar.com has not RSVP'd to the hackathon");

        for status in [
            None,
            Some(ReviewStatus::Waitlisted),
            Some(ReviewStatus::Rejected),
            Some(ReviewStatus::Incomplete),
        ] {
            let err = sign_in(true, participation(status, Some(true))).unwrap_err();
            assert_eq!(err.code, OperationCode::NotAccepted);
            assert_eq!(
                err.message,
                "User foo@bar.com has not been Accepted to attend NewHacks"
            );
        }
    }

    #[test]
    fn profile_eligibility() {
        let accepted = |rsvp| participation(Some(ReviewStatus::Accepted), rsvp);
        let waitlisted = participation(Some(ReviewStatus::Waitlisted), None);

        assert!(event::profile(true, false, accepted(Some(true))).is_ok());
        assert!(event::profile(false, false, accepted(None)).is_ok());
        assert_eq!(
            event::profile(true, false, accepted(Some(false))).unwrap_err().code,
            OperationCode::NotRsvped
        );
        assert_eq!(
            event::profile(true, false, waitlisted).unwrap_err().code,
            OperationCode::NotAccepted
        );
        assert!(event::profile(true, true, waitlisted).is_ok());
        assert_eq!(
            event::profile(true, true, None).unwrap_err().code,
            OperationCode::ApplicationRequired
        );
        assert_eq!(
            event::profile(true, true, participation(Some(ReviewStatus::Rejected), None))
                .unwrap_err()
                .code,
            OperationCode::NotAccepted
        );
    }

    #[test]
    fn order_items_are_merged_per_hardware() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let items = vec![
            OrderItemRequest { hardware_id: a, quantity: 1 },
            OrderItemRequest { hardware_id: b, quantity: 2 },
            OrderItemRequest { hardware_id: a, quantity: 2 },
        ];

        assert_eq!(hardware::order_items(&items).unwrap(), vec![(a, 3), (b, 2)]);

        let zero = vec![OrderItemRequest { hardware_id: a, quantity: 0 }];
        let errors = hardware::order_items(&zero).unwrap_err();
        assert_eq!(paths(&errors), vec!["/items/0/quantity"]);
        assert!(hardware::order_items(&[]).is_err());
    }

    #[test]
    fn order_quantities_fit_an_integer_column() {
        let id = Uuid::new_v4();
        let items = vec![
            OrderItemRequest { hardware_id: id, quantity: hardware::QUANTITY_MAX },
            OrderItemRequest { hardware_id: id, quantity: 2 },
        ];
        let errors = hardware::order_items(&items).unwrap_err();
        assert_eq!(paths(&errors), vec!["/items/1/quantity"]);

        let items = vec![OrderItemRequest { hardware_id: id, quantity: u32::MAX }];
        let errors = hardware::order_items(&items).unwrap_err();
        assert_eq!(paths(&errors), vec!["/items/0/quantity"]);
        assert_eq!(
            errors[0].kinds,
            vec![ValidationErrorKind::Maximum(i32::MAX.into())]
        );
    }

    #[test]
    fn team_holding_near_the_limit_does_not_overflow() {
        let id = Uuid::new_v4();
        let stock = HashMap::from([(
            id,
            hardware::Stock {
                name: "Arduino".into(),
                quantity_remaining: u32::MAX,
                max_per_team: Some(u32::MAX),
                team_holding: u32::MAX,
            },
        )]);

        assert_eq!(
            hardware::availability(&[(id, 1)], &stock).unwrap_err().code,
            OperationCode::TeamLimitExceeded
        );
    }

    #[test]
    fn order_availability() {
        let id = Uuid::new_v4();
        let stock = HashMap::from([(
            id,
            hardware::Stock {
                name: "Arduino".into(),
                quantity_remaining: 3,
                max_per_team: Some(2),
                team_holding: 1,
            },
        )]);

        assert!(hardware::availability(&[(id, 1)], &stock).is_ok());
        assert_eq!(
            hardware::availability(&[(id, 2)], &stock).unwrap_err().code,
            OperationCode::TeamLimitExceeded
        );
        assert_eq!(
            hardware::availability(&[(id, 4)], &stock).unwrap_err().code,
            OperationCode::InsufficientStock
        );
        assert_eq!(
            hardware::availability(&[(Uuid::new_v4(), 1)], &stock)
                .unwrap_err()
                .code,
            OperationCode::InsufficientStock
        );
    }

    #[test]
    fn team_size_bounds() {
        assert!(hardware::team_size(2, 2, 4).is_ok());
        assert!(hardware::team_size(4, 2, 4).is_ok());
        assert_eq!(
            hardware::team_size(1, 2, 4).unwrap_err().code,
            OperationCode::TeamSize
        );
    }

    #[test]
    fn hardware_requires_names_and_web_datasheet() {
        let dto = crate::app::resource::hardware::CreateHardware {
            name: " Arduino Uno ".into(),
            model_number: "A000066".into(),
            manufacturer: "Arduino".into(),
            datasheet: Some("https://docs.arduino.cc/uno.pdf".into()),
            quantity_available: 10,
            max_per_team: Some(2),
            notes: String::new(),
        };
        let hardware = hardware::hardware(&dto).unwrap();
        assert_eq!(hardware.name(), "Arduino Uno");
        assert_eq!(hardware.max_per_team(), Some(2));

        let dto = crate::app::resource::hardware::CreateHardware {
            name: String::new(),
            datasheet: Some("ftp://docs.arduino.cc".into()),
            ..dto
        };
        let errors = hardware::hardware(&dto).unwrap_err();
        assert_eq!(paths(&errors), vec!["/name", "/datasheet"]);
    }

    #[test]
    fn hardware_quantities_are_bounded() {
        let dto = crate::app::resource::hardware::CreateHardware {
            name: "Arduino Uno".into(),
            model_number: "A000066".into(),
            manufacturer: "Arduino".into(),
            datasheet: None,
            quantity_available: u32::MAX,
            max_per_team: Some(hardware::QUANTITY_MAX + 1),
            notes: String::new(),
        };
        let errors = hardware::hardware(&dto).unwrap_err();
        assert_eq!(paths(&errors), vec!["/quantity_available", "/max_per_team"]);

        let dto = crate::app::resource::hardware::CreateHardware {
            quantity_available: hardware::QUANTITY_MAX,
            max_per_team: None,
            ..dto
        };
        assert!(hardware::hardware(&dto).is_ok());
    }

    #[test]
    fn url_length_is_checked_on_the_stored_form() {
        // 200 characters, normalised with a trailing slash
        let value = format!("https://{}.com", "a".repeat(188));
        assert_eq!(value.len(), 200);

        let mut errors = FieldErrors::new();
        assert_eq!(registration::url(&mut errors, "/github", Some(&value)), None);
        assert_eq!(
            paths(&errors.into_vec()),
            vec!["/github"]
        );

        let value = format!("https://{}.com/", "a".repeat(187));
        let mut errors = FieldErrors::new();
        let url = registration::url(&mut errors, "/github", Some(&value))
            .unwrap()
            .unwrap();
        assert!(errors.is_empty());
        assert_eq!(url.as_str().len(), 200);
    }

    #[test]
    fn profile_rules_agreement() {
        assert_eq!(
            event::rules_agreement(true, Some(" Jane Doe "), true),
            Ok(Some("Jane Doe".into()))
        );
        assert_eq!(event::rules_agreement(true, None, false), Ok(None));

        let errors = event::rules_agreement(false, Some("  "), true).unwrap_err();
        assert_eq!(paths(&errors), vec!["/acknowledge_rules", "/e_signature"]);
    }
}
