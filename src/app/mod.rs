pub mod resource;
pub mod use_case;

pub mod transform {
    use super::resource::{
        event::{ProfileInUserResponse, ProfileResponse},
        hardware::HardwareResponse,
        iam::{UserInProfileResponse, UserResponse},
        registration::ApplicationResponse,
        review::ReviewResponse,
    };
    use crate::domain::entity::{
        event::Profile,
        hardware::Hardware,
        iam::User,
        registration::Application,
        review::Review,
        Entity,
    };

    impl From<(&User, Option<&Profile>)> for UserResponse {
        fn from((user, profile): (&User, Option<&Profile>)) -> Self {
            Self {
                id: user.ident(),
                created: user.created(),
                updated: user.updated(),
                version: user.version(),
                email: user.email().clone(),
                first_name: user.first_name().clone(),
                last_name: user.last_name().clone(),
                is_staff: user.is_staff(),
                profile: profile.map(ProfileInUserResponse::from),
            }
        }
    }

    impl From<&User> for UserInProfileResponse {
        fn from(user: &User) -> Self {
            Self {
                id: user.ident(),
                first_name: user.first_name().clone(),
                last_name: user.last_name().clone(),
                email: user.email().clone(),
            }
        }
    }

    impl From<&Profile> for ProfileInUserResponse {
        fn from(profile: &Profile) -> Self {
            Self {
                id: profile.ident(),
                id_provided: profile.id_provided(),
                attended: profile.attended(),
                acknowledge_rules: profile.acknowledge_rules(),
                e_signature: profile.e_signature().clone(),
                phone_number: profile.phone_number().clone(),
            }
        }
    }

    impl From<&Profile> for ProfileResponse {
        fn from(profile: &Profile) -> Self {
            Self {
                id: profile.ident(),
                id_provided: profile.id_provided(),
                attended: profile.attended(),
                acknowledge_rules: profile.acknowledge_rules(),
                e_signature: profile.e_signature().clone(),
                team: profile.team_id(),
                phone_number: profile.phone_number().clone(),
            }
        }
    }

    impl From<&Application> for ApplicationResponse {
        fn from(application: &Application) -> Self {
            let form = application.form().clone();
            Self {
                id: application.ident(),
                created: application.created(),
                updated: application.updated(),
                version: application.version(),
                user_id: application.user_id(),
                team_id: application.team_id(),
                age: form.age,
                under_age: application.under_age(),
                pronouns: form.pronouns,
                free_response_pronouns: form.free_response_pronouns,
                gender: form.gender,
                free_response_gender: form.free_response_gender,
                ethnicity: form.ethnicity,
                phone_number: form.phone_number,
                city: form.city,
                country: form.country,
                tshirt_size: form.tshirt_size,
                dietary_restrictions: form.dietary_restrictions,
                free_response_dietary_restrictions: form.free_response_dietary_restrictions,
                under_represented_group: form.under_represented_group,
                sexual_identity: form.sexual_identity,
                free_response_sexual_identity: form.free_response_sexual_identity,
                highest_formal_education: form.highest_formal_education,
                free_response_highest_formal_education: form
                    .free_response_highest_formal_education,
                school: form.school,
                study_level: form.study_level,
                graduation_year: form.graduation_year,
                program: form.program,
                resume: form.resume,
                linkedin: form.linkedin,
                github: form.github,
                devpost: form.devpost,
                how_many_hackathons: form.how_many_hackathons,
                past_hackathon_info: form.past_hackathon_info,
                what_past_experience: form.what_past_experience,
                why_participate: form.why_participate,
                what_technical_experience: form.what_technical_experience,
                what_role_in_team_setting: form.what_role_in_team_setting,
                discovery_method: form.discovery_method,
                conduct_agree: form.conduct_agree,
                logistics_agree: form.logistics_agree,
                email_agree: form.email_agree,
                resume_sharing: form.resume_sharing,
                rsvp: application.rsvp(),
            }
        }
    }

    impl From<&Review> for ReviewResponse {
        fn from(review: &Review) -> Self {
            Self {
                id: review.ident(),
                created: review.created(),
                updated: review.updated(),
                version: review.version(),
                application_id: review.application_id(),
                reviewer_id: review.reviewer_id(),
                status: review.status(),
                reviewer_comments: review.reviewer_comments().clone(),
                decision_sent_date: review.decision_sent_date(),
            }
        }
    }

    impl From<(&Hardware, u32)> for HardwareResponse {
        fn from((hardware, quantity_remaining): (&Hardware, u32)) -> Self {
            Self {
                id: hardware.ident(),
                created: hardware.created(),
                updated: hardware.updated(),
                version: hardware.version(),
                name: hardware.name().clone(),
                model_number: hardware.model_number().clone(),
                manufacturer: hardware.manufacturer().clone(),
                datasheet: hardware.datasheet().clone(),
                quantity_available: hardware.quantity_available(),
                quantity_remaining,
                max_per_team: hardware.max_per_team(),
                notes: hardware.notes().clone(),
            }
        }
    }
}
