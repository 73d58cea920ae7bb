use std::str::FromStr;

use sqlx::{postgres::PgRow, Row};
use url::Url;

use super::{
    datatype::{choice::Age, team_code::TeamCode},
    entity::{
        event::{EventTeam, EventTeamState, Profile, ProfileState, UserActivity, UserActivityState},
        hardware::{Hardware, HardwareState, Order, OrderItem, OrderItemState, OrderState},
        iam::{User, UserState},
        registration::{Application, ApplicationForm, ApplicationState, Team, TeamState},
        review::{Review, ReviewState},
        EntityData,
    },
};

type BoxedDecodeError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn parsed<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: Into<BoxedDecodeError>,
{
    let value: String = row.try_get(column)?;
    value.parse().map_err(|err: T::Err| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: err.into(),
    })
}

fn parsed_opt<T>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: Into<BoxedDecodeError>,
{
    let value: Option<String> = row.try_get(column)?;
    value
        .map(|value| value.parse())
        .transpose()
        .map_err(|err: T::Err| sqlx::Error::ColumnDecode {
            index: column.into(),
            source: err.into(),
        })
}

fn url_opt(row: &PgRow, column: &str) -> Result<Option<Url>, sqlx::Error> {
    parsed_opt(row, column)
}

/// Non negative INTEGER column.
fn unsigned(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i32 = row.try_get(column)?;
    u32::try_from(value).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: err.into(),
    })
}

fn unsigned_opt(row: &PgRow, column: &str) -> Result<Option<u32>, sqlx::Error> {
    let value: Option<i32> = row.try_get(column)?;
    value
        .map(u32::try_from)
        .transpose()
        .map_err(|err| sqlx::Error::ColumnDecode {
            index: column.into(),
            source: err.into(),
        })
}

impl TryFrom<&PgRow> for EntityData {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created: row.try_get("created")?,
            updated: row.try_get("updated")?,
            version: unsigned(row, "version")?,
        })
    }
}

macro_rules! entity_from_row {
    ($entity:ty) => {
        impl TryFrom<&PgRow> for $entity {
            type Error = sqlx::Error;

            fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
                Ok(Self::restore(row.try_into()?, row.try_into()?))
            }
        }
    };
}

impl TryFrom<&PgRow> for UserState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            password_hash: parsed(row, "password_hash")?,
            is_staff: row.try_get("is_staff")?,
        })
    }
}

entity_from_row!(User);

impl TryFrom<&PgRow> for TeamState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            team_code: parsed::<TeamCode>(row, "team_code")?,
        })
    }
}

entity_from_row!(Team);

impl TryFrom<&PgRow> for ApplicationForm {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        let age = unsigned(row, "age")?;

        Ok(Self {
            age: Age::new(age).map_err(|err| sqlx::Error::ColumnDecode {
                index: "age".into(),
                source: err.into(),
            })?,
            pronouns: parsed(row, "pronouns")?,
            free_response_pronouns: row.try_get("free_response_pronouns")?,
            gender: parsed(row, "gender")?,
            free_response_gender: row.try_get("free_response_gender")?,
            ethnicity: parsed_opt(row, "ethnicity")?,
            phone_number: row.try_get("phone_number")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
            tshirt_size: parsed(row, "tshirt_size")?,
            dietary_restrictions: parsed(row, "dietary_restrictions")?,
            free_response_dietary_restrictions: row
                .try_get("free_response_dietary_restrictions")?,
            under_represented_group: parsed(row, "under_represented_group")?,
            sexual_identity: parsed(row, "sexual_identity")?,
            free_response_sexual_identity: row.try_get("free_response_sexual_identity")?,
            highest_formal_education: parsed(row, "highest_formal_education")?,
            free_response_highest_formal_education: row
                .try_get("free_response_highest_formal_education")?,
            school: row.try_get("school")?,
            study_level: parsed(row, "study_level")?,
            graduation_year: row.try_get("graduation_year")?,
            program: row.try_get("program")?,
            resume: row.try_get("resume")?,
            linkedin: url_opt(row, "linkedin")?,
            github: url_opt(row, "github")?,
            devpost: url_opt(row, "devpost")?,
            how_many_hackathons: parsed(row, "how_many_hackathons")?,
            past_hackathon_info: row.try_get("past_hackathon_info")?,
            what_past_experience: row.try_get("what_past_experience")?,
            why_participate: row.try_get("why_participate")?,
            what_technical_experience: row.try_get("what_technical_experience")?,
            what_role_in_team_setting: row.try_get("what_role_in_team_setting")?,
            discovery_method: parsed(row, "discovery_method")?,
            conduct_agree: row.try_get("conduct_agree")?,
            logistics_agree: row.try_get("logistics_agree")?,
            email_agree: row.try_get("email_agree")?,
            resume_sharing: row.try_get("resume_sharing")?,
        })
    }
}

impl TryFrom<&PgRow> for ApplicationState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            team_id: row.try_get("team_id")?,
            under_age: row.try_get("under_age")?,
            rsvp: row.try_get("rsvp")?,
            form: row.try_into()?,
        })
    }
}

entity_from_row!(Application);

impl TryFrom<&PgRow> for ReviewState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            application_id: row.try_get("application_id")?,
            reviewer_id: row.try_get("reviewer_id")?,
            status: parsed(row, "status")?,
            reviewer_comments: row.try_get("reviewer_comments")?,
            decision_sent_date: row.try_get("decision_sent_date")?,
        })
    }
}

entity_from_row!(Review);

impl TryFrom<&PgRow> for EventTeamState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            team_code: parsed::<TeamCode>(row, "team_code")?,
        })
    }
}

entity_from_row!(EventTeam);

impl TryFrom<&PgRow> for ProfileState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            team_id: row.try_get("team_id")?,
            id_provided: row.try_get("id_provided")?,
            attended: row.try_get("attended")?,
            acknowledge_rules: row.try_get("acknowledge_rules")?,
            e_signature: row.try_get("e_signature")?,
            phone_number: row.try_get("phone_number")?,
        })
    }
}

entity_from_row!(Profile);

impl TryFrom<&PgRow> for UserActivityState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            sign_in_event: row.try_get("sign_in_event")?,
            signed_in_by: row.try_get("signed_in_by")?,
        })
    }
}

entity_from_row!(UserActivity);

impl TryFrom<&PgRow> for HardwareState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            model_number: row.try_get("model_number")?,
            manufacturer: row.try_get("manufacturer")?,
            datasheet: url_opt(row, "datasheet")?,
            quantity_available: unsigned(row, "quantity_available")?,
            max_per_team: unsigned_opt(row, "max_per_team")?,
            notes: row.try_get("notes")?,
        })
    }
}

entity_from_row!(Hardware);

impl TryFrom<&PgRow> for OrderState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            team_id: row.try_get("team_id")?,
            status: parsed(row, "status")?,
        })
    }
}

entity_from_row!(Order);

impl TryFrom<&PgRow> for OrderItemState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: row.try_get("order_id")?,
            hardware_id: row.try_get("hardware_id")?,
        })
    }
}

entity_from_row!(OrderItem);
