use sqlx::{Executor, Postgres, Row};
use uuid::Uuid;

use super::super::sql;
use crate::{
    app::resource::{registration::TeamMemberResponse, review::ApplicationSummaryResponse},
    domain::{
        datatype::team_code::TeamCode,
        entity::{
            registration::{Application, Team},
            Entity,
        },
    },
    error::persistence::PersistenceError,
};

const TEAM_COLUMNS: &str = "t.id, t.created, t.updated, t.version, t.team_code";

const APPLICATION_COLUMNS: &str = concat!(
    "a.id, a.created, a.updated, a.version, a.user_id, a.team_id, a.under_age, a.rsvp, ",
    "a.age, a.pronouns, a.free_response_pronouns, a.gender, a.free_response_gender, ",
    "a.ethnicity, a.phone_number, a.city, a.country, a.tshirt_size, a.dietary_restrictions, ",
    "a.free_response_dietary_restrictions, a.under_represented_group, a.sexual_identity, ",
    "a.free_response_sexual_identity, a.highest_formal_education, ",
    "a.free_response_highest_formal_education, a.school, a.study_level, a.graduation_year, ",
    "a.program, a.resume, a.linkedin, a.github, a.devpost, a.how_many_hackathons, ",
    "a.past_hackathon_info, a.what_past_experience, a.why_participate, ",
    "a.what_technical_experience, a.what_role_in_team_setting, a.discovery_method, ",
    "a.conduct_agree, a.logistics_agree, a.email_agree, a.resume_sharing",
);

pub async fn insert_team<'e, E>(exec: E, team: &Team) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO registration.team (id, created, updated, version, team_code) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(team.ident())
    .bind(team.created())
    .bind(team.updated())
    .bind(sql::version(team.version()))
    .bind(team.team_code().as_str())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn team_code_exists<'e, E>(exec: E, code: &TeamCode) -> Result<bool, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM registration.team WHERE team_code = $1)")
        .bind(code.as_str())
        .fetch_one(exec)
        .await?;

    Ok(row.try_get(0)?)
}

pub async fn find_team<'e, E>(exec: E, id: Uuid) -> Result<Option<Team>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM registration.team t WHERE t.id = $1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Team::try_from).transpose()?)
}

/// Find a team and lock it until the end of the transaction.
pub async fn lock_team_by_code<'e, E>(
    exec: E,
    code: &TeamCode,
) -> Result<Option<Team>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM registration.team t WHERE t.team_code = $1 FOR UPDATE"
    ))
    .bind(code.as_str())
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Team::try_from).transpose()?)
}

pub async fn find_team_by_code<'e, E>(
    exec: E,
    code: &TeamCode,
) -> Result<Option<Team>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM registration.team t WHERE t.team_code = $1"
    ))
    .bind(code.as_str())
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Team::try_from).transpose()?)
}

/// Lock the teams still present among `ids`, always in id order.
pub async fn lock_teams<'e, E>(exec: E, ids: &[Uuid]) -> Result<Vec<Team>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM registration.team t WHERE t.id = ANY($1) ORDER BY t.id FOR UPDATE"
    ))
    .bind(ids)
    .fetch_all(exec)
    .await?;

    Ok(rows
        .iter()
        .map(Team::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Remove a team left without applications.
pub async fn delete_team_if_empty<'e, E>(exec: E, id: Uuid) -> Result<bool, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(concat!(
        "DELETE FROM registration.team t WHERE t.id = $1 AND NOT EXISTS ",
        "(SELECT 1 FROM registration.application a WHERE a.team_id = t.id)",
    ))
    .bind(id)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_team_members<'e, E>(exec: E, team_id: Uuid) -> Result<u32, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query("SELECT COUNT(*) FROM registration.application WHERE team_id = $1")
        .bind(team_id)
        .fetch_one(exec)
        .await?;

    Ok(sql::count(row.try_get(0)?))
}

pub async fn team_members<'e, E>(
    exec: E,
    team_id: Uuid,
) -> Result<Vec<TeamMemberResponse>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(concat!(
        "SELECT u.first_name, u.last_name FROM registration.application a ",
        "JOIN iam.user u ON u.id = a.user_id WHERE a.team_id = $1 ORDER BY a.created",
    ))
    .bind(team_id)
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(TeamMemberResponse {
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
            })
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}

pub async fn insert_application<'e, E>(
    exec: E,
    application: &Application,
) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let form = application.form();
    let url = |url: &Option<url::Url>| url.as_ref().map(|url| url.to_string());

    sqlx::query(&format!(
        "INSERT INTO registration.application ({}) VALUES ({})",
        APPLICATION_COLUMNS.replace("a.", ""),
        (1..=44).map(|n| format!("${n}")).collect::<Vec<_>>().join(", "),
    ))
    .bind(application.ident())
    .bind(application.created())
    .bind(application.updated())
    .bind(sql::version(application.version()))
    .bind(application.user_id())
    .bind(application.team_id())
    .bind(application.under_age())
    .bind(application.rsvp())
    .bind(form.age.value() as i32)
    .bind(form.pronouns.as_str())
    .bind(form.free_response_pronouns.as_deref())
    .bind(form.gender.as_str())
    .bind(form.free_response_gender.as_deref())
    .bind(form.ethnicity.map(|ethnicity| ethnicity.as_str()))
    .bind(form.phone_number.as_str())
    .bind(form.city.as_str())
    .bind(form.country.as_str())
    .bind(form.tshirt_size.as_str())
    .bind(form.dietary_restrictions.as_str())
    .bind(form.free_response_dietary_restrictions.as_deref())
    .bind(form.under_represented_group.as_str())
    .bind(form.sexual_identity.as_str())
    .bind(form.free_response_sexual_identity.as_deref())
    .bind(form.highest_formal_education.as_str())
    .bind(form.free_response_highest_formal_education.as_deref())
    .bind(form.school.as_str())
    .bind(form.study_level.as_str())
    .bind(form.graduation_year)
    .bind(form.program.as_str())
    .bind(form.resume.as_str())
    .bind(url(&form.linkedin))
    .bind(url(&form.github))
    .bind(url(&form.devpost))
    .bind(form.how_many_hackathons.as_str())
    .bind(form.past_hackathon_info.as_deref())
    .bind(form.what_past_experience.as_str())
    .bind(form.why_participate.as_str())
    .bind(form.what_technical_experience.as_str())
    .bind(form.what_role_in_team_setting.as_str())
    .bind(form.discovery_method.as_str())
    .bind(form.conduct_agree)
    .bind(form.logistics_agree)
    .bind(form.email_agree)
    .bind(form.resume_sharing)
    .execute(exec)
    .await?;

    Ok(())
}

/// Persist the team and RSVP of an application, the form never changes.
pub async fn update_application<'e, E>(
    exec: E,
    application: &Application,
) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "UPDATE registration.application SET team_id = $2, rsvp = $3, updated = $4, version = $5 ",
        "WHERE id = $1",
    ))
    .bind(application.ident())
    .bind(application.team_id())
    .bind(application.rsvp())
    .bind(application.updated())
    .bind(sql::version(application.version()))
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn find_application_by_user<'e, E>(
    exec: E,
    user_id: Uuid,
) -> Result<Option<Application>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM registration.application a WHERE a.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Application::try_from).transpose()?)
}

/// Find the application of a user and lock it until the end of the
/// transaction.
pub async fn lock_application_by_user<'e, E>(
    exec: E,
    user_id: Uuid,
) -> Result<Option<Application>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM registration.application a WHERE a.user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Application::try_from).transpose()?)
}

pub async fn find_application<'e, E>(
    exec: E,
    id: Uuid,
) -> Result<Option<Application>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM registration.application a WHERE a.id = $1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Application::try_from).transpose()?)
}

pub async fn count_applications<'e, E>(exec: E) -> Result<u64, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query("SELECT COUNT(*) FROM registration.application")
        .fetch_one(exec)
        .await?;
    let count: i64 = row.try_get(0)?;

    Ok(count as u64)
}

pub async fn list_application_summaries<'e, E>(
    exec: E,
    limit: u32,
    offset: u32,
) -> Result<Vec<ApplicationSummaryResponse>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(concat!(
        "SELECT a.id, a.user_id, u.first_name, u.last_name, u.email, t.team_code, a.rsvp, ",
        "r.status, r.decision_sent_date FROM registration.application a ",
        "JOIN iam.user u ON u.id = a.user_id ",
        "JOIN registration.team t ON t.id = a.team_id ",
        "LEFT JOIN review.review r ON r.application_id = a.id ",
        "ORDER BY a.created, a.id LIMIT $1 OFFSET $2",
    ))
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            let status: Option<String> = row.try_get("status")?;
            Ok(ApplicationSummaryResponse {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                team_code: row.try_get("team_code")?,
                review_status: status.unwrap_or_else(|| "None".into()),
                decision_sent_date: row.try_get("decision_sent_date")?,
                rsvp: row.try_get("rsvp")?,
            })
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}
