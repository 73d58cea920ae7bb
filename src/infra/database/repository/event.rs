use sqlx::{Executor, Postgres, Row};
use uuid::Uuid;

use super::super::sql;
use crate::{
    domain::{
        datatype::team_code::TeamCode,
        entity::{
            event::{EventTeam, Profile, UserActivity},
            Entity,
        },
    },
    error::persistence::PersistenceError,
};

const TEAM_COLUMNS: &str = "t.id, t.created, t.updated, t.version, t.team_code";

const PROFILE_COLUMNS: &str = concat!(
    "p.id, p.created, p.updated, p.version, p.user_id, p.team_id, p.id_provided, ",
    "p.attended, p.acknowledge_rules, p.e_signature, p.phone_number",
);

pub async fn find_team<'e, E>(exec: E, id: Uuid) -> Result<Option<EventTeam>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM event.team t WHERE t.id = $1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(EventTeam::try_from).transpose()?)
}

pub async fn lock_team_by_code<'e, E>(
    exec: E,
    code: &TeamCode,
) -> Result<Option<EventTeam>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {TEAM_COLUMNS} FROM event.team t WHERE t.team_code = $1 FOR UPDATE"
    ))
    .bind(code.as_str())
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(EventTeam::try_from).transpose()?)
}

pub async fn insert_team<'e, E>(exec: E, team: &EventTeam) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO event.team (id, created, updated, version, team_code) VALUES ($1, $2, $3, $4, $5)",
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

/// Remove an event team left without profiles.
pub async fn delete_team_if_empty<'e, E>(exec: E, id: Uuid) -> Result<bool, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(concat!(
        "DELETE FROM event.team t WHERE t.id = $1 AND NOT EXISTS ",
        "(SELECT 1 FROM event.profile p WHERE p.team_id = t.id)",
    ))
    .bind(id)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_team_profiles<'e, E>(exec: E, team_id: Uuid) -> Result<u32, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query("SELECT COUNT(*) FROM event.profile WHERE team_id = $1")
        .bind(team_id)
        .fetch_one(exec)
        .await?;

    Ok(sql::count(row.try_get(0)?))
}

pub async fn insert_profile<'e, E>(exec: E, profile: &Profile) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(&format!(
        "INSERT INTO event.profile ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        PROFILE_COLUMNS.replace("p.", ""),
    ))
    .bind(profile.ident())
    .bind(profile.created())
    .bind(profile.updated())
    .bind(sql::version(profile.version()))
    .bind(profile.user_id())
    .bind(profile.team_id())
    .bind(profile.id_provided())
    .bind(profile.attended())
    .bind(profile.acknowledge_rules())
    .bind(profile.e_signature().as_deref())
    .bind(profile.phone_number())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn update_profile<'e, E>(exec: E, profile: &Profile) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "UPDATE event.profile SET id_provided = $2, attended = $3, acknowledge_rules = $4, ",
        "e_signature = $5, updated = $6, version = $7 WHERE id = $1",
    ))
    .bind(profile.ident())
    .bind(profile.id_provided())
    .bind(profile.attended())
    .bind(profile.acknowledge_rules())
    .bind(profile.e_signature().as_deref())
    .bind(profile.updated())
    .bind(sql::version(profile.version()))
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn delete_profile<'e, E>(exec: E, id: Uuid) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("DELETE FROM event.profile WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;

    Ok(())
}

pub async fn find_profile<'e, E>(exec: E, id: Uuid) -> Result<Option<Profile>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {PROFILE_COLUMNS} FROM event.profile p WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Profile::try_from).transpose()?)
}

pub async fn find_profile_by_user<'e, E>(
    exec: E,
    user_id: Uuid,
) -> Result<Option<Profile>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {PROFILE_COLUMNS} FROM event.profile p WHERE p.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Profile::try_from).transpose()?)
}

pub async fn insert_user_activity<'e, E>(
    exec: E,
    activity: &UserActivity,
) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "INSERT INTO event.user_activity (id, created, updated, version, user_id, sign_in_event, ",
        "signed_in_by) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    ))
    .bind(activity.ident())
    .bind(activity.created())
    .bind(activity.updated())
    .bind(sql::version(activity.version()))
    .bind(activity.user_id())
    .bind(activity.sign_in_event())
    .bind(activity.signed_in_by())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn user_activity_exists<'e, E>(
    exec: E,
    user_id: Uuid,
    sign_in_event: &str,
) -> Result<bool, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(concat!(
        "SELECT EXISTS (SELECT 1 FROM event.user_activity ",
        "WHERE user_id = $1 AND sign_in_event = $2)",
    ))
    .bind(user_id)
    .bind(sign_in_event)
    .fetch_one(exec)
    .await?;

    Ok(row.try_get(0)?)
}
