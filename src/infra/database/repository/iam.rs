use sqlx::{Executor, Postgres, Row};
use uuid::Uuid;

use super::super::sql;
use crate::{
    app::resource::iam::UserReviewStatusResponse,
    domain::entity::{iam::User, Entity},
    error::persistence::PersistenceError,
};

const USER_COLUMNS: &str =
    "u.id, u.created, u.updated, u.version, u.email, u.first_name, u.last_name, u.password_hash, u.is_staff";

pub async fn insert_user<'e, E>(exec: E, user: &User) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "INSERT INTO iam.user (id, created, updated, version, email, first_name, last_name, password_hash, is_staff) ",
        "VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    ))
    .bind(user.ident())
    .bind(user.created())
    .bind(user.updated())
    .bind(sql::version(user.version()))
    .bind(user.email())
    .bind(user.first_name())
    .bind(user.last_name())
    .bind(user.password_hash().as_str())
    .bind(user.is_staff())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn update_user_password<'e, E>(exec: E, user: &User) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "UPDATE iam.user SET password_hash = $2, updated = $3, version = $4 WHERE id = $1",
    )
    .bind(user.ident())
    .bind(user.password_hash().as_str())
    .bind(user.updated())
    .bind(sql::version(user.version()))
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn find_user<'e, E>(exec: E, id: Uuid) -> Result<Option<User>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM iam.user u WHERE u.id = $1"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(User::try_from).transpose()?)
}

/// Emails are compared case insensitively.
pub async fn find_user_by_email<'e, E>(
    exec: E,
    email: &str,
) -> Result<Option<User>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM iam.user u WHERE lower(u.email) = lower($1)"
    ))
    .bind(email)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(User::try_from).transpose()?)
}

pub async fn email_exists<'e, E>(exec: E, email: &str) -> Result<bool, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row =
        sqlx::query("SELECT EXISTS (SELECT 1 FROM iam.user WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(exec)
            .await?;

    Ok(row.try_get(0)?)
}

pub async fn count_users<'e, E>(exec: E) -> Result<u64, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query("SELECT COUNT(*) FROM iam.user")
        .fetch_one(exec)
        .await?;
    let count: i64 = row.try_get(0)?;

    Ok(count as u64)
}

pub async fn list_users_review_status<'e, E>(
    exec: E,
    limit: u32,
    offset: u32,
) -> Result<Vec<UserReviewStatusResponse>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(concat!(
        "SELECT u.id, u.first_name, u.last_name, u.email, r.status FROM iam.user u ",
        "LEFT JOIN registration.application a ON a.user_id = u.id ",
        "LEFT JOIN review.review r ON r.application_id = a.id ",
        "ORDER BY u.created, u.id LIMIT $1 OFFSET $2",
    ))
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            let status: Option<String> = row.try_get("status")?;
            Ok(UserReviewStatusResponse {
                id: row.try_get("id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                review_status: status.unwrap_or_else(|| "None".into()),
            })
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}
