use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, Postgres, Row};
use uuid::Uuid;

use super::super::sql;
use crate::{
    domain::{
        datatype::choice::ReviewStatus,
        entity::{review::Review, Entity},
    },
    error::persistence::PersistenceError,
};

const REVIEW_COLUMNS: &str = concat!(
    "r.id, r.created, r.updated, r.version, r.application_id, r.reviewer_id, r.status, ",
    "r.reviewer_comments, r.decision_sent_date",
);

pub async fn find_review_by_application<'e, E>(
    exec: E,
    application_id: Uuid,
) -> Result<Option<Review>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query(&format!(
        "SELECT {REVIEW_COLUMNS} FROM review.review r WHERE r.application_id = $1"
    ))
    .bind(application_id)
    .fetch_optional(exec)
    .await?;

    Ok(row.as_ref().map(Review::try_from).transpose()?)
}

pub async fn insert_review<'e, E>(exec: E, review: &Review) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "INSERT INTO review.review (id, created, updated, version, application_id, reviewer_id, ",
        "status, reviewer_comments, decision_sent_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    ))
    .bind(review.ident())
    .bind(review.created())
    .bind(review.updated())
    .bind(sql::version(review.version()))
    .bind(review.application_id())
    .bind(review.reviewer_id())
    .bind(review.status().as_str())
    .bind(review.reviewer_comments())
    .bind(review.decision_sent_date())
    .execute(exec)
    .await?;

    Ok(())
}

pub async fn update_review<'e, E>(exec: E, review: &Review) -> Result<(), PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(concat!(
        "UPDATE review.review SET reviewer_id = $2, status = $3, reviewer_comments = $4, ",
        "decision_sent_date = $5, updated = $6, version = $7 WHERE id = $1",
    ))
    .bind(review.ident())
    .bind(review.reviewer_id())
    .bind(review.status().as_str())
    .bind(review.reviewer_comments())
    .bind(review.decision_sent_date())
    .bind(review.updated())
    .bind(sql::version(review.version()))
    .execute(exec)
    .await?;

    Ok(())
}

/// Decision delivered to an applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentDecision {
    pub email: String,
    pub status: ReviewStatus,
}

/// Mark every pending decision as sent on `date`.
pub async fn send_pending_decisions<'e, E>(
    exec: E,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<SentDecision>, PersistenceError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query(concat!(
        "WITH sent AS (UPDATE review.review SET decision_sent_date = $1, updated = $2, ",
        "version = version + 1 WHERE decision_sent_date IS NULL AND status <> $3 ",
        "RETURNING application_id, status) ",
        "SELECT u.email, sent.status FROM sent ",
        "JOIN registration.application a ON a.id = sent.application_id ",
        "JOIN iam.user u ON u.id = a.user_id",
    ))
    .bind(date)
    .bind(now)
    .bind(ReviewStatus::Incomplete.as_str())
    .fetch_all(exec)
    .await?;

    rows.iter()
        .map(|row| {
            let status: String = row.try_get("status")?;
            Ok(SentDecision {
                email: row.try_get("email")?,
                status: status.parse().map_err(|err| sqlx::Error::ColumnDecode {
                    index: "status".into(),
                    source: Box::new(err),
                })?,
            })
        })
        .collect::<Result<_, sqlx::Error>>()
        .map_err(PersistenceError::from)
}
