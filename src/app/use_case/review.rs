use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    app::resource::{
        iam::UserReviewStatusResponse,
        page::{Page, PageQuery},
        registration::ApplicationResponse,
        review::{ApplicationSummaryResponse, PutReview, ReviewResponse, SendDecisionsResponse},
    },
    domain::{
        datatype::choice::ReviewStatus,
        entity::{iam::User, review::Review, Entity},
        validation::FieldErrors,
    },
    error::{
        app::ApplicationError,
        resource::{NotFoundError, ValidationError},
    },
    infra::database::repository,
};

pub async fn list_applications(
    pool: &PgPool,
    page: PageQuery,
) -> Result<Page<ApplicationSummaryResponse>, ApplicationError<()>> {
    let count = repository::registration::count_applications(pool).await?;
    let results =
        repository::registration::list_application_summaries(pool, page.limit(), page.offset())
            .await?;

    Ok(Page {
        count,
        limit: page.limit(),
        offset: page.offset(),
        results,
    })
}

pub async fn list_users_review_status(
    pool: &PgPool,
    page: PageQuery,
) -> Result<Page<UserReviewStatusResponse>, ApplicationError<()>> {
    let count = repository::iam::count_users(pool).await?;
    let results =
        repository::iam::list_users_review_status(pool, page.limit(), page.offset()).await?;

    Ok(Page {
        count,
        limit: page.limit(),
        offset: page.offset(),
        results,
    })
}

/// Record the decision of `reviewer` on an application.
pub async fn review_application(
    pool: &PgPool,
    reviewer: &User,
    application_id: Uuid,
    dto: PutReview,
) -> Result<ReviewResponse, ApplicationError<PutReview>> {
    let mut errors = FieldErrors::new();
    let status = match errors.choice::<ReviewStatus>("/status", &dto.status) {
        Some(status) => status,
        None => return Err(ValidationError::from_resource(dto, errors.into_vec()).into()),
    };

    let mut trx = pool.begin().await?;
    repository::registration::find_application(&mut trx, application_id)
        .await?
        .ok_or_else(|| NotFoundError::of::<ApplicationResponse>(application_id))?;

    let review = match repository::review::find_review_by_application(&mut trx, application_id)
        .await?
    {
        Some(mut review) => {
            review.revise(reviewer.ident(), status, dto.reviewer_comments);
            repository::review::update_review(&mut trx, &review).await?;
            review
        }
        None => {
            let review = Review::new(
                application_id,
                reviewer.ident(),
                status,
                dto.reviewer_comments,
            );
            repository::review::insert_review(&mut trx, &review).await?;
            review
        }
    };
    trx.commit().await?;

    tracing::info!(
        %application_id,
        reviewer_id = %reviewer.ident(),
        %status,
        "application reviewed"
    );

    Ok((&review).into())
}

/// Deliver every pending decision. Decisions are recorded and logged, mail
/// delivery is handled outside this service.
pub async fn send_decisions(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<SendDecisionsResponse, ApplicationError<()>> {
    let sent = repository::review::send_pending_decisions(pool, now.date_naive(), now).await?;

    for decision in &sent {
        tracing::info!(email = %decision.email, status = %decision.status, "decision sent");
    }
    tracing::info!(count = sent.len(), "decisions sent");

    Ok(SendDecisionsResponse {
        sent: sent.len() as u64,
    })
}
