use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::unknown;
use crate::{
    app::resource::registration::{
        ApplicationResponse, DashboardResponse, DashboardState, JoinTeam, PutRsvp, ResumeResponse,
        SubmitApplication, TeamResponse,
    },
    config::event::EventSettings,
    domain::{
        datatype::{choice::ReviewStatus, team_code::TeamCode},
        entity::{
            iam::User,
            registration::{Application, Team},
            Entity,
        },
        service::FileStorage,
        validation::{self, review::Decision},
    },
    error::{
        app::ApplicationError,
        http::UploadError,
        persistence::PersistenceError,
        resource::{NotFoundError, OperationCode, OperationError, ValidationError},
    },
    infra::database::repository,
};

pub const RESUME_MAX_SIZE: u64 = 20 * 1024 * 1024;
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";

const UNIQUE_VIOLATION: &str = "23505";

fn already_applied() -> OperationError {
    OperationError::new(
        OperationCode::AlreadyApplied,
        "User has already submitted an application.",
    )
}

fn application_required() -> OperationError {
    OperationError::new(
        OperationCode::ApplicationRequired,
        "You must submit an application first.",
    )
}

/// Store an uploaded resume, the returned path goes in the application.
pub async fn upload_resume<FS: FileStorage>(
    storage: &FS,
    content_type: Option<&str>,
    content: &[u8],
) -> Result<ResumeResponse, ApplicationError<()>> {
    let mime = content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .unwrap_or_default();
    if !mime.eq_ignore_ascii_case(RESUME_CONTENT_TYPE) {
        return Err(UploadError::UnsupportedType(mime.into()).into());
    }

    let size = content.len() as u64;
    if size > RESUME_MAX_SIZE {
        return Err(UploadError::TooLarge {
            size,
            limit: RESUME_MAX_SIZE,
        }
        .into());
    }

    let resume = format!(
        "{}{}.pdf",
        validation::registration::RESUME_DIR,
        Uuid::new_v4()
    );
    storage.store(&resume, content).await.map_err(unknown)?;

    tracing::debug!(%resume, size, "resume stored");

    Ok(ResumeResponse { resume })
}

/// Create a team with a code no other team has.
async fn create_team(trx: &mut Transaction<'_, Postgres>) -> Result<Team, PersistenceError> {
    loop {
        let code = TeamCode::generate();
        if !repository::registration::team_code_exists(&mut *trx, &code).await? {
            let team = Team::new(code);
            repository::registration::insert_team(&mut *trx, &team).await?;
            return Ok(team);
        }
    }
}

pub async fn submit_application(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
    dto: SubmitApplication,
) -> Result<ApplicationResponse, ApplicationError<SubmitApplication>> {
    if !settings.schedule.is_registration_open(now) {
        return Err(
            OperationError::new(OperationCode::RegistrationClosed, "Registration has closed.")
                .into(),
        );
    }

    if repository::registration::find_application_by_user(pool, user.ident())
        .await?
        .is_some()
    {
        return Err(already_applied().into());
    }

    let form = validation::registration::application(&dto, settings.minimum_age)
        .map_err(|errors| ValidationError::from_resource(dto, errors))?;

    let mut trx = pool.begin().await?;
    let team = create_team(&mut trx).await?;
    let application = Application::new(user.ident(), team.ident(), form);

    match repository::registration::insert_application(&mut trx, &application).await {
        Ok(()) => {}
        Err(PersistenceError::Database(Some(code))) if code == UNIQUE_VIOLATION => {
            return Err(already_applied().into());
        }
        Err(err) => return Err(err.into()),
    }
    trx.commit().await?;

    tracing::info!(
        user_id = %user.ident(),
        application_id = %application.ident(),
        team_code = %team.team_code(),
        "application submitted"
    );

    Ok((&application).into())
}

pub async fn get_application(
    pool: &PgPool,
    user: &User,
) -> Result<ApplicationResponse, ApplicationError<()>> {
    let application = repository::registration::find_application_by_user(pool, user.ident())
        .await?
        .ok_or_else(|| NotFoundError::of::<ApplicationResponse>(user.ident()))?;

    Ok((&application).into())
}

async fn decision<'e, E>(exec: E, application_id: Uuid) -> Result<Option<Decision>, PersistenceError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let review = repository::review::find_review_by_application(exec, application_id).await?;

    Ok(review.map(|review| Decision {
        status: review.status(),
        decision_sent_date: review.decision_sent_date(),
    }))
}

pub async fn rsvp(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
    dto: PutRsvp,
) -> Result<ApplicationResponse, ApplicationError<()>> {
    let mut trx = pool.begin().await?;
    let mut application = repository::registration::lock_application_by_user(&mut trx, user.ident())
        .await?
        .ok_or_else(application_required)?;

    let decision = decision(&mut trx, application.ident()).await?;
    validation::review::rsvp(settings.rsvp, &settings.schedule, decision, now.date_naive())?;

    application.set_rsvp(dto.rsvp);
    repository::registration::update_application(&mut trx, &application).await?;
    trx.commit().await?;

    tracing::info!(user_id = %user.ident(), rsvp = dto.rsvp, "rsvp answered");

    Ok((&application).into())
}

async fn team_response<'e, E>(
    exec: E,
    team: &Team,
    max_members: u32,
) -> Result<TeamResponse, PersistenceError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let members = repository::registration::team_members(exec, team.ident()).await?;
    let spots_remaining = max_members.saturating_sub(members.len() as u32);

    Ok(TeamResponse {
        id: team.ident(),
        team_code: team.team_code().to_string(),
        members,
        spots_remaining,
    })
}

pub async fn get_team(
    pool: &PgPool,
    settings: &EventSettings,
    user: &User,
) -> Result<TeamResponse, ApplicationError<()>> {
    let application = repository::registration::find_application_by_user(pool, user.ident())
        .await?
        .ok_or_else(application_required)?;
    let team = repository::registration::find_team(pool, application.team_id())
        .await?
        .ok_or_else(|| NotFoundError::of::<TeamCode>(application.team_id()))?;

    Ok(team_response(pool, &team, settings.max_members).await?)
}

fn team_change_allowed(settings: &EventSettings, now: DateTime<Utc>) -> Result<(), OperationError> {
    if !settings.teams {
        return Err(OperationError::new(
            OperationCode::TeamsDisabled,
            "Teams are disabled for this event.",
        ));
    }
    if !settings.schedule.is_registration_open(now) {
        return Err(OperationError::new(
            OperationCode::RegistrationClosed,
            "You cannot change teams after registration has closed.",
        ));
    }
    Ok(())
}

/// Application of the user, locked, as long as it was not reviewed.
async fn changeable_application<R>(
    trx: &mut Transaction<'_, Postgres>,
    user: &User,
) -> Result<Application, ApplicationError<R>> {
    let application = repository::registration::lock_application_by_user(&mut *trx, user.ident())
        .await?
        .ok_or_else(application_required)?;

    if repository::review::find_review_by_application(&mut *trx, application.ident())
        .await?
        .is_some()
    {
        return Err(OperationError::new(
            OperationCode::AlreadyReviewed,
            "You cannot change teams after your application has been reviewed.",
        )
        .into());
    }

    Ok(application)
}

fn team_not_found(code: &str) -> OperationError {
    OperationError::new(
        OperationCode::TeamNotFound,
        format!("Team {code} does not exist."),
    )
}

pub async fn join_team(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
    dto: JoinTeam,
) -> Result<TeamResponse, ApplicationError<JoinTeam>> {
    team_change_allowed(settings, now)?;

    let mut trx = pool.begin().await?;
    let mut application = changeable_application::<JoinTeam>(&mut trx, user).await?;

    let code: TeamCode = dto
        .team_code
        .parse()
        .map_err(|_| team_not_found(&dto.team_code.trim().to_uppercase()))?;
    let target = repository::registration::find_team_by_code(&mut trx, &code)
        .await?
        .ok_or_else(|| team_not_found(code.as_str()))?;

    let previous_team = application.team_id();
    if target.ident() == previous_team {
        return Ok(team_response(&mut trx, &target, settings.max_members).await?);
    }

    let locked =
        repository::registration::lock_teams(&mut trx, &[target.ident(), previous_team]).await?;
    let team = locked
        .into_iter()
        .find(|team| team.ident() == target.ident())
        .ok_or_else(|| team_not_found(code.as_str()))?;

    let members = repository::registration::count_team_members(&mut trx, team.ident()).await?;
    validation::registration::team_capacity(code.as_str(), members, settings.max_members)?;

    application.move_to_team(team.ident());
    repository::registration::update_application(&mut trx, &application).await?;
    let removed = repository::registration::delete_team_if_empty(&mut trx, previous_team).await?;

    let response = team_response(&mut trx, &team, settings.max_members).await?;
    trx.commit().await?;

    tracing::info!(
        user_id = %user.ident(),
        team_code = %code,
        previous_team_removed = removed,
        "joined team"
    );

    Ok(response)
}

pub async fn leave_team(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
) -> Result<TeamResponse, ApplicationError<()>> {
    team_change_allowed(settings, now)?;

    let mut trx = pool.begin().await?;
    let mut application = changeable_application::<()>(&mut trx, user).await?;

    let previous_team = application.team_id();
    repository::registration::lock_teams(&mut trx, &[previous_team]).await?;

    let team = create_team(&mut trx).await?;
    application.move_to_team(team.ident());
    repository::registration::update_application(&mut trx, &application).await?;
    let removed = repository::registration::delete_team_if_empty(&mut trx, previous_team).await?;

    let response = team_response(&mut trx, &team, settings.max_members).await?;
    trx.commit().await?;

    tracing::info!(
        user_id = %user.ident(),
        team_code = %team.team_code(),
        previous_team_removed = removed,
        "left team"
    );

    Ok(response)
}

/// Registration record of a user, as shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub applied: bool,
    pub rsvp: Option<bool>,
    pub decision: Option<Decision>,
    /// Code and member count of the team
    pub team: Option<(String, u32)>,
}

/// What a participant can see and do at `now`.
pub fn dashboard(
    settings: &EventSettings,
    now: DateTime<Utc>,
    registration: Registration,
) -> DashboardResponse {
    let schedule = &settings.schedule;
    let registration_open = schedule.is_registration_open(now);

    let sent = registration
        .decision
        .and_then(|decision| decision.decision_sent_date.map(|date| (decision.status, date)));

    let state = match (registration.applied, sent) {
        (false, _) if registration_open => DashboardState::ApplicationIncomplete,
        (false, _) => DashboardState::ApplicationsClosed,
        (true, Some((ReviewStatus::Accepted, _))) => DashboardState::Accepted,
        (true, Some((ReviewStatus::Waitlisted, _))) => DashboardState::Waitlisted,
        (true, Some((ReviewStatus::Rejected, _))) => DashboardState::Rejected,
        (true, _) => DashboardState::ApplicationComplete,
    };

    let rsvp_deadline: Option<NaiveDate> = match sent {
        Some((ReviewStatus::Accepted, date)) => Some(schedule.rsvp_deadline(date)),
        _ => None,
    };
    let rsvp_passed = rsvp_deadline
        .map(|deadline| now.date_naive() > deadline)
        .unwrap_or(false);

    let (team_code, spots_remaining) = match registration.team {
        Some((code, members)) if registration_open => {
            (Some(code), Some(settings.max_members.saturating_sub(members)))
        }
        _ => (None, None),
    };

    DashboardResponse {
        state,
        registration_open,
        application_open: schedule.is_application_open(now),
        can_change_team: settings.teams
            && registration_open
            && registration.applied
            && registration.decision.is_none(),
        team_code,
        spots_remaining,
        review_status: sent.map(|(status, _)| status),
        rsvp: registration.rsvp,
        rsvp_deadline,
        rsvp_passed,
        final_review_response_date: schedule.final_review_response_date,
    }
}

pub async fn get_dashboard(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
) -> Result<DashboardResponse, ApplicationError<()>> {
    let application = repository::registration::find_application_by_user(pool, user.ident()).await?;

    let registration = match application {
        None => Registration::default(),
        Some(application) => {
            let team = repository::registration::find_team(pool, application.team_id()).await?;
            let team = match team {
                Some(team) => {
                    let members =
                        repository::registration::count_team_members(pool, team.ident()).await?;
                    Some((team.team_code().to_string(), members))
                }
                None => None,
            };

            Registration {
                applied: true,
                rsvp: application.rsvp(),
                decision: decision(pool, application.ident()).await?,
                team,
            }
        }
    };

    Ok(dashboard(settings, now, registration))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::schedule::EventSchedule;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
    }

    fn settings() -> EventSettings {
        EventSettings {
            hackathon_name: "NewHacks".into(),
            contact_email: "hello@newhacks.ca".into(),
            participant_package_link: String::new(),
            chat_room: ("Discord".into(), "https://discord.gg/test".into()),
            schedule: EventSchedule {
                registration_open: at(1, 18),
                registration_close: at(10, 11),
                application_open: at(9, 25),
                event_start: at(10, 26),
                event_end: at(10, 27),
                hardware_sign_out_start: at(10, 26),
                hardware_sign_out_end: at(10, 27),
                waitlisted_acceptance_start: at(10, 26),
                final_review_response_date: at(10, 18),
                rsvp_days: 10,
            },
            sign_in_times: Vec::new(),
            minimum_age: 18,
            min_members: 2,
            max_members: 4,
            rsvp: true,
            teams: true,
        }
    }

    fn sent(status: ReviewStatus, month: u32, day: u32) -> Option<Decision> {
        Some(Decision {
            status,
            decision_sent_date: Some(at(month, day).date_naive()),
        })
    }

    #[test]
    fn dashboard_without_application() {
        let settings = settings();

        let open = dashboard(&settings, at(10, 1), Registration::default());
        assert_eq!(open.state, DashboardState::ApplicationIncomplete);
        assert!(open.application_open);
        assert!(!open.can_change_team);

        let closed = dashboard(&settings, at(10, 12), Registration::default());
        assert_eq!(closed.state, DashboardState::ApplicationsClosed);
        assert_eq!(closed.team_code, None);
    }

    #[test]
    fn dashboard_of_pending_application() {
        let settings = settings();
        let registration = Registration {
            applied: true,
            rsvp: None,
            decision: None,
            team: Some(("AB12F".into(), 3)),
        };

        let response = dashboard(&settings, at(10, 1), registration.clone());
        assert_eq!(response.state, DashboardState::ApplicationComplete);
        assert!(response.can_change_team);
        assert_eq!(response.team_code.as_deref(), Some("AB12F"));
        assert_eq!(response.spots_remaining, Some(1));
        assert_eq!(response.review_status, None);

        let reviewed = Registration {
            decision: Some(Decision {
                status: ReviewStatus::Accepted,
                decision_sent_date: None,
            }),
            ..registration
        };
        let response = dashboard(&settings, at(10, 1), reviewed);
        assert_eq!(response.state, DashboardState::ApplicationComplete);
        assert!(!response.can_change_team);
        assert_eq!(response.review_status, None);
    }

    #[test]
    fn dashboard_of_sent_decisions() {
        let settings = settings();
        let registration = |decision| Registration {
            applied: true,
            rsvp: None,
            decision,
            team: Some(("AB12F".into(), 2)),
        };

        let accepted = dashboard(
            &settings,
            at(10, 15),
            registration(sent(ReviewStatus::Accepted, 10, 14)),
        );
        assert_eq!(accepted.state, DashboardState::Accepted);
        assert_eq!(accepted.review_status, Some(ReviewStatus::Accepted));
        assert_eq!(accepted.rsvp_deadline, Some(at(10, 24).date_naive()));
        assert!(!accepted.rsvp_passed);
        assert_eq!(accepted.team_code, None);

        let late = dashboard(
            &settings,
            at(10, 25),
            registration(sent(ReviewStatus::Accepted, 10, 14)),
        );
        assert!(late.rsvp_passed);

        let waitlisted = dashboard(
            &settings,
            at(10, 15),
            registration(sent(ReviewStatus::Waitlisted, 10, 14)),
        );
        assert_eq!(waitlisted.state, DashboardState::Waitlisted);
        assert_eq!(waitlisted.rsvp_deadline, None);

        let rejected = dashboard(
            &settings,
            at(10, 15),
            registration(sent(ReviewStatus::Rejected, 10, 14)),
        );
        assert_eq!(rejected.state, DashboardState::Rejected);
    }

    #[test]
    fn team_changes_follow_settings_and_schedule() {
        let mut settings = settings();

        assert!(team_change_allowed(&settings, at(10, 1)).is_ok());
        assert_eq!(
            team_change_allowed(&settings, at(10, 12)).unwrap_err().code,
            OperationCode::RegistrationClosed
        );

        settings.teams = false;
        assert_eq!(
            team_change_allowed(&settings, at(10, 1)).unwrap_err().code,
            OperationCode::TeamsDisabled
        );
    }

    #[tokio::test]
    async fn resume_upload_checks_type_and_size() {
        struct Discard;

        #[async_trait::async_trait]
        impl FileStorage for Discard {
            async fn store(&self, _: &str, _: &[u8]) -> std::io::Result<()> {
                Ok(())
            }
        }

        let response = upload_resume(&Discard, Some("application/pdf"), b"%PDF-1.4")
            .await
            .unwrap();
        assert!(validation::registration::is_resume_path(&response.resume));

        assert!(matches!(
            upload_resume(&Discard, Some("image/png"), b"png").await,
            Err(ApplicationError::Upload(UploadError::UnsupportedType(_)))
        ));
        assert!(matches!(
            upload_resume(&Discard, None, b"").await,
            Err(ApplicationError::Upload(UploadError::UnsupportedType(_)))
        ));

        let large = vec![0u8; RESUME_MAX_SIZE as usize + 1];
        assert!(matches!(
            upload_resume(&Discard, Some("application/pdf; charset=binary"), &large).await,
            Err(ApplicationError::Upload(UploadError::TooLarge { .. }))
        ));
    }
}
