use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    app::resource::event::{
        ChatRoomResponse, CreateProfile, EventInfoResponse, ProfileCreateResponse, ProfileResponse,
        SignIn, UpdateCurrentProfile, UpdateProfile, UserActivityResponse,
    },
    config::event::EventSettings,
    domain::{
        datatype::team_code::TeamCode,
        entity::{
            event::{EventTeam, Profile, UserActivity},
            iam::User,
            registration::Application,
            Entity,
        },
        validation::{self, event::Participation},
    },
    error::{
        app::ApplicationError,
        persistence::PersistenceError,
        resource::{NotFoundError, OperationCode, OperationError, ValidationError},
    },
    infra::database::repository,
};

/// Public description of the event at `now`.
pub fn event_info(settings: &EventSettings, now: DateTime<Utc>) -> EventInfoResponse {
    let schedule = &settings.schedule;
    let (chat_room_name, chat_room_link) = &settings.chat_room;

    EventInfoResponse {
        hackathon_name: settings.hackathon_name.clone(),
        contact_email: settings.contact_email.clone(),
        participant_package_link: settings.participant_package_link.clone(),
        chat_room: ChatRoomResponse {
            name: chat_room_name.clone(),
            link: chat_room_link.clone(),
        },
        registration_open_date: schedule.registration_open,
        registration_close_date: schedule.registration_close,
        application_open_date: schedule.application_open,
        event_start_date: schedule.event_start,
        event_end_date: schedule.event_end,
        hardware_sign_out_start_date: schedule.hardware_sign_out_start,
        hardware_sign_out_end_date: schedule.hardware_sign_out_end,
        final_review_response_date: schedule.final_review_response_date,
        registration_open: schedule.is_registration_open(now),
        application_open: schedule.is_application_open(now),
        hackathon_happening: schedule.is_hackathon_happening(now),
        hardware_sign_out_open: schedule.is_hardware_sign_out_open(now),
        countdown: schedule.countdown(now),
        sign_in_times: settings.sign_in_times.clone(),
        teams: settings.teams,
        rsvp: settings.rsvp,
        min_members: settings.min_members,
        max_members: settings.max_members,
        minimum_age: settings.minimum_age,
    }
}

/// Application of a user, locked, and the state of its review.
async fn participation(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Option<(Application, Participation)>, PersistenceError> {
    let application =
        match repository::registration::lock_application_by_user(&mut *conn, user_id).await? {
            Some(application) => application,
            None => return Ok(None),
        };
    let review =
        repository::review::find_review_by_application(&mut *conn, application.ident()).await?;

    let participation = Participation {
        review_status: review.map(|review| review.status()),
        rsvp: application.rsvp(),
    };

    Ok(Some((application, participation)))
}

pub async fn create_profile(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    user: &User,
    dto: CreateProfile,
) -> Result<ProfileCreateResponse, ApplicationError<CreateProfile>> {
    let mut trx = pool.begin().await?;
    let participation = participation(&mut trx, user.ident()).await?;

    validation::event::profile(
        settings.rsvp,
        settings.schedule.is_waitlisted_acceptance_open(now),
        participation.as_ref().map(|(_, participation)| *participation),
    )?;
    let application = match participation {
        Some((application, _)) => application,
        None => {
            return Err(OperationError::new(
                OperationCode::ApplicationRequired,
                "You must submit an application first.",
            )
            .into())
        }
    };

    let e_signature = match validation::event::rules_agreement(
        dto.acknowledge_rules,
        Some(&dto.e_signature),
        true,
    ) {
        Ok(e_signature) => e_signature,
        Err(errors) => return Err(ValidationError::from_resource(dto, errors).into()),
    };

    if repository::event::find_profile_by_user(&mut trx, user.ident())
        .await?
        .is_some()
    {
        return Err(OperationError::new(
            OperationCode::ProfileExists,
            "You have already created a profile.",
        )
        .into());
    }

    let team = repository::registration::find_team(&mut trx, application.team_id())
        .await?
        .ok_or_else(|| NotFoundError::of::<TeamCode>(application.team_id()))?;
    let code = team.team_code().clone();

    // Members of a team create their profiles one at a time.
    repository::registration::lock_team_by_code(&mut trx, &code).await?;
    let event_team = match repository::event::lock_team_by_code(&mut trx, &code).await? {
        Some(event_team) => event_team,
        None => {
            let event_team = EventTeam::new(code.clone());
            repository::event::insert_team(&mut trx, &event_team).await?;
            event_team
        }
    };

    let profile = Profile::new(
        user.ident(),
        event_team.ident(),
        application.form().phone_number.clone(),
        dto.acknowledge_rules,
        e_signature.unwrap_or_default(),
    );
    repository::event::insert_profile(&mut trx, &profile).await?;
    trx.commit().await?;

    tracing::info!(
        user_id = %user.ident(),
        profile_id = %profile.ident(),
        team_code = %code,
        "profile created"
    );

    Ok(ProfileCreateResponse {
        id_provided: profile.id_provided(),
        attended: profile.attended(),
        acknowledge_rules: profile.acknowledge_rules(),
        e_signature: profile.e_signature().clone(),
        team: code.to_string(),
        phone_number: profile.phone_number().clone(),
    })
}

pub async fn current_profile(
    pool: &PgPool,
    user: &User,
) -> Result<ProfileResponse, ApplicationError<()>> {
    let profile = repository::event::find_profile_by_user(pool, user.ident())
        .await?
        .ok_or_else(|| NotFoundError::of::<ProfileResponse>(user.ident()))?;

    Ok((&profile).into())
}

/// Participants only change their rules acknowledgement and signature.
pub async fn update_current_profile(
    pool: &PgPool,
    user: &User,
    dto: UpdateCurrentProfile,
) -> Result<ProfileResponse, ApplicationError<UpdateCurrentProfile>> {
    let e_signature = match validation::event::rules_agreement(
        dto.acknowledge_rules,
        dto.e_signature.as_deref(),
        false,
    ) {
        Ok(e_signature) => e_signature,
        Err(errors) => return Err(ValidationError::from_resource(dto, errors).into()),
    };

    let mut profile = repository::event::find_profile_by_user(pool, user.ident())
        .await?
        .ok_or_else(|| NotFoundError::of::<ProfileResponse>(user.ident()))?;

    profile.sign_rules(dto.acknowledge_rules, e_signature);
    repository::event::update_profile(pool, &profile).await?;

    Ok((&profile).into())
}

/// Check-in desk update of a profile.
pub async fn update_profile(
    pool: &PgPool,
    profile_id: Uuid,
    dto: UpdateProfile,
) -> Result<ProfileResponse, ApplicationError<()>> {
    let mut profile = repository::event::find_profile(pool, profile_id)
        .await?
        .ok_or_else(|| NotFoundError::of::<ProfileResponse>(profile_id))?;

    profile.check_in(dto.id_provided, dto.attended);
    repository::event::update_profile(pool, &profile).await?;

    tracing::info!(
        %profile_id,
        id_provided = dto.id_provided,
        attended = dto.attended,
        "profile checked in"
    );

    Ok((&profile).into())
}

pub async fn delete_profile(pool: &PgPool, profile_id: Uuid) -> Result<(), ApplicationError<()>> {
    let mut trx = pool.begin().await?;
    let profile = repository::event::find_profile(&mut trx, profile_id)
        .await?
        .ok_or_else(|| NotFoundError::of::<ProfileResponse>(profile_id))?;

    repository::event::delete_profile(&mut trx, profile_id).await?;
    let team_removed = repository::event::delete_team_if_empty(&mut trx, profile.team_id()).await?;
    trx.commit().await?;

    tracing::info!(%profile_id, team_removed, "profile deleted");

    Ok(())
}

/// Organizer signs a participant in to one of the sign in times.
pub async fn sign_in(
    pool: &PgPool,
    settings: &EventSettings,
    now: DateTime<Utc>,
    staff: &User,
    dto: SignIn,
) -> Result<UserActivityResponse, ApplicationError<SignIn>> {
    if !settings.schedule.is_hackathon_happening(now) {
        return Err(OperationError::new(
            OperationCode::InvalidSignInTime,
            "You cannot sign in outside of the hackathon period.",
        )
        .into());
    }

    let sign_in_time = settings.sign_in_time(&dto.event).ok_or_else(|| {
        OperationError::new(
            OperationCode::UnknownSignInEvent,
            format!("{} is not a valid sign in event.", dto.event),
        )
    })?;

    let email = dto.email.trim();
    let user = repository::iam::find_user_by_email(pool, email)
        .await?
        .ok_or_else(|| {
            OperationError::new(
                OperationCode::UserNotFound,
                format!("User {email} does not exist."),
            )
        })?;

    let mut trx = pool.begin().await?;
    let participation = participation(&mut trx, user.ident()).await?;
    validation::event::sign_in(
        user.email(),
        &settings.hackathon_name,
        settings.rsvp,
        participation.map(|(_, participation)| participation),
    )?;

    if repository::event::user_activity_exists(&mut trx, user.ident(), &sign_in_time.name).await? {
        return Err(OperationError::new(
            OperationCode::AlreadySignedIn,
            format!(
                "User {} has already signed in for {}.",
                user.email(),
                sign_in_time.description
            ),
        )
        .into());
    }

    let activity = UserActivity::new(user.ident(), sign_in_time.name.clone(), staff.ident());
    repository::event::insert_user_activity(&mut trx, &activity).await?;
    trx.commit().await?;

    tracing::info!(
        user_id = %user.ident(),
        event = %sign_in_time.name,
        signed_in_by = %staff.ident(),
        "user signed in"
    );

    Ok(UserActivityResponse {
        id: activity.ident(),
        user: (&user).into(),
        sign_in_event: sign_in_time.name.clone(),
        description: sign_in_time.description.clone(),
        created: activity.created(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::schedule::{CountdownKind, EventSchedule, SignInTime};

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
    }

    fn settings() -> EventSettings {
        EventSettings {
            hackathon_name: "NewHacks".into(),
            contact_email: "hello@newhacks.ca".into(),
            participant_package_link: "https://newhacks.ca/package".into(),
            chat_room: ("Discord".into(), "https://discord.gg/test".into()),
            schedule: EventSchedule {
                registration_open: at(1, 18, 0),
                registration_close: at(10, 11, 23),
                application_open: at(9, 25, 0),
                event_start: at(10, 26, 8),
                event_end: at(10, 27, 17),
                hardware_sign_out_start: at(10, 26, 8),
                hardware_sign_out_end: at(10, 27, 17),
                waitlisted_acceptance_start: at(10, 26, 9),
                final_review_response_date: at(10, 18, 23),
                rsvp_days: 10,
            },
            sign_in_times: vec![SignInTime {
                name: "sign_in".into(),
                description: "Hackathon Sign In".into(),
                time: at(10, 26, 10),
            }],
            minimum_age: 18,
            min_members: 2,
            max_members: 4,
            rsvp: true,
            teams: true,
        }
    }

    #[test]
    fn event_info_before_registration_closes() {
        let info = event_info(&settings(), at(10, 1, 0));

        assert_eq!(info.hackathon_name, "NewHacks");
        assert_eq!(info.chat_room.name, "Discord");
        assert!(info.registration_open);
        assert!(info.application_open);
        assert!(!info.hackathon_happening);
        assert!(!info.hardware_sign_out_open);
        assert_eq!(
            info.countdown.map(|countdown| countdown.kind),
            Some(CountdownKind::RegistrationCloses)
        );
        assert_eq!(info.sign_in_times.len(), 1);
        assert_eq!(info.max_members, 4);
    }

    #[test]
    fn event_info_during_event() {
        let info = event_info(&settings(), at(10, 26, 12));

        assert!(!info.registration_open);
        assert!(info.hackathon_happening);
        assert!(info.hardware_sign_out_open);
        assert_eq!(info.countdown, None);
    }
}
