use std::time::Duration;

use sqlx::PgPool;

use super::unknown;
use crate::{
    app::resource::iam::{
        AuthenticateUserResponse, ChangePassword, CreateUser, UserCredential, UserResponse,
    },
    domain::{
        datatype::security::{Token, TokenPayload, TokenSubject},
        entity::{iam::User, Entity},
        service::{PasswordHashService, TokenEncryptionService},
        validation,
    },
    error::{
        app::ApplicationError,
        persistence::PersistenceError,
        resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
        security::{AuthenticationError, ForbiddenError, UnauthorizedError},
    },
    infra::database::repository,
};

const AUTHENTICATION_TOKEN_EXPIRATION: Duration = Duration::from_secs(60 * 60 * 8);

const UNIQUE_VIOLATION: &str = "23505";

fn email_unavailable(email: &str) -> ValidationFieldError {
    ValidationFieldError::new(
        "base::email",
        email.into(),
        "/email".into(),
        vec![ValidationErrorKind::AlreadyExists],
    )
    .with_message("This email is unavailable")
}

/// Passwords are never echoed back in error responses.
fn redacted(dto: CreateUser) -> CreateUser {
    CreateUser {
        password1: String::new(),
        password2: String::new(),
        ..dto
    }
}

pub async fn sign_up<HS: PasswordHashService>(
    pool: &PgPool,
    hash_service: &HS,
    dto: CreateUser,
) -> Result<UserResponse, ApplicationError<CreateUser>> {
    let mut errors = validation::iam::sign_up(&dto);
    let email = dto.email.trim().to_lowercase();

    if !email.is_empty() && repository::iam::email_exists(pool, &email).await? {
        errors.push(email_unavailable(&email));
    }

    if !errors.is_empty() {
        return Err(ValidationError::from_resource(redacted(dto), errors).into());
    }

    let password_hash = hash_service.hash_password(&dto.password1).map_err(unknown)?;
    let user = User::new(
        email,
        dto.first_name.trim().into(),
        dto.last_name.trim().into(),
        password_hash,
    );

    match repository::iam::insert_user(pool, &user).await {
        Ok(()) => {}
        Err(PersistenceError::Database(Some(code))) if code == UNIQUE_VIOLATION => {
            let field = email_unavailable(user.email());
            return Err(ValidationError::from_resource(redacted(dto), vec![field]).into());
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!(user_id = %user.ident(), "user signed up");

    Ok((&user, None).into())
}

pub async fn authenticate<HS, TS>(
    pool: &PgPool,
    hash_service: &HS,
    token_service: &TS,
    credential: UserCredential,
) -> Result<AuthenticateUserResponse, ApplicationError<()>>
where
    HS: PasswordHashService,
    TS: TokenEncryptionService,
{
    let user = repository::iam::find_user_by_email(pool, credential.email.trim())
        .await?
        .ok_or(AuthenticationError::InvalidCredential)?;

    hash_service
        .verify_password(&credential.password, user.password_hash())
        .map_err(AuthenticationError::from)?;

    let payload = TokenPayload::new(
        AUTHENTICATION_TOKEN_EXPIRATION,
        TokenSubject::User(user.ident()),
        (),
    );
    let token = Token::new(payload, token_service).map_err(unknown)?;
    let profile = repository::event::find_profile_by_user(pool, user.ident()).await?;

    tracing::debug!(user_id = %user.ident(), "user authenticated");

    Ok(AuthenticateUserResponse {
        user: (&user, profile.as_ref()).into(),
        token: token.into(),
    })
}

/// User owning a bearer token.
pub async fn resolve_session<TS: TokenEncryptionService>(
    pool: &PgPool,
    token_service: &TS,
    token: &str,
) -> Result<User, ApplicationError<()>> {
    let token = Token::<()>::verify(token.into(), token_service).map_err(UnauthorizedError::from)?;

    let TokenSubject::User(id) = token.payload().sub;
    let user = repository::iam::find_user(pool, id)
        .await?
        .ok_or(UnauthorizedError::InvalidToken)?;

    Ok(user)
}

pub fn require_staff(user: &User) -> Result<(), ForbiddenError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(ForbiddenError::AccessDenied)
    }
}

pub async fn current_user(
    pool: &PgPool,
    user: &User,
) -> Result<UserResponse, ApplicationError<()>> {
    let profile = repository::event::find_profile_by_user(pool, user.ident()).await?;

    Ok((user, profile.as_ref()).into())
}

pub async fn change_password<HS: PasswordHashService>(
    pool: &PgPool,
    hash_service: &HS,
    mut user: User,
    dto: ChangePassword,
) -> Result<UserResponse, ApplicationError<ChangePassword>> {
    let mut errors = Vec::new();

    if hash_service
        .verify_password(&dto.old_password, user.password_hash())
        .is_err()
    {
        errors.push(
            ValidationFieldError::new(
                "base::password",
                String::new(),
                "/old_password".into(),
                vec![ValidationErrorKind::Mismatch],
            )
            .with_message("Your old password was entered incorrectly. Please enter it again."),
        );
    }
    errors.extend(validation::iam::change_password(&dto));

    if !errors.is_empty() {
        let dto = ChangePassword {
            old_password: String::new(),
            new_password1: String::new(),
            new_password2: String::new(),
        };
        return Err(ValidationError::from_resource(dto, errors).into());
    }

    let password_hash = hash_service
        .hash_password(&dto.new_password1)
        .map_err(unknown)?;
    user.change_password(password_hash);
    repository::iam::update_user_password(pool, &user).await?;

    tracing::info!(user_id = %user.ident(), "password changed");

    let profile = repository::event::find_profile_by_user(pool, user.ident()).await?;

    Ok((&user, profile.as_ref()).into())
}
