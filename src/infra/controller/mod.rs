pub mod event;
pub mod hardware;
pub mod iam;
pub mod registration;
pub mod review;

use std::sync::Arc;

use salvo::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    app::use_case,
    config::event::EventSettings,
    domain::entity::iam::User,
    error::{app::ApplicationError, http::BadRequest, security::UnauthorizedError},
    infra::service::{
        security::{Argon2HashService, JWTEncryptionService},
        storage::LocalFileStorage,
    },
};

/// Shared state cloned into every controller.
#[derive(Clone)]
pub struct Context {
    pub pool: PgPool,
    pub hash_service: Arc<Argon2HashService>,
    pub token_service: Arc<JWTEncryptionService>,
    pub storage: Arc<LocalFileStorage>,
    pub settings: &'static EventSettings,
}

impl Context {
    /// User authenticated by the request bearer token.
    pub async fn user<R>(&self, req: &Request) -> Result<User, ApplicationError<R>> {
        let token = extract_token(req)?;

        use_case::iam::resolve_session(&self.pool, self.token_service.as_ref(), token)
            .await
            .map_err(|err| match err {
                ApplicationError::Persistence(err) => ApplicationError::Persistence(err),
                _ => ApplicationError::Unauthorized(UnauthorizedError::InvalidToken),
            })
    }

    /// Authenticated user with staff access.
    pub async fn staff<R>(&self, req: &Request) -> Result<User, ApplicationError<R>> {
        let user = self.user(req).await?;
        use_case::iam::require_staff(&user)?;

        Ok(user)
    }
}

macro_rules! map_res_err {
    ($result:expr, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

macro_rules! controller {
    ($($name:ident),+ $(,)?) => {
        $(
            pub struct $name {
                ctx: super::Context,
            }

            impl $name {
                pub fn new(ctx: super::Context) -> Self {
                    Self { ctx }
                }
            }
        )+
    };
}

pub(self) use controller;
pub(self) use map_res_err;

/// Extract a authorization token from a request.
///
/// Token must be formated in the Bearer authentication scheme
/// described in [RFC 6750](https://datatracker.ietf.org/doc/html/rfc6750)
fn extract_token(req: &Request) -> Result<&str, UnauthorizedError> {
    let header = req
        .headers()
        .get("authorization")
        .ok_or(UnauthorizedError::TokenNotPresent)?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(UnauthorizedError::MalformattedToken)
}

/// Extract a uuid from the request id param.
fn extract_id(req: &Request) -> Result<Uuid, BadRequest> {
    req.params()
        .get("id")
        .and_then(|id| id.parse().ok())
        .ok_or(BadRequest::InvalidPath)
}
