pub mod event;
pub mod hardware;
pub mod iam;
pub mod registration;
pub mod review;

use crate::error::UnknownError;

/// Errors of the application services that are never caused by the request.
fn unknown(err: impl std::error::Error + Send + Sync + 'static) -> UnknownError {
    UnknownError::new(Box::new(err))
}
