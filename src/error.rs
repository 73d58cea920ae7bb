use derive_more::Display;
use salvo::{prelude::StatusError, writer::Json, Piece, Response};

use self::http::ErrorResponse;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Display)]
pub struct UnknownError(BoxedError);

impl std::error::Error for UnknownError {}

impl UnknownError {
    pub fn new(err: BoxedError) -> Self {
        Self(err)
    }
}

impl From<BoxedError> for UnknownError {
    fn from(err: BoxedError) -> Self {
        Self::new(err)
    }
}

#[derive(Debug, Display)]
struct StrError(pub Box<str>);

impl std::error::Error for StrError {}

impl<'a> From<&'a str> for UnknownError {
    fn from(err: &'a str) -> Self {
        UnknownError(Box::new(StrError(Box::from(err))))
    }
}

impl From<sqlx::error::Error> for UnknownError {
    fn from(err: sqlx::error::Error) -> Self {
        Self::new(err.into())
    }
}

impl From<std::io::Error> for UnknownError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.into())
    }
}

impl Piece for UnknownError {
    fn render(self, res: &mut Response) {
        tracing::error!("unknown error: {}", self.0);
        let status = StatusError::internal_server_error();
        res.render(Json(ErrorResponse::from_status_error(&status, ())));
        res.set_status_error(status);
    }
}

pub mod app {
    use derive_more::Display;
    use salvo::{prelude::StatusError, writer::Json, Piece};
    use serde::Serialize;

    use super::{
        http::{ErrorResponse, UploadError},
        persistence::PersistenceError,
        resource::{NotFoundError, OperationError, ValidationError},
        security::{AuthenticationError, ForbiddenError, UnauthorizedError},
        UnknownError,
    };

    #[derive(Debug, Display, Serialize)]
    pub enum ApplicationError<R> {
        Authentication(AuthenticationError),
        Unauthorized(UnauthorizedError),
        Forbidden(ForbiddenError),
        Validation(ValidationError<R>),
        NotFound(NotFoundError),
        Operation(OperationError),
        Upload(UploadError),
        Persistence(PersistenceError),
        #[serde(serialize_with = "serialize_unknown")]
        Unknown(UnknownError),
    }

    fn serialize_unknown<S>(_: &UnknownError, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_none()
    }

    impl<R: std::fmt::Debug> std::error::Error for ApplicationError<R> {}

    impl<R> From<AuthenticationError> for ApplicationError<R> {
        fn from(err: AuthenticationError) -> Self {
            Self::Authentication(err)
        }
    }

    impl<R> From<UnauthorizedError> for ApplicationError<R> {
        fn from(err: UnauthorizedError) -> Self {
            Self::Unauthorized(err)
        }
    }

    impl<R> From<ForbiddenError> for ApplicationError<R> {
        fn from(err: ForbiddenError) -> Self {
            Self::Forbidden(err)
        }
    }

    impl<R> From<ValidationError<R>> for ApplicationError<R> {
        fn from(err: ValidationError<R>) -> Self {
            Self::Validation(err)
        }
    }

    impl<R> From<NotFoundError> for ApplicationError<R> {
        fn from(err: NotFoundError) -> Self {
            Self::NotFound(err)
        }
    }

    impl<R> From<OperationError> for ApplicationError<R> {
        fn from(err: OperationError) -> Self {
            Self::Operation(err)
        }
    }

    impl<R> From<UploadError> for ApplicationError<R> {
        fn from(err: UploadError) -> Self {
            Self::Upload(err)
        }
    }

    impl<R> From<PersistenceError> for ApplicationError<R> {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl<R> From<sqlx::Error> for ApplicationError<R> {
        fn from(err: sqlx::Error) -> Self {
            Self::Persistence(err.into())
        }
    }

    impl<R> From<UnknownError> for ApplicationError<R> {
        fn from(err: UnknownError) -> Self {
            Self::Unknown(err)
        }
    }

    impl<R: Serialize + Send> Piece for ApplicationError<R> {
        fn render(self, res: &mut salvo::Response) {
            let status = match &self {
                ApplicationError::Persistence(err) => {
                    tracing::error!("persistence error: {err}");
                    StatusError::service_unavailable()
                }
                ApplicationError::Unknown(err) => {
                    tracing::error!("unknown error: {err}");
                    StatusError::internal_server_error()
                }
                ApplicationError::Validation(_) => StatusError::bad_request(),
                ApplicationError::Authentication(_) | ApplicationError::Unauthorized(_) => {
                    StatusError::unauthorized()
                }
                ApplicationError::Forbidden(_) => StatusError::forbidden(),
                ApplicationError::NotFound(_) => StatusError::not_found(),
                ApplicationError::Operation(_) => StatusError::unprocessable_entity(),
                ApplicationError::Upload(UploadError::TooLarge { .. }) => {
                    StatusError::payload_too_large()
                }
                ApplicationError::Upload(UploadError::UnsupportedType(_)) => {
                    StatusError::unsupported_media_type()
                }
            };
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }
}

pub mod service {
    use derive_more::Display;

    use crate::error::UnknownError;

    #[derive(Debug, Display)]
    pub enum DispatchError {
        #[display(fmt = "Dispatched operation timed out in {_0:?}")]
        Timeout(Option<std::time::Duration>),
        #[display(fmt = "IO error dispatching {_0}")]
        IO(std::io::Error),
        #[display(fmt = "Unknown dispatch error {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for DispatchError {}
}

pub mod persistence {
    use std::io;

    use derive_more::Display;
    use serde::Serialize;

    use super::{service::DispatchError, UnknownError};

    pub type SqlState = String;

    #[derive(Debug, Display)]
    pub enum PersistenceError {
        #[display(fmt = "database persistence error: SQLSTATE {_0:?}")]
        Database(Option<SqlState>),
        #[display(fmt = "persistence layer connection error: {_0}")]
        Connection(DispatchError),
        #[display(fmt = "PersistenceError data not found")]
        NotFound,
        #[display(fmt = "PersistenceError decoding data")]
        DecodeData,
        #[display(fmt = "PersistenceError data migration")]
        DataMigration,
        #[display(fmt = "unknown persistence error: {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for PersistenceError {}

    impl Serialize for PersistenceError {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_none()
        }
    }

    type SqlxError = sqlx::error::Error;

    impl From<SqlxError> for PersistenceError {
        fn from(err: SqlxError) -> Self {
            match err {
                SqlxError::Configuration(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::InvalidInput.into()))
                }
                SqlxError::Database(db) => Self::Database(db.code().map(|code| code.into())),
                SqlxError::Io(io) => Self::Connection(DispatchError::IO(io)),
                SqlxError::Tls(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::ConnectionRefused.into()))
                }
                SqlxError::Protocol(msg) => Self::Connection(DispatchError::IO(io::Error::new(
                    io::ErrorKind::InvalidData,
                    msg,
                ))),
                SqlxError::RowNotFound => Self::NotFound,
                SqlxError::TypeNotFound { .. } => Self::DecodeData,
                SqlxError::ColumnIndexOutOfBounds { .. } => Self::DecodeData,
                SqlxError::ColumnNotFound(_) => Self::NotFound,
                SqlxError::ColumnDecode { .. } => Self::DecodeData,
                SqlxError::Decode(_) => Self::DecodeData,
                SqlxError::PoolTimedOut => Self::Connection(DispatchError::Timeout(None)),
                SqlxError::PoolClosed => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::NotConnected.into()))
                }
                SqlxError::WorkerCrashed => {
                    tracing::error!("sqlx background worker crashed");
                    Self::Connection(DispatchError::Unknown(UnknownError::from(
                        "sqlx background worker crashed",
                    )))
                }
                SqlxError::Migrate(_) => Self::DataMigration,
                _ => PersistenceError::Unknown(err.into()),
            }
        }
    }
}

pub mod resource {
    use derive_more::{Display, Error};
    use serde::{Deserialize, Serialize};

    use crate::base::ResourceID;

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ValidationErrorKind {
        /// When a required property is missing.
        Required,

        /// Maximum inclusive string length.
        MaxLength(u64),
        /// Minimum inclusive string length.
        MinLength(u64),
        /// When the input doesn't match to a pattern.
        #[display(fmt = "Validation error kind: pattern {_0}")]
        Pattern(String),

        /// Inclusive lower bound exceeded.
        Minimum(i64),
        /// Inclusive higher bound exceeded.
        Maximum(i64),
        /// When some number is not positive.
        Positive,

        /// The input value doesn't match any of specified options.
        UnknownVariant,
        /// Two inputs that must be equal are different.
        Mismatch,
        /// Input value is too common or too simple.
        Weak,
        /// Input value already exists.
        AlreadyExists,
        /// Input value was not found.
        NotFound,
        /// Generic kind.
        Invalid,
    }

    impl std::error::Error for ValidationErrorKind {}

    #[derive(Debug, Error, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ValidationError<R> {
        /// Resource value
        pub resource: R,
        /// Name of the resource
        pub resource_type: &'static str,
        /// Invalid resource fields
        pub fields: Vec<ValidationFieldError>,
    }

    impl<R> ValidationError<R> {
        pub fn from_resource(resource: R, fields: Vec<ValidationFieldError>) -> Self
        where
            R: ResourceID,
        {
            Self {
                resource,
                resource_type: R::resource_id(),
                fields,
            }
        }
    }

    impl<R> std::fmt::Display for ValidationError<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!(
                "Invalid resource {}, fields {:?}",
                self.resource_type, self.fields
            ))
        }
    }

    #[derive(Debug, Display, Error, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[display(fmt = "{path}: {value:?}, {kinds:?}")]
    pub struct ValidationFieldError {
        /// Resource field path with invalid value
        pub path: String,
        /// Displayed invalid value
        pub value: String,
        /// Value type id
        pub type_id: &'static str,
        /// Kinds of validation errors
        pub kinds: Vec<ValidationErrorKind>,
        /// Human readable description
        pub message: Option<String>,
    }

    impl ValidationFieldError {
        pub fn from_resource<T>(
            value: String,
            path: String,
            kinds: Vec<ValidationErrorKind>,
        ) -> Self
        where
            T: ResourceID,
        {
            Self {
                path,
                type_id: T::resource_id(),
                value,
                kinds,
                message: None,
            }
        }

        pub fn new(
            type_id: &'static str,
            value: String,
            path: String,
            kinds: Vec<ValidationErrorKind>,
        ) -> Self {
            Self {
                path,
                type_id,
                value,
                kinds,
                message: None,
            }
        }

        pub fn with_message(mut self, message: impl Into<String>) -> Self {
            self.message = Some(message.into());
            self
        }
    }

    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Serialize)]
    #[display(fmt = "Resource {resource_type} {key} not found")]
    pub struct NotFoundError {
        /// Name of the resource
        pub resource_type: &'static str,
        /// Displayed key used in the lookup
        pub key: String,
    }

    impl NotFoundError {
        pub fn of<R: ResourceID>(key: impl ToString) -> Self {
            Self {
                resource_type: R::resource_id(),
                key: key.to_string(),
            }
        }
    }

    /// Rule the current operation does not satisfy.
    #[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OperationCode {
        #[display(fmt = "registration_closed")]
        RegistrationClosed,
        #[display(fmt = "already_applied")]
        AlreadyApplied,
        #[display(fmt = "application_required")]
        ApplicationRequired,
        #[display(fmt = "already_reviewed")]
        AlreadyReviewed,
        #[display(fmt = "teams_disabled")]
        TeamsDisabled,
        #[display(fmt = "team_not_found")]
        TeamNotFound,
        #[display(fmt = "team_full")]
        TeamFull,
        #[display(fmt = "rsvp_disabled")]
        RsvpDisabled,
        #[display(fmt = "rsvp_closed")]
        RsvpClosed,
        #[display(fmt = "not_accepted")]
        NotAccepted,
        #[display(fmt = "not_rsvped")]
        NotRsvped,
        #[display(fmt = "profile_exists")]
        ProfileExists,
        #[display(fmt = "profile_required")]
        ProfileRequired,
        #[display(fmt = "invalid_sign_in_time")]
        InvalidSignInTime,
        #[display(fmt = "unknown_sign_in_event")]
        UnknownSignInEvent,
        #[display(fmt = "user_not_found")]
        UserNotFound,
        #[display(fmt = "not_applied")]
        NotApplied,
        #[display(fmt = "already_signed_in")]
        AlreadySignedIn,
        #[display(fmt = "hardware_sign_out_closed")]
        HardwareSignOutClosed,
        #[display(fmt = "team_size")]
        TeamSize,
        #[display(fmt = "insufficient_stock")]
        InsufficientStock,
        #[display(fmt = "team_limit_exceeded")]
        TeamLimitExceeded,
        #[display(fmt = "order_not_cancellable")]
        OrderNotCancellable,
    }

    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Serialize)]
    #[display(fmt = "{code}: {message}")]
    pub struct OperationError {
        pub code: OperationCode,
        pub message: String,
    }

    impl OperationError {
        pub fn new(code: OperationCode, message: impl Into<String>) -> Self {
            Self {
                code,
                message: message.into(),
            }
        }
    }
}

pub mod security {
    use derive_more::Display;
    use serde::Serialize;

    use crate::domain::datatype::security::{PasswordHashError, TokenEncryptionError};

    /// Unauthorized access to a resource.
    ///
    /// The user is unauthorized to access the resource.
    #[derive(Debug, Display, Serialize)]
    pub enum UnauthorizedError {
        /// Authentication token is not present.
        #[display(fmt = "token_not_present")]
        TokenNotPresent,

        /// Authentication token is malformatted.
        ///
        /// The token is no formated as the required authentication scheme
        #[display(fmt = "malformatted_token")]
        MalformattedToken,

        /// Authentication token is invalid.
        #[display(fmt = "invalid_token")]
        InvalidToken,
    }

    #[derive(Debug, Display, Serialize)]
    pub enum AuthenticationError {
        /// Attempt to authenticate with invalid credentials.
        #[display(fmt = "invalid_credential")]
        InvalidCredential,
    }

    #[derive(Debug, Display, Serialize)]
    pub enum ForbiddenError {
        /// Access denied.
        ///
        /// The user is authenticated, however does not have access to the requested resource.
        #[display(fmt = "access_denied")]
        AccessDenied,
    }

    impl From<PasswordHashError> for AuthenticationError {
        fn from(_: PasswordHashError) -> Self {
            Self::InvalidCredential
        }
    }

    impl From<TokenEncryptionError> for UnauthorizedError {
        fn from(_: TokenEncryptionError) -> Self {
            Self::InvalidToken
        }
    }
}

pub mod http {
    use derive_more::{Display, Error};
    use salvo::{http::ParseError, prelude::StatusError, writer::Json, Piece, Response};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    pub enum BadRequest {
        InvalidContent,
        InvalidPath,
        InvalidQuery,
    }

    #[derive(Debug, Display, Clone, Error, Serialize, Deserialize)]
    #[display(fmt = "Response error: {title}, {message}")]
    pub struct ErrorResponse<T> {
        pub title: String,
        pub message: String,
        pub error: T,
    }

    impl<T> ErrorResponse<T> {
        pub fn from_status_error(status: &StatusError, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message: status
                    .summary
                    .clone()
                    .unwrap_or_else(|| status.name.clone()),
                error: err,
            }
        }
    }

    impl From<ParseError> for BadRequest {
        fn from(_: ParseError) -> Self {
            BadRequest::InvalidContent
        }
    }

    impl Piece for BadRequest {
        fn render(self, res: &mut Response) {
            let status = StatusError::bad_request();
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }

    /// Rejected file upload.
    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    pub enum UploadError {
        #[display(fmt = "Upload of {size} bytes exceeds the limit of {limit} bytes")]
        TooLarge { size: u64, limit: u64 },
        #[display(fmt = "Unsupported upload content type {_0:?}")]
        UnsupportedType(String),
    }

    impl std::error::Error for UploadError {}
}
