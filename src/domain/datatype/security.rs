use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    base::ResourceID,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

/// Password hash.
///
/// A validated [PHC string][1], the format every password hashing service
/// of the application must produce:
///
/// ```text
/// $<id>[$v=<version>][$<param>=<value>(,<param>=<value>)*][$<salt>[$<hash>]]
/// ```
///
/// [1]: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md#specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed view of the PHC string.
    pub fn phc(&self) -> Result<password_hash::PasswordHash<'_>, PasswordHashError> {
        Ok(password_hash::PasswordHash::new(&self.0)?)
    }
}

impl ResourceID for PasswordHash {
    fn resource_id() -> &'static str {
        "base::password_hash"
    }
}

impl FromStr for PasswordHash {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        password_hash::PasswordHash::new(s).map_err(|_| {
            Self::Err::from_resource::<Self>(
                String::new(),
                String::new(),
                vec![ValidationErrorKind::Invalid],
            )
        })?;

        Ok(Self(s.into()))
    }
}

impl<'a> From<password_hash::PasswordHash<'a>> for PasswordHash {
    fn from(hash: password_hash::PasswordHash<'a>) -> Self {
        Self(hash.to_string())
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PasswordHashError {
    /// Unsupported Algorithm.
    UnsupportedAlgorithm,

    /// Invalid password.
    InvalidPassword,

    /// Invalid password hash.
    InvalidPasswordHash,

    /// Cryptographic error.
    Cryptographic,

    /// Error in the hasher configuration.
    Config,

    /// Unknown hashing error.
    Unknown,
}

impl std::error::Error for PasswordHashError {}

impl From<password_hash::Error> for PasswordHashError {
    fn from(err: password_hash::Error) -> Self {
        match err {
            password_hash::Error::Algorithm => Self::UnsupportedAlgorithm,
            password_hash::Error::B64Encoding(_) => Self::InvalidPasswordHash,
            password_hash::Error::Crypto => Self::Cryptographic,
            password_hash::Error::OutputTooShort => Self::Cryptographic,
            password_hash::Error::OutputTooLong => Self::Cryptographic,
            password_hash::Error::ParamNameDuplicated => Self::Config,
            password_hash::Error::ParamNameInvalid => Self::Config,
            password_hash::Error::ParamValueInvalid(_) => Self::Config,
            password_hash::Error::ParamsMaxExceeded => Self::Config,
            password_hash::Error::Password => Self::InvalidPassword,
            password_hash::Error::PhcStringInvalid => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooShort => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooLong => Self::InvalidPasswordHash,
            password_hash::Error::SaltInvalid(_) => Self::Config,
            password_hash::Error::Version => Self::UnsupportedAlgorithm,
            _ => Self::Unknown,
        }
    }
}

/// Issuer of every token signed by the application.
pub struct TokenIssuer;

impl TokenIssuer {
    pub const fn as_str() -> &'static str {
        "hackathon_site"
    }
}

/// Subject a token was issued to, encoded as `<kind>:<id>`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TokenSubject {
    #[display(fmt = "user:{_0}")]
    User(Uuid),
}

impl FromStr for TokenSubject {
    type Err = TokenEncryptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("user", id)) => id
                .parse()
                .map(Self::User)
                .map_err(|_| TokenEncryptionError::InvalidClaims),
            _ => Err(TokenEncryptionError::InvalidClaims),
        }
    }
}

impl Serialize for TokenSubject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenSubject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let subject = String::deserialize(deserializer)?;
        subject.parse().map_err(serde::de::Error::custom)
    }
}

/// Registered claims plus application data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload<T> {
    pub iss: String,
    pub sub: TokenSubject,
    /// Issued at, as a unix timestamp
    pub iat: i64,
    /// Expiration, as a unix timestamp
    pub exp: i64,
    pub data: T,
}

impl<T> TokenPayload<T> {
    pub fn new(expiration: Duration, sub: TokenSubject, data: T) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            iss: TokenIssuer::as_str().into(),
            sub,
            iat,
            exp: iat + expiration.as_secs() as i64,
            data,
        }
    }
}

/// Signed token and its payload.
#[derive(Debug, Clone)]
pub struct Token<T> {
    pub(in crate::domain) token: String,
    pub(in crate::domain) payload: TokenPayload<T>,
}

impl<T> Token<T> {
    pub fn payload(&self) -> &TokenPayload<T> {
        &self.payload
    }
}

impl<T> From<Token<T>> for String {
    fn from(token: Token<T>) -> Self {
        token.token
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TokenEncryptionError {
    #[display(fmt = "invalid token signature")]
    InvalidSignature,
    #[display(fmt = "expired token")]
    Expired,
    #[display(fmt = "invalid token claims")]
    InvalidClaims,
    #[display(fmt = "malformed token")]
    Malformed,
    #[display(fmt = "token encryption error")]
    Encryption,
}

impl std::error::Error for TokenEncryptionError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn token_subject_encoding() {
        let id = Uuid::new_v4();
        let subject = TokenSubject::User(id);

        assert_eq!(subject.to_string(), format!("user:{id}"));
        assert_eq!(subject.to_string().parse::<TokenSubject>(), Ok(subject));
        assert_eq!(
            "team:1234".parse::<TokenSubject>(),
            Err(TokenEncryptionError::InvalidClaims)
        );
        assert_eq!(
            "user:not-a-uuid".parse::<TokenSubject>(),
            Err(TokenEncryptionError::InvalidClaims)
        );
    }

    #[test]
    fn token_payload_expiration() {
        let payload = TokenPayload::new(
            Duration::from_secs(60),
            TokenSubject::User(Uuid::new_v4()),
            (),
        );

        assert_eq!(payload.exp - payload.iat, 60);
        assert_eq!(payload.iss, "hackathon_site");
    }

    #[test]
    fn password_hash_rejects_non_phc_string() {
        assert!("plain-password".parse::<PasswordHash>().is_err());
        let hash: PasswordHash = "$argon2id$v=19$m=4096,t=3,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA"
            .parse()
            .unwrap();
        assert_eq!(hash.phc().unwrap().algorithm.as_str(), "argon2id");
    }
}
