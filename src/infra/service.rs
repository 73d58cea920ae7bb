pub mod security {
    use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
    use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
    use serde::{de::DeserializeOwned, Serialize};

    use crate::domain::datatype::security::{
        PasswordHash, PasswordHashError, TokenEncryptionError, TokenIssuer, TokenPayload,
    };
    use crate::domain::service::{PasswordHashService, TokenEncryptionService};

    pub struct Argon2HashService(Argon2<'static>);

    impl Argon2HashService {
        pub fn new() -> Self {
            Self(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::default(),
            ))
        }
    }

    impl Default for Argon2HashService {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PasswordHashService for Argon2HashService {
        fn hash_password(&self, pwd: &str) -> Result<PasswordHash, PasswordHashError> {
            let salt = password_hash::SaltString::generate(&mut rand_core::OsRng);
            let hash = self.0.hash_password(pwd.as_bytes(), &salt)?;

            Ok(hash.into())
        }

        fn verify_password(&self, pwd: &str, hash: &PasswordHash) -> Result<(), PasswordHashError> {
            let phc = hash.phc()?;
            self.0.verify_password(pwd.as_bytes(), &phc)?;

            Ok(())
        }
    }

    pub struct JWTEncryptionService {
        header: Header,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        validation: Validation,
    }

    impl JWTEncryptionService {
        pub fn new(secret: &str) -> Self {
            let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
            validation.set_required_spec_claims(&["exp", "iss", "sub"]);
            validation.set_issuer(&[TokenIssuer::as_str()]);
            validation.leeway = 60;
            validation.validate_exp = true;
            validation.validate_nbf = false;

            Self {
                encoding_key: EncodingKey::from_secret(secret.as_ref()),
                decoding_key: DecodingKey::from_secret(secret.as_ref()),
                header: Header::new(jsonwebtoken::Algorithm::HS256),
                validation,
            }
        }
    }

    impl From<jsonwebtoken::errors::Error> for TokenEncryptionError {
        fn from(err: jsonwebtoken::errors::Error) -> Self {
            match err.kind() {
                ErrorKind::InvalidSignature => Self::InvalidSignature,
                ErrorKind::ExpiredSignature => Self::Expired,
                ErrorKind::InvalidIssuer
                | ErrorKind::InvalidSubject
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::ImmatureSignature
                | ErrorKind::InvalidAudience => Self::InvalidClaims,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::InvalidAlgorithm => Self::Malformed,
                _ => Self::Encryption,
            }
        }
    }

    impl TokenEncryptionService for JWTEncryptionService {
        fn issue_token<T>(&self, payload: &TokenPayload<T>) -> Result<String, TokenEncryptionError>
        where
            T: Serialize,
        {
            let token = jsonwebtoken::encode(&self.header, payload, &self.encoding_key)?;
            Ok(token)
        }

        fn verify_token<T>(&self, token: &str) -> Result<TokenPayload<T>, TokenEncryptionError>
        where
            T: DeserializeOwned,
        {
            let token_data = jsonwebtoken::decode::<TokenPayload<T>>(
                token,
                &self.decoding_key,
                &self.validation,
            )?;
            Ok(token_data.claims)
        }
    }

    #[cfg(test)]
    mod tests {
        use std::time::Duration;

        use pretty_assertions::assert_eq;
        use uuid::Uuid;

        use super::*;
        use crate::domain::datatype::security::{Token, TokenSubject};

        #[test]
        fn hash_and_verify_password() {
            let service = Argon2HashService::new();
            let hash = service.hash_password("correct horse battery").unwrap();

            assert_eq!(hash.phc().unwrap().algorithm.as_str(), "argon2id");
            assert!(service
                .verify_password("correct horse battery", &hash)
                .is_ok());
            assert_eq!(
                service.verify_password("wrong password", &hash),
                Err(PasswordHashError::InvalidPassword)
            );
        }

        #[test]
        fn issue_and_verify_token() {
            let service = JWTEncryptionService::new("test-secret");
            let id = Uuid::new_v4();
            let payload = TokenPayload::new(Duration::from_secs(60), TokenSubject::User(id), ());

            let token: String = Token::new(payload, &service).unwrap().into();
            let verified = Token::<()>::verify(token.clone(), &service).unwrap();
            assert_eq!(verified.payload().sub, TokenSubject::User(id));

            let other = JWTEncryptionService::new("other-secret");
            assert_eq!(
                Token::<()>::verify(token, &other).unwrap_err(),
                TokenEncryptionError::InvalidSignature
            );
        }

        #[test]
        fn expired_token_is_rejected() {
            let service = JWTEncryptionService::new("test-secret");
            let mut payload =
                TokenPayload::new(Duration::from_secs(60), TokenSubject::User(Uuid::new_v4()), ());
            payload.iat -= 3600;
            payload.exp = payload.iat + 60;

            let token: String = Token::new(payload, &service).unwrap().into();
            assert_eq!(
                Token::<()>::verify(token, &service).unwrap_err(),
                TokenEncryptionError::Expired
            );
        }
    }
}

pub mod storage {
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;

    use crate::domain::service::FileStorage;

    /// Files kept under a directory of the local file system.
    pub struct LocalFileStorage {
        root: PathBuf,
    }

    impl LocalFileStorage {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        fn resolve(&self, path: &str) -> std::io::Result<PathBuf> {
            let relative = Path::new(path);
            if relative.is_absolute()
                || relative
                    .components()
                    .any(|c| !matches!(c, std::path::Component::Normal(_)))
            {
                return Err(std::io::ErrorKind::InvalidInput.into());
            }
            Ok(self.root.join(relative))
        }
    }

    #[async_trait]
    impl FileStorage for LocalFileStorage {
        async fn store(&self, path: &str, content: &[u8]) -> std::io::Result<()> {
            let path = self.resolve(path)?;
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }
            tokio::fs::write(path, content).await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn store_file_under_root() {
            let root = std::env::temp_dir().join(format!("storage-{}", uuid::Uuid::new_v4()));
            let storage = LocalFileStorage::new(&root);

            storage
                .store("applications/resumes/test.pdf", b"%PDF-1.4")
                .await
                .unwrap();
            let content = tokio::fs::read(root.join("applications/resumes/test.pdf"))
                .await
                .unwrap();
            assert_eq!(content, b"%PDF-1.4");

            tokio::fs::remove_dir_all(root).await.unwrap();
        }

        #[tokio::test]
        async fn paths_escaping_the_root_are_rejected() {
            let storage = LocalFileStorage::new(std::env::temp_dir());

            assert!(storage.store("../escape.pdf", b"").await.is_err());
            assert!(storage.store("/etc/escape.pdf", b"").await.is_err());
        }
    }
}
