use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    base::ResourceID,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

/// Code a participant shares so others can join the team.
///
/// Five uppercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TeamCode(String);

impl TeamCode {
    pub const LENGTH: usize = 5;

    /// Random code, uniqueness must be checked against the stored teams.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::LENGTH].to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ResourceID for TeamCode {
    fn resource_id() -> &'static str {
        "registration::team_code"
    }
}

/// Accepts user input: surrounding spaces are ignored and the code is
/// uppercased.
impl FromStr for TeamCode {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();

        if code.len() != Self::LENGTH || !code.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationFieldError::from_resource::<Self>(
                s.into(),
                String::new(),
                vec![ValidationErrorKind::Pattern("^[0-9A-F]{5}$".into())],
            ));
        }

        Ok(Self(code))
    }
}

impl std::fmt::Display for TeamCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TeamCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn generated_codes_are_five_uppercase_hex_chars() {
        for _ in 0..32 {
            let code = TeamCode::generate();
            assert_eq!(code.as_str().len(), TeamCode::LENGTH);
            assert!(code
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[test]
    fn parse_normalizes_user_input() {
        assert_eq!(" ab12f ".parse::<TeamCode>().unwrap().as_str(), "AB12F");
        assert!("ABCD".parse::<TeamCode>().is_err());
        assert!("ABCDEG".parse::<TeamCode>().is_err());
        assert!("XYZ12".parse::<TeamCode>().is_err());
    }
}
