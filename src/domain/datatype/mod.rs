pub mod choice;
pub mod security;
pub mod team_code;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(concat!(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ))
    .expect("Expect a valid email regex");
    static ref PHONE_NUMBER: Regex =
        Regex::new(r"^(?:\+\d{1,3})?\s?\(?\d{3}\)?[\s-]?\d{3}[\s-]?\d{4}$")
            .expect("Expect a valid phone number regex");
    static ref PERSON_NAME: Regex =
        Regex::new(r"^[a-zA-Z0-9\s-]*$").expect("Expect a valid person name regex");
}

pub const EMAIL_PATTERN: &str = "html5_email";
pub const PHONE_NUMBER_PATTERN: &str = r"^(?:\+\d{1,3})?\s?\(?\d{3}\)?[\s-]?\d{3}[\s-]?\d{4}$";
pub const PERSON_NAME_PATTERN: &str = r"^[a-zA-Z0-9\s-]*$";

/// Email address as accepted by an HTML5 `email` input.
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_phone_number(value: &str) -> bool {
    PHONE_NUMBER.is_match(value)
}

pub fn is_person_name(value: &str) -> bool {
    PERSON_NAME.is_match(value)
}

/// Keep only the digits of a phone number.
pub fn normalize_phone_number(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
