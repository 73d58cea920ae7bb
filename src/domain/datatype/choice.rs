//! Closed sets of values accepted by the application form and the admin
//! workflows.
//!
//! Every choice is stored and transferred with its machine value and carries
//! a human label.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    base::ResourceID,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident, $resource_name:literal {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ResourceID for $name {
            fn resource_id() -> &'static str {
                $resource_name
            }
        }

        impl FromStr for $name {
            type Err = ValidationFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(ValidationFieldError::from_resource::<Self>(
                        s.into(),
                        String::new(),
                        vec![ValidationErrorKind::UnknownVariant],
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(|_| {
                    serde::de::Error::unknown_variant(&value, &[$($value),+])
                })
            }
        }
    };
}

choice! {
    Pronouns, "registration::pronouns" {
        HeHim => ("he-him", "he/him"),
        HeThey => ("he-they", "he/they"),
        SheHer => ("she-her", "she/her"),
        SheThey => ("she-they", "she/they"),
        TheyThem => ("they-them", "they/them"),
        Other => ("other", "other"),
        NoAnswer => ("no-answer", "prefer not to answer"),
    }
}

choice! {
    Gender, "registration::gender" {
        Man => ("man", "Man"),
        Woman => ("woman", "Woman"),
        NonBinary => ("non-binary", "Non-Binary"),
        SelfDescribe => ("prefer-to-self-describe", "Prefer to Self-Describe"),
        NoAnswer => ("prefer-to-not-answer", "Prefer to not Answer"),
    }
}

choice! {
    Ethnicity, "registration::ethnicity" {
        AmericanNative => ("american-native", "American Indian or Alaskan Native"),
        AsianPacificIslander => ("asian-pacific-islander", "Asian / Pacific Islander"),
        BlackAfricanAmerican => ("black-african-american", "Black or African American"),
        Hispanic => ("hispanic", "Hispanic"),
        Caucasian => ("caucasian", "White / Caucasian"),
        Other => ("other", "Multiple ethnicity / Other"),
        NoAnswer => ("no-answer", "Prefer not to answer"),
    }
}

choice! {
    TshirtSize, "registration::tshirt_size" {
        S => ("S", "S"),
        M => ("M", "M"),
        L => ("L", "L"),
        XL => ("XL", "XL"),
    }
}

choice! {
    DietaryRestriction, "registration::dietary_restriction" {
        None => ("none", "None"),
        Halal => ("halal", "Halal"),
        Vegetarian => ("vegetarian", "Vegetarian"),
        Vegan => ("vegan", "Vegan"),
        CeliacDisease => ("celiac-disease", "Celiac Disease"),
        Allergies => ("allergies", "Allergies"),
        Kosher => ("kosher", "Kosher"),
        GlutenFree => ("gluten-free", "Gluten Free"),
        Other => ("other", "Other"),
    }
}

choice! {
    UnderRepresentedGroup, "registration::under_represented_group" {
        Yes => ("yes", "Yes"),
        No => ("no", "No"),
        Unsure => ("unsure", "Unsure"),
    }
}

choice! {
    SexualIdentity, "registration::sexual_identity" {
        Heterosexual => ("heterosexual-or-straight", "Heterosexual or straight"),
        GayOrLesbian => ("gay-or-lesbian", "Gay or lesbian"),
        Bisexual => ("bisexual", "Bisexual"),
        DifferentIdentity => ("different-identity", "Different Identity"),
        NoAnswer => ("prefer-to-not-answer", "Prefer to not Answer"),
    }
}

choice! {
    HighestFormalEducation, "registration::highest_formal_education" {
        LessThanSecondary => ("less-than-secondary-or-high-school", "Less than Secondary / High School"),
        Secondary => ("secondary-or-high-school", "Secondary / High School"),
        PostSecondaryTwoYears => ("post-secondary-2-years", "2 year Undergraduate University or community college program"),
        PostSecondaryThreeYears => ("post-secondary-3-or-more-years", "3+ year Undergraduate University program"),
        Graduate => ("graduate-university", "Graduate University (Masters, Professional, Doctoral, etc)"),
        CodeSchool => ("code-school-or-bootcamp", "Code School / Bootcamp"),
        Vocational => ("vocational-or-trades-or-apprenticeship", "Other Vocational or Trade Program or Apprenticeship"),
        Other => ("other", "Other"),
        NoAnswer => ("prefer-to-not-answer", "Prefer to not answer"),
    }
}

choice! {
    StudyLevel, "registration::study_level" {
        LessThanSecondary => ("less-than-secondary", "Less than Secondary / High School"),
        Secondary => ("secondary", "Secondary / High School"),
        UndergraduateTwoYear => ("undergraduate-2-year", "Undergraduate University (2 year - community college or similar)"),
        UndergraduateThreeYear => ("undergraduate-3-year", "Undergraduate University (3+ year)"),
        Graduate => ("graduate", "Graduate University (Masters, Professional, Doctoral, etc)"),
        CodeSchool => ("code-school", "Code School / Bootcamp"),
        Vocational => ("vocational", "Other Vocational / Trade Program or Apprenticeship"),
        PostDoctorate => ("post-doctorate", "Post Doctorate"),
        Other => ("other", "Other"),
        NotAStudent => ("not-a-student", "I’m not currently a student"),
        NoAnswer => ("no-answer", "Prefer not to answer"),
    }
}

choice! {
    /// Number of hackathons attended before.
    HackathonCount, "registration::how_many_hackathons" {
        Zero => ("0", "0"),
        One => ("1", "1"),
        Two => ("2", "2"),
        Three => ("3", "3"),
        FourPlus => ("4+", "4+"),
    }
}

choice! {
    DiscoveryMethod, "registration::discovery_method" {
        SocialMedia => ("social-media", "Social Media"),
        WordOfMouth => ("word-of-mouth", "Word of Mouth"),
        Mlh => ("mlh", "MLH"),
        School => ("school", "School / Club"),
        PastParticipant => ("past-participant", "Past Participant"),
        Other => ("other", "Other"),
    }
}

choice! {
    ReviewStatus, "review::status" {
        Accepted => ("Accepted", "Accepted"),
        Waitlisted => ("Waitlisted", "Waitlisted"),
        Rejected => ("Rejected", "Rejected"),
        Incomplete => ("Incomplete", "Incomplete"),
    }
}

choice! {
    OrderStatus, "hardware::order_status" {
        Submitted => ("Submitted", "Submitted"),
        ReadyForPickup => ("Ready for Pickup", "Ready for Pickup"),
        PickedUp => ("Picked Up", "Picked Up"),
        Cancelled => ("Cancelled", "Cancelled"),
        Returned => ("Returned", "Returned"),
    }
}

impl OrderStatus {
    /// Whether items of an order in this status are held by a team.
    pub fn holds_items(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled | OrderStatus::Returned)
    }
}

/// Age bracket of an applicant, the last bracket reads as "22+".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Age(u32);

impl Age {
    pub const MIN: u32 = 17;
    pub const MAX: u32 = 23;

    pub fn new(age: u32) -> Result<Self, ValidationFieldError> {
        if (Self::MIN..=Self::MAX).contains(&age) {
            Ok(Self(age))
        } else {
            Err(ValidationFieldError::from_resource::<Self>(
                age.to_string(),
                String::new(),
                vec![ValidationErrorKind::UnknownVariant],
            ))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn label(&self) -> String {
        if self.0 == Self::MAX {
            "22+".into()
        } else {
            self.0.to_string()
        }
    }
}

impl ResourceID for Age {
    fn resource_id() -> &'static str {
        "registration::age"
    }
}

impl<'de> Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let age = u32::deserialize(deserializer)?;
        Self::new(age).map_err(|_| {
            serde::de::Error::custom(format!(
                "age must be between {} and {}",
                Self::MIN,
                Self::MAX
            ))
        })
    }
}
