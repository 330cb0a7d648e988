//! Candidate profile — the six fields collected before the interview starts.
//!
//! `ProfileForm` is what the presentation layer submits (plain strings);
//! `Profile` is the validated value the session owns. Conversion is the only
//! place bounds and choices are enforced.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;

pub const MAX_NAME_CHARS: usize = 40;
pub const MAX_EXPERIENCE_CHARS: usize = 200;
pub const MAX_SKILLS_CHARS: usize = 200;

/// Declares a fixed-choice field: serde, `Display` and `FromStr` all use the label text.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let choices: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        AppError::Validation(format!(
                            "{} must be one of: {} (got '{}')",
                            $field,
                            choices.join(", "),
                            s
                        ))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                label.parse().map_err(de::Error::custom)
            }
        }
    };
}

choice_enum!(
    /// Seniority of the target role.
    Level, "level" {
        Junior => "Junior",
        MidLevel => "Mid-level",
        Senior => "Senior",
    }
);

choice_enum!(
    Position, "position" {
        DataScientist => "Data Scientist",
        DataEngineer => "Data Engineer",
        MlEngineer => "ML Engineer",
        BiAnalyst => "BI Analyst",
        FinancialAnalyst => "Financial Analyst",
    }
);

choice_enum!(
    Company, "company" {
        Amazon => "Amazon",
        Meta => "Meta",
        Udemy => "Udemy",
        Company365 => "365 Company",
        Nestle => "Nestle",
        LinkedIn => "LinkedIn",
        Spotify => "Spotify",
    }
);

impl Default for Level {
    fn default() -> Self {
        Level::Junior
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::DataScientist
    }
}

impl Default for Company {
    fn default() -> Self {
        Company::Amazon
    }
}

/// Raw profile fields as submitted by the setup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
}

/// A validated candidate profile. Immutable once the interview has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    name: String,
    experience: String,
    skills: String,
    level: Level,
    position: Position,
    company: Company,
}

impl Profile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn experience(&self) -> &str {
        &self.experience
    }

    pub fn skills(&self) -> &str {
        &self.skills
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn company(&self) -> Company {
        self.company
    }
}

impl TryFrom<ProfileForm> for Profile {
    type Error = AppError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        Ok(Profile {
            name: bounded_text("name", &form.name, MAX_NAME_CHARS)?,
            experience: bounded_text("experience", &form.experience, MAX_EXPERIENCE_CHARS)?,
            skills: bounded_text("skills", &form.skills, MAX_SKILLS_CHARS)?,
            level: form.level.parse()?,
            position: form.position.parse()?,
            company: form.company.parse()?,
        })
    }
}

/// Checks the raw `value` is at most `max_chars` characters and not blank,
/// then returns it trimmed. Padding counts towards the cap.
pub fn bounded_text(field: &str, value: &str, max_chars: usize) -> Result<String, AppError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_chars} characters (got {len})"
        )));
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// The sample candidate used across tests.
#[cfg(test)]
pub(crate) fn ana_form() -> ProfileForm {
    ProfileForm {
        name: "Ana".to_string(),
        experience: "2 yrs analytics".to_string(),
        skills: "SQL, Python".to_string(),
        level: "Junior".to_string(),
        position: "Data Scientist".to_string(),
        company: "Amazon".to_string(),
    }
}
