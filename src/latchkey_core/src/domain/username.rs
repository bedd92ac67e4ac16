use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_.-]{0,63}$").expect("username pattern is valid")
});

#[derive(Debug, Error, PartialEq)]
pub enum UsernameError {
    #[error("Username is empty")]
    Empty,
    #[error("Invalid username: {0}")]
    Invalid(String),
}

/// A username in canonical form: trimmed and lowercased.
///
/// Two names that differ only by case or surrounding whitespace normalize
/// to the same value, so comparisons should always go through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedUsername(String);

impl NormalizedUsername {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UsernameError::Empty);
        }
        if !USERNAME_RE.is_match(&normalized) {
            return Err(UsernameError::Invalid(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against an unnormalized name.
    pub fn eq_raw(&self, raw: &str) -> bool {
        Self::parse(raw).is_ok_and(|other| other == *self)
    }
}

impl TryFrom<String> for NormalizedUsername {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NormalizedUsername> for String {
    fn from(value: NormalizedUsername) -> Self {
        value.0
    }
}

impl AsRef<str> for NormalizedUsername {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
