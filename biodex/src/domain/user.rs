//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the [`DisplayName`] and [`UserId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    IdTooLong { max: usize },
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::IdTooLong { max } => write!(f, "user id must be at most {max} characters"),
            Self::EmptyDisplayName => write!(f, "your name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "your name may not contain more than {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a display name and its derived id.
pub const DISPLAY_NAME_MAX: usize = 12;

/// Normalized user key: the lower-cased form of a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Normalize and validate a raw identifier.
    ///
    /// Input is lower-cased, so `UserId::new("Ash")` and `UserId::new("ash")`
    /// name the same user.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_lowercase())
    }

    /// Derive the id for a freshly validated display name.
    pub fn from_display_name(display_name: &DisplayName) -> Result<Self, UserValidationError> {
        Self::new(display_name.as_ref())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        // Lower-casing can grow some characters, so the bound is checked here
        // as well as on the display name.
        if id.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::IdTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A registered player and their running total.
///
/// ## Invariants
/// - `id` is the lower-cased `display_name` captured at registration and is
///   never re-derived afterwards.
/// - `display_name` is non-empty and at most [`DISPLAY_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    score: i64,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, display_name: DisplayName, score: i64) -> Self {
        Self {
            id,
            display_name,
            score,
        }
    }

    /// Register a new user: derives the id and starts the score at zero.
    pub fn register(display_name: DisplayName) -> Result<Self, UserValidationError> {
        let id = UserId::from_display_name(&display_name)?;
        Ok(Self::new(id, display_name, 0))
    }

    /// Fallible constructor from raw display name input.
    #[cfg(test)]
    pub(crate) fn try_register(
        display_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Self::register(DisplayName::new(display_name)?)
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Name shown on the leaderboard.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Current running total.
    pub fn score(&self) -> i64 {
        self.score
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
