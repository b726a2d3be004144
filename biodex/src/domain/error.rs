//! Domain-level error type.
//!
//! Validation failures are meant for the end user; storage failures are fatal
//! to the action that hit them and carry no retry policy.

use super::capture_draw::CaptureDrawError;
use super::ports::ScoreRepositoryError;
use super::{UserId, UserValidationError};

/// Errors surfaced by [`crate::domain::ScoreStore`] and the session layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The supplied name or id failed validation.
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    /// A mutation addressed a user that does not exist.
    #[error("no user with id {id}")]
    UnknownUser { id: UserId },
    /// The action needs a logged-in user.
    #[error("you must be logged in to do this")]
    NotLoggedIn,
    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] ScoreRepositoryError),
    /// The species catalog cannot be drawn from.
    #[error(transparent)]
    Draw(#[from] CaptureDrawError),
}

impl Error {
    /// Whether the error should be shown to the player as a blocking notice
    /// rather than treated as a failure of the program.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnknownUser { .. } | Self::NotLoggedIn
        )
    }
}
