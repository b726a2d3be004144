//! Score keeping service: the single source of truth for users, scores and
//! the capture log.
//!
//! `ScoreStore` validates and normalizes caller input, stamps captures with
//! the injected clock, and applies the [`MissingUserPolicy`] to score
//! corrections that name an unknown user. Storage lives behind the
//! [`ScoreRepository`] port.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::capture::capture_timestamp;
use super::ports::{ScoreRepository, ScoreRepositoryError};
use super::{CaptureEntry, DisplayName, Error, LeaderboardEntry, NewCapture, User, UserId};

/// How score corrections treat ids that match no user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingUserPolicy {
    /// Log a warning and carry on, leaving the store untouched.
    #[default]
    Ignore,
    /// Fail with [`Error::UnknownUser`].
    Reject,
}

/// Error returned when parsing an unrecognised [`MissingUserPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown missing-user policy {0:?}; expected \"ignore\" or \"reject\"")]
pub struct ParseMissingUserPolicyError(String);

impl FromStr for MissingUserPolicy {
    type Err = ParseMissingUserPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseMissingUserPolicyError(s.to_owned())),
        }
    }
}

impl fmt::Display for MissingUserPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => f.write_str("ignore"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Score keeping service over a [`ScoreRepository`].
pub struct ScoreStore<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    missing_user_policy: MissingUserPolicy,
}

impl<R> Clone for ScoreStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            missing_user_policy: self.missing_user_policy,
        }
    }
}

impl<R> ScoreStore<R> {
    /// Create a store over `repository`, timestamping captures with `clock`.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use biodex::domain::ScoreStore;
    /// # use biodex::outbound::persistence::{ConnectionConfig, DbConnection, DieselScoreRepository};
    /// # use mockable::DefaultClock;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let connection = DbConnection::open(&ConnectionConfig::in_memory())?;
    /// let store = ScoreStore::new(
    ///     Arc::new(DieselScoreRepository::new(connection)),
    ///     Arc::new(DefaultClock),
    /// );
    /// let ash = store.ensure_user("Ash")?;
    /// assert_eq!(ash.score(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            missing_user_policy: MissingUserPolicy::default(),
        }
    }

    /// Replace the policy applied to corrections for unknown users.
    #[must_use]
    pub fn with_missing_user_policy(mut self, policy: MissingUserPolicy) -> Self {
        self.missing_user_policy = policy;
        self
    }
}

impl<R: ScoreRepository> ScoreStore<R> {
    /// Return the user for `name`, registering them with a zero score first
    /// if needed. Calling this again never resets an existing score.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the name is empty or too long; nothing is
    /// written in that case.
    pub fn ensure_user(&self, name: &str) -> Result<User, Error> {
        let candidate = User::register(DisplayName::new(name)?)?;
        if self.repository.insert_user_if_absent(&candidate)? {
            info!(user_id = %candidate.id(), "registered new user");
            return Ok(candidate);
        }

        self.repository
            .find_user(candidate.id())?
            .ok_or_else(|| {
                Error::Storage(ScoreRepositoryError::query(format!(
                    "user {} vanished after registration",
                    candidate.id()
                )))
            })
    }

    /// Append a capture for `user_id`, bumping their score by `points` when
    /// `add_to_score` is set. Entry and score change commit together.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`] when no such user exists; nothing is written.
    pub fn record_capture(
        &self,
        user_id: &UserId,
        species: &str,
        points: i64,
        add_to_score: bool,
    ) -> Result<CaptureEntry, Error> {
        let capture = NewCapture {
            submitter: user_id.clone(),
            species: species.to_owned(),
            points_awarded: points,
            captured_at: capture_timestamp(self.clock.utc()),
            add_to_score,
        };

        if !self.repository.record_capture(&capture)? {
            return Err(Error::UnknownUser {
                id: user_id.clone(),
            });
        }

        info!(
            user_id = %user_id,
            species,
            points,
            add_to_score,
            "recorded capture"
        );
        Ok(CaptureEntry {
            submitter: capture.submitter,
            species: capture.species,
            points_awarded: capture.points_awarded,
            captured_at: capture.captured_at,
        })
    }

    /// Overwrite the score for `user_id`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`] for a missing user under
    /// [`MissingUserPolicy::Reject`].
    pub fn set_score(&self, user_id: &UserId, new_score: i64) -> Result<(), Error> {
        if self.repository.set_score(user_id, new_score)? {
            debug!(user_id = %user_id, new_score, "score overwritten");
            return Ok(());
        }
        self.missing_user(user_id, "set_score")
    }

    /// Add `delta` (which may be negative) to the score for `user_id`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`] for a missing user under
    /// [`MissingUserPolicy::Reject`].
    pub fn add_score(&self, user_id: &UserId, delta: i64) -> Result<(), Error> {
        if self.repository.add_score(user_id, delta)? {
            debug!(user_id = %user_id, delta, "score adjusted");
            return Ok(());
        }
        self.missing_user(user_id, "add_score")
    }

    /// Current score, or `None` when the user does not exist.
    pub fn get_score(&self, user_id: &UserId) -> Result<Option<i64>, Error> {
        Ok(self.repository.find_user(user_id)?.map(|user| user.score()))
    }

    /// Full capture history, newest first.
    pub fn get_entries(&self, user_id: &UserId) -> Result<Vec<CaptureEntry>, Error> {
        Ok(self.repository.entries_for(user_id, None)?)
    }

    /// The `limit` most recent captures, newest first.
    pub fn recent_entries(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<CaptureEntry>, Error> {
        Ok(self.repository.entries_for(user_id, Some(limit))?)
    }

    /// Display name as registered, or `None` when the user does not exist.
    pub fn get_display_name(&self, user_id: &UserId) -> Result<Option<DisplayName>, Error> {
        Ok(self
            .repository
            .find_user(user_id)?
            .map(|user| user.display_name().clone()))
    }

    /// The top `n` rows of the leaderboard.
    pub fn leaderboard_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, Error> {
        Ok(self.repository.leaderboard(Some(n))?)
    }

    /// Every user, ranked.
    pub fn full_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        Ok(self.repository.leaderboard(None)?)
    }

    /// 1-based rank of `user_id`, or `None` when the user does not exist.
    pub fn leaderboard_position(&self, user_id: &UserId) -> Result<Option<usize>, Error> {
        Ok(self.repository.position_of(user_id)?)
    }

    /// Whether `user_id` is registered.
    pub fn user_exists(&self, user_id: &UserId) -> Result<bool, Error> {
        Ok(self.repository.user_exists(user_id)?)
    }

    /// Highest score on record, or `None` for an empty store.
    pub fn highest_score(&self) -> Result<Option<i64>, Error> {
        Ok(self.repository.highest_score()?)
    }

    fn missing_user(&self, user_id: &UserId, operation: &'static str) -> Result<(), Error> {
        match self.missing_user_policy {
            MissingUserPolicy::Ignore => {
                warn!(user_id = %user_id, operation, "ignoring score change for unknown user");
                Ok(())
            }
            MissingUserPolicy::Reject => Err(Error::UnknownUser {
                id: user_id.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "score_store_tests.rs"]
mod tests;
