//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `BIODEX_*` environment variables or a configuration file;
//! every setting has a default so an empty environment yields a working game.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    CatchOfTheDay, DEFAULT_LEADERBOARD_SIZE, MissingUserPolicy, ParseMissingUserPolicyError,
    SpeciesCatalog,
};

const DEFAULT_DATABASE_PATH: &str = "users.sqlite";

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `missing_user_policy` is not a known policy.
    #[error(transparent)]
    MissingUserPolicy(#[from] ParseMissingUserPolicyError),
    /// `catch_of_the_day` names a species outside the catalog.
    #[error("catch of the day {name:?} is not a known species")]
    UnknownCatchOfTheDay { name: String },
}

/// Configuration values for the score store and its front end.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BIODEX")]
pub struct BiodexSettings {
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Rows shown by the leaderboard.
    pub leaderboard_size: Option<usize>,
    /// Cap on capture history rows; unlimited when unset.
    pub history_limit: Option<usize>,
    /// Species awarding triple points today.
    pub catch_of_the_day: Option<String>,
    /// `ignore` or `reject` score corrections for unknown users.
    pub missing_user_policy: Option<String>,
}

impl BiodexSettings {
    /// Return the configured database path, falling back to `users.sqlite`.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Return the configured leaderboard size, falling back to ten rows.
    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size.unwrap_or(DEFAULT_LEADERBOARD_SIZE)
    }

    /// Return the configured missing-user policy, defaulting to `ignore`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingUserPolicy`] for unrecognised values.
    pub fn missing_user_policy(&self) -> Result<MissingUserPolicy, SettingsError> {
        self.missing_user_policy
            .as_deref()
            .map_or(Ok(MissingUserPolicy::default()), str::parse)
            .map_err(SettingsError::from)
    }

    /// Resolve the featured species against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownCatchOfTheDay`] when the name is not in
    /// the catalog.
    pub fn catch_of_the_day(
        &self,
        catalog: &SpeciesCatalog,
    ) -> Result<Option<CatchOfTheDay>, SettingsError> {
        self.catch_of_the_day
            .as_deref()
            .map(|name| {
                CatchOfTheDay::select(catalog, name).ok_or_else(|| {
                    SettingsError::UnknownCatchOfTheDay {
                        name: name.to_owned(),
                    }
                })
            })
            .transpose()
    }
}
