//! Domain primitives and services.
//!
//! Purpose: hold the scoring model independently of storage and
//! presentation. Types here validate their invariants on construction.
//!
//! Public surface:
//! - User, UserId, DisplayName: registered players and their keys.
//! - SpeciesCatalog, CaptureDraw: what can be caught and how often.
//! - ScoreStore: the score keeping service over the `ScoreRepository` port.
//! - Error: domain failures surfaced to the presentation layer.

pub mod capture;
pub mod capture_draw;
pub mod error;
pub mod leaderboard;
pub mod ports;
pub mod score_store;
pub mod species;
pub mod user;

pub use self::capture::{CaptureEntry, NewCapture};
pub use self::capture_draw::{CaptureDraw, CaptureDrawError};
pub use self::error::Error;
pub use self::leaderboard::{DEFAULT_LEADERBOARD_SIZE, LeaderboardEntry, RankedEntry, rank};
pub use self::score_store::{MissingUserPolicy, ParseMissingUserPolicyError, ScoreStore};
pub use self::species::{
    CATCH_OF_THE_DAY_MULTIPLIER, CatchOfTheDay, Species, SpeciesCatalog, award_points,
};
pub use self::user::{DISPLAY_NAME_MAX, DisplayName, User, UserId, UserValidationError};
