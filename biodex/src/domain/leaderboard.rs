//! Leaderboard rows.

use serde::Serialize;

use super::{DisplayName, UserId};

/// Number of rows shown by default.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// One leaderboard row: `(name, score, id)`.
///
/// Rows are ordered by score descending; equal scores keep registration
/// order, earliest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub display_name: DisplayName,
    pub score: i64,
    pub id: UserId,
}

/// A ranked row as shown to a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// 1-based rank.
    pub position: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    /// Whether this row belongs to the viewing user.
    pub is_viewer: bool,
}

/// Attach 1-based positions to `entries`, flagging the viewer's row.
pub fn rank(entries: Vec<LeaderboardEntry>, viewer: Option<&UserId>) -> Vec<RankedEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedEntry {
            position: index + 1,
            is_viewer: viewer.is_some_and(|id| *id == entry.id),
            entry,
        })
        .collect()
}
