//! Player session: the presentation-side context for one running front end.
//!
//! A [`Session`] owns the score store handle, the capture draw, today's
//! featured species and the logged-in user. Front ends translate user input
//! into [`Command`]s and render the returned [`CommandOutcome`]s.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::domain::ports::ScoreRepository;
use crate::domain::{
    CaptureDraw, CaptureEntry, CatchOfTheDay, DEFAULT_LEADERBOARD_SIZE, DisplayName, Error,
    RankedEntry, ScoreStore, SpeciesCatalog, User, UserId, award_points, rank,
};

/// Actions a player can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in as `name`, registering them on first use.
    LogIn { name: String },
    /// Forget the logged-in user.
    LogOff,
    /// Draw a species and credit it to the logged-in user.
    Capture,
    /// Top of the leaderboard, with the viewer's row flagged.
    ShowLeaderboard,
    /// The logged-in user's capture history.
    ShowCollected,
    /// The logged-in user's score.
    ShowScore,
    /// Overwrite a user's score.
    SetScore { user: String, score: i64 },
    /// Adjust a user's score by `delta`.
    AddScore { user: String, delta: i64 },
    /// Probability of each species turning up.
    ShowOdds,
}

/// Draw odds for one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesOdds {
    pub species: &'static str,
    /// Points a capture awards today, bonus included.
    pub points: i64,
    pub probability: f64,
    pub catch_of_the_day: bool,
}

/// Plain data produced by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommandOutcome {
    LoggedIn {
        user: User,
    },
    LoggedOff,
    #[serde(rename_all = "camelCase")]
    Captured {
        entry: CaptureEntry,
        catch_of_the_day: bool,
    },
    /// `viewer_position` is set whenever a user is logged in, even when
    /// their row falls outside `rows`.
    #[serde(rename_all = "camelCase")]
    Leaderboard {
        rows: Vec<RankedEntry>,
        viewer_position: Option<usize>,
    },
    Collected {
        entries: Vec<CaptureEntry>,
    },
    #[serde(rename_all = "camelCase")]
    Score {
        display_name: DisplayName,
        score: i64,
    },
    /// `score` is `None` when the correction named an unknown user.
    ScoreUpdated {
        id: UserId,
        score: Option<i64>,
    },
    Odds {
        odds: Vec<SpeciesOdds>,
    },
}

/// Presentation context for one player at a time.
pub struct Session<R> {
    store: ScoreStore<R>,
    draw: CaptureDraw,
    catch_of_the_day: Option<CatchOfTheDay>,
    current_user: Option<UserId>,
    leaderboard_size: usize,
    history_limit: Option<usize>,
    rng: Box<dyn RngCore + Send>,
}

impl<R> Session<R> {
    /// Create a logged-out session drawing from `catalog`.
    ///
    /// # Errors
    ///
    /// [`Error::Draw`] when the catalog cannot be drawn from.
    pub fn new(store: ScoreStore<R>, catalog: &SpeciesCatalog) -> Result<Self, Error> {
        Ok(Self {
            store,
            draw: CaptureDraw::new(catalog)?,
            catch_of_the_day: None,
            current_user: None,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            history_limit: None,
            rng: Box::new(StdRng::from_os_rng()),
        })
    }

    /// Feature a species for triple points.
    #[must_use]
    pub fn with_catch_of_the_day(mut self, catch_of_the_day: Option<CatchOfTheDay>) -> Self {
        self.catch_of_the_day = catch_of_the_day;
        self
    }

    /// Number of rows shown by [`Command::ShowLeaderboard`].
    #[must_use]
    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.leaderboard_size = size;
        self
    }

    /// Cap the rows shown by [`Command::ShowCollected`].
    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Replace the random source used for captures.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Id of the logged-in user, if any.
    pub fn current_user(&self) -> Option<&UserId> {
        self.current_user.as_ref()
    }

    fn require_login(&self) -> Result<UserId, Error> {
        self.current_user.clone().ok_or(Error::NotLoggedIn)
    }
}

impl<R: ScoreRepository> Session<R> {
    /// Execute `command` against the store.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoggedIn`] for player commands issued while logged out,
    /// plus any error raised by the store.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, Error> {
        match command {
            Command::LogIn { name } => self.log_in(&name),
            Command::LogOff => {
                if let Some(id) = self.current_user.take() {
                    info!(user_id = %id, "logged off");
                }
                Ok(CommandOutcome::LoggedOff)
            }
            Command::Capture => self.capture(),
            Command::ShowLeaderboard => self.leaderboard(),
            Command::ShowCollected => self.collected(),
            Command::ShowScore => self.score(),
            Command::SetScore { user, score } => {
                let id = UserId::new(user)?;
                self.store.set_score(&id, score)?;
                self.score_updated(id)
            }
            Command::AddScore { user, delta } => {
                let id = UserId::new(user)?;
                self.store.add_score(&id, delta)?;
                self.score_updated(id)
            }
            Command::ShowOdds => Ok(CommandOutcome::Odds { odds: self.odds() }),
        }
    }

    fn log_in(&mut self, name: &str) -> Result<CommandOutcome, Error> {
        let user = self.store.ensure_user(name)?;
        info!(user_id = %user.id(), "logged in");
        self.current_user = Some(user.id().clone());
        Ok(CommandOutcome::LoggedIn { user })
    }

    fn capture(&mut self) -> Result<CommandOutcome, Error> {
        let user_id = self.require_login()?;
        let species = self.draw.draw_with(self.rng.as_mut()).clone();
        let points = award_points(&species, self.catch_of_the_day.as_ref());
        let featured = self.is_featured(species.name());

        let entry = self
            .store
            .record_capture(&user_id, species.name(), points, true)?;
        Ok(CommandOutcome::Captured {
            entry,
            catch_of_the_day: featured,
        })
    }

    fn leaderboard(&self) -> Result<CommandOutcome, Error> {
        let top = self.store.leaderboard_top(self.leaderboard_size)?;
        let viewer_position = match &self.current_user {
            Some(id) => self.store.leaderboard_position(id)?,
            None => None,
        };
        Ok(CommandOutcome::Leaderboard {
            rows: rank(top, self.current_user.as_ref()),
            viewer_position,
        })
    }

    fn collected(&self) -> Result<CommandOutcome, Error> {
        let user_id = self.require_login()?;
        let entries = match self.history_limit {
            Some(limit) => self.store.recent_entries(&user_id, limit)?,
            None => self.store.get_entries(&user_id)?,
        };
        Ok(CommandOutcome::Collected { entries })
    }

    fn score(&self) -> Result<CommandOutcome, Error> {
        let user_id = self.require_login()?;
        let (Some(display_name), Some(score)) = (
            self.store.get_display_name(&user_id)?,
            self.store.get_score(&user_id)?,
        ) else {
            return Err(Error::UnknownUser { id: user_id });
        };
        Ok(CommandOutcome::Score {
            display_name,
            score,
        })
    }

    fn score_updated(&self, id: UserId) -> Result<CommandOutcome, Error> {
        let score = self.store.get_score(&id)?;
        Ok(CommandOutcome::ScoreUpdated { id, score })
    }

    fn odds(&self) -> Vec<SpeciesOdds> {
        self.draw
            .odds()
            .map(|(species, probability)| SpeciesOdds {
                species: species.name(),
                points: award_points(species, self.catch_of_the_day.as_ref()),
                probability,
                catch_of_the_day: self.is_featured(species.name()),
            })
            .collect()
    }

    fn is_featured(&self, name: &str) -> bool {
        self.catch_of_the_day
            .as_ref()
            .is_some_and(|featured| featured.species().name() == name)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
