//! Command-line front end: argument parsing and outcome rendering.
//!
//! Each invocation is one short session. `--user` logs that player in before
//! the subcommand runs, registering them on first use.

use std::io::Write;

use clap::{Parser, Subcommand, ValueEnum};

use super::session::{Command, CommandOutcome};
use crate::domain::Error;

/// `biodex` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "biodex",
    about = "Catch species, keep score and climb the BioDex leaderboard",
    version
)]
pub struct CliArgs {
    /// Player to act as; registered on first use.
    #[arg(long, short = 'u', global = true, value_name = "name")]
    pub user: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Subcommands understood by the binary.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Log in, registering the player if needed.
    Login {
        /// Display name, at most 12 characters.
        name: String,
    },
    /// Catch a random species.
    Capture,
    /// Show the top of the leaderboard.
    Leaderboard,
    /// Show the player's captures, newest first.
    History,
    /// Show the player's score.
    Score,
    /// Overwrite a player's score.
    SetScore {
        /// Player whose score is corrected; never logged in.
        #[arg(value_name = "user")]
        target: String,
        #[arg(allow_negative_numbers = true)]
        score: i64,
    },
    /// Add to (or subtract from) a player's score.
    AddScore {
        /// Player whose score is corrected; never logged in.
        #[arg(value_name = "user")]
        target: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Show how likely each species is to turn up.
    DrawOdds,
}

/// How outcomes are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors raised while writing an outcome.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliArgs {
    /// Session commands for this invocation, in order. Only the outcome of
    /// the last one is meant to be shown.
    pub fn commands(&self) -> Vec<Command> {
        let login = self.user.as_ref().map(|name| Command::LogIn { name: name.clone() });
        let main = match &self.command {
            CliCommand::Login { name } => {
                return vec![Command::LogIn { name: name.clone() }];
            }
            CliCommand::Capture => Command::Capture,
            CliCommand::Leaderboard => Command::ShowLeaderboard,
            CliCommand::History => Command::ShowCollected,
            CliCommand::Score => Command::ShowScore,
            CliCommand::SetScore { target, score } => Command::SetScore {
                user: target.clone(),
                score: *score,
            },
            CliCommand::AddScore { target, delta } => Command::AddScore {
                user: target.clone(),
                delta: *delta,
            },
            CliCommand::DrawOdds => Command::ShowOdds,
        };
        login.into_iter().chain(std::iter::once(main)).collect()
    }
}

/// Write `outcome` to `out` in `format`.
///
/// # Errors
///
/// Returns [`RenderError`] when writing or JSON encoding fails.
pub fn render(
    outcome: &CommandOutcome,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Text => render_text(outcome, out)?,
    }
    Ok(())
}

/// Write a user-facing `error` as a one-line notice, without a report.
///
/// # Errors
///
/// Returns the underlying I/O error when writing fails.
pub fn render_notice(error: &Error, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "biodex: {error}")
}

fn render_text(outcome: &CommandOutcome, out: &mut impl Write) -> std::io::Result<()> {
    match outcome {
        CommandOutcome::LoggedIn { user } => writeln!(
            out,
            "Logged in as {} (score {})",
            user.display_name(),
            user.score()
        ),
        CommandOutcome::LoggedOff => writeln!(out, "Logged off"),
        CommandOutcome::Captured {
            entry,
            catch_of_the_day,
        } => {
            let bonus = if *catch_of_the_day {
                " (Catch of the Day!)"
            } else {
                ""
            };
            writeln!(
                out,
                "Captured {} for {} points{bonus}",
                entry.species, entry.points_awarded
            )
        }
        CommandOutcome::Leaderboard {
            rows,
            viewer_position,
        } => {
            for row in rows {
                let marker = if row.is_viewer { "  <- you" } else { "" };
                writeln!(
                    out,
                    "{}. {}: {}{marker}",
                    row.position, row.entry.display_name, row.entry.score
                )?;
            }
            match viewer_position {
                Some(position) if !rows.iter().any(|row| row.is_viewer) => {
                    writeln!(out, "Your position: {position}")
                }
                _ => Ok(()),
            }
        }
        CommandOutcome::Collected { entries } => {
            if entries.is_empty() {
                return writeln!(out, "Nothing collected yet");
            }
            for entry in entries {
                writeln!(out, "{}: {}", entry.species, entry.points_awarded)?;
            }
            Ok(())
        }
        CommandOutcome::Score { score, .. } => writeln!(out, "Score: {score}"),
        CommandOutcome::ScoreUpdated { id, score } => match score {
            Some(score) => writeln!(out, "{id}: {score}"),
            None => writeln!(out, "No user {id}; nothing changed"),
        },
        CommandOutcome::Odds { odds } => {
            for row in odds {
                let bonus = if row.catch_of_the_day { "  (Catch of the Day)" } else { "" };
                writeln!(
                    out,
                    "{:<10} {:>5} pts {:>7.3}%{bonus}",
                    row.species,
                    row.points,
                    row.probability * 100.0
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    //! Argument planning and rendering coverage.

    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::{CaptureEntry, DisplayName, LeaderboardEntry, UserId, rank};

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("biodex").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    fn text(outcome: &CommandOutcome) -> String {
        let mut buffer = Vec::new();
        render(outcome, OutputFormat::Text, &mut buffer).expect("render");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    fn row(name: &str, score: i64) -> LeaderboardEntry {
        let display_name = DisplayName::new(name).expect("valid name");
        LeaderboardEntry {
            id: UserId::from_display_name(&display_name).expect("valid id"),
            display_name,
            score,
        }
    }

    #[rstest]
    fn user_flag_logs_in_before_the_command() {
        let args = parse(&["capture", "--user", "Ash"]);

        assert_eq!(
            args.commands(),
            vec![
                Command::LogIn {
                    name: "Ash".to_owned()
                },
                Command::Capture
            ]
        );
    }

    #[rstest]
    fn login_subcommand_is_a_single_command() {
        let args = parse(&["login", "Misty"]);

        assert_eq!(
            args.commands(),
            vec![Command::LogIn {
                name: "Misty".to_owned()
            }]
        );
    }

    #[rstest]
    fn negative_adjustments_parse() {
        let args = parse(&["add-score", "ash", "-15"]);

        assert_eq!(
            args.commands(),
            vec![Command::AddScore {
                user: "ash".to_owned(),
                delta: -15
            }]
        );
    }

    #[rstest]
    fn score_corrections_do_not_log_in_their_target() {
        let args = parse(&["set-score", "ghost", "5"]);

        assert_eq!(args.user, None);
        assert_eq!(
            args.commands(),
            vec![Command::SetScore {
                user: "ghost".to_owned(),
                score: 5
            }]
        );
    }

    #[rstest]
    fn acting_user_stays_distinct_from_correction_target() {
        let args = parse(&["--user", "Ash", "add-score", "ghost", "5"]);

        assert_eq!(
            args.commands(),
            vec![
                Command::LogIn {
                    name: "Ash".to_owned()
                },
                Command::AddScore {
                    user: "ghost".to_owned(),
                    delta: 5
                }
            ]
        );
    }

    #[rstest]
    fn format_defaults_to_text() {
        assert_eq!(parse(&["leaderboard"]).format, OutputFormat::Text);
        assert_eq!(
            parse(&["leaderboard", "--format", "json"]).format,
            OutputFormat::Json
        );
    }

    #[rstest]
    fn leaderboard_renders_numbered_rows() {
        let viewer = UserId::new("ash").expect("valid id");
        let outcome = CommandOutcome::Leaderboard {
            rows: rank(vec![row("Misty", 80), row("Ash", 50)], Some(&viewer)),
            viewer_position: Some(2),
        };

        assert_eq!(text(&outcome), "1. Misty: 80\n2. Ash: 50  <- you\n");
    }

    #[rstest]
    fn leaderboard_reports_hidden_viewer_position() {
        let viewer = UserId::new("ash").expect("valid id");
        let outcome = CommandOutcome::Leaderboard {
            rows: rank(vec![row("Misty", 80)], Some(&viewer)),
            viewer_position: Some(4),
        };

        assert_eq!(text(&outcome), "1. Misty: 80\nYour position: 4\n");
    }

    #[rstest]
    fn history_renders_species_and_points() {
        let captured_at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp");
        let outcome = CommandOutcome::Collected {
            entries: vec![CaptureEntry {
                submitter: UserId::new("ash").expect("valid id"),
                species: "Tree".to_owned(),
                points_awarded: 10,
                captured_at,
            }],
        };

        assert_eq!(text(&outcome), "Tree: 10\n");
        assert_eq!(
            text(&CommandOutcome::Collected {
                entries: Vec::new()
            }),
            "Nothing collected yet\n"
        );
    }

    #[rstest]
    fn notices_are_a_single_plain_line() {
        let mut buffer = Vec::new();
        render_notice(&Error::NotLoggedIn, &mut buffer).expect("render");

        assert_eq!(
            String::from_utf8(buffer).expect("utf-8 output"),
            "biodex: you must be logged in to do this\n"
        );
    }

    #[rstest]
    fn json_output_is_tagged() {
        let outcome = CommandOutcome::ScoreUpdated {
            id: UserId::new("ash").expect("valid id"),
            score: Some(40),
        };
        let mut buffer = Vec::new();
        render(&outcome, OutputFormat::Json, &mut buffer).expect("render");

        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
        assert_eq!(
            value,
            serde_json::json!({ "kind": "scoreUpdated", "id": "ash", "score": 40 })
        );
    }
}
