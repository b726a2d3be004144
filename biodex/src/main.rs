//! BioDex entry-point: loads settings, opens the score database and runs one
//! command-line session.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use biodex::BiodexSettings;
use biodex::domain::{ScoreStore, SpeciesCatalog};
use biodex::inbound::{CliArgs, CommandOutcome, Session, render, render_notice};
use biodex::outbound::persistence::{ConnectionConfig, DbConnection, DieselScoreRepository};

/// Exit status for problems the player can fix, such as an over-long name.
const USER_ERROR_EXIT: u8 = 2;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = BiodexSettings::load_from_iter([OsString::from("biodex")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    let catalog = SpeciesCatalog::standard();
    let catch_of_the_day = settings.catch_of_the_day(&catalog)?;
    let connection = DbConnection::open(&ConnectionConfig::new(settings.database_path()))
        .wrap_err("failed to open the score database")?;
    let store = ScoreStore::new(
        Arc::new(DieselScoreRepository::new(connection)),
        Arc::new(DefaultClock),
    )
    .with_missing_user_policy(settings.missing_user_policy()?);

    let mut session = Session::new(store, &catalog)?
        .with_catch_of_the_day(catch_of_the_day)
        .with_leaderboard_size(settings.leaderboard_size())
        .with_history_limit(settings.history_limit);

    let mut last: Option<CommandOutcome> = None;
    for command in args.commands() {
        match session.dispatch(command) {
            Ok(outcome) => last = Some(outcome),
            Err(err) if err.is_user_facing() => {
                render_notice(&err, &mut io::stderr().lock())?;
                return Ok(ExitCode::from(USER_ERROR_EXIT));
            }
            Err(err) => return Err(err.into()),
        }
    }

    let outcome = last.ok_or_else(|| eyre!("no command to run"))?;
    render(&outcome, args.format, &mut io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}
