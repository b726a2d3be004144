//! Inbound adapters that translate player input into domain service calls
//! while keeping presentation details at the edge.
//!
//! [`session`] holds the per-player context and command dispatch; [`cli`] is
//! the command-line front end built on it.

pub mod cli;
pub mod session;

pub use cli::{CliArgs, CliCommand, OutputFormat, RenderError, render, render_notice};
pub use session::{Command, CommandOutcome, Session, SpeciesOdds};
