//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod score_repository;

#[cfg(test)]
pub use score_repository::MockScoreRepository;
pub use score_repository::{ScoreRepository, ScoreRepositoryError};
