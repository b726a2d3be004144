//! BioDex library: score keeping, species draws and their front ends.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::BiodexSettings;
