//! Error types for the dashboard core

use thiserror::Error;

/// Dashboard core error type
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Trajectory generation failed: {0}")]
    Solver(String),

    #[error("Path finding failed: {0}")]
    PathFinding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for DashboardError {
    fn from(e: toml::de::Error) -> Self {
        DashboardError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
