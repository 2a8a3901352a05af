//! Error types for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid placement: {0}")]
    InvalidPlacement(PlacementRejection),

    #[error("Coordinate out of bounds: ({row}, {col})")]
    OutOfBounds { row: usize, col: usize },

    #[error("No AI placement provider configured")]
    ProviderUnavailable,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Why a placement request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementRejection {
    WrongPhase,
    BudgetExhausted,
    WrongZone,
    Occupied,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PlacementRejection::WrongPhase => "not in placement phase",
            PlacementRejection::BudgetExhausted => "no cells left to place",
            PlacementRejection::WrongZone => "cell outside own zone",
            PlacementRejection::Occupied => "cell already occupied",
        };
        f.write_str(reason)
    }
}

impl Error {
    /// Rejections the caller may recover from by retrying elsewhere
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidPlacement(_))
    }
}
