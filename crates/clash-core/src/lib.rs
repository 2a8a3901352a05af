//! Core types and utilities for the Cellular Clash territorial Game of Life.

pub mod types;
pub mod config;
pub mod error;
pub mod stats;
pub mod history;

pub use error::{Error, PlacementRejection, Result};
pub use types::*;
pub use config::*;
pub use stats::*;
pub use history::*;
