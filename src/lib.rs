pub mod config;
pub mod error;
pub mod output;
pub mod players;
pub mod region;
pub mod snapshot;
pub mod tiering;
pub mod window;

pub use error::{Result, TieringError};
pub use tiering::{calculate_tier, TieringResult};
