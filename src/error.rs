use thiserror::Error;

/// Errors that abort tiering of a tournament.
///
/// Every variant is a configuration or input problem. Ambiguous player
/// matches are not errors and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TieringError {
    #[error("region table has no wildcard rule (empty country code)")]
    MissingWildcard,

    #[error("region table has {0} wildcard rules, expected exactly one")]
    DuplicateWildcard(usize),

    #[error("invalid multiplier {0}, expected 1, 2 or 3")]
    InvalidMultiplier(u8),

    #[error("player {0} is registered more than once")]
    DuplicatePlayer(String),

    #[error("no region rule matches {address} on {date}")]
    NoRegionMatch { address: String, date: chrono::NaiveDate },

    #[error("{table}[{index}]: {reason}")]
    InvalidRow {
        table: &'static str,
        index: usize,
        reason: String,
    },

    #[error("incomplete tournament context for '{slug}': {reason}")]
    IncompleteContext { slug: String, reason: String },
}

pub type Result<T, E = TieringError> = std::result::Result<T, E>;
