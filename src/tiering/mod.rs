pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod context;
pub mod result;
pub mod validation;

pub use aggregator::{calculate_tier, entrant_score, Regime};
pub use classifier::{classify, Classification, CountedValue, DisqualifiedValue, PotentialMatch};
pub use config::{TieringConfig, NEW_MULTIPLIER_SYSTEM_DATE, NUM_PLAYERS_FLOOR};
pub use context::{DqRecord, Entrant, TournamentContext};
pub use result::TieringResult;
pub use validation::validate_tiering;
