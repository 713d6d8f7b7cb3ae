pub mod tables;
pub mod tournament;
pub mod validation;

pub use tables::{load_tables, InvitationalRow, PlayerRow, RegionRow, TableSnapshot, Tables};
pub use tournament::{expand_paths, load_tournament, DqRow, TournamentSnapshot};
pub use validation::validate_tables;
