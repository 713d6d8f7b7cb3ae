pub mod table;
pub mod types;

pub use table::{specificity, RegionMultiplierTable};
pub use types::{Address, LocalityFilter, Multiplier, RegionMultiplier};
