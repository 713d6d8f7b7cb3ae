use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day the additive multiplier system took over. Events on this day still
/// use the legacy multiplication.
pub const NEW_MULTIPLIER_SYSTEM_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 12, 16) {
    Some(date) => date,
    None => panic!("invalid cutover date"),
};

/// Number of valued players an undersized event needs to count.
pub const NUM_PLAYERS_FLOOR: usize = 2;

/// Tiering parameters.
///
/// Example YAML:
/// ```yaml
/// tiering:
///   cutover_date: "2024-12-16"
///   min_qualified_players: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TieringConfig {
    /// Last date scored with the legacy multiplier system
    #[serde(default)]
    pub cutover_date: Option<NaiveDate>,

    /// Valued players needed for an undersized event to count
    #[serde(default)]
    pub min_qualified_players: Option<usize>,
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            cutover_date: Some(NEW_MULTIPLIER_SYSTEM_DATE),
            min_qualified_players: Some(NUM_PLAYERS_FLOOR),
        }
    }
}

impl TieringConfig {
    pub fn cutover_date(&self) -> NaiveDate {
        self.cutover_date.unwrap_or(NEW_MULTIPLIER_SYSTEM_DATE)
    }

    pub fn min_qualified_players(&self) -> usize {
        self.min_qualified_players.unwrap_or(NUM_PLAYERS_FLOOR)
    }
}
