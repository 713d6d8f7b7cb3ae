use chrono::NaiveDate;
use serde::Serialize;

use super::classifier::classify;
use super::config::TieringConfig;
use super::context::TournamentContext;
use super::result::TieringResult;
use crate::error::Result;
use crate::players::PlayerValueRegistry;
use crate::region::{Multiplier, RegionMultiplierTable};

/// Cap on entrants credited by the x2 tier of the current system.
pub const X2_ENTRANT_CAP: u32 = 256;
/// Cap on entrants credited by the x3 tier of the current system.
pub const X3_ENTRANT_CAP: u32 = 128;

/// Which multiplier system an event falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Entrants times the region multiplier
    Legacy,
    /// Entrants plus capped bonus tiers per multiplier step
    Current,
}

impl Regime {
    pub fn for_date(date: NaiveDate, cutover: NaiveDate) -> Self {
        if date > cutover {
            Regime::Current
        } else {
            Regime::Legacy
        }
    }
}

pub fn entrant_score(entrants: u32, multiplier: Multiplier, regime: Regime) -> u64 {
    let entrants = u64::from(entrants);
    match regime {
        Regime::Legacy => entrants * u64::from(multiplier.value()),
        Regime::Current => {
            let mut score = entrants;
            if multiplier >= Multiplier::X2 {
                score += entrants.min(u64::from(X2_ENTRANT_CAP));
            }
            if multiplier >= Multiplier::X3 {
                score += entrants.min(u64::from(X3_ENTRANT_CAP));
            }
            score
        }
    }
}

/// Tier one event against the region and player tables.
///
/// Fails only on configuration problems: an incomplete context or an address
/// no region rule covers.
pub fn calculate_tier(
    context: &TournamentContext,
    regions: &RegionMultiplierTable,
    registry: &PlayerValueRegistry,
    config: &TieringConfig,
) -> Result<TieringResult> {
    context.validate()?;

    let region = regions.resolve(&context.address, context.date)?;
    let regime = Regime::for_date(context.date, config.cutover_date());
    let entrants = context.entrant_count();
    let entrant_score = entrant_score(entrants, region.multiplier, regime);

    let classification = classify(context, registry);

    let result = TieringResult::new(
        context.slug.clone(),
        context.date,
        context.invitational,
        context.phases.clone(),
        regime,
        region.clone(),
        entrants,
        entrant_score,
        classification,
        config.min_qualified_players(),
    );

    log::info!(
        "{}: {} entrants in {} ({:?}), score {}",
        result.slug,
        entrants,
        result.region,
        regime,
        result.score
    );

    Ok(result)
}
