use chrono::NaiveDate;

use super::types::{Address, LocalityFilter, RegionMultiplier};
use crate::error::{Result, TieringError};

/// Immutable set of region rules, in registration order.
#[derive(Debug, Clone)]
pub struct RegionMultiplierTable {
    rules: Vec<RegionMultiplier>,
}

impl RegionMultiplierTable {
    /// Build a table. Exactly one wildcard rule must be present.
    pub fn from_rules(rules: Vec<RegionMultiplier>) -> Result<Self> {
        let wildcards = rules.iter().filter(|rule| rule.is_wildcard()).count();
        match wildcards {
            0 => Err(TieringError::MissingWildcard),
            1 => Ok(Self { rules }),
            n => Err(TieringError::DuplicateWildcard(n)),
        }
    }

    pub fn rules(&self) -> &[RegionMultiplier] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pick the most specific rule for an address on a date.
    ///
    /// Ties between equally specific rules go to the one registered first.
    pub fn resolve(&self, address: &Address, date: NaiveDate) -> Result<&RegionMultiplier> {
        let mut best: Option<(&RegionMultiplier, u32)> = None;

        for rule in &self.rules {
            let score = specificity(rule, address, date);
            if score == 0 {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((rule, score));
            }
        }

        match best {
            Some((rule, score)) => {
                log::debug!("Region for {} on {}: {} (specificity {})", address, date, rule, score);
                Ok(rule)
            }
            None => Err(TieringError::NoRegionMatch {
                address: address.to_string(),
                date,
            }),
        }
    }
}

/// How closely a rule matches an address. Higher is more specific, 0 is no match.
pub fn specificity(rule: &RegionMultiplier, address: &Address, date: NaiveDate) -> u32 {
    if !rule.window.contains(date) {
        return 0;
    }

    if rule.is_wildcard() {
        return 1;
    }

    if !rule.country_code.eq_ignore_ascii_case(&address.country_code) {
        return 0;
    }

    let mut score = 2;

    let subdivision_matched = match &rule.subdivision {
        None => {
            score += 1;
            true
        }
        Some(code) if address.has_subdivision(code) => {
            score += 2;
            true
        }
        Some(_) => false,
    };

    // Locality is only refined inside a matched subdivision
    if subdivision_matched && rule.locality.matches(address) {
        score += match rule.locality {
            LocalityFilter::Any => 1,
            _ => 2,
        };
    }

    if rule.country_code.eq_ignore_ascii_case("jp") {
        match &rule.jp_postal {
            None => score += 1,
            Some(prefix) if *prefix == address.postal_prefix() => score += 2,
            Some(_) => {}
        }
    }

    score
}
