use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::region::Address;
use crate::tiering::{Entrant, TournamentContext};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DqRow {
    pub id: u64,
    pub tag: String,
    pub count: u32,
}

/// Everything the fetchers collected about one event.
///
/// Example YAML:
/// ```yaml
/// slug: tournament/genesis-x/event/melee-singles
/// date: "2025-02-14"
/// address: { country_code: us, subdivision: US-CA, county: Santa Clara County }
/// phases: [Pools, Top 64]
/// participants:
///   - { id: 1000, tag: Mang0 }
/// dqs:
///   - { id: 2000, tag: Zain, count: 1 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TournamentSnapshot {
    pub slug: String,
    pub date: NaiveDate,
    pub address: Address,
    #[serde(default)]
    pub invitational: bool,
    /// Overrides the count derived from participants and DQs
    #[serde(default)]
    pub total_entrants: Option<u32>,
    #[serde(default)]
    pub phases: Vec<String>,
    #[serde(default)]
    pub participants: Vec<Entrant>,
    #[serde(default)]
    pub dqs: Vec<DqRow>,
}

impl TournamentSnapshot {
    pub fn into_context(self) -> TournamentContext {
        let mut context = TournamentContext::new(&self.slug, self.address, self.date)
            .with_invitational(self.invitational)
            .with_phases(self.phases);

        if let Some(total) = self.total_entrants {
            context = context.with_total_entrants(total);
        }

        for entrant in self.participants {
            context.add_participant(Entrant::new(entrant.id, &entrant.tag));
        }

        for dq in self.dqs {
            context.add_dq(Entrant::new(dq.id, &dq.tag), dq.count);
        }

        context
    }
}

/// Load a tournament snapshot from a YAML file.
pub fn load_tournament(path: &Path) -> Result<TournamentSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tournament file at {}", path.display()))?;

    let snapshot: TournamentSnapshot = serde_saphyr::from_str(&content).with_context(|| {
        format!(
            "Failed to parse tournament: invalid YAML in {}",
            path.display()
        )
    })?;

    Ok(snapshot)
}

/// Expand glob patterns into snapshot paths, deduplicated in first-seen order.
/// A pattern without glob matches is kept as a literal path so that a missing
/// file surfaces as a load error.
pub fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern).with_context(|| format!("Bad glob '{}'", pattern))? {
            let path = entry.with_context(|| format!("Unreadable match for '{}'", pattern))?;
            matched = true;
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
        if !matched {
            let path = PathBuf::from(pattern);
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}
