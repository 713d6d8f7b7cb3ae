use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use super::formatter::Verdict;
use crate::region::RegionMultiplier;
use crate::tiering::{CountedValue, DisqualifiedValue, PotentialMatch, Regime, TieringResult};

/// Serializable view of a tiering result for the JSON report.
#[derive(Debug, Serialize)]
pub struct TieringSummary<'a> {
    pub slug: &'a str,
    pub date: NaiveDate,
    pub invitational: bool,
    pub phases: &'a [String],
    pub regime: Regime,
    pub region: &'a RegionMultiplier,
    pub entrants: u32,
    pub entrant_score: u64,
    pub score: u64,
    pub max_potential_score: u64,
    pub should_count: bool,
    pub should_count_strict: bool,
    pub verdict: &'static str,
    pub values: &'a [CountedValue],
    pub dqs: &'a [DisqualifiedValue],
    pub potential: &'a [PotentialMatch],
}

impl<'a> From<&'a TieringResult> for TieringSummary<'a> {
    fn from(result: &'a TieringResult) -> Self {
        Self {
            slug: &result.slug,
            date: result.date,
            invitational: result.invitational,
            phases: &result.phases,
            regime: result.regime,
            region: &result.region,
            entrants: result.entrants,
            entrant_score: result.entrant_score,
            score: result.score,
            max_potential_score: result.max_potential_score(),
            should_count: result.should_count(),
            should_count_strict: result.should_count_strict(),
            verdict: Verdict::of(result).label(),
            values: &result.values,
            dqs: &result.dqs,
            potential: &result.potential,
        }
    }
}

pub fn to_json(results: &[TieringResult]) -> Result<String> {
    let summaries: Vec<TieringSummary> = results.iter().map(TieringSummary::from).collect();
    serde_json::to_string_pretty(&summaries).context("Failed to serialize tiering report")
}

/// Save the JSON report atomically
///
/// Uses atomic-write-file so a crashed run never leaves a half-written report.
pub fn write_json_report(path: &Path, results: &[TieringResult]) -> Result<()> {
    let summaries: Vec<TieringSummary> = results.iter().map(TieringSummary::from).collect();

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &summaries).context("Failed to serialize tiering report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}
