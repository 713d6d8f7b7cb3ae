use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::tiering::TieringResult;

/// Where an event stands against its region's floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Counts on confirmed players alone
    Counts,
    /// Only counts if ambiguous or DQ'd players are confirmed
    NeedsReview,
    /// Cannot count even in the best case
    BelowFloor,
}

impl Verdict {
    pub fn of(result: &TieringResult) -> Self {
        if result.should_count_strict() {
            Verdict::Counts
        } else if result.should_count() {
            Verdict::NeedsReview
        } else {
            Verdict::BelowFloor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Counts => "counts",
            Verdict::NeedsReview => "review",
            Verdict::BelowFloor => "below",
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Score with the optimistic bound appended when it differs: "412 (<=530)"
pub fn format_score(result: &TieringResult) -> String {
    let max = result.max_potential_score();
    if max > result.score {
        format!("{} (<={})", result.score, max)
    } else {
        result.score.to_string()
    }
}

fn format_verdict(verdict: Verdict, use_colors: bool) -> String {
    let label = format!("{:<6}", verdict.label());
    if !use_colors {
        return label;
    }
    match verdict {
        Verdict::Counts => label.green().to_string(),
        Verdict::NeedsReview => label.yellow().to_string(),
        Verdict::BelowFloor => label.red().to_string(),
    }
}

/// One line per event: index, verdict, score, slug
pub fn format_result_table(results: &[TieringResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No tournaments scored.".to_string();
    }

    let score_width = results
        .iter()
        .map(|r| format_score(r).len())
        .max()
        .unwrap_or(0);

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>2}.", idx + 1);
            let verdict = format_verdict(Verdict::of(result), use_colors);
            let score = format!("{:>width$}", format_score(result), width = score_width);

            if use_colors {
                format!(
                    "{} {}  {}  {}",
                    index_str.dimmed(),
                    verdict,
                    score.bold(),
                    result.slug.underline()
                )
            } else {
                format!("{} {}  {}  {}", index_str, verdict, score, result.slug)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown of one event (for verbose mode)
pub fn format_result_detail(result: &TieringResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let title = format!(
        "{}{}",
        result.slug,
        if result.invitational { " (invitational)" } else { "" }
    );
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });

    if !result.phases.is_empty() {
        lines.push(format!("  Phases: {}", result.phases.join(", ")));
    }
    lines.push(format!("  Region: {}", result.region));
    lines.push(format!(
        "  Entrants: {} ({:?}) = {}",
        result.entrants, result.regime, result.entrant_score
    ));

    let sections = [
        ("Top player points", result.values.iter().map(|v| v.to_string()).collect::<Vec<_>>()),
        ("DQs", result.dqs.iter().map(|d| d.to_string()).collect()),
        ("Potential matches", result.potential.iter().map(|p| p.to_string()).collect()),
    ];
    for (heading, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("  {}:", heading));
        lines.extend(entries.into_iter().map(|entry| format!("    {}", entry)));
    }

    lines.push(format!("  Score: {}", result.score));
    lines.push(format!("  Max potential: {}", result.max_potential_score()));
    lines.push(format!(
        "  Verdict: {} (floors: {} entrants or {} points)",
        format_verdict(Verdict::of(result), use_colors).trim_end(),
        result.region.entrant_floor(),
        result.region.score_floor()
    ));

    lines.join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: score, max potential, verdict, slug (no headers, no colors)
pub fn format_tsv(results: &[TieringResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "{}\t{}\t{}\t{}",
                result.score,
                result.max_potential_score(),
                Verdict::of(result).label(),
                result.slug
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
