use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::aggregator::Regime;
use super::classifier::{Classification, CountedValue, DisqualifiedValue, PotentialMatch};
use crate::region::RegionMultiplier;

/// Outcome of tiering one event.
///
/// Immutable apart from the memoized upper bound, which is safe to compute
/// from several threads at once.
#[derive(Debug)]
pub struct TieringResult {
    pub slug: String,
    pub date: NaiveDate,
    pub invitational: bool,
    pub phases: Vec<String>,
    pub regime: Regime,
    pub region: RegionMultiplier,
    pub entrants: u32,
    pub entrant_score: u64,
    pub score: u64,
    pub values: Vec<CountedValue>,
    pub dqs: Vec<DisqualifiedValue>,
    pub potential: Vec<PotentialMatch>,
    min_qualified_players: usize,
    max_score: OnceLock<u64>,
}

impl TieringResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        slug: String,
        date: NaiveDate,
        invitational: bool,
        phases: Vec<String>,
        regime: Regime,
        region: RegionMultiplier,
        entrants: u32,
        entrant_score: u64,
        classification: Classification,
        min_qualified_players: usize,
    ) -> Self {
        let score = entrant_score + classification.counted_points();
        Self {
            slug,
            date,
            invitational,
            phases,
            regime,
            region,
            entrants,
            entrant_score,
            score,
            values: classification.values,
            dqs: classification.dqs,
            potential: classification.potential,
            min_qualified_players,
            max_score: OnceLock::new(),
        }
    }

    /// Score if every DQ'd and tag-matched player turned out to count.
    ///
    /// Each entrant adds their best value once, however many records they have.
    pub fn max_potential_score(&self) -> u64 {
        *self.max_score.get_or_init(|| {
            let mut best: HashMap<u64, u32> = HashMap::new();
            let records = self
                .potential
                .iter()
                .map(|p| (p.entrant.id, p.value.points))
                .chain(self.dqs.iter().map(|d| (d.entrant.id, d.value.points)));

            for (id, points) in records {
                let entry = best.entry(id).or_insert(0);
                *entry = (*entry).max(points);
            }

            self.score + best.values().map(|&p| u64::from(p)).sum::<u64>()
        })
    }

    /// Contributors that are confirmed and not DQ'd.
    pub fn confirmed_count(&self) -> usize {
        self.values.len()
    }

    /// Everyone that might contribute: confirmed, potential and DQ'd.
    pub fn possible_count(&self) -> usize {
        self.values.len() + self.potential.len() + self.dqs.len()
    }

    /// Whether the event counts using confirmed players only.
    pub fn should_count_strict(&self) -> bool {
        self.entrants >= self.region.entrant_floor()
            || (self.score >= self.region.score_floor()
                && self.confirmed_count() >= self.min_qualified_players)
    }

    /// Whether the event could count once ambiguous players are reviewed.
    pub fn should_count(&self) -> bool {
        self.entrants >= self.region.entrant_floor()
            || (self.max_potential_score() >= self.region.score_floor()
                && self.possible_count() >= self.min_qualified_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{PlayerId, ResolvedValue};
    use crate::region::Multiplier;
    use crate::tiering::Entrant;

    fn value(id: u64, points: u32) -> ResolvedValue {
        ResolvedValue {
            player: PlayerId::Num(id),
            tag: format!("P{}", id),
            points,
            category: "Top Player".to_string(),
            note: String::new(),
        }
    }

    fn counted(id: u64, points: u32) -> CountedValue {
        CountedValue {
            entrant: Entrant::new(id, &format!("P{}", id)),
            value: value(id, points),
        }
    }

    fn potential(id: u64, points: u32, dqs: u32) -> PotentialMatch {
        PotentialMatch {
            entrant: Entrant::new(id, &format!("P{}", id)),
            value: value(id + 1000, points),
            dqs,
            candidates: 1,
        }
    }

    fn dq(id: u64, points: u32, dqs: u32) -> DisqualifiedValue {
        DisqualifiedValue {
            entrant: Entrant::new(id, &format!("P{}", id)),
            value: value(id, points),
            dqs,
        }
    }

    fn result(entrants: u32, classification: Classification) -> TieringResult {
        TieringResult::new(
            "tournament/test/event/singles".to_string(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            false,
            vec![],
            Regime::Current,
            RegionMultiplier::wildcard(Multiplier::X1, "default"),
            entrants,
            u64::from(entrants),
            classification,
            2,
        )
    }

    #[test]
    fn test_score_adds_counted_points() {
        let r = result(
            20,
            Classification {
                values: vec![counted(1, 100), counted(2, 50)],
                ..Default::default()
            },
        );
        assert_eq!(r.score, 170);
        assert_eq!(r.max_potential_score(), 170);
    }

    #[test]
    fn test_max_potential_counts_each_identity_once() {
        let r = result(
            20,
            Classification {
                values: vec![counted(1, 100)],
                dqs: vec![dq(2, 300, 2)],
                potential: vec![potential(3, 40, 0), potential(3, 90, 0), potential(4, 10, 1)],
            },
        );
        assert_eq!(r.score, 120);
        assert_eq!(r.max_potential_score(), 120 + 300 + 90 + 10);
        // Memoized value is stable
        assert_eq!(r.max_potential_score(), r.max_potential_score());
    }

    #[test]
    fn test_strict_requires_two_confirmed_players() {
        let r = result(
            10,
            Classification {
                values: vec![counted(1, 300)],
                ..Default::default()
            },
        );
        assert_eq!(r.score, 310);
        assert!(!r.should_count_strict());
        assert!(!r.should_count());

        let r = result(
            10,
            Classification {
                values: vec![counted(1, 300)],
                potential: vec![potential(2, 5, 0)],
                ..Default::default()
            },
        );
        assert!(!r.should_count_strict());
        assert!(r.should_count());
    }

    #[test]
    fn test_entrant_floor_counts_regardless_of_players() {
        let r = result(64, Classification::default());
        assert!(r.should_count_strict());
        assert!(r.should_count());

        let r = result(63, Classification::default());
        assert!(!r.should_count_strict());
        assert!(!r.should_count());
    }

    #[test]
    fn test_bound_reaches_floor_only_with_potential() {
        let r = result(
            10,
            Classification {
                values: vec![counted(1, 100), counted(2, 100)],
                dqs: vec![dq(3, 60, 1)],
                ..Default::default()
            },
        );
        assert_eq!(r.score, 210);
        assert!(!r.should_count_strict());
        assert_eq!(r.max_potential_score(), 270);
        assert!(r.should_count());
    }

    #[test]
    fn test_strict_implies_loose() {
        let shapes = [
            Classification::default(),
            Classification {
                values: vec![counted(1, 150), counted(2, 150)],
                ..Default::default()
            },
            Classification {
                values: vec![counted(1, 240)],
                dqs: vec![dq(2, 10, 1)],
                potential: vec![potential(3, 10, 0)],
            },
        ];
        for entrants in [0, 10, 63, 64, 100] {
            for shape in &shapes {
                let r = result(entrants, shape.clone());
                assert!(r.score <= r.max_potential_score());
                if r.should_count_strict() {
                    assert!(r.should_count());
                }
            }
        }
    }

    #[test]
    fn test_concurrent_bound_is_consistent() {
        let r = result(
            10,
            Classification {
                values: vec![counted(1, 100)],
                potential: vec![potential(2, 30, 0), potential(3, 20, 1)],
                ..Default::default()
            },
        );
        let seen: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| r.max_potential_score())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(seen.iter().all(|&v| v == 160));
    }
}
