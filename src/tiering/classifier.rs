use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

use super::context::{Entrant, TournamentContext};
use crate::players::{PlayerValueRegistry, Resolution, ResolvedValue};

/// A confirmed player whose points count towards the guaranteed score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedValue {
    pub entrant: Entrant,
    pub value: ResolvedValue,
}

impl CountedValue {
    pub fn points(&self) -> u32 {
        self.value.points
    }
}

impl fmt::Display for CountedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entrant.tag.eq_ignore_ascii_case(&self.value.tag) {
            write!(f, "{}", self.entrant.tag)?;
        } else {
            write!(f, "{} (aka {})", self.entrant.tag, self.value.tag)?;
        }
        write!(f, " - {} points [{}]", self.value.points, self.value.note)
    }
}

/// A confirmed player with DQ losses. Only counts towards the upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisqualifiedValue {
    pub entrant: Entrant,
    pub value: ResolvedValue,
    pub dqs: u32,
}

impl fmt::Display for DisqualifiedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} points [{}] - {} DQ{}",
            self.entrant.tag,
            self.value.points,
            self.value.note,
            self.dqs,
            if self.dqs == 1 { "" } else { "s" }
        )
    }
}

/// An entrant matched by tag only, left for a human to confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PotentialMatch {
    pub entrant: Entrant,
    pub value: ResolvedValue,
    pub dqs: u32,
    pub candidates: usize,
}

impl fmt::Display for PotentialMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}) - ", self.entrant.tag, self.entrant.id)?;
        if self.value.tag != self.entrant.tag {
            write!(f, "{}: ", self.value.tag)?;
        }
        write!(f, "{} points [{}]", self.value.points, self.value.note)?;
        if self.candidates > 1 {
            write!(f, " ({} players share this tag)", self.candidates)?;
        }
        if self.dqs > 0 {
            write!(f, " - {} DQ{}", self.dqs, if self.dqs == 1 { "" } else { "s" })?;
        }
        Ok(())
    }
}

/// Participants split by how they may contribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub values: Vec<CountedValue>,
    pub dqs: Vec<DisqualifiedValue>,
    pub potential: Vec<PotentialMatch>,
}

impl Classification {
    pub fn counted_points(&self) -> u64 {
        self.values.iter().map(|v| u64::from(v.points())).sum()
    }
}

/// Sort every participant into counted, DQ'd and potential contributions.
///
/// Participants without DQs are checked first; every DQ record is then
/// resolved on its own so that players who never finished a set are still
/// reported. Unknown players are dropped.
pub fn classify(context: &TournamentContext, registry: &PlayerValueRegistry) -> Classification {
    let mut classification = Classification::default();
    let date = context.date;
    let invitational = context.invitational;

    for participant in context.participants() {
        if context.is_disqualified(participant.id) {
            continue;
        }

        match registry.resolve(participant, date, invitational) {
            Some(Resolution::Confirmed { value, .. }) => {
                classification.values.push(CountedValue {
                    entrant: participant.clone(),
                    value,
                });
            }
            Some(Resolution::Ambiguous {
                value, candidates, ..
            }) => {
                classification.potential.push(PotentialMatch {
                    entrant: participant.clone(),
                    value,
                    dqs: 0,
                    candidates,
                });
            }
            None => log::debug!("{}: no value for {}", context.slug, participant),
        }
    }

    for record in context.dqs().values() {
        match registry.resolve(&record.entrant, date, invitational) {
            Some(Resolution::Confirmed { value, .. }) => {
                classification.dqs.push(DisqualifiedValue {
                    entrant: record.entrant.clone(),
                    value,
                    dqs: record.count,
                });
            }
            Some(Resolution::Ambiguous {
                value, candidates, ..
            }) => {
                classification.potential.push(PotentialMatch {
                    entrant: record.entrant.clone(),
                    value,
                    dqs: record.count,
                    candidates,
                });
            }
            None => log::debug!("{}: no value for DQ'd {}", context.slug, record.entrant),
        }
    }

    classification.values.sort_by(|a, b| {
        (Reverse(a.points()), &a.value.category, &a.value.note)
            .cmp(&(Reverse(b.points()), &b.value.category, &b.value.note))
    });
    classification
        .dqs
        .sort_by_key(|dq| (Reverse(dq.dqs), Reverse(dq.value.points)));
    classification
        .potential
        .sort_by(|a, b| (a.dqs, &a.entrant.tag).cmp(&(b.dqs, &b.entrant.tag)));

    log::debug!(
        "{}: {} counted, {} DQ'd, {} potential",
        context.slug,
        classification.values.len(),
        classification.dqs.len(),
        classification.potential.len()
    );

    classification
}
