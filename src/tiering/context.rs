use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::error::{Result, TieringError};
use crate::region::Address;

/// A participant as the bracket site reports them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entrant {
    pub id: u64,
    pub tag: String,
}

impl Entrant {
    pub fn new(id: u64, tag: &str) -> Self {
        Self {
            id,
            tag: tag.trim().to_string(),
        }
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.tag, self.id)
    }
}

/// Disqualification losses of one player within the scored phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DqRecord {
    pub entrant: Entrant,
    pub count: u32,
}

/// Everything known about one event, fully fetched before scoring.
#[derive(Debug, Clone)]
pub struct TournamentContext {
    pub slug: String,
    pub address: Address,
    pub date: NaiveDate,
    pub invitational: bool,
    pub phases: Vec<String>,
    total_entrants: Option<u32>,
    participants: BTreeSet<Entrant>,
    dqs: BTreeMap<u64, DqRecord>,
}

impl TournamentContext {
    pub fn new(slug: &str, address: Address, date: NaiveDate) -> Self {
        Self {
            slug: slug.trim().to_string(),
            address,
            date,
            invitational: false,
            phases: Vec::new(),
            total_entrants: None,
            participants: BTreeSet::new(),
            dqs: BTreeMap::new(),
        }
    }

    pub fn with_invitational(mut self, invitational: bool) -> Self {
        self.invitational = invitational;
        self
    }

    pub fn with_phases(mut self, phases: Vec<String>) -> Self {
        self.phases = phases;
        self
    }

    /// Override the entrant count instead of deriving it from participants.
    pub fn with_total_entrants(mut self, total: u32) -> Self {
        self.total_entrants = Some(total);
        self
    }

    pub fn add_participant(&mut self, entrant: Entrant) {
        self.participants.insert(entrant);
    }

    /// Record DQ losses. Repeated records for the same player add up.
    pub fn add_dq(&mut self, entrant: Entrant, count: u32) {
        self.dqs
            .entry(entrant.id)
            .and_modify(|record| record.count = record.count.saturating_add(count))
            .or_insert(DqRecord { entrant, count });
    }

    pub fn participants(&self) -> &BTreeSet<Entrant> {
        &self.participants
    }

    pub fn dqs(&self) -> &BTreeMap<u64, DqRecord> {
        &self.dqs
    }

    pub fn is_disqualified(&self, id: u64) -> bool {
        self.dqs.contains_key(&id)
    }

    /// Players who only ever lost by DQ never show up as participants.
    pub fn dq_only_count(&self) -> u32 {
        let participant_ids: HashSet<u64> = self.participants.iter().map(|e| e.id).collect();
        self.dqs
            .keys()
            .filter(|id| !participant_ids.contains(id))
            .count() as u32
    }

    /// Explicit total when given, else participants plus DQ-only players.
    pub fn entrant_count(&self) -> u32 {
        self.total_entrants
            .unwrap_or_else(|| self.participants.len() as u32 + self.dq_only_count())
    }

    /// Refuse contexts a collaborator left half-filled.
    pub fn validate(&self) -> Result<()> {
        let incomplete = |reason: String| TieringError::IncompleteContext {
            slug: self.slug.clone(),
            reason,
        };

        if self.slug.is_empty() {
            return Err(incomplete("event slug is empty".to_string()));
        }

        if let Some(record) = self.dqs.values().find(|record| record.count == 0) {
            return Err(incomplete(format!(
                "DQ record for {} has a count of zero",
                record.entrant
            )));
        }

        let participants = self.participants.len() as u32;
        if self.entrant_count() < participants {
            return Err(incomplete(format!(
                "total entrants {} is below the {} known participants",
                self.entrant_count(),
                participants
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TournamentContext {
        TournamentContext::new(
            "tournament/genesis-10/event/melee-singles",
            Address::in_country("us"),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        )
    }

    #[test]
    fn test_entrant_equality_uses_both_fields() {
        assert_eq!(Entrant::new(1, "Zain"), Entrant::new(1, "Zain "));
        assert_ne!(Entrant::new(1, "Zain"), Entrant::new(1, "zain"));
        assert_ne!(Entrant::new(1, "Zain"), Entrant::new(2, "Zain"));
    }

    #[test]
    fn test_duplicate_participants_collapse() {
        let mut ctx = context();
        ctx.add_participant(Entrant::new(1, "A"));
        ctx.add_participant(Entrant::new(1, "A"));
        ctx.add_participant(Entrant::new(2, "B"));
        assert_eq!(ctx.participants().len(), 2);
    }

    #[test]
    fn test_dq_records_merge() {
        let mut ctx = context();
        ctx.add_dq(Entrant::new(5, "Late"), 1);
        ctx.add_dq(Entrant::new(5, "Late"), 1);
        assert_eq!(ctx.dqs().len(), 1);
        assert_eq!(ctx.dqs()[&5].count, 2);
        assert!(ctx.is_disqualified(5));
    }

    #[test]
    fn test_dq_count_saturates() {
        let mut ctx = context();
        ctx.add_dq(Entrant::new(5, "Late"), u32::MAX);
        ctx.add_dq(Entrant::new(5, "Late"), 1);
        assert_eq!(ctx.dqs()[&5].count, u32::MAX);
    }

    #[test]
    fn test_derived_entrant_count_includes_dq_only_players() {
        let mut ctx = context();
        ctx.add_participant(Entrant::new(1, "A"));
        ctx.add_participant(Entrant::new(2, "B"));
        // Played one set then DQ'd: already a participant
        ctx.add_dq(Entrant::new(2, "B"), 1);
        // Never showed up
        ctx.add_dq(Entrant::new(3, "C"), 2);

        assert_eq!(ctx.dq_only_count(), 1);
        assert_eq!(ctx.entrant_count(), 3);
        assert_eq!(ctx.clone().with_total_entrants(40).entrant_count(), 40);
    }

    #[test]
    fn test_validate_rejects_incomplete_context() {
        let mut ctx = context();
        ctx.add_participant(Entrant::new(1, "A"));
        ctx.add_participant(Entrant::new(2, "B"));
        assert!(ctx.validate().is_ok());

        let too_small = ctx.clone().with_total_entrants(1);
        assert!(matches!(
            too_small.validate(),
            Err(TieringError::IncompleteContext { .. })
        ));

        let mut zero_dq = ctx.clone();
        zero_dq.add_dq(Entrant::new(3, "C"), 0);
        assert!(zero_dq.validate().is_err());

        let unnamed = TournamentContext::new("  ", Address::in_country("us"), ctx.date);
        assert!(unnamed.validate().is_err());
    }
}
