use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::window::ValidityWindow;

/// Player identity.
///
/// Table rows normally carry the bracket site's numeric player id. Rows
/// without one fall back to the player's name, and such players can only
/// ever be matched by tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Num(u64),
    Name(String),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Num(id) => write!(f, "{}", id),
            PlayerId::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        PlayerId::Num(id)
    }
}

/// Points a player is worth during a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerValue {
    pub points: u32,
    pub category: String,
    pub note: String,
    pub window: ValidityWindow,
}

/// Extra points a player adds to invitational events. `rank` is the
/// invitational ranking the bonus comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationalValue {
    pub points: u32,
    pub rank: String,
    pub window: ValidityWindow,
}

/// The value that applies to one player at one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
    pub player: PlayerId,
    /// Canonical tag of the player the value belongs to
    pub tag: String,
    pub points: u32,
    pub category: String,
    pub note: String,
}

pub const INVITATIONAL_CATEGORY: &str = "Invitational Value";
pub const INVITATIONAL_ONLY_NOTE: &str = "Invitational only";

/// One player and every value they hold.
#[derive(Debug, Clone)]
pub struct PlayerValueGroup {
    pub id: PlayerId,
    pub tag: String,
    alt_tags: Vec<String>,
    values: Vec<PlayerValue>,
    invitational_values: Vec<InvitationalValue>,
}

impl PlayerValueGroup {
    pub fn new(id: PlayerId, tag: &str, alt_tags: &[String]) -> Self {
        Self {
            id,
            tag: tag.trim().to_string(),
            alt_tags: alt_tags.iter().map(|t| t.trim().to_lowercase()).collect(),
            values: Vec::new(),
            invitational_values: Vec::new(),
        }
    }

    /// Values stay sorted by points, highest first. Equal points keep insertion order.
    pub fn add_value(&mut self, value: PlayerValue) {
        let at = self.values.partition_point(|v| v.points >= value.points);
        self.values.insert(at, value);
    }

    pub fn add_invitational_value(&mut self, value: InvitationalValue) {
        let at = self
            .invitational_values
            .partition_point(|v| v.points >= value.points);
        self.invitational_values.insert(at, value);
    }

    pub fn values(&self) -> &[PlayerValue] {
        &self.values
    }

    pub fn invitational_values(&self) -> &[InvitationalValue] {
        &self.invitational_values
    }

    /// Lowercased alternate tags
    pub fn alt_tags(&self) -> &[String] {
        &self.alt_tags
    }

    pub fn match_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        tag == self.tag.to_lowercase() || self.alt_tags.contains(&tag)
    }

    /// Value that applies on `date`.
    ///
    /// Takes the highest-points value whose window holds the date, then adds
    /// the highest in-window invitational bonus when `invitational` is set.
    pub fn retrieve_value(&self, date: NaiveDate, invitational: bool) -> Option<ResolvedValue> {
        let base = self
            .values
            .iter()
            .find(|value| value.window.contains(date))
            .map(|value| self.resolved(value.points, &value.category, &value.note));

        if !invitational {
            return base;
        }

        let Some(bonus) = self
            .invitational_values
            .iter()
            .find(|value| value.window.contains(date))
        else {
            return base;
        };

        let base = base.unwrap_or_else(|| {
            self.resolved(0, INVITATIONAL_CATEGORY, INVITATIONAL_ONLY_NOTE)
        });

        Some(ResolvedValue {
            points: base.points.saturating_add(bonus.points),
            note: format!("{} + Invit. Val. (Rank {})", base.note, bonus.rank),
            ..base
        })
    }

    fn resolved(&self, points: u32, category: &str, note: &str) -> ResolvedValue {
        ResolvedValue {
            player: self.id.clone(),
            tag: self.tag.clone(),
            points,
            category: category.to_string(),
            note: note.to_string(),
        }
    }
}
