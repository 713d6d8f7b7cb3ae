use chrono::NaiveDate;
use std::collections::HashMap;

use super::types::{PlayerId, PlayerValueGroup, ResolvedValue};
use crate::error::{Result, TieringError};
use crate::tiering::Entrant;

/// Outcome of looking up an entrant.
///
/// `Confirmed` means the entrant's id is a known player. `Ambiguous` means
/// only the tag matched, so the entrant may or may not be that player and
/// the value must never count towards a guaranteed score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Confirmed {
        player: PlayerId,
        value: ResolvedValue,
    },
    Ambiguous {
        tag: String,
        value: ResolvedValue,
        /// Number of known players sharing the tag that hold a value
        candidates: usize,
    },
}

impl Resolution {
    pub fn value(&self) -> &ResolvedValue {
        match self {
            Resolution::Confirmed { value, .. } | Resolution::Ambiguous { value, .. } => value,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Resolution::Confirmed { .. })
    }
}

/// Read-only snapshot of every scored player.
#[derive(Debug, Clone, Default)]
pub struct PlayerValueRegistry {
    groups: Vec<PlayerValueGroup>,
    by_id: HashMap<PlayerId, usize>,
    by_tag: HashMap<String, Vec<usize>>,
}

impl PlayerValueRegistry {
    /// Index groups. Registration order is kept for tag lookups.
    pub fn from_groups(groups: Vec<PlayerValueGroup>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(groups.len());
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();

        for (index, group) in groups.iter().enumerate() {
            if by_id.insert(group.id.clone(), index).is_some() {
                return Err(TieringError::DuplicatePlayer(group.id.to_string()));
            }

            let tags = std::iter::once(group.tag.to_lowercase()).chain(group.alt_tags().iter().cloned());
            for tag in tags {
                let indices = by_tag.entry(tag).or_default();
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        }

        Ok(Self {
            groups,
            by_id,
            by_tag,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[PlayerValueGroup] {
        &self.groups
    }

    pub fn get(&self, id: &PlayerId) -> Option<&PlayerValueGroup> {
        self.by_id.get(id).map(|&index| &self.groups[index])
    }

    /// Groups whose canonical or alternate tag equals `tag`, ignoring case.
    pub fn groups_with_tag(&self, tag: &str) -> impl Iterator<Item = &PlayerValueGroup> {
        self.by_tag
            .get(&tag.trim().to_lowercase())
            .into_iter()
            .flatten()
            .map(|&index| &self.groups[index])
    }

    /// Resolve the value an entrant brings to an event on `date`.
    ///
    /// A known id is authoritative: if that player has no value on the date
    /// the entrant resolves to nothing, without trying the tag.
    pub fn resolve(&self, entrant: &Entrant, date: NaiveDate, invitational: bool) -> Option<Resolution> {
        if let Some(group) = self.get(&PlayerId::Num(entrant.id)) {
            return group
                .retrieve_value(date, invitational)
                .map(|value| Resolution::Confirmed {
                    player: group.id.clone(),
                    value,
                });
        }

        let mut values = self
            .groups_with_tag(&entrant.tag)
            .filter_map(|group| group.retrieve_value(date, invitational));
        let value = values.next()?;
        let candidates = 1 + values.count();

        if candidates > 1 {
            log::warn!(
                "Tag '{}' (id {}) matches {} scored players; reporting {} for review",
                entrant.tag,
                entrant.id,
                candidates,
                value.tag
            );
        }

        Some(Resolution::Ambiguous {
            tag: entrant.tag.clone(),
            value,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{InvitationalValue, PlayerValue};
    use crate::window::ValidityWindow;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn group(id: PlayerId, tag: &str, alt_tags: &[&str], points: &[u32]) -> PlayerValueGroup {
        let alt_tags: Vec<String> = alt_tags.iter().map(|t| t.to_string()).collect();
        let mut group = PlayerValueGroup::new(id, tag, &alt_tags);
        for &p in points {
            group.add_value(PlayerValue {
                points: p,
                category: "Top Player".to_string(),
                note: format!("{} pts", p),
                window: ValidityWindow::always(),
            });
        }
        group
    }

    fn registry() -> PlayerValueRegistry {
        PlayerValueRegistry::from_groups(vec![
            group(PlayerId::Num(1), "Mang0", &["C9 Mang0"], &[300]),
            group(PlayerId::Num(2), "Zain", &[], &[250]),
            group(PlayerId::Name("Ghost".to_string()), "Ghost", &[], &[60]),
            group(PlayerId::Num(3), "Ghost", &[], &[80]),
        ])
        .unwrap()
    }

    fn entrant(id: u64, tag: &str) -> Entrant {
        Entrant::new(id, tag)
    }

    #[test]
    fn test_confirmed_by_id() {
        let resolution = registry()
            .resolve(&entrant(1, "whatever"), date("2024-06-01"), false)
            .unwrap();
        assert!(resolution.is_confirmed());
        assert_eq!(resolution.value().points, 300);
        assert_eq!(resolution.value().tag, "Mang0");
    }

    #[test]
    fn test_ambiguous_by_alt_tag() {
        let resolution = registry()
            .resolve(&entrant(99, "c9 mang0"), date("2024-06-01"), false)
            .unwrap();
        match resolution {
            Resolution::Ambiguous {
                tag,
                value,
                candidates,
            } => {
                assert_eq!(tag, "c9 mang0");
                assert_eq!(value.player, PlayerId::Num(1));
                assert_eq!(value.points, 300);
                assert_eq!(candidates, 1);
            }
            other => panic!("expected ambiguous match, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_tag_not_merged() {
        let resolution = registry()
            .resolve(&entrant(42, "GHOST"), date("2024-06-01"), false)
            .unwrap();
        match resolution {
            Resolution::Ambiguous {
                value, candidates, ..
            } => {
                // First registered group is the representative
                assert_eq!(value.player, PlayerId::Name("Ghost".to_string()));
                assert_eq!(value.points, 60);
                assert_eq!(candidates, 2);
            }
            other => panic!("expected ambiguous match, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_entrant() {
        assert!(registry()
            .resolve(&entrant(99, "Nobody"), date("2024-06-01"), false)
            .is_none());
    }

    #[test]
    fn test_known_id_without_value_does_not_fall_back_to_tag() {
        let mut expired = PlayerValueGroup::new(PlayerId::Num(7), "Zain", &[]);
        expired.add_value(PlayerValue {
            points: 500,
            category: "Top Player".to_string(),
            note: String::new(),
            window: ValidityWindow::new(None, Some(date("2020-01-01"))),
        });
        let registry = PlayerValueRegistry::from_groups(vec![
            expired,
            group(PlayerId::Num(2), "Zain", &[], &[250]),
        ])
        .unwrap();

        assert!(registry
            .resolve(&entrant(7, "Zain"), date("2024-06-01"), false)
            .is_none());
    }

    #[test]
    fn test_invitational_resolution() {
        let mut zain = group(PlayerId::Num(2), "Zain", &[], &[200]);
        zain.add_invitational_value(InvitationalValue {
            points: 50,
            rank: "2".to_string(),
            window: ValidityWindow::always(),
        });
        let registry = PlayerValueRegistry::from_groups(vec![zain]).unwrap();

        let resolution = registry
            .resolve(&entrant(2, "Zain"), date("2024-06-01"), true)
            .unwrap();
        assert_eq!(resolution.value().points, 250);
        assert!(resolution.value().note.contains("200 pts"));
        assert!(resolution.value().note.contains("Rank 2"));
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let result = PlayerValueRegistry::from_groups(vec![
            group(PlayerId::Num(1), "A", &[], &[10]),
            group(PlayerId::Num(1), "B", &[], &[20]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            TieringError::DuplicatePlayer("1".to_string())
        );
    }
}
