use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::TieringError;
use crate::players::{InvitationalValue, PlayerId, PlayerValue, PlayerValueGroup, PlayerValueRegistry};
use crate::region::{LocalityFilter, Multiplier, RegionMultiplier, RegionMultiplierTable};
use crate::window::ValidityWindow;

/// One row of the region sheet.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegionRow {
    /// Empty for the catch-all rule
    #[serde(default)]
    pub country_code: String,
    /// ISO 3166-2 code
    #[serde(default)]
    pub subdivision: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state_district: String,
    #[serde(default)]
    pub jp_postal: String,
    pub multiplier: u8,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl RegionRow {
    pub fn window(&self) -> ValidityWindow {
        ValidityWindow::new(self.start_date, self.end_date)
    }

    pub fn into_rule(self) -> Result<RegionMultiplier, TieringError> {
        let multiplier = Multiplier::try_from(self.multiplier)?;
        let window = self.window();
        Ok(RegionMultiplier {
            country_code: self.country_code.trim().to_lowercase(),
            subdivision: non_empty(&self.subdivision),
            locality: LocalityFilter::from_fields(
                self.county.trim(),
                self.city.trim(),
                self.state_district.trim(),
            ),
            jp_postal: non_empty(&self.jp_postal),
            multiplier,
            note: self.note,
            window,
        })
    }
}

/// One row of the player sheet. A player may have several rows.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlayerRow {
    /// Numeric bracket-site id; players without one are keyed by tag
    #[serde(default)]
    pub id: Option<u64>,
    pub tag: String,
    pub points: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PlayerRow {
    pub fn player_id(&self) -> PlayerId {
        match self.id {
            Some(id) => PlayerId::Num(id),
            None => PlayerId::Name(self.tag.trim().to_string()),
        }
    }

    pub fn window(&self) -> ValidityWindow {
        ValidityWindow::new(self.start_date, self.end_date)
    }
}

/// One row of the invitational sheet.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InvitationalRow {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub points: u32,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl InvitationalRow {
    pub fn player_id(&self) -> PlayerId {
        match self.id {
            Some(id) => PlayerId::Num(id),
            None => PlayerId::Name(self.name.trim().to_string()),
        }
    }

    pub fn window(&self) -> ValidityWindow {
        ValidityWindow::new(self.start_date, self.end_date)
    }
}

/// All scoring tables as exported from the ranking spreadsheet.
///
/// Example YAML:
/// ```yaml
/// regions:
///   - { country_code: "", multiplier: 1, note: "All other regions" }
///   - { country_code: us, subdivision: US-CA, multiplier: 3, note: California }
/// players:
///   - { id: 1000, tag: Mang0, points: 300, category: Top 10, note: "#2" }
/// alt_tags:
///   Mang0: ["C9 Mang0"]
/// invitational:
///   - { id: 1000, name: Mang0, points: 50, rank: "2" }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableSnapshot {
    pub regions: Vec<RegionRow>,
    #[serde(default)]
    pub players: Vec<PlayerRow>,
    /// Canonical tag -> other accepted tags
    #[serde(default)]
    pub alt_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub invitational: Vec<InvitationalRow>,
}

/// The built, read-only tables shared by every scoring run.
#[derive(Debug, Clone)]
pub struct Tables {
    pub regions: RegionMultiplierTable,
    pub players: PlayerValueRegistry,
}

impl TableSnapshot {
    /// Build the region table and player registry. Run `validate_tables` first
    /// to get every problem at once; this stops at the first one.
    pub fn build(self) -> Result<Tables, TieringError> {
        let rules = self
            .regions
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                row.into_rule().map_err(|e| TieringError::InvalidRow {
                    table: "regions",
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let regions = RegionMultiplierTable::from_rules(rules)?;

        let mut groups: Vec<PlayerValueGroup> = Vec::new();
        let mut index: HashMap<PlayerId, usize> = HashMap::new();

        for row in self.players {
            let id = row.player_id();
            let at = *index.entry(id.clone()).or_insert_with(|| {
                let alt_tags = self.alt_tags.get(row.tag.trim()).cloned().unwrap_or_default();
                groups.push(PlayerValueGroup::new(id, &row.tag, &alt_tags));
                groups.len() - 1
            });
            groups[at].add_value(PlayerValue {
                points: row.points,
                window: row.window(),
                category: row.category,
                note: row.note,
            });
        }

        for row in self.invitational {
            let id = row.player_id();
            let at = *index.entry(id.clone()).or_insert_with(|| {
                let alt_tags = self.alt_tags.get(row.name.trim()).cloned().unwrap_or_default();
                groups.push(PlayerValueGroup::new(id, &row.name, &alt_tags));
                groups.len() - 1
            });
            groups[at].add_invitational_value(InvitationalValue {
                points: row.points,
                window: row.window(),
                rank: row.rank,
            });
        }

        let players = PlayerValueRegistry::from_groups(groups)?;
        log::debug!(
            "Built {} region rules and {} players",
            regions.len(),
            players.len()
        );

        Ok(Tables { regions, players })
    }
}

/// Load the table snapshot from a YAML file.
pub fn load_tables(path: &Path) -> Result<TableSnapshot> {
    if !path.exists() {
        anyhow::bail!("Tables file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tables file at {}", path.display()))?;

    let snapshot: TableSnapshot = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse tables: invalid YAML in {}", path.display()))?;

    Ok(snapshot)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiering::Entrant;
    use std::env;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const SNAPSHOT: &str = r##"
regions:
  - country_code: ""
    multiplier: 1
    note: "All other regions"
  - country_code: us
    subdivision: US-CA
    county: Orange County
    multiplier: 3
    note: "OC"
    start_date: "2024-01-01"
players:
  - id: 1000
    tag: Mang0
    points: 300
    category: "Top 10"
    note: "#2"
    end_date: "2024-01-01"
  - id: 1000
    tag: Mang0
    points: 500
    category: "Top 10"
    note: "#1"
    start_date: "2024-01-01"
  - tag: Nameless
    points: 20
alt_tags:
  Mang0:
    - "C9 Mang0"
invitational:
  - id: 1000
    name: Mang0
    points: 50
    rank: "1"
  - id: 2000
    name: Zain
    points: 40
    rank: "3"
"##;

    #[test]
    fn test_parse_snapshot() {
        let snapshot: TableSnapshot = serde_saphyr::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.regions.len(), 2);
        assert_eq!(snapshot.regions[1].county, "Orange County");
        assert_eq!(snapshot.regions[1].start_date, Some(date("2024-01-01")));
        assert_eq!(snapshot.players.len(), 3);
        assert_eq!(snapshot.players[2].id, None);
        assert_eq!(snapshot.alt_tags["Mang0"], vec!["C9 Mang0".to_string()]);
        assert_eq!(snapshot.invitational.len(), 2);
    }

    #[test]
    fn test_build_groups_rows_by_player() {
        let snapshot: TableSnapshot = serde_saphyr::from_str(SNAPSHOT).unwrap();
        let tables = snapshot.build().unwrap();

        assert_eq!(tables.regions.len(), 2);
        assert_eq!(
            tables.regions.rules()[1].locality,
            LocalityFilter::County("Orange County".to_string())
        );

        // Mang0, Nameless, then invitational-only Zain
        let tags: Vec<_> = tables.players.groups().iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, vec!["Mang0", "Nameless", "Zain"]);

        let mang0 = tables.players.get(&PlayerId::Num(1000)).unwrap();
        assert_eq!(mang0.values().len(), 2);
        assert_eq!(mang0.invitational_values().len(), 1);
        assert!(mang0.match_tag("c9 mang0"));

        let nameless = tables
            .players
            .get(&PlayerId::Name("Nameless".to_string()))
            .unwrap();
        assert_eq!(nameless.values()[0].points, 20);
    }

    #[test]
    fn test_built_registry_resolves_by_date() {
        let tables = serde_saphyr::from_str::<TableSnapshot>(SNAPSHOT)
            .unwrap()
            .build()
            .unwrap();
        let mang0 = Entrant::new(1000, "Mang0");

        let old = tables.players.resolve(&mang0, date("2023-06-01"), false).unwrap();
        assert_eq!(old.value().points, 300);
        let new = tables.players.resolve(&mang0, date("2024-06-01"), false).unwrap();
        assert_eq!(new.value().points, 500);
        let invit = tables.players.resolve(&mang0, date("2024-06-01"), true).unwrap();
        assert_eq!(invit.value().points, 550);
    }

    #[test]
    fn test_build_rejects_bad_multiplier() {
        let snapshot = TableSnapshot {
            regions: vec![RegionRow {
                multiplier: 7,
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = snapshot.build().unwrap_err();
        assert!(matches!(
            err,
            TieringError::InvalidRow {
                table: "regions",
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_build_rejects_missing_wildcard() {
        let snapshot = TableSnapshot {
            regions: vec![RegionRow {
                country_code: "us".to_string(),
                multiplier: 2,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(snapshot.build().unwrap_err(), TieringError::MissingWildcard);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_path = env::temp_dir().join("ultrank_tiering_test_missing_tables.yaml");
        let _ = fs::remove_file(&temp_path);
        assert!(load_tables(&temp_path).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_path = env::temp_dir().join("ultrank_tiering_test_tables.yaml");
        fs::write(&temp_path, SNAPSHOT).unwrap();

        let snapshot = load_tables(&temp_path).unwrap();
        assert_eq!(snapshot.players.len(), 3);

        let _ = fs::remove_file(&temp_path);
    }
}
