use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TieringError;
use crate::window::ValidityWindow;

/// Region multiplier. Only 1, 2 and 3 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Multiplier {
    X1 = 1,
    X2 = 2,
    X3 = 3,
}

impl Multiplier {
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Entrant count at which an event counts regardless of its score.
    pub fn entrant_floor(self) -> u32 {
        match self {
            Multiplier::X1 => 64,
            Multiplier::X2 => 48,
            Multiplier::X3 => 32,
        }
    }

    /// Score an undersized event needs (with enough qualified players) to count.
    pub fn score_floor(self) -> u64 {
        match self {
            Multiplier::X1 => 250,
            Multiplier::X2 | Multiplier::X3 => 200,
        }
    }
}

impl TryFrom<u8> for Multiplier {
    type Error = TieringError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Multiplier::X1),
            2 => Ok(Multiplier::X2),
            3 => Ok(Multiplier::X3),
            other => Err(TieringError::InvalidMultiplier(other)),
        }
    }
}

impl From<Multiplier> for u8 {
    fn from(multiplier: Multiplier) -> Self {
        multiplier as u8
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.value())
    }
}

/// Reverse-geocoded address attributes of an event venue.
///
/// Field names follow the geocoder's address keys. Empty strings and missing
/// keys are treated the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    pub country_code: String,

    /// ISO 3166-2 level 4 code, e.g. "US-CA"
    #[serde(default)]
    pub subdivision: Option<String>,

    /// ISO 3166-2 level 3 code, used by countries without level 4 subdivisions
    #[serde(default)]
    pub subdivision_lvl3: Option<String>,

    #[serde(default)]
    pub county: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state_district: Option<String>,

    #[serde(default)]
    pub postcode: Option<String>,
}

impl Address {
    pub fn in_country(country_code: &str) -> Self {
        Self {
            country_code: country_code.to_string(),
            ..Self::default()
        }
    }

    /// First two characters of the postcode, "XX" when unknown.
    pub fn postal_prefix(&self) -> String {
        match self.postcode.as_deref() {
            Some(code) if !code.is_empty() => code.chars().take(2).collect(),
            _ => "XX".to_string(),
        }
    }

    pub(crate) fn has_subdivision(&self, code: &str) -> bool {
        self.subdivision.as_deref() == Some(code) || self.subdivision_lvl3.as_deref() == Some(code)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![self.country_code.as_str()];
        for part in [
            &self.subdivision,
            &self.county,
            &self.city,
            &self.state_district,
            &self.postcode,
        ]
        .into_iter()
        .flatten()
        {
            parts.push(part.as_str());
        }
        write!(f, "{}", parts.join("/"))
    }
}

/// Locality refinement of a region rule.
///
/// A rule names at most one locality; county beats city beats state district
/// when a row fills in several of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum LocalityFilter {
    #[default]
    Any,
    County(String),
    City(String),
    StateDistrict(String),
}

impl LocalityFilter {
    pub fn from_fields(county: &str, city: &str, state_district: &str) -> Self {
        if !county.is_empty() {
            LocalityFilter::County(county.to_string())
        } else if !city.is_empty() {
            LocalityFilter::City(city.to_string())
        } else if !state_district.is_empty() {
            LocalityFilter::StateDistrict(state_district.to_string())
        } else {
            LocalityFilter::Any
        }
    }

    /// Only the declared field is compared, never the others.
    pub fn matches(&self, address: &Address) -> bool {
        match self {
            LocalityFilter::Any => true,
            LocalityFilter::County(county) => address.county.as_deref() == Some(county.as_str()),
            LocalityFilter::City(city) => address.city.as_deref() == Some(city.as_str()),
            LocalityFilter::StateDistrict(district) => {
                address.state_district.as_deref() == Some(district.as_str())
            }
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            LocalityFilter::Any => None,
            LocalityFilter::County(name)
            | LocalityFilter::City(name)
            | LocalityFilter::StateDistrict(name) => Some(name),
        }
    }
}

/// One row of the region table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionMultiplier {
    /// Lowercase ISO country code; empty for the wildcard rule
    pub country_code: String,
    pub subdivision: Option<String>,
    pub locality: LocalityFilter,
    /// Two-character postal prefix, only consulted for Japan
    pub jp_postal: Option<String>,
    pub multiplier: Multiplier,
    pub note: String,
    pub window: ValidityWindow,
}

impl RegionMultiplier {
    /// The catch-all rule for every region without its own entry.
    pub fn wildcard(multiplier: Multiplier, note: &str) -> Self {
        Self {
            country_code: String::new(),
            subdivision: None,
            locality: LocalityFilter::Any,
            jp_postal: None,
            multiplier,
            note: note.to_string(),
            window: ValidityWindow::always(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.country_code.is_empty()
    }

    pub fn entrant_floor(&self) -> u32 {
        self.multiplier.entrant_floor()
    }

    pub fn score_floor(&self) -> u64 {
        self.multiplier.score_floor()
    }
}

impl fmt::Display for RegionMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, "All Other Regions")?;
        } else {
            write!(f, "{}", self.country_code)?;
            if let Some(subdivision) = &self.subdivision {
                write!(f, "/{}", subdivision)?;
                if let Some(locality) = self.locality.name() {
                    write!(f, "/{}", locality)?;
                }
            }
            if let Some(prefix) = &self.jp_postal {
                write!(f, "/JP Postal {}", prefix)?;
            }
        }
        write!(f, " [{}] - {}", self.note, self.multiplier)
    }
}
