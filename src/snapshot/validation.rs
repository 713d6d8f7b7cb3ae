use std::collections::HashSet;

use super::tables::TableSnapshot;
use crate::region::Multiplier;
use crate::window::ValidityWindow;

/// Validate a table snapshot before building it.
/// Returns all validation errors at once (not just the first).
pub fn validate_tables(tables: &TableSnapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut wildcards = 0;
    for (i, row) in tables.regions.iter().enumerate() {
        if let Err(e) = Multiplier::try_from(row.multiplier) {
            errors.push(format!("regions[{}].multiplier: {}", i, e));
        }

        if row.window().is_empty() {
            errors.push(format!(
                "regions[{}]: start_date must be before end_date",
                i
            ));
        }

        let prefix = row.jp_postal.trim();
        if !prefix.is_empty() && prefix.chars().count() != 2 {
            errors.push(format!(
                "regions[{}].jp_postal: expected two characters, got '{}'",
                i, prefix
            ));
        }

        if row.country_code.trim().is_empty() {
            wildcards += 1;
            let has_filters = [
                &row.subdivision,
                &row.county,
                &row.city,
                &row.state_district,
                &row.jp_postal,
            ]
            .iter()
            .any(|field| !field.trim().is_empty());
            if has_filters {
                errors.push(format!(
                    "regions[{}]: wildcard rule cannot have subdivision, locality or postal filters",
                    i
                ));
            }
            // The catch-all must match every date
            if row.window() != ValidityWindow::always() {
                errors.push(format!(
                    "regions[{}]: wildcard rule cannot have start_date or end_date",
                    i
                ));
            }
        } else {
            let localities = [&row.county, &row.city, &row.state_district]
                .iter()
                .filter(|field| !field.trim().is_empty())
                .count();
            if localities > 1 {
                log::warn!(
                    "regions[{}]: several localities set, only the first of county/city/state_district is used",
                    i
                );
            }
        }
    }

    if wildcards != 1 {
        errors.push(format!(
            "regions: expected exactly one wildcard rule (empty country_code), found {}",
            wildcards
        ));
    }

    for (i, row) in tables.players.iter().enumerate() {
        if row.tag.trim().is_empty() {
            errors.push(format!("players[{}].tag: must not be empty", i));
        }
        if row.window().is_empty() {
            errors.push(format!(
                "players[{}]: start_date must be before end_date",
                i
            ));
        }
    }

    for (i, row) in tables.invitational.iter().enumerate() {
        if row.name.trim().is_empty() {
            errors.push(format!("invitational[{}].name: must not be empty", i));
        }
        if row.window().is_empty() {
            errors.push(format!(
                "invitational[{}]: start_date must be before end_date",
                i
            ));
        }
    }

    let known_tags: HashSet<&str> = tables
        .players
        .iter()
        .map(|row| row.tag.trim())
        .chain(tables.invitational.iter().map(|row| row.name.trim()))
        .collect();
    for name in tables.alt_tags.keys() {
        if !known_tags.contains(name.trim()) {
            log::warn!("alt_tags: '{}' is not a known player, its tags are ignored", name);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
