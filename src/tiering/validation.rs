use super::config::TieringConfig;

/// Validate tiering configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_tiering(config: &TieringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(players) = config.min_qualified_players {
        if players == 0 {
            errors.push("tiering.min_qualified_players: must be at least 1".to_string());
        }
    }

    if let Some(cutover) = config.cutover_date {
        if cutover < super::config::NEW_MULTIPLIER_SYSTEM_DATE {
            log::warn!(
                "tiering.cutover_date {} is earlier than the official {}",
                cutover,
                super::config::NEW_MULTIPLIER_SYSTEM_DATE
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_tiering(&TieringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config_valid() {
        let config = TieringConfig {
            cutover_date: None,
            min_qualified_players: None,
        };
        assert!(validate_tiering(&config).is_ok());
    }

    #[test]
    fn test_zero_players_rejected() {
        let config = TieringConfig {
            cutover_date: None,
            min_qualified_players: Some(0),
        };
        let errors = validate_tiering(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("min_qualified_players"));
    }
}
