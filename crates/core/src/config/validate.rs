use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Planner result cap is not 0
/// - Every provider timeout is positive
/// - DataForSEO expansion limit is within 1..=1000
/// - SerpAPI searches at least one seed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.planner.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "planner.max_results cannot be 0".to_string(),
        ));
    }

    let p = &config.providers;
    let timeouts = [
        ("dataforseo", p.dataforseo.timeout_secs),
        ("google_ads", p.google_ads.timeout_secs),
        ("microsoft_ads", p.microsoft_ads.timeout_secs),
        ("serpapi", p.serpapi.timeout_secs),
    ];
    for (name, timeout) in timeouts {
        if timeout == 0 {
            return Err(ConfigError::ValidationError(format!(
                "providers.{}.timeout_secs cannot be 0",
                name
            )));
        }
    }

    if !(1..=1000).contains(&p.dataforseo.expansion_limit) {
        return Err(ConfigError::ValidationError(format!(
            "providers.dataforseo.expansion_limit must be between 1 and 1000, got {}",
            p.dataforseo.expansion_limit
        )));
    }

    if p.serpapi.max_seeds == 0 {
        return Err(ConfigError::ValidationError(
            "providers.serpapi.max_seeds cannot be 0".to_string(),
        ));
    }

    Ok(())
}
