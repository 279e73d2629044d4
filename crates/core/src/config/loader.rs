use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Env var naming the config file used by [`load_config_from_env`].
pub const CONFIG_PATH_VAR: &str = "SEMPLAN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Conventional provider variables and the config keys they set.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DATAFORSEO_API_LOGIN", "providers.dataforseo.login"),
    ("DATAFORSEO_API_PASSWORD", "providers.dataforseo.password"),
    ("DATAFORSEO_API_KEY", "providers.dataforseo.api_key"),
    ("DATAFORSEO_BASE_URL", "providers.dataforseo.base_url"),
    ("GOOGLE_ADS_CLIENT_ID", "providers.google_ads.client_id"),
    ("GOOGLE_ADS_CLIENT_SECRET", "providers.google_ads.client_secret"),
    ("GOOGLE_ADS_REFRESH_TOKEN", "providers.google_ads.refresh_token"),
    ("GOOGLE_ADS_DEVELOPER_TOKEN", "providers.google_ads.developer_token"),
    ("GOOGLE_ADS_CUSTOMER_ID", "providers.google_ads.customer_id"),
    ("GOOGLE_ADS_LOGIN_CUSTOMER_ID", "providers.google_ads.login_customer_id"),
    ("MSADS_DEVELOPER_TOKEN", "providers.microsoft_ads.developer_token"),
    ("MSADS_CLIENT_ID", "providers.microsoft_ads.client_id"),
    ("MSADS_CLIENT_SECRET", "providers.microsoft_ads.client_secret"),
    ("MSADS_REFRESH_TOKEN", "providers.microsoft_ads.refresh_token"),
    ("MSADS_CUSTOMER_ID", "providers.microsoft_ads.customer_id"),
    ("MSADS_ACCOUNT_ID", "providers.microsoft_ads.account_id"),
    ("SERPAPI_KEY", "providers.serpapi.api_key"),
    ("ALLOWED_ORIGINS", "cors.allowed_origins"),
];

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            .map(|(_, path)| (*path).into())
    })
}

/// File values, then conventional provider variables, then `SEMPLAN_*`
/// overrides (`__` separates nesting levels).
fn with_env_overrides(figment: Figment) -> Figment {
    figment
        .merge(legacy_env())
        .merge(Env::prefixed("SEMPLAN_").ignore(&["CONFIG"]).split("__"))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    with_env_overrides(Figment::new().merge(Toml::file(path)))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from `$SEMPLAN_CONFIG` (default `config.toml`) if it
/// exists, otherwise from the environment alone.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if path.exists() {
        return load_config(&path);
    }
    if explicit.is_some() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    with_env_overrides(Figment::new())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
