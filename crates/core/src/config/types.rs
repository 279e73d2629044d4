use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;

use crate::keyword::KeywordQuery;
use crate::provider::{DataForSeoConfig, GoogleAdsConfig, MicrosoftAdsConfig, SerpApiConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any. A comma-separated string is accepted.
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "origins_from_list_or_csv"
    )]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

fn origins_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(list) => list,
        ListOrCsv::Csv(csv) => csv.split(',').map(String::from).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect())
}

/// Defaults applied to keyword requests that omit them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_location_code")]
    pub default_location_code: u32,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Volume floor passed to providers that filter at the source.
    #[serde(default = "default_min_volume")]
    pub default_min_volume: u64,
    /// Cap on `max_results` for keyword generation.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_location_code: default_location_code(),
            default_language: default_language(),
            default_min_volume: default_min_volume(),
            max_results: default_max_results(),
        }
    }
}

fn default_location_code() -> u32 {
    KeywordQuery::DEFAULT_LOCATION_CODE
}

fn default_language() -> String {
    KeywordQuery::DEFAULT_LANGUAGE.to_string()
}

fn default_min_volume() -> u64 {
    KeywordQuery::DEFAULT_MIN_VOLUME
}

fn default_max_results() -> usize {
    1000
}

/// Keyword provider credentials and tuning, one section per waterfall tier.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub dataforseo: DataForSeoConfig,
    #[serde(default)]
    pub google_ads: GoogleAdsConfig,
    #[serde(default)]
    pub microsoft_ads: MicrosoftAdsConfig,
    #[serde(default)]
    pub serpapi: SerpApiConfig,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub planner: PlannerConfig,
    pub providers: SanitizedProvidersConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProvidersConfig {
    pub dataforseo: SanitizedProviderConfig,
    pub google_ads: SanitizedProviderConfig,
    pub microsoft_ads: SanitizedProviderConfig,
    pub serpapi: SanitizedProviderConfig,
}

/// Provider config with credentials hidden, just shows if they are set.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProviderConfig {
    pub credentials_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let p = &config.providers;
        Self {
            server: config.server.clone(),
            cors: config.cors.clone(),
            planner: config.planner.clone(),
            providers: SanitizedProvidersConfig {
                dataforseo: SanitizedProviderConfig {
                    credentials_configured: p.dataforseo.has_credentials(),
                    base_url: p.dataforseo.base_url.clone(),
                    timeout_secs: p.dataforseo.timeout_secs,
                },
                google_ads: SanitizedProviderConfig {
                    credentials_configured: p.google_ads.has_credentials(),
                    base_url: p.google_ads.base_url.clone(),
                    timeout_secs: p.google_ads.timeout_secs,
                },
                microsoft_ads: SanitizedProviderConfig {
                    credentials_configured: p.microsoft_ads.has_credentials(),
                    base_url: p.microsoft_ads.base_url.clone(),
                    timeout_secs: p.microsoft_ads.timeout_secs,
                },
                serpapi: SanitizedProviderConfig {
                    credentials_configured: !p.serpapi.api_key.is_empty(),
                    base_url: p.serpapi.base_url.clone(),
                    timeout_secs: p.serpapi.timeout_secs,
                },
            },
        }
    }
}
