pub mod acquisition;
pub mod config;
pub mod error;
pub mod insights;
pub mod keyword;
pub mod metrics;
pub mod planning;
pub mod provider;
pub mod scoring;
pub mod testing;

pub use acquisition::{Acquisition, AttemptOutcome, ProviderAttempt, Waterfall};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, CorsConfig, PlannerConfig, ProvidersConfig, SanitizedConfig, ServerConfig,
};
pub use error::PlanError;
pub use keyword::{
    hostname_tokens, Competition, Intent, KeywordQuery, KeywordRecord, ProviderTag,
    ScoredKeyword,
};
pub use planning::{
    bucketize, calculate_bids, filter_keywords, group_keywords, AdGroup, BidPlan, BidRequest,
    BidSummary, CpcRange, FilterCriteria, FilterOutcome, MatchType, PMaxTheme, ThemeCategory,
};
pub use provider::{
    DataForSeoClient, DataForSeoConfig, GoogleAdsClient, GoogleAdsConfig, KeywordProvider,
    MicrosoftAdsClient, MicrosoftAdsConfig, ProviderError, ProviderStatus, SerpApiClient,
    SerpApiConfig,
};
pub use scoring::{difficulty, opportunity, score, Scorer};
