use std::sync::Arc;

use semplan_core::{Config, PlannerConfig, SanitizedConfig, Waterfall};

/// Shared application state
pub struct AppState {
    config: Config,
    waterfall: Arc<Waterfall>,
}

impl AppState {
    pub fn new(config: Config, waterfall: Arc<Waterfall>) -> Self {
        Self { config, waterfall }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn planner(&self) -> &PlannerConfig {
        &self.config.planner
    }

    pub fn waterfall(&self) -> &Waterfall {
        self.waterfall.as_ref()
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
