use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::keyword::{Competition, ScoredKeyword};

// ============================================================================
// Filtering
// ============================================================================

/// Predicates applied by [`filter_keywords`](super::filter_keywords).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default = "default_min_search_volume")]
    pub min_search_volume: u64,
    /// Any ceiling other than High drops High-competition keywords.
    #[serde(default = "default_max_competition")]
    pub max_competition: Option<Competition>,
    #[serde(default = "default_min_opportunity_score")]
    pub min_opportunity_score: f64,
    /// Drop keywords containing the literal word "brand".
    #[serde(default)]
    pub exclude_branded: bool,
}

fn default_min_search_volume() -> u64 {
    500
}

fn default_max_competition() -> Option<Competition> {
    Some(Competition::High)
}

fn default_min_opportunity_score() -> f64 {
    0.6
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_search_volume: default_min_search_volume(),
            max_competition: default_max_competition(),
            min_opportunity_score: default_min_opportunity_score(),
            exclude_branded: false,
        }
    }
}

/// Result of a filter pass.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    pub original_count: usize,
    pub filtered_count: usize,
    /// Retained keywords, highest opportunity first.
    pub keywords: Vec<ScoredKeyword>,
    pub filter_criteria: FilterCriteria,
}

// ============================================================================
// Ad groups
// ============================================================================

/// Keyword match type. `bmm` (broad match modifier) is read as broad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Phrase,
    #[serde(alias = "bmm")]
    Broad,
}

/// Cost-per-click range in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpcRange {
    pub low: f64,
    pub high: f64,
}

impl CpcRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low >= 0.0 && self.low <= self.high
    }

    /// Clamp a bid into the range. Assumes a valid range.
    pub fn clamp(&self, bid: f64) -> f64 {
        bid.max(self.low).min(self.high)
    }
}

/// An intent-based ad group with fixed performance estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdGroup {
    pub name: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub keywords: Vec<ScoredKeyword>,
    #[serde(
        default,
        rename = "suggested_match_types",
        alias = "match_type_suggestions"
    )]
    pub match_type_suggestions: BTreeMap<MatchType, Vec<String>>,
    pub cpc_range: CpcRange,
    #[serde(default)]
    pub estimated_clicks: u64,
    #[serde(default)]
    pub estimated_conversions: f64,
    #[serde(default)]
    pub target_cpa: f64,
}

// ============================================================================
// Performance Max themes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeCategory {
    Product,
    UseCase,
    Demographic,
    Seasonal,
}

impl ThemeCategory {
    /// Categories in matching priority; `Product` is the fallback.
    pub const PRIORITY: [ThemeCategory; 4] = [
        ThemeCategory::Demographic,
        ThemeCategory::Seasonal,
        ThemeCategory::UseCase,
        ThemeCategory::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::UseCase => "use_case",
            Self::Demographic => "demographic",
            Self::Seasonal => "seasonal",
        }
    }
}

/// A Performance-Max creative theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PMaxTheme {
    pub title: String,
    pub category: ThemeCategory,
    pub description: String,
    pub keywords: Vec<String>,
    pub target_audience: String,
    /// Sum of the volumes of every keyword in the category, not only the kept ones.
    pub estimated_impressions: u64,
    pub expected_ctr: f64,
    /// Asset kind (`headlines`, `descriptions`, `images`) to suggestions.
    pub asset_suggestions: BTreeMap<String, Vec<String>>,
}

// ============================================================================
// Bids
// ============================================================================

/// Input to [`calculate_bids`](super::calculate_bids).
#[derive(Debug, Clone, Deserialize)]
pub struct BidRequest {
    pub ad_groups: Vec<AdGroup>,
    /// Channel name (search, shopping, pmax, ...) to budget.
    pub budgets: BTreeMap<String, f64>,
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: f64,
    #[serde(default = "default_target_roas")]
    pub target_roas: Option<f64>,
}

fn default_conversion_rate() -> f64 {
    0.02
}

fn default_target_roas() -> Option<f64> {
    Some(4.0)
}

/// Bid recommendation for one ad group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidPlan {
    pub ad_group_name: String,
    pub target_cpa: f64,
    pub target_cpc: f64,
    /// `target_cpc` clamped into `bid_range`.
    pub recommended_bid: f64,
    pub bid_range: CpcRange,
    pub estimated_clicks: u64,
    pub estimated_conversions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationStrategy {
    pub conversion_rate: f64,
    pub target_roas: Option<f64>,
    pub bid_strategy: String,
    pub optimization_notes: Vec<String>,
}

/// Budget-level bid summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidSummary {
    pub budget_allocation: BTreeMap<String, f64>,
    pub total_budget: f64,
    pub target_cpa: f64,
    pub expected_roas: f64,
    pub bid_recommendations: Vec<BidPlan>,
    pub optimization_strategy: OptimizationStrategy,
}
