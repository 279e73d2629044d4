//! Static SEM guidance: industry trends, best practices and campaign
//! optimization templates.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// An industry trend with a recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct Trend {
    pub trend: &'static str,
    pub description: &'static str,
    pub impact: Impact,
    pub recommendation: &'static str,
    pub source: &'static str,
    pub confidence: Impact,
}

const fn trend(
    trend: &'static str,
    description: &'static str,
    impact: Impact,
    recommendation: &'static str,
    confidence: Impact,
) -> Trend {
    Trend {
        trend,
        description,
        impact,
        recommendation,
        source: "industry_research",
        confidence,
    }
}

pub fn sem_trends() -> Vec<Trend> {
    vec![
        trend(
            "AI Overview Integration",
            "Ads appearing within AI-generated content",
            Impact::High,
            "Optimize for conversational keywords and long-tail queries",
            Impact::High,
        ),
        trend(
            "Semantic Search Optimization",
            "Moving from keyword-based to intent-based targeting",
            Impact::High,
            "Use broad match keywords and focus on user intent",
            Impact::High,
        ),
        trend(
            "Performance Max Evolution",
            "Enhanced controls and reporting for PMax campaigns",
            Impact::Medium,
            "Leverage new PMax features for better campaign control",
            Impact::Medium,
        ),
        trend(
            "Zero-Click Searches",
            "Increasing number of searches without clicks",
            Impact::High,
            "Focus on featured snippets and answer boxes",
            Impact::High,
        ),
        trend(
            "Voice Search Optimization",
            "Growing importance of voice search queries",
            Impact::Medium,
            "Optimize for natural language and question-based queries",
            Impact::Medium,
        ),
        trend(
            "Privacy-First Advertising",
            "Shift towards privacy-compliant advertising methods",
            Impact::High,
            "Focus on first-party data and contextual targeting",
            Impact::High,
        ),
    ]
}

pub const BEST_PRACTICES: [&str; 5] = [
    "Use AI-powered creative generation",
    "Implement smart bidding strategies",
    "Focus on conversion value over volume",
    "Optimize for mobile-first experiences",
    "Leverage first-party data for targeting",
];

pub const PMAX_OPTIMIZATION_FEATURES: [&str; 4] = [
    "AI-powered asset group segmentation",
    "Audience signal optimization",
    "Creative performance prediction",
    "Cross-channel optimization",
];

pub const PMAX_BEST_PRACTICES: [&str; 4] = [
    "Include diverse asset types (images, videos, text)",
    "Use high-quality, relevant creative assets",
    "Test different audience signals",
    "Monitor asset performance regularly",
];

pub const OPTIMIZATION_INSIGHTS: [&str; 4] = [
    "Performance Max shows highest ROAS potential",
    "Video assets critical for PMax success",
    "Audience signals improve targeting precision",
    "Smart bidding reduces manual optimization",
];

pub const OPTIMIZATION_NEXT_STEPS: [&str; 4] = [
    "Implement recommended bid strategies",
    "Set up audience signals",
    "Create diverse creative assets",
    "Monitor performance and adjust",
];

/// Optimization template for one campaign type.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignOptimization {
    pub campaign_type: &'static str,
    pub budget_allocation: BTreeMap<&'static str, f64>,
    pub bid_strategy: &'static str,
    pub targeting_optimization: Value,
    pub creative_recommendations: Vec<&'static str>,
    pub performance_predictions: BTreeMap<&'static str, f64>,
}

pub fn campaign_optimizations() -> Vec<CampaignOptimization> {
    vec![
        CampaignOptimization {
            campaign_type: "Search",
            budget_allocation: BTreeMap::from([("search", 0.4), ("shopping", 0.3), ("pmax", 0.3)]),
            bid_strategy: "Target ROAS",
            targeting_optimization: json!({
                "match_types": ["exact", "phrase", "broad"],
                "negative_keywords": ["free", "cheap", "discount"],
                "audience_signals": ["in-market", "affinity", "custom"]
            }),
            creative_recommendations: vec![
                "Use AI-generated headlines for better relevance",
                "Include call-to-action in all ad copy",
                "Test different value propositions",
            ],
            performance_predictions: BTreeMap::from([
                ("expected_ctr", 0.035),
                ("expected_cvr", 0.025),
                ("expected_roas", 4.2),
            ]),
        },
        CampaignOptimization {
            campaign_type: "Performance Max",
            budget_allocation: BTreeMap::from([("search", 0.2), ("shopping", 0.4), ("pmax", 0.4)]),
            bid_strategy: "Maximize Conversion Value",
            targeting_optimization: json!({
                "audience_signals": ["customer_match", "similar_audiences", "in-market"],
                "asset_groups": 3,
                "creative_diversity": "high"
            }),
            creative_recommendations: vec![
                "Include video assets for better performance",
                "Use high-quality product images",
                "Test different creative formats",
            ],
            performance_predictions: BTreeMap::from([
                ("expected_ctr", 0.028),
                ("expected_cvr", 0.022),
                ("expected_roas", 5.1),
            ]),
        },
    ]
}
