use std::collections::BTreeMap;

use super::types::{PMaxTheme, ThemeCategory};
use crate::keyword::{contains_term, words, ScoredKeyword};

/// Keywords kept per theme.
const MAX_THEME_KEYWORDS: usize = 30;
/// Keywords reused as headline suggestions.
const MAX_HEADLINES: usize = 5;

const DEMOGRAPHIC_TOKENS: &[&str] = &["for men", "for women", "kids", "senior", "student"];
const SEASONAL_TOKENS: &[&str] = &[
    "winter",
    "summer",
    "spring",
    "fall",
    "black friday",
    "cyber monday",
];
const USE_CASE_TOKENS: &[&str] = &["best", "near me", "how to", "vs", "review", "ideas", "tips"];

struct ThemeProfile {
    title: &'static str,
    description: &'static str,
    target_audience: &'static str,
    expected_ctr: f64,
}

fn profile(category: ThemeCategory) -> ThemeProfile {
    match category {
        ThemeCategory::Demographic => ThemeProfile {
            title: "Audience Segments",
            description: "Keywords naming a specific audience or demographic",
            target_audience: "Demographic segments named in the search",
            expected_ctr: 0.028,
        },
        ThemeCategory::Seasonal => ThemeProfile {
            title: "Seasonal Promotions",
            description: "Seasonal and holiday-driven searches",
            target_audience: "Seasonal and event-driven shoppers",
            expected_ctr: 0.04,
        },
        ThemeCategory::UseCase => ThemeProfile {
            title: "Use Cases and Comparisons",
            description: "Comparison, review and local-intent searches",
            target_audience: "Researchers comparing options",
            expected_ctr: 0.03,
        },
        ThemeCategory::Product => ThemeProfile {
            title: "Core Products",
            description: "Product and category searches",
            target_audience: "In-market shoppers",
            expected_ctr: 0.035,
        },
    }
}

fn tokens(category: ThemeCategory) -> &'static [&'static str] {
    match category {
        ThemeCategory::Demographic => DEMOGRAPHIC_TOKENS,
        ThemeCategory::Seasonal => SEASONAL_TOKENS,
        ThemeCategory::UseCase => USE_CASE_TOKENS,
        ThemeCategory::Product => &[],
    }
}

/// First category in priority order whose tokens appear as whole words,
/// allowing a plural or possessive ending.
pub fn categorize(text: &str) -> ThemeCategory {
    let w = words(&text.to_lowercase());
    ThemeCategory::PRIORITY
        .into_iter()
        .find(|&category| tokens(category).iter().any(|t| contains_term(&w, t)))
        .unwrap_or(ThemeCategory::Product)
}

#[derive(Default)]
struct Accumulator {
    keywords: Vec<String>,
    impressions: u64,
}

/// Bucket keywords into Performance-Max themes, one per non-empty category.
pub fn bucketize(keywords: &[ScoredKeyword]) -> Vec<PMaxTheme> {
    let mut buckets: BTreeMap<&'static str, Accumulator> = BTreeMap::new();
    for kw in keywords {
        let entry = buckets.entry(categorize(kw.text()).as_str()).or_default();
        entry.impressions = entry.impressions.saturating_add(kw.monthly_volume());
        if entry.keywords.len() < MAX_THEME_KEYWORDS {
            entry.keywords.push(kw.text().to_string());
        }
    }

    ThemeCategory::PRIORITY
        .into_iter()
        .filter_map(|category| {
            let acc = buckets.remove(category.as_str())?;
            let p = profile(category);
            let headlines: Vec<String> = acc.keywords.iter().take(MAX_HEADLINES).cloned().collect();
            let asset_suggestions = BTreeMap::from([
                ("headlines".to_string(), headlines),
                ("descriptions".to_string(), Vec::new()),
                ("images".to_string(), Vec::new()),
            ]);

            Some(PMaxTheme {
                title: p.title.to_string(),
                category,
                description: p.description.to_string(),
                keywords: acc.keywords,
                target_audience: p.target_audience.to_string(),
                estimated_impressions: acc.impressions,
                expected_ctr: p.expected_ctr,
                asset_suggestions,
            })
        })
        .collect()
}
