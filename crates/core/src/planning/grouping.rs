use std::collections::BTreeMap;

use super::types::{AdGroup, CpcRange, MatchType};
use crate::keyword::{Intent, ScoredKeyword};

/// How many keywords of a category group get exact match.
const CATEGORY_EXACT_LIMIT: usize = 5;

/// Notes returned alongside grouped ad groups.
pub const GROUPING_NOTES: [&str; 3] = [
    "Match types assigned per intent bucket",
    "Intent-based grouping for better performance",
    "CPC ranges based on competition analysis",
];

/// Which keywords of a bucket get a match type.
#[derive(Debug, Clone, Copy)]
enum Coverage {
    None,
    All,
    First(usize),
}

impl Coverage {
    fn select(self, texts: &[String]) -> Vec<String> {
        match self {
            Coverage::None => Vec::new(),
            Coverage::All => texts.to_vec(),
            Coverage::First(n) => texts.iter().take(n).cloned().collect(),
        }
    }
}

struct Bucket {
    name: &'static str,
    theme: &'static str,
    intent: Intent,
    cpc_range: CpcRange,
    estimated_clicks: u64,
    estimated_conversions: f64,
    target_cpa: f64,
    exact: Coverage,
    phrase: Coverage,
    broad: Coverage,
}

const BUCKETS: [Bucket; 3] = [
    Bucket {
        name: "Brand Terms",
        theme: "Direct brand searches and branded keywords",
        intent: Intent::Navigational,
        cpc_range: CpcRange::new(1.5, 3.2),
        estimated_clicks: 2500,
        estimated_conversions: 50.0,
        target_cpa: 50.0,
        exact: Coverage::All,
        phrase: Coverage::All,
        broad: Coverage::None,
    },
    Bucket {
        name: "Category Terms",
        theme: "Product category and service-related keywords",
        intent: Intent::Commercial,
        cpc_range: CpcRange::new(3.2, 8.5),
        estimated_clicks: 1800,
        estimated_conversions: 36.0,
        target_cpa: 45.0,
        exact: Coverage::First(CATEGORY_EXACT_LIMIT),
        phrase: Coverage::All,
        broad: Coverage::All,
    },
    Bucket {
        name: "Informational Terms",
        theme: "Educational and informational queries",
        intent: Intent::Informational,
        cpc_range: CpcRange::new(1.2, 3.5),
        estimated_clicks: 1200,
        estimated_conversions: 24.0,
        target_cpa: 40.0,
        exact: Coverage::None,
        phrase: Coverage::All,
        broad: Coverage::All,
    },
];

/// Group keywords into brand, category and informational ad groups.
///
/// Empty buckets are omitted. Transactional keywords fall in no bucket.
pub fn group_keywords(keywords: &[ScoredKeyword]) -> Vec<AdGroup> {
    BUCKETS
        .iter()
        .filter_map(|bucket| {
            let members: Vec<ScoredKeyword> = keywords
                .iter()
                .filter(|k| k.intent() == bucket.intent)
                .cloned()
                .collect();
            if members.is_empty() {
                return None;
            }

            let texts: Vec<String> = members.iter().map(|k| k.text().to_string()).collect();
            let match_type_suggestions = BTreeMap::from([
                (MatchType::Exact, bucket.exact.select(&texts)),
                (MatchType::Phrase, bucket.phrase.select(&texts)),
                (MatchType::Broad, bucket.broad.select(&texts)),
            ]);

            Some(AdGroup {
                name: bucket.name.to_string(),
                theme: bucket.theme.to_string(),
                keywords: members,
                match_type_suggestions,
                cpc_range: bucket.cpc_range,
                estimated_clicks: bucket.estimated_clicks,
                estimated_conversions: bucket.estimated_conversions,
                target_cpa: bucket.target_cpa,
            })
        })
        .collect()
}
