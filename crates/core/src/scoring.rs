//! Keyword scoring.
//!
//! Difficulty is a fixed lookup on the competition bucket. Opportunity blends
//! normalized volume and inverse difficulty 7:3, so reachable traffic counts
//! for more than an empty auction:
//!
//! ```text
//! vol_norm    = min(1, volume / 20000)
//! opportunity = round3(clamp01(0.7 * vol_norm + 0.3 * (1 - difficulty)))
//! ```

use crate::keyword::{
    contains_phrase, contains_term, is_brand_label, words, Competition, Intent, KeywordQuery,
    KeywordRecord, ScoredKeyword,
};

/// Volume at which the volume component saturates.
pub const VOLUME_SATURATION: f64 = 20_000.0;

const VOLUME_WEIGHT: f64 = 0.7;
const EASE_WEIGHT: f64 = 0.3;

/// Markers of research-stage queries.
const INFORMATIONAL_MARKERS: &[&str] = &[
    "how to", "how do", "how does", "what", "why", "when", "who", "guide", "tutorial",
    "tips", "ideas", "learn", "meaning", "definition", "examples",
];

/// Difficulty for a competition bucket.
pub fn difficulty(competition: Competition) -> f64 {
    match competition {
        Competition::Low => 0.2,
        Competition::Medium => 0.5,
        Competition::High => 0.8,
        Competition::Unknown => 0.5,
    }
}

/// Opportunity for a monthly volume and a difficulty.
pub fn opportunity(monthly_volume: u64, difficulty: f64) -> f64 {
    let vol_norm = (monthly_volume as f64 / VOLUME_SATURATION).min(1.0);
    let raw = VOLUME_WEIGHT * vol_norm + EASE_WEIGHT * (1.0 - difficulty);
    round3(raw.clamp(0.0, 1.0))
}

/// `(difficulty, opportunity)` for a record.
pub fn score(record: &KeywordRecord) -> (f64, f64) {
    let d = difficulty(record.competition());
    (d, opportunity(record.monthly_volume(), d))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Scores records and assigns a lexical intent.
///
/// Navigational intent needs to know the brand, so a scorer is built per
/// request from the brand URL's hostname tokens. Registry labels and very
/// short labels are dropped; hyphenated labels match as multi-word phrases.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    brand_terms: Vec<String>,
}

impl Scorer {
    pub fn new(brand_tokens: Vec<String>) -> Self {
        Self {
            brand_terms: brand_tokens
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| is_brand_label(t))
                .map(|t| t.replace('-', " "))
                .collect(),
        }
    }

    pub fn for_query(query: &KeywordQuery) -> Self {
        Self::new(query.brand_tokens())
    }

    /// Navigational if the keyword names the brand, informational if it reads
    /// like a question or research query, commercial otherwise.
    pub fn classify_intent(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        let w = words(&lowered);
        if self.brand_terms.iter().any(|t| contains_term(&w, t)) {
            return Intent::Navigational;
        }

        if lowered.trim_end().ends_with('?')
            || INFORMATIONAL_MARKERS.iter().any(|m| contains_phrase(&w, m))
        {
            return Intent::Informational;
        }

        Intent::Commercial
    }

    pub fn score_keyword(&self, record: KeywordRecord) -> ScoredKeyword {
        let (d, o) = score(&record);
        let intent = self.classify_intent(record.text());
        ScoredKeyword::new(record, d, o, intent)
    }

    pub fn score_all(&self, records: Vec<KeywordRecord>) -> Vec<ScoredKeyword> {
        records.into_iter().map(|r| self.score_keyword(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::ProviderTag;

    fn record(text: &str, volume: u64, competition: Competition) -> KeywordRecord {
        KeywordRecord::new(text, volume, competition, ProviderTag::GoogleAds).unwrap()
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(difficulty(Competition::Low), 0.2);
        assert_eq!(difficulty(Competition::Medium), 0.5);
        assert_eq!(difficulty(Competition::High), 0.8);
        assert_eq!(difficulty(Competition::Unknown), 0.5);
    }

    #[test]
    fn test_running_shoes_scenario() {
        let (d, o) = score(&record("running shoes", 12_000, Competition::Medium));
        assert_eq!(d, 0.5);
        assert_eq!(o, 0.57);
    }

    #[test]
    fn test_volume_saturates() {
        let (_, at_cap) = score(&record("a", 20_000, Competition::Low));
        let (_, above_cap) = score(&record("a", 5_000_000, Competition::Low));
        assert_eq!(at_cap, above_cap);
        assert_eq!(at_cap, 0.94);
    }

    #[test]
    fn test_zero_volume_is_only_ease() {
        let (_, o) = score(&record("obscure", 0, Competition::Low));
        assert_eq!(o, 0.24);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        for competition in [
            Competition::Low,
            Competition::Medium,
            Competition::High,
            Competition::Unknown,
        ] {
            for volume in [0, 1, 150, 9_999, 20_000, 20_001, u64::MAX] {
                let (d, o) = score(&record("kw", volume, competition));
                assert!((0.0..=1.0).contains(&d));
                assert!((0.0..=1.0).contains(&o), "{competition:?}/{volume} -> {o}");
            }
        }
    }

    #[test]
    fn test_difficulty_ignores_volume() {
        let (d1, _) = score(&record("kw", 10, Competition::High));
        let (d2, _) = score(&record("kw", 90_000, Competition::High));
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_classify_intent() {
        let scorer = Scorer::new(vec!["nike".to_string()]);
        assert_eq!(scorer.classify_intent("Nike Pegasus 41"), Intent::Navigational);
        assert_eq!(scorer.classify_intent("how to lace running shoes"), Intent::Informational);
        assert_eq!(scorer.classify_intent("are running shoes worth it?"), Intent::Informational);
        assert_eq!(scorer.classify_intent("running shoes sale"), Intent::Commercial);
    }

    #[test]
    fn test_brand_matches_whole_words_only() {
        let query = KeywordQuery::new(["drills"])
            .unwrap()
            .with_brand_url(Some("https://acme.co.uk".to_string()));
        let scorer = Scorer::for_query(&query);
        assert_eq!(scorer.classify_intent("cordless drill"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("discount trainers"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("cotton socks"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("acmeville hotels"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("acme drill bits"), Intent::Navigational);
        assert_eq!(scorer.classify_intent("acme's returns policy"), Intent::Navigational);
    }

    #[test]
    fn test_storefront_subdomain_is_not_brand() {
        let scorer = Scorer::new(crate::keyword::hostname_tokens("https://shop.acme-tools.com"));
        assert_eq!(scorer.classify_intent("shopping bags"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("shop bags"), Intent::Commercial);
        assert_eq!(scorer.classify_intent("acme tools drill"), Intent::Navigational);
    }

    #[test]
    fn test_classify_intent_without_brand() {
        let scorer = Scorer::default();
        assert_eq!(scorer.classify_intent("nike pegasus"), Intent::Commercial);
    }

    #[test]
    fn test_score_keyword_keeps_source() {
        let scored =
            Scorer::default().score_keyword(record("trail shoes", 4_000, Competition::High));
        assert_eq!(scored.source(), ProviderTag::GoogleAds);
        assert_eq!(scored.difficulty(), 0.8);
        assert_eq!(scored.opportunity(), 0.2);
    }
}
