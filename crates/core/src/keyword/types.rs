use serde::{Deserialize, Serialize};

use super::brand::hostname_tokens;
use crate::error::PlanError;

/// Monetary amounts from providers are carried as integer micros.
pub const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Convert a currency amount into micros, flooring negatives at zero.
pub fn to_micros(amount: f64) -> u64 {
    (amount.max(0.0) * MICROS_PER_UNIT).round() as u64
}

/// Convert micros back into a currency amount.
pub fn from_micros(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_UNIT
}

// ============================================================================
// Enumerations
// ============================================================================

/// Competition bucket as reported by (or derived from) a provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Competition {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Competition {
    /// Map a textual bucket name in any casing; anything unrecognised is Unknown.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown,
        }
    }

    /// Map a 0..1 competition index onto a bucket.
    pub fn from_index(index: f64) -> Self {
        if index > 0.66 {
            Self::High
        } else if index > 0.33 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }
}

/// Identifies which provider produced a keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    #[serde(rename = "dataforseo")]
    DataForSeo,
    #[serde(rename = "keyword_planner")]
    GoogleAds,
    #[serde(rename = "ms_ads_planner")]
    MicrosoftAds,
    #[serde(rename = "serpapi")]
    SerpApi,
    /// Keywords supplied directly by a caller rather than acquired.
    #[default]
    #[serde(other)]
    Manual,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataForSeo => "dataforseo",
            Self::GoogleAds => "keyword_planner",
            Self::MicrosoftAds => "ms_ads_planner",
            Self::SerpApi => "serpapi",
            Self::Manual => "manual",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DataForSeo => "DataForSEO",
            Self::GoogleAds => "Google Ads Keyword Planner",
            Self::MicrosoftAds => "Microsoft Ads Keyword Planner",
            Self::SerpApi => "SerpAPI discovery",
            Self::Manual => "Manual input",
        }
    }
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search intent of a keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Informational,
    Navigational,
    Transactional,
    #[default]
    #[serde(other)]
    Commercial,
}

// ============================================================================
// Acquisition query
// ============================================================================

/// Everything a provider needs to look up keywords for a set of seeds.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordQuery {
    seeds: Vec<String>,
    /// Geo target ids (Google/DataForSEO numbering, 2840 = United States).
    pub location_codes: Vec<u32>,
    /// ISO 639-1 language code.
    pub language: String,
    pub brand_url: Option<String>,
    pub competitor_url: Option<String>,
    /// Volume floor applied by providers that filter at the source.
    pub min_volume: u64,
}

impl KeywordQuery {
    pub const DEFAULT_LOCATION_CODE: u32 = 2840;
    pub const DEFAULT_LANGUAGE: &'static str = "en";
    pub const DEFAULT_MIN_VOLUME: u64 = 300;

    /// Build a query from caller seeds. Blank seeds are dropped; at least one
    /// seed must remain.
    pub fn new<I, S>(seeds: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: Vec<String> = seeds
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if seeds.is_empty() {
            return Err(PlanError::validation(
                "seed_keywords must contain at least one non-blank keyword",
            ));
        }

        Ok(Self {
            seeds,
            location_codes: vec![Self::DEFAULT_LOCATION_CODE],
            language: Self::DEFAULT_LANGUAGE.to_string(),
            brand_url: None,
            competitor_url: None,
            min_volume: Self::DEFAULT_MIN_VOLUME,
        })
    }

    pub fn with_locations(mut self, location_codes: Vec<u32>) -> Self {
        if !location_codes.is_empty() {
            self.location_codes = location_codes;
        }
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.language = language.trim().to_ascii_lowercase();
        }
        self
    }

    pub fn with_brand_url(mut self, url: Option<String>) -> Self {
        self.brand_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_competitor_url(mut self, url: Option<String>) -> Self {
        self.competitor_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_min_volume(mut self, min_volume: u64) -> Self {
        self.min_volume = min_volume;
        self
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// The first location code, used by providers that accept only one.
    pub fn primary_location(&self) -> u32 {
        self.location_codes
            .first()
            .copied()
            .unwrap_or(Self::DEFAULT_LOCATION_CODE)
    }

    /// Hostname tokens of the brand URL.
    pub fn brand_tokens(&self) -> Vec<String> {
        self.brand_url
            .as_deref()
            .map(hostname_tokens)
            .unwrap_or_default()
    }

    /// Hostname tokens of both the brand and the competitor URL.
    pub fn exclusion_tokens(&self) -> Vec<String> {
        let mut tokens = self.brand_tokens();
        if let Some(url) = self.competitor_url.as_deref() {
            for token in hostname_tokens(url) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }
        tokens
    }
}

// ============================================================================
// Keyword records
// ============================================================================

/// A provider-normalized keyword, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordRecord {
    text: String,
    monthly_volume: u64,
    competition: Competition,
    bid_low_micros: u64,
    bid_high_micros: u64,
    provider: ProviderTag,
}

impl KeywordRecord {
    /// Create a record with zero bids. Returns `None` for blank text.
    pub fn new(
        text: impl Into<String>,
        monthly_volume: u64,
        competition: Competition,
        provider: ProviderTag,
    ) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            monthly_volume,
            competition,
            bid_low_micros: 0,
            bid_high_micros: 0,
            provider,
        })
    }

    /// Attach a bid range; an inverted range is swapped.
    pub fn with_bids(mut self, low_micros: u64, high_micros: u64) -> Self {
        self.bid_low_micros = low_micros.min(high_micros);
        self.bid_high_micros = low_micros.max(high_micros);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn monthly_volume(&self) -> u64 {
        self.monthly_volume
    }

    pub fn competition(&self) -> Competition {
        self.competition
    }

    pub fn bid_low_micros(&self) -> u64 {
        self.bid_low_micros
    }

    pub fn bid_high_micros(&self) -> u64 {
        self.bid_high_micros
    }

    pub fn provider(&self) -> ProviderTag {
        self.provider
    }
}

/// A keyword with its scores and intent. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ScoredKeywordWire", try_from = "ScoredKeywordWire")]
pub struct ScoredKeyword {
    record: KeywordRecord,
    difficulty: f64,
    opportunity: f64,
    intent: Intent,
}

impl ScoredKeyword {
    pub fn new(record: KeywordRecord, difficulty: f64, opportunity: f64, intent: Intent) -> Self {
        Self {
            record,
            difficulty,
            opportunity,
            intent,
        }
    }

    pub fn record(&self) -> &KeywordRecord {
        &self.record
    }

    pub fn text(&self) -> &str {
        self.record.text()
    }

    pub fn monthly_volume(&self) -> u64 {
        self.record.monthly_volume()
    }

    pub fn competition(&self) -> Competition {
        self.record.competition()
    }

    pub fn source(&self) -> ProviderTag {
        self.record.provider()
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn opportunity(&self) -> f64 {
        self.opportunity
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }
}

/// JSON shape of a scored keyword as exchanged with API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScoredKeywordWire {
    keyword: String,
    #[serde(default)]
    avg_monthly_searches: u64,
    #[serde(default)]
    competition: Competition,
    #[serde(default)]
    top_of_page_bid_low: f64,
    #[serde(default)]
    top_of_page_bid_high: f64,
    #[serde(default)]
    source: ProviderTag,
    #[serde(default)]
    intent: Intent,
    #[serde(default)]
    difficulty_score: f64,
    #[serde(default)]
    opportunity_score: f64,
}

impl From<ScoredKeyword> for ScoredKeywordWire {
    fn from(k: ScoredKeyword) -> Self {
        Self {
            top_of_page_bid_low: from_micros(k.record.bid_low_micros),
            top_of_page_bid_high: from_micros(k.record.bid_high_micros),
            avg_monthly_searches: k.record.monthly_volume,
            competition: k.record.competition,
            source: k.record.provider,
            keyword: k.record.text,
            intent: k.intent,
            difficulty_score: k.difficulty,
            opportunity_score: k.opportunity,
        }
    }
}

impl TryFrom<ScoredKeywordWire> for ScoredKeyword {
    type Error = String;

    fn try_from(w: ScoredKeywordWire) -> Result<Self, Self::Error> {
        if !w.difficulty_score.is_finite() || !w.opportunity_score.is_finite() {
            return Err(format!("scores for '{}' must be finite numbers", w.keyword));
        }

        let record = KeywordRecord::new(w.keyword, w.avg_monthly_searches, w.competition, w.source)
            .ok_or_else(|| "keyword text must not be empty".to_string())?
            .with_bids(to_micros(w.top_of_page_bid_low), to_micros(w.top_of_page_bid_high));

        Ok(Self {
            record,
            difficulty: w.difficulty_score,
            opportunity: w.opportunity_score,
            intent: w.intent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rejects_blank_text() {
        assert!(KeywordRecord::new("   ", 10, Competition::Low, ProviderTag::GoogleAds).is_none());
    }

    #[test]
    fn test_record_swaps_inverted_bids() {
        let record = KeywordRecord::new("shoes", 10, Competition::Low, ProviderTag::GoogleAds)
            .unwrap()
            .with_bids(1_500_000, 800_000);
        assert_eq!(record.bid_low_micros(), 800_000);
        assert_eq!(record.bid_high_micros(), 1_500_000);
    }

    #[test]
    fn test_competition_from_index_thresholds() {
        assert_eq!(Competition::from_index(0.1), Competition::Low);
        assert_eq!(Competition::from_index(0.33), Competition::Low);
        assert_eq!(Competition::from_index(0.34), Competition::Medium);
        assert_eq!(Competition::from_index(0.66), Competition::Medium);
        assert_eq!(Competition::from_index(0.67), Competition::High);
    }

    #[test]
    fn test_competition_from_label_any_case() {
        assert_eq!(Competition::from_label("HIGH"), Competition::High);
        assert_eq!(Competition::from_label("medium"), Competition::Medium);
        assert_eq!(Competition::from_label("n/a"), Competition::Unknown);
    }

    #[test]
    fn test_query_drops_blank_seeds() {
        let query = KeywordQuery::new(["  running shoes ", "", "  "]).unwrap();
        assert_eq!(query.seeds(), ["running shoes".to_string()]);
    }

    #[test]
    fn test_query_requires_a_seed() {
        let result = KeywordQuery::new(Vec::<String>::new());
        assert!(matches!(result, Err(PlanError::Validation(_))));
    }

    #[test]
    fn test_query_exclusion_tokens_merge_brand_and_competitor() {
        let query = KeywordQuery::new(["shoes"])
            .unwrap()
            .with_brand_url(Some("https://www.acme.com".to_string()))
            .with_competitor_url(Some("https://shop.rival.net/path".to_string()));
        assert_eq!(query.brand_tokens(), vec!["acme"]);
        assert_eq!(query.exclusion_tokens(), vec!["acme", "shop", "rival"]);
    }

    #[test]
    fn test_scored_keyword_wire_format() {
        let record = KeywordRecord::new(
            "running shoes",
            12000,
            Competition::Medium,
            ProviderTag::GoogleAds,
        )
        .unwrap()
        .with_bids(800_000, 1_500_000);
        let keyword = ScoredKeyword::new(record, 0.5, 0.57, Intent::Commercial);

        let json = serde_json::to_value(&keyword).unwrap();
        assert_eq!(json["keyword"], "running shoes");
        assert_eq!(json["avg_monthly_searches"], 12000);
        assert_eq!(json["competition"], "Medium");
        assert_eq!(json["top_of_page_bid_low"], 0.8);
        assert_eq!(json["top_of_page_bid_high"], 1.5);
        assert_eq!(json["source"], "keyword_planner");
        assert_eq!(json["intent"], "commercial");
        assert_eq!(json["opportunity_score"], 0.57);

        let back: ScoredKeyword = serde_json::from_value(json).unwrap();
        assert_eq!(back, keyword);
    }

    #[test]
    fn test_scored_keyword_accepts_sparse_input() {
        let keyword: ScoredKeyword = serde_json::from_value(serde_json::json!({
            "keyword": "brand shoes",
            "source": "seed",
            "competition": "high",
            "intent": "navigational"
        }))
        .unwrap();

        assert_eq!(keyword.source(), ProviderTag::Manual);
        assert_eq!(keyword.competition(), Competition::High);
        assert_eq!(keyword.intent(), Intent::Navigational);
        assert_eq!(keyword.monthly_volume(), 0);
    }

    #[test]
    fn test_scored_keyword_rejects_empty_text() {
        let result: Result<ScoredKeyword, _> =
            serde_json::from_value(serde_json::json!({ "keyword": "" }));
        assert!(result.is_err());
    }
}
