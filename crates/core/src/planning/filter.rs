use tracing::debug;

use super::types::{FilterCriteria, FilterOutcome};
use crate::error::PlanError;
use crate::keyword::{Competition, ScoredKeyword};

/// Keep keywords matching every predicate, highest opportunity first.
///
/// Ties keep their input order.
pub fn filter_keywords(
    keywords: Vec<ScoredKeyword>,
    criteria: &FilterCriteria,
) -> Result<FilterOutcome, PlanError> {
    if !criteria.min_opportunity_score.is_finite() {
        return Err(PlanError::validation(
            "min_opportunity_score must be a finite number",
        ));
    }

    let original_count = keywords.len();
    let mut kept: Vec<ScoredKeyword> = keywords
        .into_iter()
        .filter(|kw| retains(kw, criteria))
        .collect();
    kept.sort_by(|a, b| b.opportunity().total_cmp(&a.opportunity()));

    debug!(original_count, kept = kept.len(), "Filtered keywords");

    Ok(FilterOutcome {
        original_count,
        filtered_count: kept.len(),
        keywords: kept,
        filter_criteria: criteria.clone(),
    })
}

fn retains(keyword: &ScoredKeyword, criteria: &FilterCriteria) -> bool {
    if keyword.monthly_volume() < criteria.min_search_volume {
        return false;
    }

    // Only a ceiling below High excludes anything, and then only High itself.
    let ceiling_below_high = criteria
        .max_competition
        .is_some_and(|c| c != Competition::High);
    if ceiling_below_high && keyword.competition() == Competition::High {
        return false;
    }

    if keyword.opportunity() < criteria.min_opportunity_score {
        return false;
    }

    !(criteria.exclude_branded && keyword.text().to_lowercase().contains("brand"))
}
