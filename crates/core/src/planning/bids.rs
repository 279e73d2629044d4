use tracing::debug;

use super::types::{BidPlan, BidRequest, BidSummary, OptimizationStrategy};
use crate::error::PlanError;

/// Revenue per conversion assumed for the ROAS estimate, as a multiple of CPA.
const REVENUE_CPA_MULTIPLE: f64 = 4.0;

fn validate(request: &BidRequest) -> Result<(), PlanError> {
    for (channel, budget) in &request.budgets {
        if !budget.is_finite() || *budget < 0.0 {
            return Err(PlanError::validation(format!(
                "budget '{}' must be a non-negative number",
                channel
            )));
        }
    }

    let rate = request.conversion_rate;
    if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
        return Err(PlanError::validation(
            "conversion_rate must be greater than 0 and at most 1",
        ));
    }

    if let Some(roas) = request.target_roas {
        if !roas.is_finite() || roas < 0.0 {
            return Err(PlanError::validation(
                "target_roas must be a non-negative number",
            ));
        }
    }

    for group in &request.ad_groups {
        if !group.cpc_range.is_valid() {
            return Err(PlanError::validation(format!(
                "ad group '{}' has an invalid cpc_range (low must be <= high)",
                group.name
            )));
        }
        if !group.estimated_conversions.is_finite() || group.estimated_conversions < 0.0 {
            return Err(PlanError::validation(format!(
                "ad group '{}' has invalid estimated_conversions",
                group.name
            )));
        }
    }

    Ok(())
}

fn ensure_finite(value: f64, what: &str) -> Result<f64, PlanError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PlanError::stage(
            "calculate_bids",
            format!("{} is not a finite number", what),
        ))
    }
}

/// Derive a target CPA from the total budget and recommend a bid per ad group.
///
/// Total conversions are floored at 1 so an empty plan divides safely.
pub fn calculate_bids(request: &BidRequest) -> Result<BidSummary, PlanError> {
    validate(request)?;

    let total_budget = ensure_finite(request.budgets.values().sum(), "total_budget")?;
    let conversions: f64 = request
        .ad_groups
        .iter()
        .map(|g| g.estimated_conversions)
        .sum();
    let target_cpa = ensure_finite(total_budget / conversions.max(1.0), "target_cpa")?;
    let target_cpc = ensure_finite(target_cpa * request.conversion_rate, "target_cpc")?;

    let bid_recommendations: Vec<BidPlan> = request
        .ad_groups
        .iter()
        .map(|group| BidPlan {
            ad_group_name: group.name.clone(),
            target_cpa,
            target_cpc,
            recommended_bid: group.cpc_range.clamp(target_cpc),
            bid_range: group.cpc_range,
            estimated_clicks: group.estimated_clicks,
            estimated_conversions: group.estimated_conversions,
        })
        .collect();

    let expected_roas = if total_budget > 0.0 {
        let revenue: f64 = request
            .ad_groups
            .iter()
            .map(|g| g.estimated_conversions * target_cpa * REVENUE_CPA_MULTIPLE)
            .sum();
        ensure_finite(revenue / total_budget, "expected_roas")?
    } else {
        0.0
    };

    debug!(
        total_budget,
        target_cpa,
        expected_roas,
        groups = bid_recommendations.len(),
        "Calculated bids"
    );

    Ok(BidSummary {
        budget_allocation: request.budgets.clone(),
        total_budget,
        target_cpa,
        expected_roas,
        bid_recommendations,
        optimization_strategy: strategy(request),
    })
}

fn strategy(request: &BidRequest) -> OptimizationStrategy {
    let mut notes = vec![format!(
        "Bids optimized for {:.1}% conversion rate",
        request.conversion_rate * 100.0
    )];
    let bid_strategy = match request.target_roas {
        Some(roas) => {
            notes.push(format!("ROAS target: {:.1}x", roas));
            "Target ROAS"
        }
        None => "Target CPA",
    };
    notes.push("Smart bidding recommended for all campaigns".to_string());

    OptimizationStrategy {
        conversion_rate: request.conversion_rate,
        target_roas: request.target_roas,
        bid_strategy: bid_strategy.to_string(),
        optimization_notes: notes,
    }
}
