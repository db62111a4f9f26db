//! `allocate`: distribute one order.

use crm_distribution::allocator::allocate_with;
use crm_distribution::payout::{plan_payouts, RoundingPolicy};
use crm_distribution::RateProvider;
use crm_types::{Company, UserId};
use serde::Deserialize;

use super::Result;

/// Input of the `allocate` command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateRequest {
    pub company: Company,
    pub order_amount: f64,
    #[serde(default)]
    pub admin_id: Option<UserId>,
}

/// Allocate the order in `input`. With `payouts`, also plan the rounded
/// payment lines.
pub fn run(provider: &RateProvider, rounding: &RoundingPolicy, input: &str, payouts: bool) -> Result {
    let request: AllocateRequest = serde_json::from_str(input)?;
    let distribution = allocate_with(
        provider,
        request.order_amount,
        &request.company,
        request.admin_id.as_deref(),
    )?;

    if !payouts {
        return Ok(serde_json::to_value(distribution)?);
    }

    let rates = provider.resolve(&request.company);
    let plan = plan_payouts(&distribution, &rates, &request.company, rounding)?;
    Ok(serde_json::json!({
        "distribution": distribution,
        "payouts": plan,
    }))
}
