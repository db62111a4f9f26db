//! Rate set checks for company settings.
//!
//! Used before a new set of overrides is saved to a company. The allocation
//! path never calls into this module, so a bad stored configuration cannot
//! block an order from being distributed.

use crm_types::RateOverrides;

use crate::{DistributionError, Result};

/// Allowed distance of the top-level rate total from 1.0.
pub const RATE_SUM_TOLERANCE: f64 = 1e-3;

// Keeps sums such as 0.2 + 0.1 + 0.699 on the valid side of the boundary.
const FLOAT_SLACK: f64 = 1e-9;

/// Top-level total of a candidate rate set.
///
/// Includes the owner rate when present. A missing company, admin or team
/// rate counts as NaN, so the total is NaN.
pub fn rate_set_total(rates: &RateOverrides) -> f64 {
    let base = rates.company.unwrap_or(f64::NAN)
        + rates.admin.unwrap_or(f64::NAN)
        + rates.team.unwrap_or(f64::NAN);
    match rates.company_owner {
        Some(owner) => owner + base,
        None => base,
    }
}

/// Whether the top-level rates sum to 1.0 within [`RATE_SUM_TOLERANCE`].
///
/// Owner-mode rule applies when `company_owner` is set, legacy rule
/// otherwise. Never panics; any NaN makes the set invalid.
pub fn is_valid_rate_set(rates: &RateOverrides) -> bool {
    within_tolerance(rate_set_total(rates))
}

fn within_tolerance(total: f64) -> bool {
    (total - 1.0).abs() <= RATE_SUM_TOLERANCE + FLOAT_SLACK
}

/// Full settings check: every present rate in `[0, 1]` and the top-level
/// total within tolerance of 1.0.
///
/// # Errors
///
/// - [`DistributionError::RateOutOfRange`] if a rate is negative, above 1 or NaN
/// - [`DistributionError::InvalidRateTotal`] if the total is off
pub fn validate_rate_set(rates: &RateOverrides) -> Result<()> {
    let fields = [
        ("companyOwner", rates.company_owner),
        ("company", rates.company),
        ("admin", rates.admin),
        ("team", rates.team),
        ("teamLead", rates.team_lead),
        ("workers", rates.workers),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            if !(0.0..=1.0).contains(&value) {
                tracing::warn!(field, value, "rate out of range");
                return Err(DistributionError::RateOutOfRange { field, value });
            }
        }
    }

    let total = rate_set_total(rates);
    if !within_tolerance(total) {
        tracing::warn!(total, "rate set rejected");
        return Err(DistributionError::InvalidRateTotal { total });
    }
    Ok(())
}
