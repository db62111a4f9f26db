//! Order amount to per-category breakdown.
//!
//! Each share is `amount * rate` in plain floating point. No rounding
//! happens here; [`crate::payout`] turns a distribution into integer
//! minor-unit payment lines.

use crm_types::{Company, DistributionMode, UserId};
use serde::Serialize;

use crate::rates::{DistributionRates, RateProvider};
use crate::{DistributionError, Result};

/// Breakdown for a legacy-mode company.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBreakdown {
    pub company: f64,
    pub admin: f64,
    /// Admin who accepted the order. The admin share is computed even when
    /// this is absent.
    pub admin_id: Option<UserId>,
    pub team: f64,
}

/// Breakdown for an owner-mode company.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBreakdown {
    pub company_owner: f64,
    pub company_owner_id: Option<UserId>,
    pub company: f64,
    pub admin: f64,
    pub admin_id: Option<UserId>,
    pub team: f64,
}

/// Per-category amounts, shaped by the distribution mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Breakdown {
    Legacy(LegacyBreakdown),
    Owner(OwnerBreakdown),
}

impl Breakdown {
    pub fn mode(&self) -> DistributionMode {
        match self {
            Breakdown::Legacy(_) => DistributionMode::Legacy,
            Breakdown::Owner(_) => DistributionMode::Owner,
        }
    }

    /// Sum of all monetary fields.
    pub fn allocated(&self) -> f64 {
        match self {
            Breakdown::Legacy(b) => b.company + b.admin + b.team,
            Breakdown::Owner(b) => b.company_owner + b.company + b.admin + b.team,
        }
    }

    pub fn company(&self) -> f64 {
        match self {
            Breakdown::Legacy(b) => b.company,
            Breakdown::Owner(b) => b.company,
        }
    }

    pub fn admin(&self) -> f64 {
        match self {
            Breakdown::Legacy(b) => b.admin,
            Breakdown::Owner(b) => b.admin,
        }
    }

    pub fn admin_id(&self) -> Option<&str> {
        match self {
            Breakdown::Legacy(b) => b.admin_id.as_deref(),
            Breakdown::Owner(b) => b.admin_id.as_deref(),
        }
    }

    pub fn team(&self) -> f64 {
        match self {
            Breakdown::Legacy(b) => b.team,
            Breakdown::Owner(b) => b.team,
        }
    }
}

/// Result of allocating one order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    mode: DistributionMode,
    total: f64,
    breakdown: Breakdown,
}

impl Distribution {
    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    /// The order amount that was allocated.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }
}

/// Allocate `order_amount` for `company` using the system default rates.
///
/// # Errors
///
/// - [`DistributionError::InvalidAmount`] if the amount is negative, NaN or infinite
pub fn allocate(order_amount: f64, company: &Company, admin_id: Option<&str>) -> Result<Distribution> {
    allocate_with(RateProvider::system(), order_amount, company, admin_id)
}

/// Allocate `order_amount` for `company` with rates from `provider`.
///
/// # Errors
///
/// - [`DistributionError::InvalidAmount`] if the amount is negative, NaN or infinite
pub fn allocate_with(
    provider: &RateProvider,
    order_amount: f64,
    company: &Company,
    admin_id: Option<&str>,
) -> Result<Distribution> {
    if !order_amount.is_finite() || order_amount < 0.0 {
        tracing::warn!(company = %company.id, amount = order_amount, "rejected order amount");
        return Err(DistributionError::InvalidAmount {
            amount: order_amount,
        });
    }

    let rates = provider.resolve(company);
    let distribution = split(order_amount, &rates, company, admin_id);

    tracing::debug!(
        company = %company.id,
        mode = %distribution.mode,
        total = order_amount,
        admin = admin_id.unwrap_or("-"),
        "order allocated"
    );

    Ok(distribution)
}

fn split(
    amount: f64,
    rates: &DistributionRates,
    company: &Company,
    admin_id: Option<&str>,
) -> Distribution {
    let admin_id = admin_id.map(str::to_owned);
    let breakdown = match (rates.mode, rates.company_owner) {
        (DistributionMode::Owner, Some(owner_rate)) => Breakdown::Owner(OwnerBreakdown {
            company_owner: amount * owner_rate,
            company_owner_id: company.company_owner.clone(),
            company: amount * rates.company,
            admin: amount * rates.admin,
            admin_id,
            team: amount * rates.team,
        }),
        _ => Breakdown::Legacy(LegacyBreakdown {
            company: amount * rates.company,
            admin: amount * rates.admin,
            admin_id,
            team: amount * rates.team,
        }),
    };

    Distribution {
        mode: breakdown.mode(),
        total: amount,
        breakdown,
    }
}
