//! Breakdown to rounded payment lines.
//!
//! A [`Distribution`] carries floating-point amounts. Payment records are
//! stored in integer minor units, so each share is scaled by
//! [`RoundingPolicy::minor_units_per_unit`] and rounded half-to-even. The
//! team pool is split into a team lead line (order total times the team
//! lead rate) and a worker line holding the rest of the pool.
//!
//! The rounded total is computed the same way. Whatever the per-line
//! rounding leaves over goes to the worker line, so the lines always add
//! up to [`PayoutPlan::total_minor`]. The worker line also absorbs the gap
//! left by rates that are off 1.0 by no more than
//! [`RATE_SUM_TOLERANCE`], the same slack the settings check allows.

use crm_types::{Company, DistributionMode, PaymentType, UserId};
use serde::{Deserialize, Serialize};

use crate::allocator::{Breakdown, Distribution};
use crate::rates::DistributionRates;
use crate::validator::RATE_SUM_TOLERANCE;
use crate::{DistributionError, Result};

/// Largest magnitude representable exactly as both `f64` and `i64`.
const MAX_EXACT_MINOR: f64 = 9_007_199_254_740_992.0; // 2^53

/// How monetary amounts map to integer minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Minor units per currency unit: 100 for cents, 1 for whole units.
    pub minor_units_per_unit: u32,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            minor_units_per_unit: 100,
        }
    }
}

impl RoundingPolicy {
    /// Convert an amount to minor units, rounding half-to-even.
    ///
    /// # Errors
    ///
    /// - [`DistributionError::Overflow`] if the scaled amount is not finite
    ///   or too large to represent exactly
    pub fn to_minor(&self, amount: f64) -> Result<i64> {
        let scaled = (amount * f64::from(self.minor_units_per_unit)).round_ties_even();
        if !scaled.is_finite() || scaled.abs() > MAX_EXACT_MINOR {
            return Err(DistributionError::Overflow);
        }
        Ok(scaled as i64)
    }
}

/// One payment record to be created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutLine {
    pub payment_type: PaymentType,
    /// Who gets paid. `None` for the admin line when no admin accepted the
    /// order, and for team lines, whose members the caller assigns.
    pub beneficiary: Option<UserId>,
    pub amount_minor: i64,
}

/// Payment lines for one distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutPlan {
    pub mode: DistributionMode,
    pub total_minor: i64,
    pub minor_units_per_unit: u32,
    pub lines: Vec<PayoutLine>,
}

impl PayoutPlan {
    /// Total of all lines of the given type.
    pub fn amount_of(&self, kind: PaymentType) -> i64 {
        self.lines
            .iter()
            .filter(|line| line.payment_type == kind)
            .map(|line| line.amount_minor)
            .sum()
    }

    pub fn line(&self, kind: PaymentType) -> Option<&PayoutLine> {
        self.lines.iter().find(|line| line.payment_type == kind)
    }
}

/// Build the payment lines for `distribution`.
///
/// `rates` must be the rates the distribution was computed with; only the
/// team lead rate is read from it.
///
/// # Errors
///
/// - [`DistributionError::ModeMismatch`] if `rates` and `distribution` disagree on mode
/// - [`DistributionError::Overflow`] if an amount does not fit in minor units
/// - [`DistributionError::UnbalancedPayout`] if the shares do not add up to the total
/// - [`DistributionError::NegativeShare`] if any line comes out negative
pub fn plan_payouts(
    distribution: &Distribution,
    rates: &DistributionRates,
    company: &Company,
    policy: &RoundingPolicy,
) -> Result<PayoutPlan> {
    if distribution.mode() != rates.mode {
        return Err(DistributionError::ModeMismatch {
            distribution: distribution.mode(),
            rates: rates.mode,
        });
    }

    let breakdown = distribution.breakdown();
    let total_minor = policy.to_minor(distribution.total())?;

    let mut lines = Vec::with_capacity(5);
    lines.push(PayoutLine {
        payment_type: PaymentType::CompanyBudget,
        beneficiary: Some(company.id.clone()),
        amount_minor: policy.to_minor(breakdown.company())?,
    });
    if let Breakdown::Owner(owner) = breakdown {
        lines.push(PayoutLine {
            payment_type: PaymentType::CompanyOwnerShare,
            beneficiary: owner.company_owner_id.clone(),
            amount_minor: policy.to_minor(owner.company_owner)?,
        });
    }
    lines.push(PayoutLine {
        payment_type: PaymentType::AdminShare,
        beneficiary: breakdown.admin_id().map(str::to_owned),
        amount_minor: policy.to_minor(breakdown.admin())?,
    });

    let team_minor = policy.to_minor(breakdown.team())?;
    let team_lead_minor = policy.to_minor(distribution.total() * rates.team_lead)?;
    lines.push(PayoutLine {
        payment_type: PaymentType::TeamLeadShare,
        beneficiary: None,
        amount_minor: team_lead_minor,
    });

    if let Some(line) = lines.iter().find(|line| line.amount_minor < 0) {
        tracing::warn!(kind = %line.payment_type, amount_minor = line.amount_minor, "negative payout line");
        return Err(DistributionError::NegativeShare {
            kind: line.payment_type,
        });
    }

    let assigned = lines
        .iter()
        .try_fold(team_minor, |acc, line| acc.checked_add(line.amount_minor))
        .and_then(|sum| sum.checked_sub(team_lead_minor))
        .ok_or(DistributionError::Overflow)?;
    let residue = total_minor
        .checked_sub(assigned)
        .ok_or(DistributionError::Overflow)?;
    // One unit of rounding per line, plus the rate total tolerance.
    let rate_slack = (RATE_SUM_TOLERANCE * total_minor.unsigned_abs() as f64).ceil() as u64;
    if residue.unsigned_abs() > (lines.len() + 1) as u64 + rate_slack {
        tracing::warn!(total_minor, assigned, residue, "payout lines do not balance");
        return Err(DistributionError::UnbalancedPayout { residue });
    }

    let worker_minor = team_minor
        .checked_sub(team_lead_minor)
        .and_then(|v| v.checked_add(residue))
        .ok_or(DistributionError::Overflow)?;
    if worker_minor < 0 {
        return Err(DistributionError::NegativeShare {
            kind: PaymentType::WorkerShare,
        });
    }
    lines.push(PayoutLine {
        payment_type: PaymentType::WorkerShare,
        beneficiary: None,
        amount_minor: worker_minor,
    });

    tracing::info!(
        company = %company.id,
        mode = %distribution.mode(),
        total_minor,
        lines = lines.len(),
        residue,
        "payout plan built"
    );

    Ok(PayoutPlan {
        mode: distribution.mode(),
        total_minor,
        minor_units_per_unit: policy.minor_units_per_unit,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::allocate;
    use crate::rates::resolve_rates;
    use crm_types::RateOverrides;

    fn owner_company() -> Company {
        Company::new("c-owner").with_owner("owner1").with_rates(RateOverrides {
            company_owner: Some(0.10),
            ..Default::default()
        })
    }

    fn plan(amount: f64, company: &Company, admin: Option<&str>, policy: RoundingPolicy) -> PayoutPlan {
        let distribution = allocate(amount, company, admin).expect("allocate");
        let rates = resolve_rates(company);
        plan_payouts(&distribution, &rates, company, &policy).expect("plan")
    }

    fn lines_sum(plan: &PayoutPlan) -> i64 {
        plan.lines.iter().map(|line| line.amount_minor).sum()
    }

    #[test]
    fn test_round_half_even() {
        let policy = RoundingPolicy {
            minor_units_per_unit: 1,
        };
        assert_eq!(policy.to_minor(0.5).expect("round"), 0);
        assert_eq!(policy.to_minor(1.5).expect("round"), 2);
        assert_eq!(policy.to_minor(2.5).expect("round"), 2);
        assert_eq!(policy.to_minor(2.6).expect("round"), 3);
    }

    #[test]
    fn test_to_minor_overflow() {
        let policy = RoundingPolicy::default();
        assert!(policy.to_minor(f64::INFINITY).is_err());
        assert!(policy.to_minor(1e300).is_err());
    }

    #[test]
    fn test_legacy_plan_10000() {
        let company = Company::new("c1");
        let plan = plan(10_000.0, &company, Some("admin1"), RoundingPolicy::default());
        assert_eq!(plan.mode, DistributionMode::Legacy);
        assert_eq!(plan.total_minor, 1_000_000);
        assert_eq!(plan.amount_of(PaymentType::CompanyBudget), 200_000);
        assert_eq!(plan.amount_of(PaymentType::AdminShare), 100_000);
        assert_eq!(plan.amount_of(PaymentType::TeamLeadShare), 100_000);
        assert_eq!(plan.amount_of(PaymentType::WorkerShare), 600_000);
        assert!(plan.line(PaymentType::CompanyOwnerShare).is_none());
        assert_eq!(
            plan.line(PaymentType::CompanyBudget).and_then(|l| l.beneficiary.as_deref()),
            Some("c1")
        );
        assert_eq!(lines_sum(&plan), plan.total_minor);
    }

    #[test]
    fn test_owner_plan_10000() {
        let company = owner_company();
        let plan = plan(10_000.0, &company, Some("admin1"), RoundingPolicy::default());
        assert_eq!(plan.mode, DistributionMode::Owner);
        assert_eq!(plan.lines.len(), 5);
        let owner = plan.line(PaymentType::CompanyOwnerShare).expect("owner line");
        assert_eq!(owner.amount_minor, 100_000);
        assert_eq!(owner.beneficiary.as_deref(), Some("owner1"));
        assert_eq!(
            plan.line(PaymentType::AdminShare).and_then(|l| l.beneficiary.as_deref()),
            Some("admin1")
        );
        assert_eq!(lines_sum(&plan), plan.total_minor);
    }

    #[test]
    fn test_rounding_residue_goes_to_workers() {
        let policy = RoundingPolicy {
            minor_units_per_unit: 1,
        };
        for amount in [1.0, 3.0, 7.0, 33.0, 101.0, 999.0, 12_345.0] {
            for company in [Company::new("c"), owner_company()] {
                let plan = plan(amount, &company, None, policy);
                assert_eq!(lines_sum(&plan), plan.total_minor, "amount {amount}");
                assert!(plan.lines.iter().all(|l| l.amount_minor >= 0));
            }
        }
    }

    #[test]
    fn test_cents_conservation() {
        for amount in [0.01, 0.05, 19.99, 1_234.56, 99_999.99] {
            let plan = plan(amount, &owner_company(), Some("a"), RoundingPolicy::default());
            assert_eq!(lines_sum(&plan), plan.total_minor, "amount {amount}");
        }
    }

    #[test]
    fn test_unbalanced_rates_rejected() {
        let company = Company::new("c1").with_owner("o").with_rates(RateOverrides {
            company_owner: Some(0.5),
            company: Some(0.5),
            ..Default::default()
        });
        let distribution = allocate(1_000.0, &company, None).expect("allocate");
        let rates = resolve_rates(&company);
        let err = plan_payouts(&distribution, &rates, &company, &RoundingPolicy::default())
            .expect_err("unbalanced");
        assert!(matches!(err, DistributionError::UnbalancedPayout { .. }));
    }

    #[test]
    fn test_negative_worker_share_rejected() {
        let company = Company::new("c1").with_owner("o").with_rates(RateOverrides {
            company_owner: Some(0.1),
            team_lead: Some(0.9),
            ..Default::default()
        });
        let distribution = allocate(1_000.0, &company, None).expect("allocate");
        let rates = resolve_rates(&company);
        let err = plan_payouts(&distribution, &rates, &company, &RoundingPolicy::default())
            .expect_err("negative workers");
        assert!(matches!(
            err,
            DistributionError::NegativeShare {
                kind: PaymentType::WorkerShare
            }
        ));
    }

    #[test]
    fn test_rates_at_tolerance_edge_balance() {
        let overrides = RateOverrides {
            company_owner: Some(0.1005),
            company: Some(0.10),
            admin: Some(0.10),
            team: Some(0.70),
            ..Default::default()
        };
        crate::validator::validate_rate_set(&overrides).expect("within tolerance");
        let company = Company::new("c1").with_owner("o").with_rates(overrides);

        let plan = plan(10_000.0, &company, None, RoundingPolicy::default());
        assert_eq!(plan.amount_of(PaymentType::CompanyOwnerShare), 100_500);
        assert_eq!(plan.amount_of(PaymentType::WorkerShare), 599_500);
        assert_eq!(lines_sum(&plan), plan.total_minor);
    }

    #[test]
    fn test_rates_past_tolerance_rejected() {
        let overrides = RateOverrides {
            company_owner: Some(0.102),
            ..Default::default()
        };
        assert!(crate::validator::validate_rate_set(&RateOverrides {
            company: Some(0.10),
            admin: Some(0.10),
            team: Some(0.70),
            ..overrides.clone()
        })
        .is_err());
        let company = Company::new("c1").with_owner("o").with_rates(overrides);
        let distribution = allocate(10_000.0, &company, None).expect("allocate");
        let rates = resolve_rates(&company);
        assert!(matches!(
            plan_payouts(&distribution, &rates, &company, &RoundingPolicy::default()),
            Err(DistributionError::UnbalancedPayout { .. })
        ));
    }

    #[test]
    fn test_negative_company_budget_rejected() {
        let company = Company::new("c1").with_owner("o").with_rates(RateOverrides {
            company_owner: Some(0.1),
            company: Some(-0.1),
            admin: Some(0.1),
            team: Some(0.9),
            ..Default::default()
        });
        let distribution = allocate(1_000.0, &company, None).expect("allocate");
        let rates = resolve_rates(&company);
        let err = plan_payouts(&distribution, &rates, &company, &RoundingPolicy::default())
            .expect_err("negative company budget");
        assert!(matches!(
            err,
            DistributionError::NegativeShare {
                kind: PaymentType::CompanyBudget
            }
        ));
    }

    #[test]
    fn test_mode_mismatch_rejected() {
        let company = owner_company();
        let distribution = allocate(100.0, &company, None).expect("allocate");
        let legacy_rates = resolve_rates(&Company::new("other"));
        assert!(matches!(
            plan_payouts(&distribution, &legacy_rates, &company, &RoundingPolicy::default()),
            Err(DistributionError::ModeMismatch { .. })
        ));
    }
}
