//! Default rate tables and per-company rate resolution.
//!
//! Legacy mode always uses the legacy table as-is and never looks at a
//! company's overrides. Owner mode takes each override that is present and
//! falls back to the owner table for the rest. Nothing here validates the
//! result; see [`crate::validator`] for the settings-side checks.
//!
//! | mode   | owner | company | admin | team | team lead | workers |
//! |--------|-------|---------|-------|------|-----------|---------|
//! | legacy |   -   |  0.20   | 0.10  | 0.70 |   0.10    |  0.60   |
//! | owner  | 0.10  |  0.10   | 0.10  | 0.70 |   0.10    |  0.60   |
//!
//! `team_lead` and `workers` are sub-splits of `team`, not extra shares.

use crm_types::{Company, DistributionMode, RateOverrides};
use serde::{Deserialize, Serialize};

use crate::mode::resolve_mode;

/// One table of rates, each a fraction of the order amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Owner share. Must stay 0 in the legacy table, which has no owner.
    #[serde(default)]
    pub company_owner: f64,
    pub company: f64,
    pub admin: f64,
    pub team: f64,
    pub team_lead: f64,
    pub workers: f64,
}

/// System defaults for companies without an owner share.
pub const LEGACY_DEFAULTS: RateTable = RateTable {
    company_owner: 0.0,
    company: 0.20,
    admin: 0.10,
    team: 0.70,
    team_lead: 0.10,
    workers: 0.60,
};

/// System defaults for owner-mode companies. The owner's 10% comes out of
/// the legacy company budget.
pub const OWNER_DEFAULTS: RateTable = RateTable {
    company_owner: 0.10,
    company: 0.10,
    admin: 0.10,
    team: 0.70,
    team_lead: 0.10,
    workers: 0.60,
};

impl RateTable {
    /// View this table as a candidate rate set for `mode`, so it can go
    /// through the same checks as a company's overrides.
    pub fn as_overrides(&self, mode: DistributionMode) -> RateOverrides {
        RateOverrides {
            company_owner: match mode {
                DistributionMode::Legacy => None,
                DistributionMode::Owner => Some(self.company_owner),
            },
            company: Some(self.company),
            admin: Some(self.admin),
            team: Some(self.team),
            team_lead: Some(self.team_lead),
            workers: Some(self.workers),
        }
    }
}

/// Effective rates for one company.
///
/// `company_owner` is `Some` exactly when `mode` is [`DistributionMode::Owner`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRates {
    pub mode: DistributionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_owner: Option<f64>,
    pub company: f64,
    pub admin: f64,
    pub team: f64,
    pub team_lead: f64,
    pub workers: f64,
}

impl DistributionRates {
    fn legacy(table: &RateTable) -> Self {
        Self {
            mode: DistributionMode::Legacy,
            company_owner: None,
            company: table.company,
            admin: table.admin,
            team: table.team,
            team_lead: table.team_lead,
            workers: table.workers,
        }
    }

    /// Sum of the top-level shares (owner, company, admin, team).
    pub fn top_level_total(&self) -> f64 {
        self.company_owner.unwrap_or(0.0) + self.company + self.admin + self.team
    }
}

/// Resolves effective rates from an injected pair of default tables.
#[derive(Clone, Debug, PartialEq)]
pub struct RateProvider {
    legacy: RateTable,
    owner: RateTable,
}

static DEFAULT_PROVIDER: RateProvider = RateProvider::with_tables(LEGACY_DEFAULTS, OWNER_DEFAULTS);

impl Default for RateProvider {
    fn default() -> Self {
        DEFAULT_PROVIDER.clone()
    }
}

impl RateProvider {
    /// Create a provider with custom default tables.
    pub const fn with_tables(legacy: RateTable, owner: RateTable) -> Self {
        Self { legacy, owner }
    }

    /// The provider built from the system default tables.
    pub fn system() -> &'static Self {
        &DEFAULT_PROVIDER
    }

    pub fn legacy_table(&self) -> &RateTable {
        &self.legacy
    }

    pub fn owner_table(&self) -> &RateTable {
        &self.owner
    }

    /// Resolve the effective rates for `company`.
    pub fn resolve(&self, company: &Company) -> DistributionRates {
        let rates = match resolve_mode(company) {
            DistributionMode::Legacy => DistributionRates::legacy(&self.legacy),
            DistributionMode::Owner => {
                let overrides = company.distribution_rates.as_ref();
                let d = &self.owner;
                DistributionRates {
                    mode: DistributionMode::Owner,
                    company_owner: Some(or_default(overrides, |r| r.company_owner, d.company_owner)),
                    company: or_default(overrides, |r| r.company, d.company),
                    admin: or_default(overrides, |r| r.admin, d.admin),
                    team: or_default(overrides, |r| r.team, d.team),
                    team_lead: or_default(overrides, |r| r.team_lead, d.team_lead),
                    workers: or_default(overrides, |r| r.workers, d.workers),
                }
            }
        };

        tracing::debug!(
            company = %company.id,
            mode = %rates.mode,
            total = rates.top_level_total(),
            "distribution rates resolved"
        );

        rates
    }
}

fn or_default(
    overrides: Option<&RateOverrides>,
    field: impl Fn(&RateOverrides) -> Option<f64>,
    default: f64,
) -> f64 {
    overrides.and_then(field).unwrap_or(default)
}

/// Resolve the effective rates for `company` using the system defaults.
pub fn resolve_rates(company: &Company) -> DistributionRates {
    RateProvider::system().resolve(company)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn owner_company(overrides: RateOverrides) -> Company {
        Company::new("c1").with_owner("u1").with_rates(overrides)
    }

    #[test]
    fn test_default_tables_sum_to_one() {
        let legacy = LEGACY_DEFAULTS.company + LEGACY_DEFAULTS.admin + LEGACY_DEFAULTS.team;
        assert!((legacy - 1.0).abs() < EPS);
        let owner = OWNER_DEFAULTS.company_owner
            + OWNER_DEFAULTS.company
            + OWNER_DEFAULTS.admin
            + OWNER_DEFAULTS.team;
        assert!((owner - 1.0).abs() < EPS);
    }

    #[test]
    fn test_legacy_uses_defaults() {
        let rates = resolve_rates(&Company::new("c1"));
        assert_eq!(rates.mode, DistributionMode::Legacy);
        assert_eq!(rates.company_owner, None);
        assert_eq!(rates.company, 0.20);
        assert_eq!(rates.admin, 0.10);
        assert_eq!(rates.team, 0.70);
        assert_eq!(rates.team_lead, 0.10);
        assert_eq!(rates.workers, 0.60);
    }

    #[test]
    fn test_legacy_ignores_overrides() {
        let company = Company::new("c1").with_rates(RateOverrides {
            company: Some(0.99),
            admin: Some(0.5),
            team_lead: Some(0.3),
            ..Default::default()
        });
        let rates = resolve_rates(&company);
        assert_eq!(rates.mode, DistributionMode::Legacy);
        assert_eq!(rates.company, 0.20);
        assert_eq!(rates.admin, 0.10);
        assert_eq!(rates.team_lead, 0.10);
        assert!((rates.top_level_total() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_owner_overrides_applied() {
        let rates = resolve_rates(&owner_company(RateOverrides {
            company_owner: Some(0.15),
            company: Some(0.15),
            admin: Some(0.10),
            team: Some(0.60),
            ..Default::default()
        }));
        assert_eq!(rates.mode, DistributionMode::Owner);
        assert_eq!(rates.company_owner, Some(0.15));
        assert_eq!(rates.company, 0.15);
        assert_eq!(rates.admin, 0.10);
        assert_eq!(rates.team, 0.60);
        assert!((rates.top_level_total() - 1.0).abs() < EPS);
        // Unset sub-splits fall back to owner defaults.
        assert_eq!(rates.team_lead, 0.10);
        assert_eq!(rates.workers, 0.60);
    }

    #[test]
    fn test_owner_partial_overrides_fall_back() {
        let rates = resolve_rates(&owner_company(RateOverrides {
            company_owner: Some(0.05),
            ..Default::default()
        }));
        assert_eq!(rates.company_owner, Some(0.05));
        assert_eq!(rates.company, OWNER_DEFAULTS.company);
        assert_eq!(rates.admin, OWNER_DEFAULTS.admin);
        assert_eq!(rates.team, OWNER_DEFAULTS.team);
    }

    #[test]
    fn test_owner_zero_override_is_kept() {
        let rates = resolve_rates(&owner_company(RateOverrides {
            company_owner: Some(0.2),
            company: Some(0.0),
            ..Default::default()
        }));
        assert_eq!(rates.company, 0.0);
    }

    #[test]
    fn test_owner_rates_not_validated() {
        let rates = resolve_rates(&owner_company(RateOverrides {
            company_owner: Some(0.5),
            company: Some(0.5),
            ..Default::default()
        }));
        assert!(rates.top_level_total() > 1.5);
    }

    #[test]
    fn test_injected_tables() {
        let legacy = RateTable {
            company: 0.30,
            team: 0.60,
            ..LEGACY_DEFAULTS
        };
        let owner = RateTable {
            company_owner: 0.20,
            company: 0.0,
            ..OWNER_DEFAULTS
        };
        let provider = RateProvider::with_tables(legacy, owner);

        let rates = provider.resolve(&Company::new("c1"));
        assert_eq!(rates.company, 0.30);
        assert_eq!(rates.team, 0.60);

        let rates = provider.resolve(&owner_company(RateOverrides {
            company_owner: Some(0.25),
            ..Default::default()
        }));
        assert_eq!(rates.company_owner, Some(0.25));
        assert_eq!(rates.company, 0.0);
    }

    #[test]
    fn test_table_as_overrides() {
        let legacy = LEGACY_DEFAULTS.as_overrides(DistributionMode::Legacy);
        assert_eq!(legacy.company_owner, None);
        assert_eq!(legacy.company, Some(0.20));
        let owner = OWNER_DEFAULTS.as_overrides(DistributionMode::Owner);
        assert_eq!(owner.company_owner, Some(0.10));
    }

    #[test]
    fn test_rates_wire_shape() {
        let value = serde_json::to_value(resolve_rates(&Company::new("c1"))).expect("serialize");
        assert_eq!(value["mode"], "legacy");
        assert!(value.get("companyOwner").is_none());
        assert_eq!(value["teamLead"], 0.10);
    }
}
