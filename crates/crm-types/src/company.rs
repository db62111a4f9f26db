//! Company snapshot and its distribution rate overrides.

use serde::{Deserialize, Serialize};

use crate::{CompanyId, UserId};

/// The parts of a company record the distribution engine reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    /// User acting as company owner. `None` or an empty id means no owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_owner: Option<UserId>,
    /// Company-specific rate overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_rates: Option<RateOverrides>,
}

impl Company {
    /// A company with no owner and no overrides.
    pub fn new(id: impl Into<CompanyId>) -> Self {
        Self {
            id: id.into(),
            company_owner: None,
            distribution_rates: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<UserId>) -> Self {
        self.company_owner = Some(owner.into());
        self
    }

    pub fn with_rates(mut self, rates: RateOverrides) -> Self {
        self.distribution_rates = Some(rates);
        self
    }

    /// The owner id, if one is set and non-empty.
    pub fn owner(&self) -> Option<&str> {
        self.company_owner.as_deref().filter(|id| !id.is_empty())
    }
}

/// Partial rate set stored on a company. Each field is a fraction of the
/// order amount; an absent field falls back to the mode default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_owner: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_lead: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<f64>,
}

/// Distribution mode of a company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    /// Company / admin / team split, no owner share.
    Legacy,
    /// Adds a company owner share on top of the legacy categories.
    Owner,
}

impl DistributionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            DistributionMode::Legacy => "legacy",
            DistributionMode::Owner => "owner",
        }
    }
}

impl std::fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
