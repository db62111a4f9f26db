//! Payment record labels consumed by the dashboard.

use serde::{Deserialize, Serialize};

/// Kind of payment record created from one distribution line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    CompanyBudget,
    CompanyOwnerShare,
    AdminShare,
    TeamLeadShare,
    WorkerShare,
}

impl PaymentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentType::CompanyBudget => "company_budget",
            PaymentType::CompanyOwnerShare => "company_owner_share",
            PaymentType::AdminShare => "admin_share",
            PaymentType::TeamLeadShare => "team_lead_share",
            PaymentType::WorkerShare => "worker_share",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
