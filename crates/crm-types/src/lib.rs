//! # crm-types
//!
//! Shared domain types exchanged between the CRM dashboard, its REST
//! backend and the payment distribution engine.
//!
//! Field names follow the camelCase wire shape the dashboard sends, so a
//! company snapshot taken from the backend deserializes directly.

pub mod company;
pub mod payment;

pub use company::{Company, DistributionMode, RateOverrides};
pub use payment::PaymentType;

/// Opaque company identifier.
pub type CompanyId = String;

/// Opaque user identifier (company owner, admin, team member).
pub type UserId = String;
