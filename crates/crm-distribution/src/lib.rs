//! # crm-distribution
//!
//! Payment distribution engine for completed orders.
//!
//! An order's amount is split between the company treasury, the company
//! owner (only when configured), the admin who accepted the order, and the
//! delivering team. Companies created before the owner concept keep the
//! original 20/10/70 split untouched.
//!
//! ## Modules
//!
//! - [`mode`] — Legacy / owner mode resolution
//! - [`rates`] — Default rate tables and per-company rate resolution
//! - [`allocator`] — Order amount to per-category breakdown
//! - [`validator`] — Rate set checks for company settings
//! - [`payout`] — Breakdown to rounded payment lines

pub mod allocator;
pub mod mode;
pub mod payout;
pub mod rates;
pub mod validator;

pub use allocator::{allocate, Breakdown, Distribution};
pub use mode::resolve_mode;
pub use rates::{resolve_rates, DistributionRates, RateProvider, RateTable};
pub use validator::{is_valid_rate_set, validate_rate_set};

use crm_types::{DistributionMode, PaymentType};

/// Error types for distribution operations.
#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    /// Order amount is negative, NaN or infinite.
    #[error("invalid order amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: f64,
    },

    /// Top-level rates do not sum to 1.0 within tolerance.
    #[error("rates must sum to 1.0, got {total}")]
    InvalidRateTotal {
        /// The actual total.
        total: f64,
    },

    /// A single rate lies outside `[0, 1]`.
    #[error("rate {field} out of range: {value}")]
    RateOutOfRange {
        /// Rate field name as it appears on the wire.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Distribution and rates were resolved under different modes.
    #[error("distribution mode {distribution} does not match rates mode {rates}")]
    ModeMismatch {
        /// Mode of the distribution.
        distribution: DistributionMode,
        /// Mode of the rates.
        rates: DistributionMode,
    },

    /// Rounded lines leave more than rounding noise unassigned.
    #[error("payout lines leave {residue} minor units unassigned")]
    UnbalancedPayout {
        /// Rounded total minus the sum of rounded lines.
        residue: i64,
    },

    /// A payout line came out negative.
    #[error("negative payout for {kind}")]
    NegativeShare {
        /// The affected payment type.
        kind: PaymentType,
    },

    /// Amount does not fit in integer minor units.
    #[error("arithmetic overflow in payout calculation")]
    Overflow,
}

/// Convenience result type for distribution operations.
pub type Result<T> = std::result::Result<T, DistributionError>;
