//! Distribution mode resolution.
//!
//! A company only switches to owner mode once it both has an owner assigned
//! and has explicitly configured a non-zero owner rate. Anything else,
//! including an owner set without a rate, stays in legacy mode.

use crm_types::{Company, DistributionMode};

/// Decide whether `company` distributes in legacy or owner mode.
pub fn resolve_mode(company: &Company) -> DistributionMode {
    let has_owner = company.owner().is_some();
    let has_owner_rate = company
        .distribution_rates
        .as_ref()
        .and_then(|rates| rates.company_owner)
        .is_some_and(|rate| rate != 0.0 && !rate.is_nan());

    if has_owner && has_owner_rate {
        DistributionMode::Owner
    } else {
        DistributionMode::Legacy
    }
}
