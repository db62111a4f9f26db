//! `rates`: resolve the effective rates of a company.

use crm_distribution::RateProvider;
use crm_types::Company;

use super::Result;

/// Resolve rates for the company in `input`.
pub fn resolve(provider: &RateProvider, input: &str) -> Result {
    let company: Company = serde_json::from_str(input)?;
    let rates = provider.resolve(&company);
    Ok(serde_json::to_value(rates)?)
}
