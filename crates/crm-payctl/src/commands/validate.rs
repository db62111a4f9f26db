//! `validate`: check a candidate rate set before it is saved.

use crm_distribution::validator::rate_set_total;
use crm_distribution::{is_valid_rate_set, validate_rate_set};
use crm_types::RateOverrides;

/// Check the rate set in `input`.
///
/// Returns whether it passed the full settings check, plus the report to
/// print. The report keeps the plain tolerance result separately.
pub fn run(input: &str) -> anyhow::Result<(bool, serde_json::Value)> {
    let rates: RateOverrides = serde_json::from_str(input)?;
    let checked = validate_rate_set(&rates);
    let valid = checked.is_ok();

    let mut report = serde_json::json!({
        "valid": valid,
        "withinTolerance": is_valid_rate_set(&rates),
        "total": rate_set_total(&rates),
    });
    if let Err(e) = checked {
        report["error"] = serde_json::Value::String(e.to_string());
    }
    Ok((valid, report))
}
