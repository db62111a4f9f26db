//! Subcommand handlers.
//!
//! Each handler takes the raw JSON input and returns the JSON value to
//! print, so they can be tested without touching stdin or stdout.

pub mod allocate;
pub mod rates;
pub mod validate;

use serde_json::Value;

type Result = anyhow::Result<Value>;
