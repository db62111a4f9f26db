//! Integration test crate for the payment distribution engine.
//!
//! This crate has no library code. It only contains tests that run
//! order-to-payment flows across the workspace crates, starting from the
//! JSON shapes the dashboard backend returns.
//!
//! ```sh
//! cargo test -p crm-integration-tests
//! ```
