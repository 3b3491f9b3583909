//! Single test binary entry point.
//!
//! Structure:
//! - helpers: Snapshot builders and recording collaborators
//! - integration: Multi-component workflow tests through `MapCanvas`
//! - unit: Single-component tests

mod integration;
mod unit;
