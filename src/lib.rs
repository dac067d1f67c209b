//! Enrichment and filtering core for the HDB resale dashboard.
//!
//! The [`data`] module owns everything between the raw input files and the
//! views the dashboard draws; [`config`] resolves where those files live.

pub mod config;
pub mod data;
