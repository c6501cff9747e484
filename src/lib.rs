//! Data-shaping core of the SAHIE health insurance dashboard.
//!
//! Rows of the U.S. Census Small Area Health Insurance Estimates are read
//! from a local SQLite cache, compared against the statewide baseline,
//! filtered by race / sex / income band and arranged for the dashboard's
//! county, demographic and time-series charts.

pub mod config;
pub mod data;

pub use data::error::{DashError, DashResult};
pub use data::pipeline::{Pipeline, QueryContext};
