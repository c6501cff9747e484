//! Data layer: code dictionaries, storage access and row shaping.
//!
//! Architecture:
//! ```text
//!   censusdata.db
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ repository │  open → query → close, decode codes → rows
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ comparison │  subtract the All Races / Both / All Incomes baseline
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │   filter   │  race / sex / IPR multi-select → row predicate
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │    view    │  county ranking, Both-sex demographics, time series
//!   └────────────┘
//! ```
//!
//! `pipeline` wires the stages together for a [`pipeline::QueryContext`].

pub mod codes;
pub mod comparison;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod view;
