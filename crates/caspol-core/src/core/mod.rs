//! # Core Module
//!
//! Stateless building blocks of the validator: the data model of the simulation tool's output
//! tables, the parsers that read them, the tolerance comparator, the closed-form asymptotic
//! models and the table of pre-verified reference values.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Raw and typed table rows, datasets
//! - **File I/O** ([`io`]) - The tolerant line parser and the `.byXi` / `.out` formats
//! - **Numerics** ([`numerics`]) - Sign-aware logarithmic relative comparison
//! - **Asymptotics** ([`asymptotics`]) - Short- and long-range power laws with regime thresholds
//! - **References** ([`reference`]) - Exact-match lookup of verified values
//! - **Catalog** ([`catalog`]) - Built-in models and reference points

pub mod asymptotics;
pub mod catalog;
pub mod io;
pub mod models;
pub mod numerics;
pub mod reference;
