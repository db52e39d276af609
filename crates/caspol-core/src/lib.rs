//! # CasPol-Check Core Library
//!
//! Validation engine for the numerical output of Casimir-Polder simulations: it reads the
//! tables the simulation tool writes, and checks them against closed-form asymptotic laws and
//! against pre-verified exact values.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Dataset`, typed rows), the table
//!   parser, the sign-aware tolerance comparator, asymptotic models and the reference table.
//!
//! - **[`engine`]: The Logic Core.** The checks themselves (regime validation, reference
//!   regression, equivalence of alternate computations), the interface to the external
//!   simulation tool, memoization of its runs, configuration and error handling.
//!
//! - **[`workflows`]: The Public API.** Runs a complete suite of scenarios sequentially and
//!   collects one verdict per scenario.

pub mod core;
pub mod engine;
pub mod workflows;
