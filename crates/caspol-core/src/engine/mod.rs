//! # Engine Module
//!
//! Runs validation scenarios against the Casimir-Polder simulator and judges its output.
//!
//! ## Overview
//!
//! A scenario names one simulator invocation and one check to apply to the table it
//! produces. The engine owns everything between those two ends: launching the external
//! program, memoizing its results, dispatching the check, and collecting the verdicts.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scenario definitions, tolerances, and validated suites
//! - **External Computation** ([`external`]) - Invocation arguments and the [`external::Simulator`] seam
//! - **Caching** ([`cache`]) - One simulator run per distinct invocation
//! - **Checks** ([`tasks`]) - Asymptotic, reference, and equivalence comparisons
//! - **Reporting** ([`report`]) - Per-row evaluations and per-scenario verdicts
//! - **Progress Monitoring** ([`progress`]) - Event callbacks for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod progress;
pub mod report;
pub mod tasks;
