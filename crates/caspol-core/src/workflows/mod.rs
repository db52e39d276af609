//! # Workflows Module
//!
//! Top-level entry points that run complete validation suites.
//!
//! ## Overview
//!
//! A workflow takes a validated [`crate::engine::config::ValidationConfig`], a
//! [`crate::engine::external::Simulator`], and a working directory, and returns a
//! [`crate::engine::report::SuiteReport`] with one verdict per scenario.
//!
//! - **Validation Workflow** ([`validate`]) - Sequential scenario execution with memoized
//!   simulator runs.
//! - **Standard Suite** ([`suite`]) - The historical regression and validation scenarios.

pub mod suite;
pub mod validate;
