//! Pre-verified exact values used for regression checks.

pub mod table;
