//! Closed-form short- and long-range Casimir-Polder laws and their regime thresholds.

pub mod model;
