//! Reading and writing the tabular output files of the simulation tool.
//!
//! [`table`] holds the shape-agnostic line parser; [`traits`] and [`output`] bind it to the
//! two concrete file layouts (`.byXi` and `.out`).

pub mod output;
pub mod table;
pub mod traits;
