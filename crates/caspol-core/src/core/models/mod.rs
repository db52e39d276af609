//! Data structures for the tabular output of the simulation tool.
//!
//! A table is first parsed into shape-agnostic [`dataset::RawTable`] rows; the caller then
//! chooses a [`row::RowShape`] and converts it into a typed [`dataset::Dataset`].

pub mod dataset;
pub mod row;
