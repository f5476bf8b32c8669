//! Tabular dataset model and loading.
//!
//! A [`Dataset`] is an immutable, column-oriented table loaded from a
//! delimited text file. Column order is fixed at load time and every row
//! carries the same column set.

mod frame;
mod loader;

pub use frame::{Column, Dataset, Dtype, Value};
