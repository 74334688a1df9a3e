//! Filter model and translation.
//!
//! A [`FilterDescriptor`] describes one user-facing filter and the dataset
//! columns it constrains. [`translate`] turns a [`FilterValue`] into query
//! fragments, one per target, and [`FilterBoard`] keeps the current values of
//! a page and reports which widgets to refetch.

mod board;
mod descriptor;
mod translate;

pub use board::FilterBoard;
pub use board::RefetchPlan;
pub use descriptor::*;
pub use translate::predicate_for;
pub use translate::translate;
