//! Query parameter building for dataset and widget requests.
//!
//! # Shared Types
//!
//! - [`Predicate`] - A single column constraint produced by a filter
//! - [`QueryFragment`] - A predicate bound to one dataset column
//! - [`QueryParams`] - The flat parameter map merged into API requests
//! - [`OrderBy`] - Sort specification for server-side blocks

mod order;
mod params;
mod predicate;

pub use order::Direction;
pub use order::OrderBy;
pub use params::QueryFragment;
pub use params::QueryParams;
pub use predicate::Predicate;
