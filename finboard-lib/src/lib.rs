//! Financial dashboard data layer
//!
//! Typed building blocks behind the dashboard's data grids: column specs
//! derived from display configs, cell renderers and editors, filter
//! translation into query parameters, rule search, and the table and widget
//! plumbing that ties them to the data API.

pub mod error;
pub mod filter;
pub mod grid;
pub mod model;
pub mod query;
pub mod rules;
pub mod settings;

mod client;
mod widget;

pub use client::*;
pub use widget::*;
