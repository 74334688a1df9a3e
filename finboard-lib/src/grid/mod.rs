//! Schema-driven data grid
//!
//! Column specs are derived from a dataset's display config, each with a
//! render strategy from the renderer registry and, for tag columns, an
//! editor. A [`Table`] combines them with a row source.

mod block;
mod columns;
mod config;
mod datasource;
mod edit;
pub mod format;
mod render;
mod table;

pub use block::*;
pub use columns::*;
pub use config::*;
pub use datasource::*;
pub use edit::*;
pub use format::DateFormat;
pub use render::*;
pub use table::*;
