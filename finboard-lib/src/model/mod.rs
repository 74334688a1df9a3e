//! Typed models

mod column;
mod row;
mod rule;
mod session;
pub mod tag;
mod value;

pub use column::*;
pub use row::*;
pub use rule::*;
pub use session::*;
pub use value::*;
