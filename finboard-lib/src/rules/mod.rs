//! Rule card search.

mod search;

pub use search::matches;
pub use search::search;
