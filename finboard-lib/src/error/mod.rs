//! Error types

mod api;
mod field;
mod filter;
mod settings;

pub use api::*;
pub use field::*;
pub use filter::*;
pub use settings::*;

/// Top-level error for finboard operations.
///
/// Each variant wraps the error family of the subsystem that failed, so a
/// caller can match on the source without string inspection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request to the dashboard API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A filter value was rejected before any request was made.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A row field was missing or had an unexpected type.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Reading or writing a stored preference failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl Error {
    /// Returns `true` if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}
