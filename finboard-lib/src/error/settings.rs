//! Preference storage errors

/// Errors from the preference store.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
}
