//! Settings system for typed key-value storage.
//!
//! The dashboard persists a session token and a few user-preference flags
//! under fixed keys. Values are opaque to this crate beyond their types.

mod backend;
mod memory;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SettingsError;

/// The fixed preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Bearer token of the signed-in user.
    SessionToken,
    SidebarCollapsed,
    TableDensity,
    OnboardingDismissed,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::SessionToken,
        PreferenceKey::SidebarCollapsed,
        PreferenceKey::TableDensity,
        PreferenceKey::OnboardingDismissed,
    ];

    /// The storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::SessionToken => "session_token",
            PreferenceKey::SidebarCollapsed => "sidebar_collapsed",
            PreferenceKey::TableDensity => "table_density",
            PreferenceKey::OnboardingDismissed => "onboarding_dismissed",
        }
    }
}

/// Row spacing of data grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableDensity {
    Compact,
    #[default]
    Standard,
    Comfortable,
}

/// Typed settings provider.
///
/// Wraps a `SettingsBackend` with typed serialization via bincode.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    /// Create a new settings provider with the given backend.
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A provider that keeps values in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Get a typed value for a key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Get a typed value for a key, returning a default if not found.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Set a typed value for a key.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.set_bytes(key, bytes).await
    }

    /// Delete a key.
    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.delete(key).await
    }

    /// Get all keys matching a prefix.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        self.backend.keys_with_prefix(prefix).await
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub async fn session_token(&self) -> Result<Option<String>, SettingsError> {
        self.get(PreferenceKey::SessionToken.as_str()).await
    }

    pub async fn set_session_token(&self, token: &str) -> Result<(), SettingsError> {
        self.set(PreferenceKey::SessionToken.as_str(), &token).await
    }

    /// Forgets the session token, e.g. on logout.
    pub async fn clear_session_token(&self) -> Result<(), SettingsError> {
        self.delete(PreferenceKey::SessionToken.as_str()).await
    }

    pub async fn sidebar_collapsed(&self) -> Result<bool, SettingsError> {
        self.get_or(PreferenceKey::SidebarCollapsed.as_str(), false).await
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), SettingsError> {
        self.set(PreferenceKey::SidebarCollapsed.as_str(), &collapsed).await
    }

    pub async fn table_density(&self) -> Result<TableDensity, SettingsError> {
        self.get_or(PreferenceKey::TableDensity.as_str(), TableDensity::default())
            .await
    }

    pub async fn set_table_density(&self, density: TableDensity) -> Result<(), SettingsError> {
        self.set(PreferenceKey::TableDensity.as_str(), &density).await
    }

    pub async fn onboarding_dismissed(&self) -> Result<bool, SettingsError> {
        self.get_or(PreferenceKey::OnboardingDismissed.as_str(), false)
            .await
    }

    pub async fn set_onboarding_dismissed(&self, dismissed: bool) -> Result<(), SettingsError> {
        self.set(PreferenceKey::OnboardingDismissed.as_str(), &dismissed)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys() {
        let keys: Vec<_> = PreferenceKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["session_token", "sidebar_collapsed", "table_density", "onboarding_dismissed"]
        );
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let settings = SettingsProvider::in_memory();
        assert_eq!(settings.session_token().await.unwrap(), None);
        assert!(!settings.sidebar_collapsed().await.unwrap());
        assert_eq!(settings.table_density().await.unwrap(), TableDensity::Standard);
        assert!(!settings.onboarding_dismissed().await.unwrap());
    }

    #[tokio::test]
    async fn test_preferences_persist() {
        let settings = SettingsProvider::in_memory();
        settings.set_session_token("tok-123").await.unwrap();
        settings.set_sidebar_collapsed(true).await.unwrap();
        settings.set_table_density(TableDensity::Compact).await.unwrap();

        let shared = settings.clone();
        assert_eq!(shared.session_token().await.unwrap().as_deref(), Some("tok-123"));
        assert!(shared.sidebar_collapsed().await.unwrap());
        assert_eq!(shared.table_density().await.unwrap(), TableDensity::Compact);

        shared.clear_session_token().await.unwrap();
        assert_eq!(settings.session_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_with_prefix_sorted() {
        let settings = SettingsProvider::in_memory();
        settings.set_onboarding_dismissed(true).await.unwrap();
        settings.set_sidebar_collapsed(false).await.unwrap();
        settings.set_session_token("t").await.unwrap();
        assert_eq!(
            settings.keys_with_prefix("s").await.unwrap(),
            vec!["session_token", "sidebar_collapsed"]
        );
    }

    #[tokio::test]
    async fn test_wrong_type_fails_to_decode() {
        let settings = SettingsProvider::in_memory();
        settings.set("table_density", &"not a density").await.unwrap();
        assert!(matches!(
            settings.table_density().await,
            Err(SettingsError::Deserialization(_))
        ));
    }
}
