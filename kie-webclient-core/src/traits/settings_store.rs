//! Settings storage abstraction Trait

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::{KieSettings, SETTINGS_STORAGE_KEY};

/// Persistent storage of the KIE settings object
///
/// Implementations only move raw JSON in and out; parsing and the fallback
/// policy are shared by the provided `load`/`save`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Raw stored JSON, `None` when nothing has been saved yet
    async fn load_raw(&self) -> CoreResult<Option<String>>;

    /// Replace the stored JSON wholesale
    async fn save_raw(&self, json: &str) -> CoreResult<()>;

    /// Load the settings
    ///
    /// Never fails: absent, unreadable or malformed data yields empty-string
    /// defaults for the affected fields.
    async fn load(&self) -> KieSettings {
        match self.load_raw().await {
            Ok(Some(raw)) => {
                log::info!("{SETTINGS_STORAGE_KEY} loaded");
                KieSettings::from_json_lenient(&raw)
            }
            Ok(None) => {
                log::info!("{SETTINGS_STORAGE_KEY} not found in storage, using defaults");
                KieSettings::default()
            }
            Err(e) => {
                log::warn!("Failed to read {SETTINGS_STORAGE_KEY}, using defaults: {e}");
                KieSettings::default()
            }
        }
    }

    /// Save the whole settings object
    async fn save(&self, settings: &KieSettings) -> CoreResult<()> {
        let json = serde_json::to_string(settings)?;
        self.save_raw(&json).await?;
        log::info!("{SETTINGS_STORAGE_KEY} saved");
        Ok(())
    }
}

/// In-memory settings store
///
/// Default implementation for tests and frontends without persistence.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    raw: RwLock<Option<String>>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw JSON
    #[must_use]
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(json.into())),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load_raw(&self) -> CoreResult<Option<String>> {
        Ok(self.raw.read().await.clone())
    }

    async fn save_raw(&self, json: &str) -> CoreResult<()> {
        *self.raw.write().await = Some(json.to_string());
        Ok(())
    }
}
