//! 设置文件存储
//!
//! 使用 JSON 文件存储 KIE 设置对象
//! 实现 kie-webclient-core 的 SettingsStore trait

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use kie_webclient_core::traits::SettingsStore;
use kie_webclient_core::types::SETTINGS_STORAGE_KEY;
use kie_webclient_core::{CoreError, CoreResult};
use tokio::fs;

const APP_DIR_NAME: &str = "kie-webclient";

/// 基于 JSON 文件的设置存储
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/kie-webclient/kieSettings.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(format!("{SETTINGS_STORAGE_KEY}.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 确保父目录存在
    async fn ensure_parent_dir(&self) -> CoreResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .await
                    .map_err(|e| CoreError::StorageError(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl Default for JsonFileSettingsStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load_raw(&self) -> CoreResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;
        Ok(Some(content))
    }

    async fn save_raw(&self, json: &str) -> CoreResult<()> {
        self.ensure_parent_dir().await?;

        fs::write(&self.path, json)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))?;
        log::debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}
