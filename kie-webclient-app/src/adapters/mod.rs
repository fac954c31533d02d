//! Platform-agnostic storage adapters for frontends without their own storage.

mod json_file_settings_store;

pub use json_file_settings_store::JsonFileSettingsStore;
