//! Collaborator abstraction trait definitions

mod rules_service;
mod settings_store;

pub use rules_service::{RulesService, RulesServiceFactory};
pub use settings_store::{InMemorySettingsStore, SettingsStore};
