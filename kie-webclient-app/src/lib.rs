//! Platform-agnostic application bootstrap for the KIE business application client.
//!
//! Provides `AppState` (form container) and `AppStateBuilder` (adapter injection).

pub mod adapters;

use std::sync::Arc;

use kie_webclient_core::error::{CoreError, CoreResult};
use kie_webclient_core::services::{CarInsuranceForm, SettingsForm};
use kie_webclient_core::traits::{RulesServiceFactory, SettingsStore};

/// Platform-agnostic application state.
///
/// Holds both forms and the adapters they were built from. Every frontend
/// constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Settings persistence
    pub settings_store: Arc<dyn SettingsStore>,
    /// Builds a rules service from the current settings
    pub rules_service_factory: Arc<dyn RulesServiceFactory>,
    /// Car insurance application form
    pub car_insurance_form: CarInsuranceForm,
    /// Settings form
    pub settings_form: SettingsForm,
}

impl AppState {
    /// Re-read the stored settings.
    ///
    /// Rebuilds the rules service of the application form and re-seeds the
    /// settings form. Application field values are kept.
    pub async fn reload_settings(&mut self) -> CoreResult<()> {
        let settings = self.settings_store.load().await;
        let service = self.rules_service_factory.connect(&settings);
        self.car_insurance_form.set_rules_service(service);
        self.settings_form = SettingsForm::from_settings(&settings, Arc::clone(&self.settings_store))?;
        log::info!("Settings reloaded");
        Ok(())
    }

    /// Save the settings form, then apply the saved values.
    pub async fn save_settings(&mut self) -> CoreResult<()> {
        self.settings_form.save().await?;
        self.reload_settings().await
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `settings_store`: where the KIE settings are persisted
/// - `rules_service_factory`: how a rules service is built from the settings
pub struct AppStateBuilder {
    settings_store: Option<Arc<dyn SettingsStore>>,
    rules_service_factory: Option<Arc<dyn RulesServiceFactory>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings_store: None,
            rules_service_factory: None,
        }
    }

    #[must_use]
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    #[must_use]
    pub fn rules_service_factory(mut self, factory: Arc<dyn RulesServiceFactory>) -> Self {
        self.rules_service_factory = Some(factory);
        self
    }

    /// Build the `AppState`, loading the stored settings.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub async fn build(self) -> CoreResult<AppState> {
        let settings_store = self.settings_store.ok_or_else(|| {
            CoreError::ValidationError("settings_store is required".to_string())
        })?;
        let rules_service_factory = self.rules_service_factory.ok_or_else(|| {
            CoreError::ValidationError("rules_service_factory is required".to_string())
        })?;

        let settings = settings_store.load().await;
        let car_insurance_form = CarInsuranceForm::new(rules_service_factory.connect(&settings))?;
        let settings_form = SettingsForm::from_settings(&settings, Arc::clone(&settings_store))?;

        Ok(AppState {
            settings_store,
            rules_service_factory,
            car_insurance_form,
            settings_form,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
