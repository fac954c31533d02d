//! KIE server settings form
//!
//! Edits the persisted [`KieSettings`] object. Saving writes the whole object
//! through the injected [`SettingsStore`]; testing the connection uses the
//! current, possibly unsaved, values.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{BindError, CoreError, CoreResult};
use crate::form::{FieldSpec, Form, FormBuilder, InputEvent, Rule, ValidationMarker};
use crate::traits::{RulesServiceFactory, SettingsStore};
use crate::types::{
    Alert, CommonSettings, DmnSettings, DroolsSettings, FieldValue, Group, JbpmSettings,
    KieSettings, SaveStatus, ServerInteraction,
};

const COMMON: &str = "common";
const JBPM: &str = "jbpm";
const DROOLS: &str = "drools";
const DMN: &str = "dmn";

fn build_form(settings: &KieSettings) -> CoreResult<Form> {
    let KieSettings {
        common,
        jbpm,
        drools,
        dmn,
    } = settings;

    FormBuilder::new()
        .group(
            COMMON,
            vec![
                FieldSpec::text("kieServerBaseUrl", &common.kie_server_base_url, Rule::NonEmpty),
                FieldSpec::text("kieServerUser", &common.kie_server_user, Rule::NonEmpty),
                FieldSpec::text(
                    "kieServerPassword",
                    &common.kie_server_password,
                    Rule::NonEmpty,
                ),
            ],
        )
        .group(
            JBPM,
            vec![
                FieldSpec::text("containerId", &jbpm.container_id, Rule::AlwaysValid),
                FieldSpec::text("processId", &jbpm.process_id, Rule::AlwaysValid),
            ],
        )
        .group(
            DROOLS,
            vec![FieldSpec::text(
                "containerId",
                &drools.container_id,
                Rule::NonEmpty,
            )],
        )
        .group(
            DMN,
            vec![
                FieldSpec::text("containerId", &dmn.container_id, Rule::AlwaysValid),
                FieldSpec::text("modelNamespace", &dmn.model_namespace, Rule::AlwaysValid),
                FieldSpec::text("modelName", &dmn.model_name, Rule::AlwaysValid),
            ],
        )
        .build()
}

/// Settings form instance
pub struct SettingsForm {
    form: Form,
    interaction: ServerInteraction,
    store: Arc<dyn SettingsStore>,
}

impl SettingsForm {
    /// Create a form seeded from the store
    pub async fn load(store: Arc<dyn SettingsStore>) -> CoreResult<Self> {
        let settings = store.load().await;
        Self::from_settings(&settings, store)
    }

    pub fn from_settings(settings: &KieSettings, store: Arc<dyn SettingsStore>) -> CoreResult<Self> {
        Ok(Self {
            form: build_form(settings)?,
            interaction: ServerInteraction::new(),
            store,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn interaction(&self) -> &ServerInteraction {
        &self.interaction
    }

    pub fn on_input(&mut self, event: &InputEvent) -> bool {
        self.form.on_input(event)
    }

    pub fn bind(&mut self, name: &str, raw: &str) -> Result<Arc<Group>, BindError> {
        self.form.bind(name, raw)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.form.value(name)
    }

    pub fn marker(&self, name: &str) -> ValidationMarker {
        self.form.marker(name)
    }

    pub fn form_valid(&self) -> bool {
        self.form.form_valid()
    }

    /// Current field values as a settings object
    pub fn settings(&self) -> KieSettings {
        let text = |group: &str, property: &str| -> String {
            self.form
                .group(group)
                .map(|g| g.text(property).to_string())
                .unwrap_or_default()
        };

        KieSettings {
            common: CommonSettings {
                kie_server_base_url: text(COMMON, "kieServerBaseUrl"),
                kie_server_user: text(COMMON, "kieServerUser"),
                kie_server_password: text(COMMON, "kieServerPassword"),
            },
            jbpm: JbpmSettings {
                container_id: text(JBPM, "containerId"),
                process_id: text(JBPM, "processId"),
            },
            drools: DroolsSettings {
                container_id: text(DROOLS, "containerId"),
            },
            dmn: DmnSettings {
                container_id: text(DMN, "containerId"),
                model_namespace: text(DMN, "modelNamespace"),
                model_name: text(DMN, "modelName"),
            },
        }
    }

    /// Persist the current values
    pub async fn save(&mut self) -> CoreResult<()> {
        let ticket = self.form.try_begin_submission().map_err(|e| {
            log::warn!("Settings save blocked: {e}");
            CoreError::from(e)
        })?;

        let settings = self.settings();
        let result = self.store.save(&settings).await;
        self.form.gate_mut().finish(ticket, result.is_ok());

        match result {
            Ok(()) => {
                self.interaction.save_status = SaveStatus::None;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save settings: {e}");
                self.interaction.save_status = SaveStatus::Error;
                self.interaction.alert = Alert::danger(e.to_string());
                Err(e)
            }
        }
    }

    /// Try the current values against the server
    pub async fn test_connection(&mut self, factory: &dyn RulesServiceFactory) -> CoreResult<()> {
        let ticket = self.form.try_begin_submission().map_err(|e| {
            log::warn!("Connection test blocked: {e}");
            CoreError::from(e)
        })?;

        self.interaction.save_status = SaveStatus::Processing;
        self.interaction.close_alert();

        let service = factory.connect(&self.settings());
        let result = service.test_connection().await;
        if !self.form.gate_mut().finish(ticket, result.is_ok()) {
            return Ok(());
        }

        match result {
            Ok(response) => {
                let kind = response
                    .get("type")
                    .map(|t| match t {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default();
                log::info!("Connection test succeeded: {kind}");
                self.interaction.save_status = SaveStatus::None;
                self.interaction.raw_response = Some(response);
                self.interaction.alert = Alert::success(kind);
                Ok(())
            }
            Err(e) => {
                log::warn!("Connection test failed: {e}");
                self.interaction.record_failure(&e);
                Err(e.into())
            }
        }
    }

    pub fn close_alert(&mut self) {
        self.interaction.close_alert();
    }

    /// Release the gate after a `save` or `test_connection` future was dropped
    ///
    /// Returns `false` when nothing was outstanding.
    pub fn cancel(&mut self) -> bool {
        if !self.form.gate().is_in_flight() {
            return false;
        }
        self.form.gate_mut().reset();
        self.interaction.save_status = SaveStatus::None;
        log::debug!("Outstanding settings request cancelled");
        true
    }
}
