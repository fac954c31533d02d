//! KIE server connection settings

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key the settings object lives under
pub const SETTINGS_STORAGE_KEY: &str = "kieSettings";

/// Settings shared by every KIE integration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonSettings {
    pub kie_server_base_url: String,
    pub kie_server_user: String,
    pub kie_server_password: String,
}

/// jBPM process integration (optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JbpmSettings {
    pub container_id: String,
    pub process_id: String,
}

/// Drools rules integration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroolsSettings {
    pub container_id: String,
}

/// DMN decision integration (optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmnSettings {
    pub container_id: String,
    pub model_namespace: String,
    pub model_name: String,
}

/// Persisted KIE settings object
///
/// ```json
/// { "common": { "kieServerBaseUrl": "..." }, "jbpm": {..}, "drools": {..}, "dmn": {..} }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KieSettings {
    pub common: CommonSettings,
    pub jbpm: JbpmSettings,
    pub drools: DroolsSettings,
    pub dmn: DmnSettings,
}

impl KieSettings {
    /// Parse a stored settings object, field by field
    ///
    /// Malformed JSON, a missing group, or a missing/non-string property never
    /// fails: the affected field falls back to an empty string.
    #[must_use]
    pub fn from_json_lenient(raw: &str) -> Self {
        let root: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("{SETTINGS_STORAGE_KEY} is not valid JSON, using defaults: {e}");
                Value::Null
            }
        };
        Self::from_value_lenient(&root)
    }

    /// Same as [`KieSettings::from_json_lenient`] on an already parsed value
    #[must_use]
    pub fn from_value_lenient(root: &Value) -> Self {
        let field = |group: &str, property: &str| -> String {
            root.get(group)
                .and_then(|g| g.get(property))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            common: CommonSettings {
                kie_server_base_url: field("common", "kieServerBaseUrl"),
                kie_server_user: field("common", "kieServerUser"),
                kie_server_password: field("common", "kieServerPassword"),
            },
            jbpm: JbpmSettings {
                container_id: field("jbpm", "containerId"),
                process_id: field("jbpm", "processId"),
            },
            drools: DroolsSettings {
                container_id: field("drools", "containerId"),
            },
            dmn: DmnSettings {
                container_id: field("dmn", "containerId"),
                model_namespace: field("dmn", "modelNamespace"),
                model_name: field("dmn", "modelName"),
            },
        }
    }
}
