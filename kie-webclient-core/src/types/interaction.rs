//! Server interaction state
//!
//! What the presentation layer renders from after a submission: status line,
//! alert banner, confirmation dialog and the debug request/response view.

use serde::Serialize;
use serde_json::Value;

use crate::error::RulesServiceError;
use crate::types::facts::DecodedFacts;

/// Status of the last submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SaveStatus {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "Processing...")]
    Processing,
    #[serde(rename = "ERROR")]
    Error,
}

impl SaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Processing => "Processing...",
            Self::Error => "ERROR",
        }
    }
}

/// Alert banner variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    #[default]
    Default,
    Success,
    Danger,
}

/// Dismissible alert banner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub visible: bool,
    pub variant: AlertVariant,
    pub msg: String,
}

impl Alert {
    #[must_use]
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            visible: true,
            variant: AlertVariant::Success,
            msg: msg.into(),
        }
    }

    #[must_use]
    pub fn danger(msg: impl Into<String>) -> Self {
        Self {
            visible: true,
            variant: AlertVariant::Danger,
            msg: msg.into(),
        }
    }

    /// Danger banner for a rejected call, `"<status>: <response>"`
    #[must_use]
    pub fn from_error(err: &RulesServiceError) -> Self {
        Self::danger(err.to_string())
    }
}

/// Transient record of the last exchange with the rules service
///
/// Reset only by a new submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInteraction {
    pub save_status: SaveStatus,
    pub raw_request: Option<Value>,
    pub raw_response: Option<Value>,
    pub decoded: DecodedFacts,
    pub alert: Alert,
    pub confirmation_open: bool,
    pub debug_expanded: bool,
}

impl ServerInteraction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection: status `ERROR`, raw body kept, danger banner shown
    pub fn record_failure(&mut self, err: &RulesServiceError) {
        self.save_status = SaveStatus::Error;
        self.raw_response = Some(Value::String(err.response.clone()));
        self.alert = Alert::from_error(err);
    }

    pub fn close_alert(&mut self) {
        self.alert = Alert::default();
    }

    pub fn toggle_confirmation(&mut self) {
        self.confirmation_open = !self.confirmation_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_status_serializes_to_display_strings() {
        assert_eq!(serde_json::to_value(SaveStatus::None).unwrap(), "NONE");
        assert_eq!(
            serde_json::to_value(SaveStatus::Processing).unwrap(),
            "Processing..."
        );
        assert_eq!(SaveStatus::Error.as_str(), "ERROR");
    }

    #[test]
    fn record_failure_sets_error_banner() {
        let mut state = ServerInteraction::new();
        state.record_failure(&RulesServiceError::new(500, "boom"));

        assert_eq!(state.save_status, SaveStatus::Error);
        assert_eq!(state.raw_response, Some(Value::String("boom".into())));
        assert!(state.alert.visible);
        assert_eq!(state.alert.variant, AlertVariant::Danger);
        assert_eq!(state.alert.msg, "500: boom");

        state.close_alert();
        assert_eq!(state.alert, Alert::default());
    }
}
