//! Input binder
//!
//! Turns frontend input events into typed field updates.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::BindError;
use crate::form::store::FormStateStore;
use crate::types::{Group, QualifiedName};

/// Input event as delivered by a frontend
///
/// Text inputs and selects identify the field by element id, radio groups by
/// their shared name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputEvent {
    Text { id: String, value: String },
    Radio { name: String, value: String },
    Select { id: String, value: String },
}

impl InputEvent {
    /// The `(qualified name, raw value)` pair carried by the event
    pub fn target(&self) -> (&str, &str) {
        match self {
            Self::Text { id, value } | Self::Select { id, value } => (id.as_str(), value.as_str()),
            Self::Radio { name, value } => (name.as_str(), value.as_str()),
        }
    }
}

/// Apply a raw value to the field named `name`
///
/// The raw string is converted to the field's declared kind before it is
/// stored; on any error the previous value stays in place.
pub fn bind(store: &mut FormStateStore, name: &str, raw: &str) -> Result<Arc<Group>, BindError> {
    let qualified: QualifiedName = name.parse()?;

    let group = store
        .get(&qualified.group)
        .ok_or_else(|| BindError::UnknownGroup(qualified.group.clone()))?;
    let kind = group
        .kind(&qualified.property)
        .ok_or_else(|| BindError::UnknownField(qualified.to_string()))?;

    let value = kind.coerce(raw).ok_or_else(|| BindError::TypeMismatch {
        field: qualified.to_string(),
        expected: kind.name().to_string(),
        raw: raw.to_string(),
    })?;

    store.set(&qualified.group, &qualified.property, value)
}

/// Apply an input event
pub fn bind_event(store: &mut FormStateStore, event: &InputEvent) -> Result<Arc<Group>, BindError> {
    let (name, raw) = event.target();
    bind(store, name, raw)
}

/// Apply an input event, ignoring anything that does not bind
///
/// Default frontend behaviour: a stray or unparsable input is dropped rather
/// than surfaced to the user.
pub fn bind_lenient(store: &mut FormStateStore, event: &InputEvent) -> bool {
    match bind_event(store, event) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("Ignored input event: {e}");
            false
        }
    }
}
