//! Generic field binding and validation engine
//!
//! A [`Form`] owns the state of a fixed set of groups, the validation rule of
//! every field, and the submission gate. Concrete forms are declared with
//! [`FormBuilder`].

pub mod binder;
pub mod gate;
pub mod store;
pub mod validation;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

pub use binder::InputEvent;
pub use gate::{SubmissionGate, SubmissionPhase, SubmissionTicket};
pub use store::FormStateStore;
pub use validation::{Rule, ValidationMarker, ValidationRegistry};

use crate::error::{BindError, Blocked, CoreError, CoreResult};
use crate::types::{Field, FieldKind, FieldValue, Group, QualifiedName};

/// Declaration of one field: kind, initial value and rule
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub property: String,
    pub kind: FieldKind,
    pub initial: FieldValue,
    pub rule: Rule,
}

impl FieldSpec {
    pub fn new(property: impl Into<String>, kind: FieldKind, initial: FieldValue, rule: Rule) -> Self {
        Self {
            property: property.into(),
            kind,
            initial,
            rule,
        }
    }

    pub fn text(property: impl Into<String>, initial: impl Into<String>, rule: Rule) -> Self {
        Self::new(property, FieldKind::Text, FieldValue::Text(initial.into()), rule)
    }

    pub fn integer(property: impl Into<String>, initial: i64, rule: Rule) -> Self {
        Self::new(property, FieldKind::Integer, FieldValue::Integer(initial), rule)
    }

    pub fn decimal(property: impl Into<String>, initial: f64, rule: Rule) -> Self {
        Self::new(property, FieldKind::Decimal, FieldValue::Decimal(initial), rule)
    }

    pub fn boolean(property: impl Into<String>, initial: bool, rule: Rule) -> Self {
        Self::new(property, FieldKind::Boolean, FieldValue::Boolean(initial), rule)
    }

    pub fn choice(
        property: impl Into<String>,
        options: &'static [&'static str],
        initial: &str,
        rule: Rule,
    ) -> Self {
        Self::new(
            property,
            FieldKind::Choice(options),
            FieldValue::Choice(initial.to_string()),
            rule,
        )
    }
}

/// Builder for a [`Form`]
#[derive(Debug, Default)]
pub struct FormBuilder {
    groups: Vec<(String, Vec<FieldSpec>)>,
}

impl FormBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn group(mut self, name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        self.groups.push((name.into(), fields));
        self
    }

    /// Build the form
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` on a duplicate group or property,
    /// or an initial value that does not fit its declared kind.
    pub fn build(self) -> CoreResult<Form> {
        let mut seen_groups = HashSet::new();
        let mut groups = Vec::with_capacity(self.groups.len());
        let mut registry = ValidationRegistry::new();

        for (name, specs) in self.groups {
            if !seen_groups.insert(name.clone()) {
                return Err(CoreError::ValidationError(format!("duplicate group: {name}")));
            }

            let mut seen_fields = HashSet::new();
            let mut fields = Vec::with_capacity(specs.len());
            for spec in specs {
                let qualified = QualifiedName::new(&name, &spec.property);
                if !seen_fields.insert(spec.property.clone()) {
                    return Err(CoreError::ValidationError(format!(
                        "duplicate field: {qualified}"
                    )));
                }
                if !spec.kind.accepts(&spec.initial) {
                    return Err(CoreError::ValidationError(format!(
                        "initial value of {qualified} is not a valid {}",
                        spec.kind.name()
                    )));
                }
                registry.register(qualified, spec.rule);
                fields.push(Field {
                    property: spec.property,
                    kind: spec.kind,
                    value: spec.initial,
                });
            }
            groups.push(Group::new(name, fields));
        }

        Ok(Form {
            store: FormStateStore::new(groups),
            registry,
            gate: SubmissionGate::new(),
        })
    }
}

/// Field state, validation rules and submission gate of one form instance
#[derive(Debug)]
pub struct Form {
    store: FormStateStore,
    registry: ValidationRegistry,
    gate: SubmissionGate,
}

impl Form {
    pub fn store(&self) -> &FormStateStore {
        &self.store
    }

    pub fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut SubmissionGate {
        &mut self.gate
    }

    /// Snapshot of a group
    pub fn group(&self, name: &str) -> Option<Arc<Group>> {
        self.store.get(name)
    }

    /// Group as a flat JSON object
    pub fn group_json(&self, name: &str) -> Option<Value> {
        self.store.get(name).map(|g| g.to_json())
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        let qualified: QualifiedName = name.parse().ok()?;
        self.store.value(&qualified)
    }

    /// Bind a raw value, reporting failures
    pub fn bind(&mut self, name: &str, raw: &str) -> Result<Arc<Group>, BindError> {
        binder::bind(&mut self.store, name, raw)
    }

    /// Bind an input event, reporting failures
    pub fn bind_event(&mut self, event: &InputEvent) -> Result<Arc<Group>, BindError> {
        binder::bind_event(&mut self.store, event)
    }

    /// Bind an input event the way the UI does: errors are logged and dropped
    pub fn on_input(&mut self, event: &InputEvent) -> bool {
        binder::bind_lenient(&mut self.store, event)
    }

    pub fn form_valid(&self) -> bool {
        self.registry.form_valid(&self.store)
    }

    pub fn invalid_fields(&self) -> Vec<QualifiedName> {
        self.registry.invalid_fields(&self.store)
    }

    /// Marker of a field; unknown or malformed names have no rule and read as `Default`
    pub fn marker(&self, name: &str) -> ValidationMarker {
        name.parse::<QualifiedName>()
            .map_or(ValidationMarker::Default, |q| {
                self.registry.marker(&self.store, &q)
            })
    }

    /// Ask the gate for a submission ticket
    pub fn try_begin_submission(&mut self) -> Result<SubmissionTicket, Blocked> {
        self.gate.try_begin(&self.registry, &self.store)
    }
}
