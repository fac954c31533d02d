//! Validation registry
//!
//! One rule per field, evaluated against the live group state on every query.
//! Nothing is cached, so a marker can never disagree with its predicate.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::form::store::FormStateStore;
use crate::types::{FieldValue, Group, QualifiedName};

/// Group-scoped predicate
pub type GroupPredicate = Arc<dyn Fn(&Group) -> bool + Send + Sync>;

/// Validation rule of a single field
#[derive(Clone)]
pub enum Rule {
    /// Fails iff the value is the empty string
    NonEmpty,
    /// Fails iff the integer is outside the inclusive bounds
    IntRange { min: Option<i64>, max: Option<i64> },
    /// Fails iff the value equals the sentinel
    NotSentinel(&'static str),
    /// Never fails (optional fields)
    AlwaysValid,
    /// Arbitrary predicate over the field's whole group
    Custom(GroupPredicate),
}

impl Rule {
    #[must_use]
    pub fn at_least(min: i64) -> Self {
        Self::IntRange {
            min: Some(min),
            max: None,
        }
    }

    #[must_use]
    pub fn between(min: i64, max: i64) -> Self {
        Self::IntRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn custom(f: impl Fn(&Group) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate against the current group
    ///
    /// A missing value, or one of a kind the rule does not understand, fails.
    pub fn check(&self, group: &Group, property: &str) -> bool {
        let value = group.get(property);
        match self {
            Self::AlwaysValid => true,
            Self::Custom(f) => f(group),
            Self::NonEmpty => value
                .and_then(FieldValue::as_str)
                .is_some_and(|s| !s.is_empty()),
            Self::IntRange { min, max } => value.and_then(FieldValue::as_i64).is_some_and(|v| {
                min.is_none_or(|lo| v >= lo) && max.is_none_or(|hi| v <= hi)
            }),
            Self::NotSentinel(sentinel) => value
                .and_then(FieldValue::as_str)
                .is_some_and(|s| s != *sentinel),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmpty => f.write_str("NonEmpty"),
            Self::IntRange { min, max } => f
                .debug_struct("IntRange")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::NotSentinel(s) => f.debug_tuple("NotSentinel").field(s).finish(),
            Self::AlwaysValid => f.write_str("AlwaysValid"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Display marker of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMarker {
    #[default]
    Default,
    Error,
}

impl From<bool> for ValidationMarker {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Default
        } else {
            Self::Error
        }
    }
}

/// Rules of every field of a form, keyed by qualified name
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    rules: Vec<(QualifiedName, Rule)>,
}

impl ValidationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the rule of a field
    pub fn register(&mut self, name: QualifiedName, rule: Rule) {
        if let Some(slot) = self.rules.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = rule;
        } else {
            self.rules.push((name, rule));
        }
    }

    pub fn rule(&self, name: &QualifiedName) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Whether a field currently passes
    ///
    /// Fields without a rule pass; fields whose group is gone fail.
    pub fn is_valid(&self, store: &FormStateStore, name: &QualifiedName) -> bool {
        let Some(rule) = self.rule(name) else {
            return true;
        };
        store
            .get(&name.group)
            .is_some_and(|group| rule.check(&group, &name.property))
    }

    pub fn marker(&self, store: &FormStateStore, name: &QualifiedName) -> ValidationMarker {
        self.is_valid(store, name).into()
    }

    /// Aggregate validity, group by group
    ///
    /// Stops at the first group holding a failing field.
    pub fn form_valid(&self, store: &FormStateStore) -> bool {
        store.groups().all(|group| self.group_valid(store, group.name()))
    }

    /// Whether every field of one group passes
    pub fn group_valid(&self, store: &FormStateStore, group: &str) -> bool {
        self.rules
            .iter()
            .filter(|(n, _)| n.group == group)
            .all(|(n, _)| self.is_valid(store, n))
    }

    /// Every failing field, in registration order
    pub fn invalid_fields(&self, store: &FormStateStore) -> Vec<QualifiedName> {
        self.rules
            .iter()
            .filter(|(n, _)| !self.is_valid(store, n))
            .map(|(n, _)| n.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, FieldKind};

    const RISK: &[&str] = &["NONE", "LOW", "MED", "HIGH"];

    fn field(property: &str, kind: FieldKind, value: FieldValue) -> Field {
        Field {
            property: property.into(),
            kind,
            value,
        }
    }

    fn fixture() -> (FormStateStore, ValidationRegistry) {
        let store = FormStateStore::new(vec![Group::new(
            "driver",
            vec![
                field("name", FieldKind::Text, "".into()),
                field("age", FieldKind::Integer, FieldValue::Integer(0)),
                field("priorClaims", FieldKind::Integer, FieldValue::Integer(0)),
                field(
                    "locationRiskProfile",
                    FieldKind::Choice(RISK),
                    FieldValue::Choice("NONE".into()),
                ),
            ],
        )]);

        let mut registry = ValidationRegistry::new();
        registry.register(QualifiedName::new("driver", "name"), Rule::NonEmpty);
        registry.register(QualifiedName::new("driver", "age"), Rule::at_least(1));
        registry.register(
            QualifiedName::new("driver", "priorClaims"),
            Rule::between(0, 100),
        );
        registry.register(
            QualifiedName::new("driver", "locationRiskProfile"),
            Rule::NotSentinel("NONE"),
        );
        (store, registry)
    }

    fn is_valid_with(property: &str, value: FieldValue) -> bool {
        let (mut store, registry) = fixture();
        store.set("driver", property, value).unwrap();
        registry.is_valid(&store, &QualifiedName::new("driver", property))
    }

    #[test]
    fn age_boundary() {
        assert!(!is_valid_with("age", FieldValue::Integer(0)));
        assert!(is_valid_with("age", FieldValue::Integer(1)));
    }

    #[test]
    fn prior_claims_boundaries() {
        assert!(!is_valid_with("priorClaims", FieldValue::Integer(-1)));
        assert!(is_valid_with("priorClaims", FieldValue::Integer(0)));
        assert!(is_valid_with("priorClaims", FieldValue::Integer(100)));
        assert!(!is_valid_with("priorClaims", FieldValue::Integer(101)));
    }

    #[test]
    fn sentinel_is_invalid_any_option_valid() {
        assert!(!is_valid_with(
            "locationRiskProfile",
            FieldValue::Choice("NONE".into())
        ));
        for option in ["LOW", "MED", "HIGH"] {
            assert!(is_valid_with(
                "locationRiskProfile",
                FieldValue::Choice(option.into())
            ));
        }
    }

    #[test]
    fn non_empty_text() {
        assert!(!is_valid_with("name", "".into()));
        assert!(is_valid_with("name", " ".into()));
    }

    #[test]
    fn marker_follows_live_state() {
        let (mut store, registry) = fixture();
        let name = QualifiedName::new("driver", "name");
        assert_eq!(registry.marker(&store, &name), ValidationMarker::Error);

        store.set("driver", "name", "Ana".into()).unwrap();
        assert_eq!(registry.marker(&store, &name), ValidationMarker::Default);

        store.set("driver", "name", "".into()).unwrap();
        assert_eq!(registry.marker(&store, &name), ValidationMarker::Error);
    }

    #[test]
    fn form_valid_requires_every_field() {
        let (mut store, registry) = fixture();
        assert!(!registry.form_valid(&store));
        assert_eq!(registry.invalid_fields(&store).len(), 3);

        store.set("driver", "name", "Ana".into()).unwrap();
        store.set("driver", "age", FieldValue::Integer(30)).unwrap();
        store
            .set("driver", "locationRiskProfile", FieldValue::Choice("LOW".into()))
            .unwrap();
        assert!(registry.form_valid(&store));
        assert!(registry.invalid_fields(&store).is_empty());
    }

    #[test]
    fn custom_rule_sees_whole_group() {
        let (mut store, mut registry) = fixture();
        registry.register(
            QualifiedName::new("driver", "priorClaims"),
            Rule::custom(|g| {
                let age = g.get("age").and_then(FieldValue::as_i64).unwrap_or(0);
                let claims = g.get("priorClaims").and_then(FieldValue::as_i64).unwrap_or(0);
                claims <= age
            }),
        );
        let claims = QualifiedName::new("driver", "priorClaims");

        store.set("driver", "priorClaims", FieldValue::Integer(5)).unwrap();
        assert!(!registry.is_valid(&store, &claims));

        store.set("driver", "age", FieldValue::Integer(40)).unwrap();
        assert!(registry.is_valid(&store, &claims));
    }

    #[test]
    fn rule_on_wrong_kind_fails() {
        let group = Group::new("g", vec![field("n", FieldKind::Text, "12".into())]);
        assert!(!Rule::at_least(1).check(&group, "n"));
        assert!(!Rule::NonEmpty.check(&group, "missing"));
    }
}
