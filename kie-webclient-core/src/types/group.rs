//! Field groups

use serde_json::{Map, Value};

use crate::error::BindError;
use crate::types::field::{FieldKind, FieldValue, QualifiedName};

/// A single declared field inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub property: String,
    pub kind: FieldKind,
    pub value: FieldValue,
}

/// Named collection of related fields (e.g. `driver`, `common`)
///
/// A group is never mutated after construction; [`Group::with_value`] returns
/// an updated copy and leaves `self` as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    fields: Vec<Field>,
}

impl Group {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.property.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.field(property).is_some()
    }

    pub fn field(&self, property: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.property == property)
    }

    pub fn get(&self, property: &str) -> Option<&FieldValue> {
        self.field(property).map(|f| &f.value)
    }

    pub fn kind(&self, property: &str) -> Option<FieldKind> {
        self.field(property).map(|f| f.kind)
    }

    /// Text or choice value, empty string when absent
    pub fn text(&self, property: &str) -> &str {
        self.get(property).and_then(FieldValue::as_str).unwrap_or("")
    }

    /// Copy of this group with `property` set to `value`
    ///
    /// Fails without producing a copy when the property is not declared or the
    /// value does not fit its declared kind.
    pub fn with_value(&self, property: &str, value: FieldValue) -> Result<Self, BindError> {
        let Some(index) = self.fields.iter().position(|f| f.property == property) else {
            return Err(BindError::UnknownField(
                QualifiedName::new(&self.name, property).to_string(),
            ));
        };

        let kind = self.fields[index].kind;
        if !kind.accepts(&value) {
            return Err(BindError::TypeMismatch {
                field: QualifiedName::new(&self.name, property).to_string(),
                expected: kind.name().to_string(),
                raw: value.to_string(),
            });
        }

        let mut fields = self.fields.clone();
        fields[index].value = value;
        Ok(Self {
            name: self.name.clone(),
            fields,
        })
    }

    /// Flat JSON object of property -> value
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.property.clone(), f.value.to_json()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Group {
        Group::new(
            "driver",
            vec![
                Field {
                    property: "name".into(),
                    kind: FieldKind::Text,
                    value: "".into(),
                },
                Field {
                    property: "age".into(),
                    kind: FieldKind::Integer,
                    value: FieldValue::Integer(0),
                },
            ],
        )
    }

    #[test]
    fn with_value_copies_and_keeps_original() {
        let before = driver();
        let after = before.with_value("age", FieldValue::Integer(30)).unwrap();

        assert_eq!(before.get("age"), Some(&FieldValue::Integer(0)));
        assert_eq!(after.get("age"), Some(&FieldValue::Integer(30)));
        assert_eq!(after.get("name"), before.get("name"));
    }

    #[test]
    fn with_value_unknown_property() {
        let res = driver().with_value("height", FieldValue::Integer(180));
        assert_eq!(res, Err(BindError::UnknownField("driver.height".into())));
    }

    #[test]
    fn with_value_wrong_kind() {
        let res = driver().with_value("age", "thirty".into());
        assert!(matches!(res, Err(BindError::TypeMismatch { ref expected, .. }) if expected == "integer"));
    }

    #[test]
    fn to_json_is_flat_object() {
        let json = driver().with_value("name", "Ana".into()).unwrap().to_json();
        assert_eq!(json, serde_json::json!({ "name": "Ana", "age": 0 }));
    }
}
