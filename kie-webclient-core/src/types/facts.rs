//! Facts exchanged with the rules service

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stateless KIE session the car insurance rules run in
pub const RULES_KIE_SESSION_NAME: &str = "stateless-session";

/// Fully-qualified fact type of the driver
pub const DRIVER_FACT_FQDN: &str = "com.redhat.demos.decisiontable.Driver";

/// Fully-qualified fact type of the policy
pub const POLICY_FACT_FQDN: &str = "com.redhat.demos.decisiontable.Policy";

/// Output alias of the driver fact
pub const DRIVER_ALIAS: &str = "driver";

/// Output alias of the policy fact
pub const POLICY_ALIAS: &str = "policy";

/// A fact wrapped for insertion into a KIE session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCommand {
    /// Fully-qualified type of the fact
    pub fact_type: String,
    /// Alias the fact is returned under
    pub out_identifier: String,
    /// Whether the (possibly modified) fact is returned
    pub return_object: bool,
    /// Fact payload
    pub object: Value,
}

impl InsertCommand {
    #[must_use]
    pub fn new(
        fact_type: impl Into<String>,
        out_identifier: impl Into<String>,
        object: Value,
        return_object: bool,
    ) -> Self {
        Self {
            fact_type: fact_type.into(),
            out_identifier: out_identifier.into(),
            return_object,
            object,
        }
    }
}

/// Driver fact as returned by the rules service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Driver {
    pub name: String,
    pub age: i64,
    pub prior_claims: i64,
    pub location_risk_profile: String,
}

/// Policy fact as returned by the rules service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    #[serde(rename = "type")]
    pub policy_type: String,
    pub approved: bool,
    pub discount_percent: i64,
    pub base_price: f64,
}

/// Facts decoded from the last successful response, by alias
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedFacts(BTreeMap<String, Value>);

impl DecodedFacts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, fact: Value) {
        self.0.insert(alias.into(), fact);
    }

    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.0.get(alias)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Typed view of the driver fact
    pub fn driver(&self) -> Option<Driver> {
        self.typed(DRIVER_ALIAS)
    }

    /// Typed view of the policy fact
    pub fn policy(&self) -> Option<Policy> {
        self.typed(POLICY_ALIAS)
    }

    fn typed<T: serde::de::DeserializeOwned>(&self, alias: &str) -> Option<T> {
        let value = self.0.get(alias)?;
        match serde_json::from_value(value.clone()) {
            Ok(fact) => Some(fact),
            Err(e) => {
                log::warn!("Fact '{alias}' does not match its expected shape: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_policy_view() {
        let mut facts = DecodedFacts::new();
        facts.insert(
            POLICY_ALIAS,
            json!({ "type": "COMPREHENSIVE", "approved": true, "discountPercent": 20, "basePrice": 450.5 }),
        );

        let policy = facts.policy().unwrap();
        assert_eq!(policy.policy_type, "COMPREHENSIVE");
        assert!(policy.approved);
        assert_eq!(policy.discount_percent, 20);
        assert!((policy.base_price - 450.5).abs() < f64::EPSILON);
        assert!(facts.driver().is_none());
    }

    #[test]
    fn typed_view_tolerates_missing_fields() {
        let mut facts = DecodedFacts::new();
        facts.insert(DRIVER_ALIAS, json!({ "name": "Ana" }));

        let driver = facts.driver().unwrap();
        assert_eq!(driver.name, "Ana");
        assert_eq!(driver.age, 0);
    }

    #[test]
    fn typed_view_of_wrong_shape_is_none() {
        let mut facts = DecodedFacts::new();
        facts.insert(DRIVER_ALIAS, json!("not an object"));
        assert!(facts.driver().is_none());
    }
}
