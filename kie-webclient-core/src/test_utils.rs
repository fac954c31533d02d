//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::RulesServiceError;
use crate::traits::{RulesService, RulesServiceFactory};
use crate::types::{InsertCommand, KieSettings};

// ===== MockRulesService =====

/// Rules service answering from canned results
///
/// A successful `fire_rules` echoes every inserted fact back under its alias,
/// with `approved` set on the policy, in the shape `{ "facts": { alias: fact } }`.
pub struct MockRulesService {
    fire_error: Mutex<Option<RulesServiceError>>,
    connection_result: Mutex<Result<Value, RulesServiceError>>,
    fire_calls: AtomicUsize,
    connection_calls: AtomicUsize,
    last_facts: Mutex<Vec<InsertCommand>>,
}

impl MockRulesService {
    pub fn new() -> Self {
        Self {
            fire_error: Mutex::new(None),
            connection_result: Mutex::new(Ok(json!({ "type": "SUCCESS" }))),
            fire_calls: AtomicUsize::new(0),
            connection_calls: AtomicUsize::new(0),
            last_facts: Mutex::new(Vec::new()),
        }
    }

    /// Make `fire_rules` reject
    pub fn failing(status: u16, response: &str) -> Self {
        let mock = Self::new();
        *mock.fire_error.lock().unwrap() = Some(RulesServiceError::new(status, response));
        mock
    }

    pub fn set_connection_result(&self, result: Result<Value, RulesServiceError>) {
        *self.connection_result.lock().unwrap() = result;
    }

    pub fn fire_calls(&self) -> usize {
        self.fire_calls.load(Ordering::SeqCst)
    }

    pub fn connection_calls(&self) -> usize {
        self.connection_calls.load(Ordering::SeqCst)
    }

    pub fn last_facts(&self) -> Vec<InsertCommand> {
        self.last_facts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RulesService for MockRulesService {
    fn build_request(&self, facts: &[InsertCommand], session_name: &str) -> Value {
        json!({ "lookup": session_name, "commands": facts })
    }

    async fn fire_rules(&self, facts: &[InsertCommand]) -> Result<Value, RulesServiceError> {
        self.fire_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_facts.lock().unwrap() = facts.to_vec();

        if let Some(err) = self.fire_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut results = serde_json::Map::new();
        for fact in facts {
            let mut object = fact.object.clone();
            if fact.out_identifier == "policy" {
                object["approved"] = Value::Bool(true);
            }
            results.insert(fact.out_identifier.clone(), object);
        }
        Ok(json!({ "type": "SUCCESS", "facts": results }))
    }

    fn extract_fact(&self, response: &Value, alias: &str) -> Option<Value> {
        response.get("facts")?.get(alias).cloned()
    }

    async fn test_connection(&self) -> Result<Value, RulesServiceError> {
        self.connection_calls.fetch_add(1, Ordering::SeqCst);
        self.connection_result.lock().unwrap().clone()
    }
}

// ===== MockRulesServiceFactory =====

/// Factory handing out one shared mock and remembering the settings it saw
pub struct MockRulesServiceFactory {
    pub service: Arc<MockRulesService>,
    connected_with: Mutex<Vec<KieSettings>>,
}

impl MockRulesServiceFactory {
    pub fn new(service: Arc<MockRulesService>) -> Self {
        Self {
            service,
            connected_with: Mutex::new(Vec::new()),
        }
    }

    pub fn connected_with(&self) -> Vec<KieSettings> {
        self.connected_with.lock().unwrap().clone()
    }
}

impl RulesServiceFactory for MockRulesServiceFactory {
    fn connect(&self, settings: &KieSettings) -> Arc<dyn RulesService> {
        self.connected_with.lock().unwrap().push(settings.clone());
        Arc::clone(&self.service) as Arc<dyn RulesService>
    }
}
