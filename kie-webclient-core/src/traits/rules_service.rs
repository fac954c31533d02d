//! Rules service abstraction Trait

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RulesServiceError;
use crate::types::{InsertCommand, KieSettings};

/// Remote rules-evaluation service
///
/// The client depends only on this narrow contract; the wire protocol of the
/// KIE server belongs to the implementation.
#[async_trait]
pub trait RulesService: Send + Sync {
    /// Request body for firing `facts` in `session_name`
    ///
    /// Used for the debug view; `fire_rules` builds its own.
    fn build_request(&self, facts: &[InsertCommand], session_name: &str) -> Value;

    /// Insert the facts and fire all rules
    async fn fire_rules(&self, facts: &[InsertCommand]) -> Result<Value, RulesServiceError>;

    /// Fact returned under `alias` in a `fire_rules` response
    fn extract_fact(&self, response: &Value, alias: &str) -> Option<Value>;

    /// Probe the server with the configured credentials
    ///
    /// The response carries a `type` string describing the outcome.
    async fn test_connection(&self) -> Result<Value, RulesServiceError>;
}

/// Creates a [`RulesService`] bound to a set of connection settings
pub trait RulesServiceFactory: Send + Sync {
    fn connect(&self, settings: &KieSettings) -> Arc<dyn RulesService>;
}
