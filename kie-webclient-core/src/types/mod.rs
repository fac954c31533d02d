//! 类型定义模块

mod facts;
mod field;
mod group;
mod interaction;
mod settings;

pub use facts::{
    DecodedFacts, Driver, InsertCommand, Policy, DRIVER_ALIAS, DRIVER_FACT_FQDN, POLICY_ALIAS,
    POLICY_FACT_FQDN, RULES_KIE_SESSION_NAME,
};
pub use field::{FieldKind, FieldValue, QualifiedName, NAME_SEPARATOR, SENTINEL_NONE};
pub use group::{Field, Group};
pub use interaction::{Alert, AlertVariant, SaveStatus, ServerInteraction};
pub use settings::{
    CommonSettings, DmnSettings, DroolsSettings, JbpmSettings, KieSettings, SETTINGS_STORAGE_KEY,
};
