//! KIE Webclient Core Library
//!
//! Platform-independent form logic for the KIE business application client:
//! - Generic field binding, validation and submission gating (`form`)
//! - Car insurance application form (`CarInsuranceForm`)
//! - KIE server settings form (`SettingsForm`)
//!
//! The rules service and settings persistence are abstracted through traits,
//! so frontends supply their own transport and storage.

pub mod error;
pub mod form;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{BindError, Blocked, CoreError, CoreResult, RulesServiceError};
pub use form::{Form, FormBuilder, InputEvent, SubmissionPhase, ValidationMarker};
pub use services::{CarInsuranceForm, SettingsForm};
pub use traits::{InMemorySettingsStore, RulesService, RulesServiceFactory, SettingsStore};
