//! Form services
//!
//! Concrete forms built on the generic [`crate::form`] engine.

mod car_insurance;
mod settings_form;

pub use car_insurance::{
    CarInsuranceForm, PendingSubmission, SubmissionOutcome, LOCATION_RISK_OPTIONS,
    POLICY_TYPE_OPTIONS,
};
pub use settings_form::SettingsForm;
