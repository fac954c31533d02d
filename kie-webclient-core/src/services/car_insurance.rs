//! Car insurance application form
//!
//! Collects a driver and a policy, and sends both to the rules service for
//! decisioning. Submission is split into three steps so no borrow of the
//! form is held while the service call is pending:
//!
//! 1. [`CarInsuranceForm::begin_submit`] checks the gate and snapshots the facts
//! 2. [`PendingSubmission::run`] calls the service
//! 3. [`CarInsuranceForm::complete`] folds the outcome into the interaction state

use std::sync::Arc;

use serde_json::Value;

use crate::error::{BindError, CoreError, CoreResult, RulesServiceError};
use crate::form::{
    FieldSpec, Form, FormBuilder, InputEvent, Rule, SubmissionTicket, ValidationMarker,
};
use crate::traits::RulesService;
use crate::types::{
    DecodedFacts, FieldValue, Group, InsertCommand, SaveStatus, ServerInteraction, DRIVER_ALIAS,
    DRIVER_FACT_FQDN, POLICY_ALIAS, POLICY_FACT_FQDN, RULES_KIE_SESSION_NAME, SENTINEL_NONE,
};

/// Location risk options; `NONE` means not selected
pub const LOCATION_RISK_OPTIONS: &[&str] = &[SENTINEL_NONE, "LOW", "MED", "HIGH"];

/// Policy type options; `NONE` means not selected
pub const POLICY_TYPE_OPTIONS: &[&str] =
    &[SENTINEL_NONE, "COMPREHENSIVE", "FIRE_THEFT", "THIRD_PARTY"];

fn build_form() -> CoreResult<Form> {
    FormBuilder::new()
        .group(
            DRIVER_ALIAS,
            vec![
                FieldSpec::text("name", "", Rule::NonEmpty),
                FieldSpec::integer("age", 0, Rule::at_least(1)),
                FieldSpec::integer("priorClaims", 0, Rule::between(0, 100)),
                FieldSpec::choice(
                    "locationRiskProfile",
                    LOCATION_RISK_OPTIONS,
                    SENTINEL_NONE,
                    Rule::NotSentinel(SENTINEL_NONE),
                ),
            ],
        )
        .group(
            POLICY_ALIAS,
            vec![
                FieldSpec::choice(
                    "type",
                    POLICY_TYPE_OPTIONS,
                    SENTINEL_NONE,
                    Rule::NotSentinel(SENTINEL_NONE),
                ),
                FieldSpec::boolean("approved", false, Rule::AlwaysValid),
                FieldSpec::integer("discountPercent", 0, Rule::AlwaysValid),
                FieldSpec::decimal("basePrice", 0.0, Rule::AlwaysValid),
            ],
        )
        .build()
}

/// Submission waiting on the rules service
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    service: Arc<dyn RulesService>,
    facts: Vec<InsertCommand>,
    raw_request: Value,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub fn facts(&self) -> &[InsertCommand] {
        &self.facts
    }

    /// Call the rules service
    pub async fn run(self) -> SubmissionOutcome {
        let result = self.service.fire_rules(&self.facts).await;
        SubmissionOutcome {
            ticket: self.ticket,
            raw_request: self.raw_request,
            result,
        }
    }
}

/// Result of a [`PendingSubmission`]
#[derive(Debug)]
pub struct SubmissionOutcome {
    ticket: SubmissionTicket,
    raw_request: Value,
    result: Result<Value, RulesServiceError>,
}

impl SubmissionOutcome {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub fn result(&self) -> &Result<Value, RulesServiceError> {
        &self.result
    }
}

/// Car insurance form instance
pub struct CarInsuranceForm {
    form: Form,
    interaction: ServerInteraction,
    rules_service: Arc<dyn RulesService>,
}

impl CarInsuranceForm {
    /// Create a form with default driver and policy values
    pub fn new(rules_service: Arc<dyn RulesService>) -> CoreResult<Self> {
        Ok(Self {
            form: build_form()?,
            interaction: ServerInteraction::new(),
            rules_service,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn interaction(&self) -> &ServerInteraction {
        &self.interaction
    }

    /// Swap the rules service (e.g. after the settings changed)
    pub fn set_rules_service(&mut self, rules_service: Arc<dyn RulesService>) {
        self.rules_service = rules_service;
    }

    pub fn driver(&self) -> Option<Arc<Group>> {
        self.form.group(DRIVER_ALIAS)
    }

    pub fn policy(&self) -> Option<Arc<Group>> {
        self.form.group(POLICY_ALIAS)
    }

    /// UI input handler; unknown or unparsable input is dropped
    pub fn on_input(&mut self, event: &InputEvent) -> bool {
        self.form.on_input(event)
    }

    pub fn bind(&mut self, name: &str, raw: &str) -> Result<Arc<Group>, BindError> {
        self.form.bind(name, raw)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.form.value(name)
    }

    pub fn marker(&self, name: &str) -> ValidationMarker {
        self.form.marker(name)
    }

    /// Whether the submit affordance should be enabled
    pub fn form_valid(&self) -> bool {
        self.form.form_valid()
    }

    /// Insert commands for the current driver and policy
    pub fn facts(&self) -> Vec<InsertCommand> {
        let mut facts = Vec::with_capacity(2);
        if let Some(driver) = self.form.group_json(DRIVER_ALIAS) {
            facts.push(InsertCommand::new(DRIVER_FACT_FQDN, DRIVER_ALIAS, driver, true));
        }
        if let Some(policy) = self.form.group_json(POLICY_ALIAS) {
            facts.push(InsertCommand::new(POLICY_FACT_FQDN, POLICY_ALIAS, policy, true));
        }
        facts
    }

    /// Check the gate and prepare the service call
    ///
    /// On success the status becomes `Processing...` and the previous alert,
    /// confirmation and decoded facts are cleared.
    pub fn begin_submit(&mut self) -> CoreResult<PendingSubmission> {
        let ticket = self.form.try_begin_submission().map_err(|e| {
            log::warn!("Submission blocked: {e}");
            CoreError::from(e)
        })?;

        let facts = self.facts();
        let raw_request = self
            .rules_service
            .build_request(&facts, RULES_KIE_SESSION_NAME);

        self.interaction.save_status = SaveStatus::Processing;
        self.interaction.close_alert();
        self.interaction.confirmation_open = false;
        self.interaction.decoded = DecodedFacts::new();

        Ok(PendingSubmission {
            ticket,
            service: Arc::clone(&self.rules_service),
            facts,
            raw_request,
        })
    }

    /// Apply a finished submission
    ///
    /// Returns `false` and changes nothing for an outcome that is no longer
    /// the outstanding submission.
    pub fn complete(&mut self, outcome: SubmissionOutcome) -> bool {
        let succeeded = outcome.result.is_ok();
        if !self.form.gate_mut().finish(outcome.ticket, succeeded) {
            return false;
        }

        match outcome.result {
            Ok(response) => {
                for alias in [DRIVER_ALIAS, POLICY_ALIAS] {
                    match self.rules_service.extract_fact(&response, alias) {
                        Some(fact) => self.interaction.decoded.insert(alias, fact),
                        None => log::warn!("Response carries no '{alias}' fact"),
                    }
                }
                self.interaction.save_status = SaveStatus::None;
                self.interaction.raw_response = Some(response);
                self.interaction.confirmation_open = true;
                log::info!("Application submitted");
            }
            Err(e) => {
                if e.is_client_error() {
                    log::warn!("Rules service rejected the application: {e}");
                } else {
                    log::error!("Rules service call failed: {e}");
                }
                self.interaction.record_failure(&e);
            }
        }
        self.interaction.raw_request = Some(outcome.raw_request);
        true
    }

    /// Submit and wait for the outcome
    ///
    /// A rejection is folded into the interaction state and also returned.
    pub async fn submit(&mut self) -> CoreResult<()> {
        let pending = self.begin_submit()?;
        let outcome = pending.run().await;
        let error = outcome.result.as_ref().err().cloned();
        self.complete(outcome);
        match error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn close_alert(&mut self) {
        self.interaction.close_alert();
    }

    pub fn toggle_confirmation(&mut self) {
        self.interaction.toggle_confirmation();
    }

    pub fn set_debug_expanded(&mut self, expanded: bool) {
        self.interaction.debug_expanded = expanded;
    }

    /// Abandon the outstanding submission
    ///
    /// For a [`PendingSubmission`] that was dropped or whose future was
    /// cancelled. A later `complete` for it is ignored. Returns `false` when
    /// nothing was outstanding.
    pub fn cancel_submit(&mut self) -> bool {
        if !self.form.gate().is_in_flight() {
            return false;
        }
        self.form.gate_mut().reset();
        self.interaction.save_status = SaveStatus::None;
        log::debug!("Outstanding submission cancelled");
        true
    }
}
