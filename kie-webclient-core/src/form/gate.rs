//! Submission gate
//!
//! Re-checks form validity at submit time and allows one outstanding
//! submission at a time.
//!
//! ```text
//! Idle ──try_begin──▶ Submitting ──finish──▶ Succeeded | Failed ──acknowledge──▶ Idle
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::error::Blocked;
use crate::form::store::FormStateStore;
use crate::form::validation::ValidationRegistry;

/// Gate phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Token for the single outstanding submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(Uuid);

impl SubmissionTicket {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Single-in-flight submission guard
#[derive(Debug, Default)]
pub struct SubmissionGate {
    phase: SubmissionPhase,
    outstanding: Option<SubmissionTicket>,
}

impl SubmissionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Start a submission if the form is valid and nothing is outstanding
    ///
    /// A finished submission is acknowledged implicitly.
    pub fn try_begin(
        &mut self,
        registry: &ValidationRegistry,
        store: &FormStateStore,
    ) -> Result<SubmissionTicket, Blocked> {
        if self.is_in_flight() {
            return Err(Blocked::InFlight);
        }

        if !registry.form_valid(store) {
            let fields = registry
                .invalid_fields(store)
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(Blocked::Invalid { fields });
        }

        self.acknowledge();
        let ticket = SubmissionTicket(Uuid::new_v4());
        self.phase = SubmissionPhase::Submitting;
        self.outstanding = Some(ticket);
        log::debug!("Submission {} started", ticket.id());
        Ok(ticket)
    }

    /// Close the outstanding submission
    ///
    /// Returns `false`, changing nothing, when `ticket` is not the outstanding one.
    pub fn finish(&mut self, ticket: SubmissionTicket, succeeded: bool) -> bool {
        if self.outstanding != Some(ticket) {
            log::warn!("Ignoring completion of stale submission {}", ticket.id());
            return false;
        }
        self.outstanding = None;
        self.phase = if succeeded {
            SubmissionPhase::Succeeded
        } else {
            SubmissionPhase::Failed
        };
        true
    }

    /// Return to `Idle` after a finished submission
    pub fn acknowledge(&mut self) {
        if matches!(
            self.phase,
            SubmissionPhase::Succeeded | SubmissionPhase::Failed
        ) {
            self.phase = SubmissionPhase::Idle;
        }
    }

    /// Drop any outstanding submission; its completion will be ignored
    pub fn reset(&mut self) {
        self.phase = SubmissionPhase::Idle;
        self.outstanding = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::Rule;
    use crate::types::{Field, FieldKind, FieldValue, Group, QualifiedName};

    fn fixture(name: &str) -> (FormStateStore, ValidationRegistry) {
        let store = FormStateStore::new(vec![Group::new(
            "driver",
            vec![Field {
                property: "name".into(),
                kind: FieldKind::Text,
                value: FieldValue::from(name),
            }],
        )]);
        let mut registry = ValidationRegistry::new();
        registry.register(QualifiedName::new("driver", "name"), Rule::NonEmpty);
        (store, registry)
    }

    #[test]
    fn invalid_form_is_blocked() {
        let (store, registry) = fixture("");
        let mut gate = SubmissionGate::new();

        let res = gate.try_begin(&registry, &store);

        assert_eq!(
            res,
            Err(Blocked::Invalid {
                fields: vec!["driver.name".into()]
            })
        );
        assert_eq!(gate.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let (store, registry) = fixture("Ana");
        let mut gate = SubmissionGate::new();

        let ticket = gate.try_begin(&registry, &store).unwrap();
        assert_eq!(gate.try_begin(&registry, &store), Err(Blocked::InFlight));

        assert!(gate.finish(ticket, true));
        assert_eq!(gate.phase(), SubmissionPhase::Succeeded);

        let again = gate.try_begin(&registry, &store).unwrap();
        assert_ne!(again, ticket);
        assert_eq!(gate.phase(), SubmissionPhase::Submitting);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let (store, registry) = fixture("Ana");
        let mut gate = SubmissionGate::new();

        let stale = gate.try_begin(&registry, &store).unwrap();
        gate.reset();
        let current = gate.try_begin(&registry, &store).unwrap();

        assert!(!gate.finish(stale, false));
        assert_eq!(gate.phase(), SubmissionPhase::Submitting);
        assert!(gate.finish(current, false));
        assert_eq!(gate.phase(), SubmissionPhase::Failed);

        gate.acknowledge();
        assert_eq!(gate.phase(), SubmissionPhase::Idle);
    }
}
