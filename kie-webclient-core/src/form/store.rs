//! Form state store
//!
//! Holds the current value of every field, partitioned into groups fixed at
//! construction. Updates swap in a fresh copy of the affected group, so a
//! snapshot handed out by [`FormStateStore::get`] never changes under its holder.

use std::sync::Arc;

use crate::error::BindError;
use crate::types::{FieldValue, Group, QualifiedName};

/// Current values of a form's fields
#[derive(Debug, Clone, Default)]
pub struct FormStateStore {
    groups: Vec<Arc<Group>>,
}

impl FormStateStore {
    #[must_use]
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: groups.into_iter().map(Arc::new).collect(),
        }
    }

    /// Snapshot of a group
    pub fn get(&self, group: &str) -> Option<Arc<Group>> {
        self.groups.iter().find(|g| g.name() == group).cloned()
    }

    /// Groups in declaration order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().map(|g| &**g)
    }

    /// Current value of a single field
    pub fn value(&self, name: &QualifiedName) -> Option<&FieldValue> {
        self.groups
            .iter()
            .find(|g| g.name() == name.group)
            .and_then(|g| g.get(&name.property))
    }

    /// Set one field, returning the new group
    ///
    /// Only properties already declared in the group can be set, and only with
    /// a value of the declared kind. On error nothing changes.
    pub fn set(
        &mut self,
        group: &str,
        property: &str,
        value: FieldValue,
    ) -> Result<Arc<Group>, BindError> {
        let slot = self
            .groups
            .iter_mut()
            .find(|g| g.name() == group)
            .ok_or_else(|| BindError::UnknownGroup(group.to_string()))?;

        let updated = Arc::new(slot.with_value(property, value)?);
        *slot = Arc::clone(&updated);
        Ok(updated)
    }
}
