use crate::common::Value;
use std::collections::BTreeMap;

/// Lifecycle state of a model instance.
///
/// Tracks whether the instance has ever been persisted, whether it is frozen
/// against mutation, and which attributes changed since the last persist.
/// Changes map a field name to its `(old, new)` value pair; the old side of a
/// never-persisted field is [Value::Null].
#[derive(Clone, Debug, Default)]
pub struct ModelState {
    new_record: bool,
    frozen: bool,
    changes: BTreeMap<String, (Value, Value)>,
}

impl ModelState {
    /// Creates the state of a freshly constructed, unpersisted instance.
    pub fn new_record() -> Self {
        ModelState {
            new_record: true,
            frozen: false,
            changes: BTreeMap::new(),
        }
    }

    /// Creates the state of an instance materialized from the store.
    pub fn persisted() -> Self {
        ModelState {
            new_record: false,
            frozen: false,
            changes: BTreeMap::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.new_record
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn changes(&self) -> &BTreeMap<String, (Value, Value)> {
        &self.changes
    }

    /// Marks the instance immutable. Irreversible.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Records a change, keeping the oldest known old value for the field.
    /// A change back to that old value clears the entry.
    pub(crate) fn record_change(&mut self, field: &str, old: Value, new: Value) {
        match self.changes.remove(field) {
            Some((first_old, _)) => {
                if first_old != new {
                    self.changes.insert(field.to_string(), (first_old, new));
                }
            }
            None => {
                if old != new {
                    self.changes.insert(field.to_string(), (old, new));
                }
            }
        }
    }

    /// Settles the instance after a successful persist.
    pub(crate) fn mark_persisted(&mut self) {
        self.new_record = false;
        self.changes.clear();
    }
}
