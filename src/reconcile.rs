//! One-directional merge of a parsed box with freshly fetched data.
//!
//! `current` is the base; `incoming` wins wherever it has a non-empty value
//! that differs, except that an existing image is never replaced. The merge
//! is not commutative.
use crate::model::{FieldValue, ProteinBox};
use crate::schema::{self, ENTREZ_GENE, IMAGE, PATH};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const NO_CHANGE_SUMMARY: &str = "Minor aesthetic updates.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Fields altered by a merge, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    changes: Vec<FieldChange>,
}

impl ChangeLog {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.iter().find(|change| change.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.changes.iter().map(|change| change.field).collect()
    }

    pub(crate) fn record(&mut self, field: &'static str, old: FieldValue, new: FieldValue) {
        self.changes.push(FieldChange { field, old, new });
    }

    /// Edit summary naming the changed fields.
    pub fn summary(&self) -> String {
        match self.changes.len() {
            0 => NO_CHANGE_SUMMARY.to_string(),
            count => {
                let noun = if count == 1 { "field" } else { "fields" };
                format!("Updated {count} {noun}: {}", self.fields().join(", "))
            }
        }
    }
}

impl Serialize for ChangeLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for change in &self.changes {
            map.serialize_entry(change.field, &(&change.old, &change.new))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub merged: ProteinBox,
    pub summary: String,
    pub changes: ChangeLog,
}

pub fn reconcile(current: &ProteinBox, incoming: &ProteinBox) -> Reconciliation {
    let mut merged = current.clone();
    let mut changes = ChangeLog::default();

    for (index, spec) in schema::schema().fields().enumerate() {
        if spec.name == PATH {
            continue;
        }
        let ours = current.value_at(index);
        if spec.name == IMAGE && !ours.is_empty() {
            continue;
        }
        let theirs = incoming.value_at(index);
        if !theirs.is_empty() && ours != theirs {
            changes.record(spec.name, ours.clone(), theirs.clone());
            merged.replace_at(index, theirs.clone());
        }
    }

    if changes.get(ENTREZ_GENE).is_some() {
        rederive_path(&mut merged, &mut changes);
    }

    tracing::debug!(changed = changes.len(), "reconciled protein box");
    Reconciliation {
        merged,
        summary: changes.summary(),
        changes,
    }
}

/// `path` follows the gene id; it never merges on its own.
fn rederive_path(merged: &mut ProteinBox, changes: &mut ChangeLog) {
    let (Some(path), Some(index)) = (merged.derived_path(), schema::schema().index_of(PATH)) else {
        return;
    };
    let derived = FieldValue::Text(path);
    let previous = merged.value_at(index).clone();
    if previous != derived {
        changes.record(PATH, previous, derived.clone());
        merged.replace_at(index, derived);
    }
}
