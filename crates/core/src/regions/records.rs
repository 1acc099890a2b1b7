//! Committed tagging outcomes.

use chrono::{DateTime, Utc};
use healthdesk_uuid::{RecordId, RecordStamp};
use serde::Serialize;

/// An immutable outcome of one tagging session.
///
/// `selected_tags` keeps the order of the selection at commit time. Corrections are made by
/// committing a new record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SymptomRecord {
    pub id: RecordId,
    pub region_id: String,
    pub region_name: String,
    pub selected_tags: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only record list owned by the page session.
#[derive(Clone, Debug, Default)]
pub struct SymptomLog {
    records: Vec<SymptomRecord>,
    last_stamp: Option<RecordStamp>,
}

impl SymptomLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp and append a record. Timestamps are strictly increasing in append order.
    pub(crate) fn append(
        &mut self,
        region_id: &str,
        region_name: &str,
        selected_tags: Vec<String>,
        notes: String,
    ) -> &SymptomRecord {
        let stamp = RecordStamp::generate(self.last_stamp.as_ref());
        self.last_stamp = Some(stamp);
        self.records.push(SymptomRecord {
            id: stamp.id(),
            region_id: region_id.to_string(),
            region_name: region_name.to_string(),
            selected_tags,
            notes,
            created_at: stamp.created_at(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn get(&self, id: RecordId) -> Option<&SymptomRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn as_slice(&self) -> &[SymptomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
