//! The region tagging state machine.
//!
//! `Idle → RegionActive → (commit | cancel) → Idle`. At most one [`RegionSession`] is live per
//! selector; activating a region while another is open discards the open one without a record.

use super::records::{SymptomLog, SymptomRecord};
use super::{Point, Region, RegionCatalogue};
use crate::error::{HealthError, HealthResult};
use std::sync::Arc;

/// Edits in progress for one region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSession {
    region: Region,
    selected_tags: Vec<String>,
    notes: String,
}

impl RegionSession {
    fn open(region: Region) -> Self {
        Self {
            region,
            selected_tags: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Selected tags, in the order they were toggled on.
    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected_tags.iter().any(|t| t == tag)
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState<'a> {
    Idle,
    RegionActive(&'a RegionSession),
}

/// Drives tagging sessions over a region catalogue and accumulates committed records.
#[derive(Debug)]
pub struct SymptomSelector {
    catalogue: Arc<RegionCatalogue>,
    session: Option<RegionSession>,
    log: SymptomLog,
}

impl SymptomSelector {
    pub fn new(catalogue: Arc<RegionCatalogue>) -> Self {
        Self {
            catalogue,
            session: None,
            log: SymptomLog::new(),
        }
    }

    pub fn catalogue(&self) -> &RegionCatalogue {
        &self.catalogue
    }

    pub fn state(&self) -> SessionState<'_> {
        match &self.session {
            Some(session) => SessionState::RegionActive(session),
            None => SessionState::Idle,
        }
    }

    /// Open a session for `region_id` with no tags and empty notes.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownRegion`] if the catalogue has no such region. The current
    /// session, if any, is kept in that case.
    pub fn activate_region(&mut self, region_id: &str) -> HealthResult<&RegionSession> {
        let region = self
            .catalogue
            .get(region_id)
            .cloned()
            .ok_or_else(|| HealthError::UnknownRegion(region_id.to_string()))?;

        if let Some(previous) = self.session.take() {
            tracing::debug!(
                region = previous.region.id(),
                "discarding open session before activating another region"
            );
        }
        tracing::debug!(region = region.id(), "region activated");
        Ok(&*self.session.insert(RegionSession::open(region)))
    }

    /// Activate the region under `point`. A point on no region leaves the selector unchanged and
    /// returns `None`.
    pub fn activate_at(&mut self, point: Point) -> HealthResult<Option<&RegionSession>> {
        let Some(id) = self.catalogue.resolve(point).map(|r| r.id().to_string()) else {
            return Ok(None);
        };
        self.activate_region(&id).map(Some)
    }

    /// Flip `tag`'s membership in the live selection and return whether it is now selected.
    ///
    /// A tag switched on is placed after the tags already selected.
    pub fn toggle_tag(&mut self, tag: &str) -> HealthResult<bool> {
        let session = self.session.as_mut().ok_or(HealthError::NoActiveSession)?;
        if !session.region.offers(tag) {
            return Err(HealthError::TagNotOffered {
                region: session.region.id().to_string(),
                tag: tag.to_string(),
            });
        }

        if let Some(pos) = session.selected_tags.iter().position(|t| t == tag) {
            session.selected_tags.remove(pos);
            Ok(false)
        } else {
            session.selected_tags.push(tag.to_string());
            Ok(true)
        }
    }

    /// Replace the notes verbatim.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> HealthResult<()> {
        let session = self.session.as_mut().ok_or(HealthError::NoActiveSession)?;
        session.notes = notes.into();
        Ok(())
    }

    /// Close the live session and append its record. Empty selections and notes are valid.
    pub fn commit(&mut self) -> HealthResult<&SymptomRecord> {
        let session = self.session.take().ok_or(HealthError::NoActiveSession)?;
        let RegionSession {
            region,
            selected_tags,
            notes,
        } = session;
        let record = self
            .log
            .append(region.id(), region.name(), selected_tags, notes);
        tracing::debug!(
            region = %record.region_id,
            record = %record.id,
            tags = record.selected_tags.len(),
            "symptom record committed"
        );
        Ok(record)
    }

    /// Discard the live session. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(region = session.region.id(), "session cancelled");
                true
            }
            None => false,
        }
    }

    pub fn records(&self) -> &[SymptomRecord] {
        self.log.as_slice()
    }

    pub fn log(&self) -> &SymptomLog {
        &self.log
    }
}
