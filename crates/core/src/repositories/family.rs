//! Family members managed alongside the account holder.

use crate::constants::FAMILY_SEED;
use crate::error::{HealthError, HealthResult};
use crate::forms::Payload;
use healthdesk_uuid::RecordId;
use serde::Serialize;

/// A relative whose health the account holder manages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FamilyMember {
    pub id: RecordId,
    pub name: String,
    pub relation: String,
    pub id_number: String,
    pub phone: String,
    /// Date of the last checkup, `None` until one is recorded.
    pub last_checkup: Option<String>,
}

/// The account's family members, in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct FamilyRoster {
    members: Vec<FamilyMember>,
}

impl FamilyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The roster shown to a new account: two seeded members.
    pub fn seeded() -> Self {
        let members = FAMILY_SEED
            .iter()
            .map(|(name, relation, id_number, phone, checkup)| FamilyMember {
                id: RecordId::new(),
                name: name.to_string(),
                relation: relation.to_string(),
                id_number: id_number.to_string(),
                phone: phone.to_string(),
                last_checkup: Some(checkup.to_string()),
            })
            .collect();
        Self { members }
    }

    /// Add a member from a validated family-member form payload.
    ///
    /// The new member gets a fresh [`RecordId`] and no checkup date.
    ///
    /// # Returns
    ///
    /// The member as stored at the end of the roster.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidInput`] if `name`, `relation`, `id_number` or `phone` is
    /// missing or not text. The roster is unchanged.
    pub fn add(&mut self, payload: &Payload) -> HealthResult<&FamilyMember> {
        let text = |field: &str| -> HealthResult<String> {
            payload
                .get(field)
                .and_then(|v| v.as_text())
                .map(str::to_owned)
                .ok_or_else(|| HealthError::InvalidInput(format!("payload has no text field {field}")))
        };

        let member = FamilyMember {
            id: RecordId::new(),
            name: text("name")?,
            relation: text("relation")?,
            id_number: text("id_number")?,
            phone: text("phone")?,
            last_checkup: None,
        };
        tracing::debug!(member = %member.id, "family member added");
        self.members.push(member);
        Ok(&self.members[self.members.len() - 1])
    }

    /// Remove the member with `id`, keeping the order of the others.
    ///
    /// # Returns
    ///
    /// The removed member.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownRecord`] if no member has `id`.
    pub fn remove(&mut self, id: RecordId) -> HealthResult<FamilyMember> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| HealthError::UnknownRecord(id.to_string()))?;
        Ok(self.members.remove(pos))
    }

    pub fn list(&self) -> &[FamilyMember] {
        &self.members
    }
}
