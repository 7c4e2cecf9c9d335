//! In-process registry used when no registry service is configured

use super::traits::{to_wire_fields, MemberRecord, RegistryClientTrait};
use crate::state::{DataUrl, Receipt, SubmitOutcome, Values};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    members: Vec<MemberRecord>,
    media: Vec<(String, HashMap<String, String>)>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a member, e.g. for renewal demos; returns the membership number
    pub fn insert_member(&mut self, fields: HashMap<String, String>) -> String {
        let membership_number = format!("M-{:04}", self.members.len() + 1);
        self.members.push(MemberRecord {
            id: Uuid::new_v4().to_string(),
            membership_number: membership_number.clone(),
            fields,
        });
        membership_number
    }

    #[cfg(test)]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[cfg(test)]
    pub fn media_count(&self) -> usize {
        self.media.len()
    }
}

/// First attachment whose data URL does not decode
fn unreadable_attachment(fields: &Values) -> Option<&str> {
    fields
        .iter()
        .find(|(_, value)| {
            value
                .as_data_url()
                .is_some_and(|url| DataUrl::parse(url).is_err())
        })
        .map(|(name, _)| name.as_str())
}

fn rejected_attachment(field: &str) -> SubmitOutcome {
    SubmitOutcome::Failure(format!("The attachment in {field} could not be read"))
}

#[async_trait]
impl RegistryClientTrait for InMemoryRegistry {
    async fn check_connection(&self) -> bool {
        true
    }

    async fn lookup_member(&mut self, membership_number: &str) -> Result<Option<MemberRecord>> {
        let wanted = membership_number.trim();
        Ok(self
            .members
            .iter()
            .find(|m| m.membership_number.eq_ignore_ascii_case(wanted))
            .cloned())
    }

    async fn create_member(&mut self, fields: &Values) -> Result<SubmitOutcome> {
        if let Some(field) = unreadable_attachment(fields) {
            return Ok(rejected_attachment(field));
        }
        let fields = to_wire_fields(fields);
        let phone = fields.get("phone");
        if phone.is_some() && self.members.iter().any(|m| m.fields.get("phone") == phone) {
            return Ok(SubmitOutcome::Failure(
                "A member with this phone number already exists".to_string(),
            ));
        }
        let reference = self.insert_member(fields);
        let id = self.members.last().map(|m| m.id.clone()).unwrap_or_default();
        tracing::info!(%reference, "member created");
        Ok(SubmitOutcome::Success(Receipt { id, reference }))
    }

    async fn update_member(&mut self, id: &str, fields: &Values) -> Result<SubmitOutcome> {
        if let Some(field) = unreadable_attachment(fields) {
            return Ok(rejected_attachment(field));
        }
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            return Ok(SubmitOutcome::Failure(format!("No member with id {id}")));
        };
        member.fields.extend(to_wire_fields(fields));
        tracing::info!(reference = %member.membership_number, "member updated");
        Ok(SubmitOutcome::Success(Receipt {
            id: member.id.clone(),
            reference: member.membership_number.clone(),
        }))
    }

    async fn create_media(&mut self, fields: &Values) -> Result<SubmitOutcome> {
        if let Some(field) = unreadable_attachment(fields) {
            return Ok(rejected_attachment(field));
        }
        let id = Uuid::new_v4().to_string();
        self.media.push((id.clone(), to_wire_fields(fields)));
        let reference = format!("G-{:04}", self.media.len());
        Ok(SubmitOutcome::Success(Receipt { id, reference }))
    }
}
