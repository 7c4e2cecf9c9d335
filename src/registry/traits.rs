//! Trait abstraction for registry backends to enable mocking in tests

use crate::state::{SubmitOutcome, Values};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// A member record as stored by the registry; field values are in wire form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberRecord {
    pub id: String,
    pub membership_number: String,
    pub fields: HashMap<String, String>,
}

/// Registry operations the wizards depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryClientTrait: Send + Sync {
    /// Check if the registry is reachable
    async fn check_connection(&self) -> bool;

    /// Find a member by membership number
    async fn lookup_member(&mut self, membership_number: &str) -> Result<Option<MemberRecord>>;

    /// Create a new membership
    async fn create_member(&mut self, fields: &Values) -> Result<SubmitOutcome>;

    /// Update an existing membership (renewal)
    async fn update_member(&mut self, id: &str, fields: &Values) -> Result<SubmitOutcome>;

    /// Add a gallery item
    async fn create_media(&mut self, fields: &Values) -> Result<SubmitOutcome>;
}

/// Convert form values to their wire representation, skipping empty ones
pub fn to_wire_fields(values: &Values) -> HashMap<String, String> {
    values
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.clone(), v.to_wire()))
        .collect()
}
