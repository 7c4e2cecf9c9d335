//! Test backends

use super::traits::{MemberRecord, RegistryClientTrait};
use crate::state::{SubmitOutcome, Values};
use async_trait::async_trait;

/// Backend that never answers
pub struct HangingRegistry;

#[async_trait]
impl RegistryClientTrait for HangingRegistry {
    async fn check_connection(&self) -> bool {
        true
    }
    async fn lookup_member(&mut self, _: &str) -> anyhow::Result<Option<MemberRecord>> {
        std::future::pending().await
    }
    async fn create_member(&mut self, _: &Values) -> anyhow::Result<SubmitOutcome> {
        std::future::pending().await
    }
    async fn update_member(&mut self, _: &str, _: &Values) -> anyhow::Result<SubmitOutcome> {
        std::future::pending().await
    }
    async fn create_media(&mut self, _: &Values) -> anyhow::Result<SubmitOutcome> {
        std::future::pending().await
    }
}
