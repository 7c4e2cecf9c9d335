//! gRPC client for communicating with the registry service

use super::traits::{to_wire_fields, MemberRecord, RegistryClientTrait};
use crate::state::{Receipt, SubmitOutcome, Values};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

// Include the generated proto types
pub mod proto {
    tonic::include_proto!("registry");
}

use proto::registry_client::RegistryClient as GrpcRegistryClient;

/// Default registry address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:50061";

/// Client for communicating with the registry service
pub struct RegistryClient {
    /// The gRPC client
    client: Option<GrpcRegistryClient<tonic::transport::Channel>>,
    /// The registry address
    address: String,
}

impl RegistryClient {
    /// Create a new registry client, connecting eagerly if possible
    pub async fn new(address: String) -> Result<Self> {
        let client = match GrpcRegistryClient::connect(address.clone()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Registry at {address} unreachable: {e}");
                None
            }
        };

        Ok(Self { client, address })
    }

    /// Ensure connection is established
    async fn ensure_connected(
        &mut self,
    ) -> Result<&mut GrpcRegistryClient<tonic::transport::Channel>> {
        if self.client.is_none() {
            self.client = Some(
                GrpcRegistryClient::connect(self.address.clone())
                    .await
                    .map_err(|e| anyhow!("Failed to connect to registry: {}", e))?,
            );
        }
        self.client
            .as_mut()
            .ok_or_else(|| anyhow!("Client not connected"))
    }

    async fn save(&mut self, operation: Operation, id: &str, fields: &Values) -> Result<SubmitOutcome> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::SaveRecordRequest {
            id: id.to_string(),
            fields: to_wire_fields(fields),
        });

        let response = match operation {
            Operation::CreateMember => client.create_member(request).await,
            Operation::UpdateMember => client.update_member(request).await,
            Operation::CreateMedia => client.create_media(request).await,
        }
        .map_err(|e| anyhow!("Failed to {}: {}", operation.describe(), e))?;

        Ok(outcome_from_response(response.into_inner()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    CreateMember,
    UpdateMember,
    CreateMedia,
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Operation::CreateMember => "create member",
            Operation::UpdateMember => "update member",
            Operation::CreateMedia => "create media",
        }
    }
}

fn outcome_from_response(response: proto::SaveRecordResponse) -> SubmitOutcome {
    if response.success {
        SubmitOutcome::Success(Receipt {
            reference: if response.reference.is_empty() {
                response.id.clone()
            } else {
                response.reference
            },
            id: response.id,
        })
    } else if response.error.is_empty() {
        SubmitOutcome::Failure("The registry rejected the submission".to_string())
    } else {
        SubmitOutcome::Failure(response.error)
    }
}

#[async_trait]
impl RegistryClientTrait for RegistryClient {
    async fn check_connection(&self) -> bool {
        self.client.is_some()
    }

    async fn lookup_member(&mut self, membership_number: &str) -> Result<Option<MemberRecord>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::LookupMemberRequest {
            membership_number: membership_number.to_string(),
        });

        let response = client
            .lookup_member(request)
            .await
            .map_err(|e| anyhow!("Failed to look up member: {}", e))?
            .into_inner();

        if !response.found {
            return Ok(None);
        }
        Ok(Some(MemberRecord {
            id: response.id,
            membership_number: response.membership_number,
            fields: response.fields,
        }))
    }

    async fn create_member(&mut self, fields: &Values) -> Result<SubmitOutcome> {
        self.save(Operation::CreateMember, "", fields).await
    }

    async fn update_member(&mut self, id: &str, fields: &Values) -> Result<SubmitOutcome> {
        self.save(Operation::UpdateMember, id, fields).await
    }

    async fn create_media(&mut self, fields: &Values) -> Result<SubmitOutcome> {
        self.save(Operation::CreateMedia, "", fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_with_reference() {
        let outcome = outcome_from_response(proto::SaveRecordResponse {
            success: true,
            error: String::new(),
            id: "rec-7".to_string(),
            reference: "M-0007".to_string(),
        });
        assert_eq!(
            outcome,
            SubmitOutcome::Success(Receipt {
                id: "rec-7".to_string(),
                reference: "M-0007".to_string(),
            })
        );
    }

    #[test]
    fn test_outcome_success_falls_back_to_id() {
        let outcome = outcome_from_response(proto::SaveRecordResponse {
            success: true,
            id: "media-3".to_string(),
            ..Default::default()
        });
        match outcome {
            SubmitOutcome::Success(receipt) => assert_eq!(receipt.reference, "media-3"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_outcome_failure_message() {
        let outcome = outcome_from_response(proto::SaveRecordResponse {
            success: false,
            error: "duplicate entry".to_string(),
            ..Default::default()
        });
        assert_eq!(outcome, SubmitOutcome::Failure("duplicate entry".to_string()));

        let blank = outcome_from_response(proto::SaveRecordResponse::default());
        assert_eq!(
            blank,
            SubmitOutcome::Failure("The registry rejected the submission".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_registry_reports_disconnected() {
        // Port 9 (discard) is not expected to speak gRPC
        let client = RegistryClient::new("http://127.0.0.1:9".to_string())
            .await
            .unwrap();
        assert!(!client.check_connection().await);
    }
}
