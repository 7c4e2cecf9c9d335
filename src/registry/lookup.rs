//! Renewal entry point: find the member before the wizard starts

use super::dispatcher::{DispatchMode, SubmissionDispatcher};
use super::traits::{MemberRecord, RegistryClientTrait};
use crate::state::{FieldValue, FormDefinition, Values, Wizard};
use std::sync::Arc;

pub const LOOKUP_FAILURE: &str = "Could not reach the registry. Please try again.";
pub const LOOKUP_TIMEOUT: &str = "The registry did not answer in time. Please try again.";

/// A renewal wizard prefilled from the member's record
pub struct RenewalStart {
    pub wizard: Wizard,
    pub dispatcher: SubmissionDispatcher,
    pub membership_number: String,
}

/// How a member lookup ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(MemberRecord),
    NotFound,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLookup {
    ticket: u64,
    identifier: String,
}

/// Identifier input shown before the renewal wizard
#[derive(Debug, Clone, Default)]
pub struct RenewalGate {
    pub identifier: String,
    page_error: Option<String>,
    pending: Option<PendingLookup>,
}

impl RenewalGate {
    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a lookup for the typed identifier under `ticket`.
    ///
    /// Returns the trimmed identifier to look up, or `None` when one is
    /// already in flight or nothing was typed.
    pub fn begin_lookup(&mut self, ticket: u64) -> Option<String> {
        if self.pending.is_some() {
            return None;
        }
        let identifier = self.identifier.trim().to_string();
        if identifier.is_empty() {
            self.page_error = Some("Please enter a membership number".to_string());
            return None;
        }
        self.page_error = None;
        self.pending = Some(PendingLookup {
            ticket,
            identifier: identifier.clone(),
        });
        Some(identifier)
    }

    /// Apply a finished lookup. Results for any other ticket are ignored;
    /// not-found, failures and timeouts stay on the gate as page errors.
    pub fn finish_lookup(
        &mut self,
        ticket: u64,
        outcome: LookupOutcome,
        definition: Arc<FormDefinition>,
    ) -> Option<RenewalStart> {
        if self.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
            return None;
        }
        let pending = self.pending.take()?;

        match outcome {
            LookupOutcome::Found(record) => {
                tracing::info!(membership_number = %record.membership_number, "member found for renewal");
                let values = record_to_values(&definition, &record);
                let dispatcher =
                    SubmissionDispatcher::new(definition.kind, DispatchMode::Update { id: record.id });
                Some(RenewalStart {
                    wizard: Wizard::with_values(definition, values),
                    dispatcher,
                    membership_number: record.membership_number,
                })
            }
            LookupOutcome::NotFound => {
                self.page_error = Some(format!(
                    "No member found with number {}",
                    pending.identifier
                ));
                None
            }
            LookupOutcome::Failed => {
                self.page_error = Some(LOOKUP_FAILURE.to_string());
                None
            }
            LookupOutcome::TimedOut => {
                self.page_error = Some(LOOKUP_TIMEOUT.to_string());
                None
            }
        }
    }
}

/// Ask the registry for one member; backend errors are logged and folded
/// into [`LookupOutcome::Failed`]
pub async fn find_member<C>(client: &mut C, identifier: &str) -> LookupOutcome
where
    C: RegistryClientTrait + ?Sized,
{
    match client.lookup_member(identifier).await {
        Ok(Some(record)) => LookupOutcome::Found(record),
        Ok(None) => LookupOutcome::NotFound,
        Err(e) => {
            tracing::error!("Member lookup failed: {e:#}");
            LookupOutcome::Failed
        }
    }
}

/// Keep the record fields the form declares, parsed by field kind.
///
/// Only identity and plan steps are carried over: the final step collects
/// the payment for this renewal and always starts empty.
pub fn record_to_values(definition: &FormDefinition, record: &MemberRecord) -> Values {
    let steps = &definition.steps;
    (0..steps.last_index())
        .flat_map(|index| steps.fields_of(index))
        .filter_map(|name| {
            let spec = definition.schema.field(name)?;
            let raw = record.fields.get(name)?;
            let value = FieldValue::from_wire(spec.kind, raw);
            (!value.is_empty()).then(|| (name.clone(), value))
        })
        .collect()
}
