//! Working data of a wizard instance

use super::encoder::UploadTracker;
use super::validator::{ErrorMap, Values};
use serde::{Deserialize, Serialize};

/// Identifying data returned by a successful save
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Backend record id
    pub id: String,
    /// Human-facing reference, e.g. a membership number
    pub reference: String,
}

/// Normalized result of a create/update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success(Receipt),
    Failure(String),
}

impl SubmitOutcome {
    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success(_))
    }
}

/// Flat state shared by all steps, so navigation never loses input
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub values: Values,
    /// Only fields that have been checked have an entry
    pub errors: ErrorMap,
    pub current_step: usize,
    pub is_submitting: bool,
    pub is_submitted: bool,
    /// Page-level error, e.g. a failed submission
    pub page_error: Option<String>,
    pub receipt: Option<Receipt>,
    pub uploads: UploadTracker,
}

impl FormState {
    pub fn with_values(values: Values) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    /// Field mutation and navigation are refused in these states
    pub fn is_locked(&self) -> bool {
        self.is_submitting || self.is_submitted
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn has_errors(&self, field: &str) -> bool {
        !self.errors_for(field).is_empty()
    }

    pub fn was_checked(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }
}
