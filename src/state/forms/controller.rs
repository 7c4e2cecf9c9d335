//! Multi-step wizard controller
//!
//! Owns the [`FormState`] of one wizard and is the only writer to it.
//! Steps advance only when their fields validate; going back never
//! touches values or errors. Submission is split into
//! [`Wizard::begin_submit`] and [`Wizard::finish_submit`] so the caller can
//! await the dispatcher without holding the wizard across the await.

use super::encoder::EncodeTicket;
use super::error::WizardError;
use super::field::{FieldKind, FieldValue};
use super::form_state::{FormState, Receipt, SubmitOutcome};
use super::steps::{StepDefinition, StepTable};
use super::validator::{Schema, Values};
use std::sync::Arc;

/// Which intake flow a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    MembershipApplication,
    MembershipRenewal,
    GalleryUpload,
}

/// Static description of a form: its fields and steps
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub kind: FormKind,
    pub title: String,
    pub schema: Schema,
    pub steps: StepTable,
}

impl FormDefinition {
    pub fn new(
        kind: FormKind,
        title: &str,
        schema: Schema,
        steps: Vec<StepDefinition>,
    ) -> Result<Self, WizardError> {
        let steps = StepTable::new(steps, &schema)?;
        Ok(Self {
            kind,
            title: title.to_string(),
            schema,
            steps,
        })
    }
}

/// Result of delivering a finished encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeResult {
    Applied,
    /// A newer selection exists for the field
    Superseded,
    /// The wizard no longer accepts changes
    Discarded,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    definition: Arc<FormDefinition>,
    state: FormState,
}

impl Wizard {
    pub fn new(definition: Arc<FormDefinition>) -> Self {
        Self::with_values(definition, Values::new())
    }

    /// Start with prefilled values, e.g. from a looked-up record
    pub fn with_values(definition: Arc<FormDefinition>, values: Values) -> Self {
        Self {
            definition,
            state: FormState::with_values(values),
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn step_count(&self) -> usize {
        self.definition.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step == self.definition.steps.last_index()
    }

    pub fn value(&self, field: &str) -> &FieldValue {
        const EMPTY: &FieldValue = &FieldValue::Empty;
        self.state.values.get(field).unwrap_or(EMPTY)
    }

    #[cfg(test)]
    pub fn values(&self) -> &Values {
        &self.state.values
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.state.errors_for(field)
    }

    pub fn page_error(&self) -> Option<&str> {
        self.state.page_error.as_deref()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.state.receipt.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.state.is_submitted
    }

    pub fn is_encoding(&self, field: &str) -> bool {
        self.state.uploads.is_pending(field)
    }

    fn kind_of(&self, field: &str) -> Result<FieldKind, WizardError> {
        self.definition
            .schema
            .field(field)
            .map(|spec| spec.kind)
            .ok_or_else(|| WizardError::UnknownField(field.to_string()))
    }

    fn ensure_unlocked(&self) -> Result<(), WizardError> {
        if self.state.is_locked() {
            return Err(WizardError::Locked);
        }
        Ok(())
    }

    /// Set a field value and re-check it and its dependents if already checked
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_unlocked()?;
        self.kind_of(field)?;
        self.state.values.insert(field.to_string(), value);
        self.revalidate_around(field);
        Ok(())
    }

    /// Set a field from raw typed text, parsed according to the field kind
    pub fn set_input(&mut self, field: &str, raw: &str) -> Result<(), WizardError> {
        let kind = self.kind_of(field)?;
        self.set_value(field, FieldValue::from_input(kind, raw))
    }

    fn revalidate_around(&mut self, changed: &str) {
        let schema = &self.definition.schema;
        let mut targets = vec![changed];
        targets.extend(schema.dependents_of(changed));
        let checked: Vec<&str> = targets
            .into_iter()
            .filter(|f| self.state.was_checked(f))
            .collect();
        if !checked.is_empty() {
            schema.validate(&checked, &self.state.values, &mut self.state.errors);
        }
    }

    /// Validate the current step and move forward if it passes.
    ///
    /// Returns the new step index. On the last step a successful advance
    /// stays put.
    pub fn advance(&mut self) -> Result<usize, WizardError> {
        self.ensure_unlocked()?;
        let steps = &self.definition.steps;
        let current = self.state.current_step;
        let failed = self.definition.schema.validate(
            steps.fields_of(current),
            &self.state.values,
            &mut self.state.errors,
        );
        if !failed.is_empty() {
            tracing::debug!(step = current, ?failed, "advance blocked");
            return Err(WizardError::Invalid { fields: failed });
        }

        let next = (current + 1).min(steps.last_index());
        if next != current {
            // Fields of the next step have not been touched yet
            for field in steps.fields_of(next) {
                self.state.errors.remove(field);
            }
            self.state.current_step = next;
            tracing::debug!(from = current, to = next, "advanced");
        }
        Ok(next)
    }

    /// Step back one step. Values and errors are left as they are.
    pub fn retreat(&mut self) -> Result<usize, WizardError> {
        self.ensure_unlocked()?;
        self.state.current_step = self.state.current_step.saturating_sub(1);
        Ok(self.state.current_step)
    }

    /// Jump back to a step that was already passed
    pub fn jump_to_completed_step(&mut self, index: usize) -> Result<(), WizardError> {
        self.ensure_unlocked()?;
        if index >= self.state.current_step {
            return Err(WizardError::StepNotCompleted { requested: index });
        }
        self.state.current_step = index;
        Ok(())
    }

    /// Register a new file selection for `field` and get its ticket
    pub fn begin_encode(&mut self, field: &str) -> Result<EncodeTicket, WizardError> {
        self.ensure_unlocked()?;
        if !self.kind_of(field)?.is_file() {
            return Err(WizardError::UnknownField(field.to_string()));
        }
        let ticket = self.state.uploads.issue(field);
        tracing::debug!(field, generation = ticket.generation, "encoding started");
        Ok(ticket)
    }

    /// Deliver a finished encoding; only the latest selection is applied
    pub fn complete_encode(&mut self, ticket: &EncodeTicket, data_url: String) -> EncodeResult {
        if !self.state.uploads.complete(ticket) {
            tracing::debug!(field = %ticket.field, generation = ticket.generation, "stale encoding dropped");
            return EncodeResult::Superseded;
        }
        if self.state.is_locked() {
            return EncodeResult::Discarded;
        }
        self.state
            .values
            .insert(ticket.field.clone(), FieldValue::File(data_url));
        self.revalidate_around(&ticket.field);
        EncodeResult::Applied
    }

    /// An encoding failed; the field keeps its previous value
    pub fn fail_encode(&mut self, ticket: &EncodeTicket) -> bool {
        self.state.uploads.complete(ticket)
    }

    /// Validate every field and enter the submitting state.
    ///
    /// Returns the snapshot to dispatch. A second call while a submission is
    /// in flight is rejected.
    pub fn begin_submit(&mut self) -> Result<Values, WizardError> {
        if self.state.is_submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        if self.state.is_submitted {
            return Err(WizardError::Locked);
        }
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep);
        }
        if self.state.uploads.any_pending() {
            return Err(WizardError::EncodingPending);
        }
        let all = self.definition.steps.all_fields();
        let failed = self
            .definition
            .schema
            .validate(&all, &self.state.values, &mut self.state.errors);
        if !failed.is_empty() {
            tracing::debug!(?failed, "submit blocked by validation");
            return Err(WizardError::Invalid { fields: failed });
        }
        self.state.is_submitting = true;
        self.state.page_error = None;
        tracing::info!(form = %self.definition.title, "submitting");
        Ok(self.state.values.clone())
    }

    /// Apply the dispatcher's outcome. Ignored unless a submission is in flight.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> bool {
        if !self.state.is_submitting {
            return false;
        }
        self.state.is_submitting = false;
        match outcome {
            SubmitOutcome::Success(receipt) => {
                tracing::info!(reference = %receipt.reference, "submitted");
                self.state.is_submitted = true;
                self.state.receipt = Some(receipt);
            }
            SubmitOutcome::Failure(message) => {
                tracing::warn!(%message, "submission failed");
                self.state.page_error = Some(message);
            }
        }
        true
    }
}
