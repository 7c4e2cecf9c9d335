//! Errors raised by the wizard core

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// One or more fields failed validation; `errors` on the form holds the messages
    #[error("{} field(s) need attention: {}", fields.len(), fields.join(", "))]
    Invalid { fields: Vec<String> },

    #[error("step {requested} has not been completed yet")]
    StepNotCompleted { requested: usize },

    #[error("submission is only possible from the last step")]
    NotOnLastStep,

    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error("the form is locked while saving or after submission")]
    Locked,

    #[error("wait for attachments to finish loading")]
    EncodingPending,

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("invalid step table: {0}")]
    InvalidStepTable(String),

    /// Rejected before encoding, surfaced as a notification
    #[error("{name} is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("could not read {name}: {reason}")]
    FileUnreadable { name: String, reason: String },

    #[error("not a data URL")]
    MalformedDataUrl,
}
