//! Form domain layer
//!
//! Multi-step wizard core: field values, declarative validation, the step
//! table, the controller that moves between steps, and attachment encoding.

mod controller;
mod encoder;
mod error;
mod field;
mod form_state;
mod steps;
mod validator;

pub use controller::{EncodeResult, FormDefinition, FormKind, Wizard};
pub use encoder::{DataUrl, EncodeTicket, FileEncoder, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::WizardError;
pub use field::{FieldKind, FieldValue};
pub use form_state::{Receipt, SubmitOutcome};
pub use steps::StepDefinition;
pub use validator::{Condition, FieldSpec, Rule, Schema, Values};
