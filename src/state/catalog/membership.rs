//! New membership application

use super::{email_rule, phone_rule, pincode_rule};
use crate::state::forms::{
    Condition, FieldKind, FieldSpec, FormDefinition, FormKind, Rule, Schema, StepDefinition,
    WizardError,
};

pub const GENDERS: &[&str] = &["female", "male", "other"];
pub const MEMBERSHIP_TYPES: &[&str] = &["general", "life", "student", "volunteer"];
pub const PAYMENT_MODES: &[&str] = &["online", "cash", "cheque", "bank_transfer"];

pub fn application(max_upload_bytes: u64) -> Result<FormDefinition, WizardError> {
    let schema = Schema::new(vec![
        // Personal details
        FieldSpec::new("full_name", "Full name", FieldKind::Text)
            .required()
            .rule(Rule::MinLength(3))
            .rule(Rule::MaxLength(80)),
        FieldSpec::new("date_of_birth", "Date of birth", FieldKind::Date)
            .required()
            .rule(Rule::PastDate),
        FieldSpec::new("gender", "Gender", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(GENDERS)),
        FieldSpec::new("phone", "Phone", FieldKind::Text)
            .required()
            .rule(phone_rule()?),
        FieldSpec::new("email", "Email", FieldKind::Text).rule(email_rule()?),
        // Address
        FieldSpec::new("address", "Address", FieldKind::Multiline)
            .required()
            .rule(Rule::MaxLength(250)),
        FieldSpec::new("city", "City", FieldKind::Text).required(),
        FieldSpec::new("state", "State", FieldKind::Text).required(),
        FieldSpec::new("pincode", "PIN code", FieldKind::Text)
            .required()
            .rule(pincode_rule()?),
        // Membership
        FieldSpec::new("membership_type", "Membership type", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(MEMBERSHIP_TYPES)),
        FieldSpec::new("occupation", "Occupation", FieldKind::Text).rule(Rule::MaxLength(80)),
        FieldSpec::new("photo", "Photo", FieldKind::File)
            .required()
            .rule(Rule::MaxFileBytes(max_upload_bytes)),
        FieldSpec::new("id_proof", "ID proof", FieldKind::File)
            .required()
            .rule(Rule::MaxFileBytes(max_upload_bytes)),
        // Payment
        FieldSpec::new("payment_mode", "Payment mode", FieldKind::Choice)
            .rule(Rule::one_of(PAYMENT_MODES)),
        FieldSpec::new("transaction_id", "Transaction ID", FieldKind::Text)
            .required_when(Condition::Equals("payment_mode".into(), "online".into()))
            .required_when(Condition::Equals("payment_mode".into(), "bank_transfer".into())),
        FieldSpec::new("payment_proof", "Payment proof", FieldKind::File)
            .required_when(Condition::Filled("payment_mode".into()))
            .rule(Rule::MaxFileBytes(max_upload_bytes)),
        FieldSpec::new("declaration", "Declaration", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(&["yes"])),
    ])?;

    FormDefinition::new(
        FormKind::MembershipApplication,
        "Membership application",
        schema,
        vec![
            StepDefinition::new(
                0,
                "Personal",
                &["full_name", "date_of_birth", "gender", "phone", "email"],
            ),
            StepDefinition::new(1, "Address", &["address", "city", "state", "pincode"]),
            StepDefinition::new(
                2,
                "Membership",
                &["membership_type", "occupation", "photo", "id_proof"],
            ),
            StepDefinition::new(
                3,
                "Payment",
                &["payment_mode", "transaction_id", "payment_proof", "declaration"],
            ),
        ],
    )
}
