//! Membership renewal, prefilled from a looked-up member record

use super::membership::{MEMBERSHIP_TYPES, PAYMENT_MODES};
use super::{email_rule, phone_rule};
use crate::state::forms::{
    Condition, FieldKind, FieldSpec, FormDefinition, FormKind, Rule, Schema, StepDefinition,
    WizardError,
};

pub fn renewal(max_upload_bytes: u64) -> Result<FormDefinition, WizardError> {
    let schema = Schema::new(vec![
        FieldSpec::new("full_name", "Full name", FieldKind::Text)
            .required()
            .rule(Rule::MaxLength(80)),
        FieldSpec::new("phone", "Phone", FieldKind::Text)
            .required()
            .rule(phone_rule()?),
        FieldSpec::new("email", "Email", FieldKind::Text).rule(email_rule()?),
        FieldSpec::new("address", "Address", FieldKind::Multiline)
            .required()
            .rule(Rule::MaxLength(250)),
        FieldSpec::new("membership_type", "Membership type", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(MEMBERSHIP_TYPES)),
        FieldSpec::new("renewal_years", "Renewal period (years)", FieldKind::Number)
            .required()
            .rule(Rule::Range { min: 1.0, max: 5.0 }),
        FieldSpec::new("payment_mode", "Payment mode", FieldKind::Choice)
            .required()
            .rule(Rule::one_of(PAYMENT_MODES)),
        FieldSpec::new("transaction_id", "Transaction ID", FieldKind::Text)
            .required_when(Condition::Equals("payment_mode".into(), "online".into()))
            .required_when(Condition::Equals("payment_mode".into(), "bank_transfer".into())),
        FieldSpec::new("payment_proof", "Payment proof", FieldKind::File)
            .required_when(Condition::Filled("payment_mode".into()))
            .rule(Rule::MaxFileBytes(max_upload_bytes)),
    ])?;

    FormDefinition::new(
        FormKind::MembershipRenewal,
        "Membership renewal",
        schema,
        vec![
            StepDefinition::new(0, "Member", &["full_name", "phone", "email", "address"]),
            StepDefinition::new(1, "Plan", &["membership_type", "renewal_years"]),
            StepDefinition::new(
                2,
                "Payment",
                &["payment_mode", "transaction_id", "payment_proof"],
            ),
        ],
    )
}
