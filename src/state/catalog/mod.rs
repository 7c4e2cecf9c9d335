//! Concrete form definitions used by the front desk

mod gallery;
mod membership;
mod renewal;

use super::forms::{FormDefinition, FormKind, Rule, WizardError};
use std::sync::Arc;

const PHONE_PATTERN: &str = r"^\d{10}$";
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PINCODE_PATTERN: &str = r"^\d{6}$";

fn phone_rule() -> Result<Rule, WizardError> {
    Rule::pattern(PHONE_PATTERN, "Phone number must be 10 digits")
}

fn email_rule() -> Result<Rule, WizardError> {
    Rule::pattern(EMAIL_PATTERN, "Enter a valid email address")
}

fn pincode_rule() -> Result<Rule, WizardError> {
    Rule::pattern(PINCODE_PATTERN, "PIN code must be 6 digits")
}

/// All forms, built once with the configured upload limit
#[derive(Debug, Clone)]
pub struct Catalog {
    pub application: Arc<FormDefinition>,
    pub renewal: Arc<FormDefinition>,
    pub gallery: Arc<FormDefinition>,
}

impl Catalog {
    pub fn new(max_upload_bytes: u64) -> Result<Self, WizardError> {
        Ok(Self {
            application: Arc::new(membership::application(max_upload_bytes)?),
            renewal: Arc::new(renewal::renewal(max_upload_bytes)?),
            gallery: Arc::new(gallery::upload(max_upload_bytes)?),
        })
    }

    pub fn get(&self, kind: FormKind) -> Arc<FormDefinition> {
        match kind {
            FormKind::MembershipApplication => Arc::clone(&self.application),
            FormKind::MembershipRenewal => Arc::clone(&self.renewal),
            FormKind::GalleryUpload => Arc::clone(&self.gallery),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::DEFAULT_MAX_UPLOAD_BYTES;

    #[test]
    fn test_catalog_builds() {
        let catalog = Catalog::new(DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(catalog.get(FormKind::MembershipApplication).kind, FormKind::MembershipApplication);
        assert_eq!(catalog.get(FormKind::MembershipRenewal).kind, FormKind::MembershipRenewal);
        assert_eq!(catalog.get(FormKind::GalleryUpload).kind, FormKind::GalleryUpload);
    }

    #[test]
    fn test_every_field_belongs_to_one_step() {
        let catalog = Catalog::new(DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        for def in [&catalog.application, &catalog.renewal, &catalog.gallery] {
            let mut from_steps = def.steps.all_fields();
            let mut from_schema: Vec<String> = def.schema.field_names().map(String::from).collect();
            from_steps.sort();
            from_schema.sort();
            assert_eq!(from_steps, from_schema, "form {}", def.title);
        }
    }
}
