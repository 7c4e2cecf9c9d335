//! Static step table: which fields gate each step

use super::error::WizardError;
use super::validator::Schema;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub index: usize,
    pub label: String,
    pub required_fields: Vec<String>,
}

impl StepDefinition {
    pub fn new(index: usize, label: &str, fields: &[&str]) -> Self {
        Self {
            index,
            label: label.to_string(),
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Ordered steps covering every schema field exactly once
#[derive(Debug, Clone)]
pub struct StepTable {
    steps: Vec<StepDefinition>,
}

impl StepTable {
    pub fn new(steps: Vec<StepDefinition>, schema: &Schema) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::InvalidStepTable("no steps".to_string()));
        }
        let mut covered = HashSet::new();
        for (position, step) in steps.iter().enumerate() {
            if step.index != position {
                return Err(WizardError::InvalidStepTable(format!(
                    "step `{}` has index {} but sits at position {position}",
                    step.label, step.index
                )));
            }
            if step.required_fields.is_empty() {
                return Err(WizardError::InvalidStepTable(format!(
                    "step `{}` has no fields",
                    step.label
                )));
            }
            for field in &step.required_fields {
                if schema.field(field).is_none() {
                    return Err(WizardError::InvalidStepTable(format!(
                        "step `{}` lists undeclared field `{field}`",
                        step.label
                    )));
                }
                if !covered.insert(field.as_str()) {
                    return Err(WizardError::InvalidStepTable(format!(
                        "field `{field}` appears in more than one step"
                    )));
                }
            }
        }
        if let Some(missing) = schema.field_names().find(|name| !covered.contains(name)) {
            return Err(WizardError::InvalidStepTable(format!(
                "field `{missing}` is not covered by any step"
            )));
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Fields of the given step; empty for out-of-range indexes
    pub fn fields_of(&self, index: usize) -> &[String] {
        self.steps
            .get(index)
            .map(|s| s.required_fields.as_slice())
            .unwrap_or(&[])
    }

    /// Every field, in step order
    pub fn all_fields(&self) -> Vec<String> {
        self.steps
            .iter()
            .flat_map(|s| s.required_fields.iter().cloned())
            .collect()
    }
}
