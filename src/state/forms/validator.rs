//! Declarative field rules and the validator that evaluates them

use super::encoder::{decoded_len, human_bytes};
use super::error::WizardError;
use super::field::{FieldKind, FieldValue};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// All field values of a form, keyed by field name
pub type Values = BTreeMap<String, FieldValue>;

/// Validation messages per checked field. An empty list means "checked, valid".
pub type ErrorMap = BTreeMap<String, Vec<String>>;

/// A predicate over the whole form, used for conditional requirements
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The other field's text equals the value
    Equals(String, String),
    /// The other field has any value
    Filled(String),
}

impl Condition {
    /// Field this condition reads
    pub fn field(&self) -> &str {
        match self {
            Condition::Equals(f, _) | Condition::Filled(f) => f,
        }
    }

    pub fn holds(&self, values: &Values) -> bool {
        let other = values.get(self.field());
        match self {
            Condition::Equals(_, expected) => {
                other.is_some_and(|v| v.to_wire().trim() == expected.as_str())
            }
            Condition::Filled(_) => other.is_some_and(|v| !v.is_empty()),
        }
    }
}

/// A single constraint on a field
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    RequiredWhen(Condition),
    Pattern { regex: Regex, message: String },
    OneOf(Vec<String>),
    MinLength(usize),
    MaxLength(usize),
    Range { min: f64, max: f64 },
    /// Date strictly before today
    PastDate,
    /// Decoded attachment size limit
    MaxFileBytes(u64),
}

impl Rule {
    /// Build a pattern rule, compiling the regex up front
    pub fn pattern(pattern: &str, message: &str) -> Result<Self, WizardError> {
        let regex = Regex::new(pattern)
            .map_err(|e| WizardError::InvalidSchema(format!("bad pattern `{pattern}`: {e}")))?;
        Ok(Rule::Pattern {
            regex,
            message: message.to_string(),
        })
    }

    pub fn one_of(choices: &[&str]) -> Self {
        Rule::OneOf(choices.iter().map(|c| c.to_string()).collect())
    }

    fn condition(&self) -> Option<&Condition> {
        match self {
            Rule::RequiredWhen(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the violation message, if any
    fn check(&self, label: &str, value: &FieldValue, values: &Values, today: NaiveDate) -> Option<String> {
        match self {
            Rule::Required => value.is_empty().then(|| format!("{label} is required")),
            Rule::RequiredWhen(cond) => {
                (value.is_empty() && cond.holds(values)).then(|| format!("{label} is required"))
            }
            // Everything below only constrains provided values
            _ if value.is_empty() => None,
            Rule::Pattern { regex, message } => {
                let text = value.to_wire();
                (!regex.is_match(text.trim())).then(|| message.clone())
            }
            Rule::OneOf(choices) => {
                let text = value.to_wire();
                (!choices.iter().any(|c| c == text.trim()))
                    .then(|| format!("{label} must be one of: {}", choices.join(", ")))
            }
            Rule::MinLength(min) => (value.to_wire().trim().chars().count() < *min)
                .then(|| format!("{label} must be at least {min} characters")),
            Rule::MaxLength(max) => (value.to_wire().trim().chars().count() > *max)
                .then(|| format!("{label} must be at most {max} characters")),
            Rule::Range { min, max } => {
                let in_range = value.as_number().is_some_and(|n| n >= *min && n <= *max);
                (!in_range).then(|| format!("{label} must be between {min} and {max}"))
            }
            Rule::PastDate => match value.as_date() {
                Some(date) if date < today => None,
                Some(_) => Some(format!("{label} must be in the past")),
                None => Some(format!("{label} must be a date like 1990-01-31")),
            },
            Rule::MaxFileBytes(limit) => {
                let too_big = value
                    .as_data_url()
                    .and_then(decoded_len)
                    .map_or(true, |len| len > *limit);
                too_big.then(|| format!("{label} must be smaller than {}", human_bytes(*limit)))
            }
        }
    }
}

/// Declaration of a field and its constraints
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            rules: Vec::new(),
        }
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn required_when(self, condition: Condition) -> Self {
        self.rule(Rule::RequiredWhen(condition))
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Allowed values, if the field is restricted to a set
    pub fn choices(&self) -> Option<&[String]> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::OneOf(choices) => Some(choices.as_slice()),
            _ => None,
        })
    }

    /// Whether the field is unconditionally required
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required))
    }
}

/// The set of declared fields for one form
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, WizardError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(WizardError::InvalidSchema(format!(
                    "field `{}` declared twice",
                    field.name
                )));
            }
        }
        for field in &fields {
            for cond in field.rules.iter().filter_map(Rule::condition) {
                if !seen.contains(cond.field()) {
                    return Err(WizardError::InvalidSchema(format!(
                        "`{}` depends on unknown field `{}`",
                        field.name,
                        cond.field()
                    )));
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Messages for a single field; empty when valid or undeclared
    pub fn check_field(&self, name: &str, values: &Values, today: NaiveDate) -> Vec<String> {
        let Some(spec) = self.field(name) else {
            return Vec::new();
        };
        let empty = FieldValue::Empty;
        let value = values.get(name).unwrap_or(&empty);
        spec.rules
            .iter()
            .filter_map(|rule| rule.check(&spec.label, value, values, today))
            .collect()
    }

    /// Validate `names`, recording each result in `errors`.
    ///
    /// Returns the names of the fields that failed, in the order given.
    pub fn validate<S: AsRef<str>>(&self, names: &[S], values: &Values, errors: &mut ErrorMap) -> Vec<String> {
        self.validate_on(names, values, errors, Local::now().date_naive())
    }

    pub fn validate_on<S: AsRef<str>>(
        &self,
        names: &[S],
        values: &Values,
        errors: &mut ErrorMap,
        today: NaiveDate,
    ) -> Vec<String> {
        let mut failed = Vec::new();
        for name in names {
            let name = name.as_ref();
            let messages = self.check_field(name, values, today);
            if !messages.is_empty() {
                failed.push(name.to_string());
            }
            errors.insert(name.to_string(), messages);
        }
        failed
    }

    /// Fields whose conditional rules read `changed`
    pub fn dependents_of(&self, changed: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| {
                f.rules
                    .iter()
                    .filter_map(Rule::condition)
                    .any(|c| c.field() == changed)
            })
            .map(|f| f.name.as_str())
            .collect()
    }
}
