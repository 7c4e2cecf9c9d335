//! Form field value objects

use super::encoder::{data_url_mime, decoded_len};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input format accepted for date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The kind of input a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Number,
    Date,
    /// A fixed set of choices, entered as text
    Choice,
    /// A local file, stored as a data URL
    File,
}

impl FieldKind {
    pub fn is_multiline(&self) -> bool {
        matches!(self, FieldKind::Multiline)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FieldKind::File)
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    /// Data URL produced by the file encoder
    File(String),
}

impl FieldValue {
    /// Parse raw typed input for a field of the given kind.
    ///
    /// Input that does not parse is kept as text so the validator can report it.
    pub fn from_input(kind: FieldKind, raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return match kind {
                FieldKind::Text | FieldKind::Multiline | FieldKind::Choice => {
                    if raw.is_empty() {
                        FieldValue::Empty
                    } else {
                        FieldValue::Text(raw.to_string())
                    }
                }
                _ => FieldValue::Empty,
            };
        }
        match kind {
            FieldKind::Number => trimmed
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::Text(raw.to_string())),
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::Text(raw.to_string())),
            _ => FieldValue::Text(raw.to_string()),
        }
    }

    /// Parse a value received from the registry
    pub fn from_wire(kind: FieldKind, raw: &str) -> Self {
        if raw.is_empty() {
            return FieldValue::Empty;
        }
        match kind {
            FieldKind::File => FieldValue::File(raw.to_string()),
            _ => Self::from_input(kind, raw),
        }
    }

    /// Serialize the value for the registry
    pub fn to_wire(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) | FieldValue::File(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }

    /// Whether the value counts as "not provided"; blank text is empty
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::File(s) => s.is_empty(),
            FieldValue::Number(_) | FieldValue::Date(_) => false,
        }
    }

    /// Get the text value (empty for non-text values)
    #[cfg(test)]
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_data_url(&self) -> Option<&str> {
        match self {
            FieldValue::File(s) => Some(s),
            _ => None,
        }
    }

    /// Text to put back into an input box when the field is edited
    pub fn input_text(&self) -> String {
        match self {
            FieldValue::File(_) => String::new(),
            other => other.to_wire(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::File(url) => match (data_url_mime(url), decoded_len(url)) {
                (Some(mime), Some(len)) => format!("{mime} ({len} bytes)"),
                _ => "(unreadable attachment)".to_string(),
            },
            other => other.to_wire(),
        }
    }
}
