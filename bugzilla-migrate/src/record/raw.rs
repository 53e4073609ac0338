//! Loosely typed record values produced by the flattener.

use crate::convert::ConvertError;
use std::collections::HashMap;

/// A single flattened field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text content of a leaf element or attribute.
    Text(String),

    /// Values of a tag that appeared more than once, in document order.
    List(Vec<RawValue>),

    /// A nested element with children.
    Record(RawRecord),
}

impl RawValue {
    /// Returns the text if this is a scalar value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Flattens a scalar into a one-element list, keeping lists as they are.
    #[must_use]
    pub fn into_list(self) -> Vec<RawValue> {
        match self {
            Self::List(values) => values,
            other => vec![other],
        }
    }

    /// Length reported in diagnostic dumps: characters for text, entries otherwise.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::List(values) => values.len(),
            Self::Record(record) => record.len(),
        }
    }

    /// Returns true if the value holds no text or entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn append(&mut self, value: RawValue) {
        match self {
            Self::List(values) => values.push(value),
            scalar => {
                let first = std::mem::replace(scalar, Self::List(Vec::with_capacity(2)));
                if let Self::List(values) = scalar {
                    values.push(first);
                    values.push(value);
                }
            }
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Self::Record(record) => {
                let mut fields: Vec<_> = record.fields.iter().collect();
                fields.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{{")?;
                for (i, (key, value)) in fields.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Mapping from field name to value for one flattened element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, RawValue>,
}

impl RawRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, turning the field into a list if it is already present.
    pub fn push(&mut self, key: impl Into<String>, value: RawValue) {
        let key = key.into();
        match self.fields.get_mut(&key) {
            Some(existing) => existing.append(value),
            None => {
                self.fields.insert(key, value);
            }
        }
    }

    /// Sets a value, replacing anything stored under the key.
    pub fn set(&mut self, key: impl Into<String>, value: RawValue) {
        self.fields.insert(key.into(), value);
    }

    /// Borrows a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields still present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if every field has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes and returns a field.
    pub fn take(&mut self, key: &str) -> Option<RawValue> {
        self.fields.remove(key)
    }

    /// Removes a field that must be present and hold text.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingField`] if absent and
    /// [`ConvertError::UnexpectedShape`] if the field is not text.
    pub fn take_text(&mut self, key: &str) -> Result<String, ConvertError> {
        self.take_optional_text(key)?
            .ok_or_else(|| ConvertError::MissingField {
                field: key.to_string(),
            })
    }

    /// Removes a field that may be absent but must hold text when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnexpectedShape`] if the field is not text.
    pub fn take_optional_text(&mut self, key: &str) -> Result<Option<String>, ConvertError> {
        match self.fields.remove(key) {
            None => Ok(None),
            Some(RawValue::Text(text)) => Ok(Some(text)),
            Some(_) => Err(ConvertError::UnexpectedShape {
                field: key.to_string(),
                expected: "text",
            }),
        }
    }

    /// Removes a field holding one or more text values.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnexpectedShape`] if any entry is not text.
    pub fn take_text_list(&mut self, key: &str) -> Result<Vec<String>, ConvertError> {
        let Some(value) = self.fields.remove(key) else {
            return Ok(Vec::new());
        };
        value
            .into_list()
            .into_iter()
            .map(|value| match value {
                RawValue::Text(text) => Ok(text),
                _ => Err(ConvertError::UnexpectedShape {
                    field: key.to_string(),
                    expected: "text list",
                }),
            })
            .collect()
    }

    /// Removes a field holding one or more nested records.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnexpectedShape`] if any entry is not a record.
    pub fn take_records(&mut self, key: &str) -> Result<Vec<RawRecord>, ConvertError> {
        let Some(value) = self.fields.remove(key) else {
            return Ok(Vec::new());
        };
        value
            .into_list()
            .into_iter()
            .map(|value| match value {
                RawValue::Record(record) => Ok(record),
                _ => Err(ConvertError::UnexpectedShape {
                    field: key.to_string(),
                    expected: "element",
                }),
            })
            .collect()
    }

    /// Drops fields that are known to carry nothing worth migrating.
    pub fn ignore(&mut self, fields: &[&str]) {
        for field in fields {
            self.fields.remove(*field);
        }
    }

    /// Remaining fields sorted by name, for diagnostic dumps.
    #[must_use]
    pub fn leftovers(&self) -> Vec<(&str, &RawValue)> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }
}
