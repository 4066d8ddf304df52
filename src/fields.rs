//! Generic keyed storage for form field values

use std::collections::BTreeMap;

/// Holds the current string value for a fixed set of named form fields.
///
/// The key set is established at construction and never grows or shrinks
/// afterwards; fields are only ever overwritten or reset back to their
/// construction-time values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    initial: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl FieldStore {
    pub fn new<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let initial: BTreeMap<String, String> = fields
            .into_iter()
            .map(|(field, value)| (field.to_owned(), value.to_owned()))
            .collect();
        let values = initial.clone();

        Self { initial, values }
    }

    /// Current value of `field`. Unknown keys read as empty.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    /// Overwrite a single field, leaving the others untouched. Writes to
    /// keys outside the construction set are ignored.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(field) {
            *slot = value.into();
        }
    }

    /// Merge several field updates in one step.
    pub fn set_values<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (field, value) in entries {
            self.set_value(field, value);
        }
    }

    /// Restore every field to its construction-time value in one step.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
