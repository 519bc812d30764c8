//! Declarative required-field validation
//!
//! A schema is a list of [`FieldRule`]s evaluated in order against a
//! structured input; the first failing rule wins.

use crate::error::{InspectionError, Result};

/// Value pulled out of an input for checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Free text, empty once trimmed counts as missing
    Text(&'a str),
    /// Optional text, `None` counts as missing
    OptionalText(Option<&'a str>),
    /// Reference to another entity; `None` or a non-positive id counts as missing
    Reference(Option<i64>),
}

impl FieldValue<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::OptionalText(s) => s.map_or(true, |s| s.trim().is_empty()),
            FieldValue::Reference(id) => id.map_or(true, |id| id <= 0),
        }
    }
}

/// One field of a validation schema
pub struct FieldRule<T> {
    /// Field name as sent to the backend
    pub name: &'static str,
    /// Human-readable label used in messages
    pub label: &'static str,
    extract: fn(&T) -> FieldValue<'_>,
    required: bool,
    when: Option<fn(&T) -> bool>,
    check: Option<fn(&FieldValue<'_>) -> Option<String>>,
}

impl<T> FieldRule<T> {
    /// A field that must be present
    pub fn required(name: &'static str, label: &'static str, extract: fn(&T) -> FieldValue<'_>) -> Self {
        Self {
            name,
            label,
            extract,
            required: true,
            when: None,
            check: None,
        }
    }

    /// A field that is only checked by its extra validator, when present
    pub fn optional(name: &'static str, label: &'static str, extract: fn(&T) -> FieldValue<'_>) -> Self {
        Self {
            required: false,
            ..Self::required(name, label, extract)
        }
    }

    /// Only apply the rule when the predicate holds
    pub fn when(mut self, predicate: fn(&T) -> bool) -> Self {
        self.when = Some(predicate);
        self
    }

    /// Extra format check, returning a message on failure
    pub fn check(mut self, check: fn(&FieldValue<'_>) -> Option<String>) -> Self {
        self.check = Some(check);
        self
    }

    fn evaluate(&self, input: &T) -> Result<()> {
        if let Some(when) = self.when {
            if !when(input) {
                return Ok(());
            }
        }

        let value = (self.extract)(input);
        if value.is_empty() {
            if self.required {
                return Err(InspectionError::validation(
                    self.name,
                    format!("The {} field is required", self.label),
                ));
            }
            return Ok(());
        }

        if let Some(check) = self.check {
            if let Some(message) = check(&value) {
                return Err(InspectionError::validation(self.name, message));
            }
        }
        Ok(())
    }
}

/// Evaluate a schema, failing on the first violated rule
pub fn validate<T>(input: &T, rules: &[FieldRule<T>]) -> Result<()> {
    rules.iter().try_for_each(|rule| rule.evaluate(input))
}

/// Build a length check for text fields
pub fn max_chars(value: &FieldValue<'_>, max: usize, label: &str) -> Option<String> {
    let len = match value {
        FieldValue::Text(s) => s.trim().chars().count(),
        FieldValue::OptionalText(Some(s)) => s.trim().chars().count(),
        _ => return None,
    };
    (len > max).then(|| format!("The {label} field must be at most {max} characters"))
}
