//! Input validation for invoice payloads.
//!
//! The item table is sent as six parallel lists; every row needs an entry in
//! each of them before anything is drawn.

use std::fmt;

use super::models::InvoiceData;
use super::traits::Validator;

/// Body returned to clients when the item lists disagree in length.
pub const ITEM_LENGTH_MISMATCH: &str = "Error: All item lists must have the same length.";

/// Validation error with a field name and an optional hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create error for an item list whose length differs from `HS_Codes`
    pub fn length_mismatch(field: &str, actual: usize, expected: usize) -> Self {
        Self::new(
            field,
            format!("has {} entries but HS_Codes has {}", actual, expected),
        )
        .with_suggestion("Send exactly one entry per item row in every item list")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One line per error, numbered, for logs.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}. {}", i + 1, error))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Check that every item list has as many entries as `HS_Codes`.
pub fn validate_item_lists(data: &InvoiceData, errors: &mut ValidationErrors) {
    let expected = data.hs_codes.len();
    let lengths = [
        ("Marks_and_Nos", data.marks_and_nos.len()),
        ("Packages", data.packages.len()),
        ("Descriptions", data.descriptions.len()),
        ("Quantities", data.quantities.len()),
        ("Rates", data.rates.len()),
    ];

    for (field, actual) in lengths {
        if actual != expected {
            errors.add(ValidationError::length_mismatch(field, actual, expected));
        }
    }
}

impl Validator for InvoiceData {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_item_lists(self, &mut errors);
        errors.into_result()
    }
}
