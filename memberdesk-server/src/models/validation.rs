//! Validation error types

use std::fmt;

use serde::Serialize;

/// Which rule a field broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required key absent or `null`
    Missing,

    /// Value has the wrong JSON type
    TypeMismatch,

    /// Numeric value below its floor
    ConstraintViolation,

    /// Email does not match address grammar
    InvalidEmail,

    /// Date or timestamp could not be parsed
    InvalidDate,

    /// Text holds a NUL character, which TEXT columns cannot store
    InvalidText,
}

impl FieldErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing => "required field missing",
            Self::TypeMismatch => "type mismatch",
            Self::ConstraintViolation => "constraint violation: must be ≥ 0",
            Self::InvalidEmail => "invalid email format",
            Self::InvalidDate => "invalid date format",
            Self::InvalidText => "text must not contain NUL characters",
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self {
            field,
            kind,
            message: kind.message(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Non-empty list of field errors, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wrap collected errors. Returns `None` when there is nothing to report.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Wrap errors already known to be non-empty.
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn single(field: &'static str, kind: FieldErrorKind) -> Self {
        Self(vec![FieldError::new(field, kind)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Error reported for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FieldError::new("age", FieldErrorKind::ConstraintViolation);
        assert_eq!(err.to_string(), "age: constraint violation: must be ≥ 0");
    }

    #[test]
    fn empty_list_is_not_an_error() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn serializes_as_array() {
        let errs = ValidationErrors::single("email", FieldErrorKind::InvalidEmail);
        let value = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "field": "email",
                "kind": "invalid_email",
                "message": "invalid email format"
            }])
        );
    }
}
