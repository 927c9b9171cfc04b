//! Declarative field validation
//!
//! Schemas are `validator` derives on the payload types. This module holds the
//! shared rules they reference and flattens `validator::ValidationErrors` into
//! [`FieldValidationError`]s keyed by wire path (`groupTourMembers[0].mobile`),
//! which is the shape the form's per-field error state and the REST error body
//! both use.

use crate::core::dates::DATE_FORMAT;
use crate::core::error::FieldValidationError;
use chrono::NaiveDate;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Exactly ten digits
pub static RE_MOBILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());

/// Mobile number: empty, or exactly ten digits
pub fn optional_mobile(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || RE_MOBILE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("mobile")
            .with_message(Cow::Borrowed("Mobile number must be exactly 10 digits")))
    }
}

/// Email: empty, or a valid address
pub fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email address")))
    }
}

/// Calendar date: empty, or `YYYY-MM-DD`
pub fn optional_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("date")
            .with_message(Cow::Borrowed("Date must be in YYYY-MM-DD format")))
    }
}

/// Run a schema and return its failures as wire-path field errors
pub fn schema_errors<T: Validate>(value: &T) -> Vec<FieldValidationError> {
    let mut out = Vec::new();
    if let Err(errors) = value.validate() {
        collect(&errors, "", &mut out);
    }
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldValidationError>) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(&field.to_string()));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(&e.code));
                    FieldValidationError::new(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn default_message(code: &str) -> String {
    match code {
        "length" => "Required".to_string(),
        "range" => "Out of range".to_string(),
        "email" => "Invalid email address".to_string(),
        "regex" => "Invalid format".to_string(),
        other => format!("Invalid value ({})", other),
    }
}

/// `group_tour_members` -> `groupTourMembers`
pub fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
