//! Per-field validation rules for the enquiry form.
//!
//! Validation is pure: callers decide when to run it (on blur, on change once
//! a field has been touched, and for every field on submit).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::model::{EnquiryForm, Field};

/// Minimum length of a name, in characters, after trimming.
pub const NAME_MIN_CHARS: usize = 2;

/// Largest group size accepted in the travelers field.
pub const TRAVELERS_MAX: u32 = 50;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s.'-]+$").expect("name pattern is valid"));

// `\d` would accept non-ASCII digits
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone pattern is valid"));

/// A user-facing validation failure. `Display` is the inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum FieldError {
    #[error("Full name is required.")]
    NameRequired,
    #[error("Name can only contain letters, spaces, and '.-")]
    NameInvalid,
    #[error("Name must be at least 2 characters.")]
    NameTooShort,
    #[error("Phone number is required.")]
    PhoneRequired,
    #[error("Please enter a valid 10-digit phone number.")]
    PhoneInvalid,
    #[error("Please enter a number of travelers between 1 and 50.")]
    TravelersOutOfRange,
}

/// Validates one raw field value.
///
/// Returns `None` when the value is acceptable.
pub fn validate_field(field: Field, raw: &str) -> Option<FieldError> {
    match field {
        Field::Name => validate_name(raw),
        Field::Phone => validate_phone(raw),
        Field::Travelers => validate_travelers(raw),
        // Length is capped at input time
        Field::Message => None,
    }
}

/// Validates every field of the form.
pub fn validate_form(form: &EnquiryForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in Field::ALL {
        errors.set(field, validate_field(field, form.get(field)));
    }
    errors
}

fn validate_name(raw: &str) -> Option<FieldError> {
    let name = raw.trim();
    if name.is_empty() {
        return Some(FieldError::NameRequired);
    }
    if !NAME_PATTERN.is_match(name) {
        return Some(FieldError::NameInvalid);
    }
    if name.chars().count() < NAME_MIN_CHARS {
        return Some(FieldError::NameTooShort);
    }
    None
}

fn validate_phone(raw: &str) -> Option<FieldError> {
    if raw.trim().is_empty() {
        return Some(FieldError::PhoneRequired);
    }
    if !PHONE_PATTERN.is_match(raw) {
        return Some(FieldError::PhoneInvalid);
    }
    None
}

fn validate_travelers(raw: &str) -> Option<FieldError> {
    if raw.is_empty() {
        return None;
    }
    match raw.trim().parse::<u32>() {
        Ok(count) if (1..=TRAVELERS_MAX).contains(&count) => None,
        _ => Some(FieldError::TravelersOutOfRange),
    }
}

/// Current validation error per field. Absent means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// Stores or clears the error for `field`.
    pub fn set(&mut self, field: Field, error: Option<FieldError>) {
        match error {
            Some(error) => {
                self.0.insert(field, error);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }
}
