//! Enquiry form domain model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::validator::{FieldErrors, validate_form};

/// Maximum number of characters accepted in the free-text message.
pub const MESSAGE_MAX_CHARS: usize = 500;

/// The fields of the enquiry form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Travelers,
    Message,
}

impl Field {
    /// All fields, in display order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Phone, Field::Travelers, Field::Message];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Travelers => "travelers",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, as-typed values of the enquiry form.
///
/// Values are kept exactly as entered (apart from the message length cap) so
/// that validation sees what the visitor typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryForm {
    pub name: String,
    pub phone: String,
    /// Numeric text; empty when not provided.
    pub travelers: String,
    pub message: String,
}

impl EnquiryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Travelers => &self.travelers,
            Field::Message => &self.message,
        }
    }

    /// Sets the raw value of a field.
    ///
    /// The message is truncated to [`MESSAGE_MAX_CHARS`] characters, the same
    /// way a capped text area refuses further input.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Travelers => self.travelers = value,
            Field::Message => self.message = truncate_chars(value, MESSAGE_MAX_CHARS),
        }
    }

    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates the form and builds the record handed to persistence.
    pub fn to_record(&self) -> Result<EnquiryRecord, FieldErrors> {
        let errors = validate_form(self);
        if !errors.is_empty() {
            return Err(errors);
        }

        let travelers = match self.travelers.trim() {
            "" => None,
            // Already range-checked by the validator
            raw => raw.parse::<u32>().ok(),
        };

        Ok(EnquiryRecord {
            name: self.name.trim().to_string(),
            phone: self.phone.clone(),
            travelers,
            message: self.message.trim().to_string(),
        })
    }
}

/// One enquiry as stored by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryRecord {
    pub name: String,
    pub phone: String,
    pub travelers: Option<u32>,
    pub message: String,
}

fn truncate_chars(value: String, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EnquiryForm {
        let mut form = EnquiryForm::new();
        form.set(Field::Name, "  Asha Rawat ");
        form.set(Field::Phone, "9876543210");
        form.set(Field::Travelers, "4");
        form.set(Field::Message, "Do you provide microspikes? ");
        form
    }

    #[test]
    fn test_message_is_capped_on_input() {
        let mut form = EnquiryForm::new();
        form.set(Field::Message, "é".repeat(MESSAGE_MAX_CHARS + 20));
        assert_eq!(form.message.chars().count(), MESSAGE_MAX_CHARS);
    }

    #[test]
    fn test_other_fields_are_not_capped() {
        let mut form = EnquiryForm::new();
        let long = "a".repeat(MESSAGE_MAX_CHARS + 1);
        form.set(Field::Name, long.clone());
        assert_eq!(form.get(Field::Name), long);
    }

    #[test]
    fn test_to_record_parses_travelers_and_trims() {
        let record = filled().to_record().unwrap();
        assert_eq!(record.name, "Asha Rawat");
        assert_eq!(record.phone, "9876543210");
        assert_eq!(record.travelers, Some(4));
        assert_eq!(record.message, "Do you provide microspikes?");
    }

    #[test]
    fn test_to_record_without_travelers_is_null() {
        let mut form = filled();
        form.set(Field::Travelers, "");
        let record = form.to_record().unwrap();
        assert_eq!(record.travelers, None);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["travelers"].is_null());
    }

    #[test]
    fn test_to_record_rejects_invalid_form() {
        let mut form = filled();
        form.set(Field::Phone, "12345");
        let errors = form.to_record().unwrap_err();
        assert!(errors.get(Field::Phone).is_some());
        assert!(errors.get(Field::Name).is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut form = filled();
        form.clear();
        assert!(form.is_empty());
    }
}
