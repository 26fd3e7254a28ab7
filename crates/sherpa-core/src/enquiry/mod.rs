//! Enquiry form domain module.
//!
//! # Module Structure
//!
//! - `model`: Form values, field identifiers and the persisted record
//! - `validator`: Pure per-field validation rules
//! - `repository`: Persistence collaborator trait
//! - `controller`: Submission state machine

mod controller;
mod model;
mod repository;
mod validator;

pub use controller::{
    EnquiryController, FAILURE_FEEDBACK, SUCCESS_FEEDBACK, SubmissionResult, SubmissionStatus,
    SubmitOutcome,
};
pub use model::{EnquiryForm, EnquiryRecord, Field, MESSAGE_MAX_CHARS};
pub use repository::EnquiryRepository;
pub use validator::{
    FieldError, FieldErrors, NAME_MIN_CHARS, TRAVELERS_MAX, validate_field, validate_form,
};
