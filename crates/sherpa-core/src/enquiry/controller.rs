//! Enquiry submission controller.
//!
//! Owns the form values, the per-field error map and the submission state
//! machine:
//!
//! ```text
//! idle ──submit (valid)──▶ submitting ──save ok──▶ success
//!   ▲                          │
//!   │                          └──save err──▶ error
//!   └──────── next edit ◀──────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::flight::Flight;

use super::model::{EnquiryForm, Field};
use super::repository::EnquiryRepository;
use super::validator::{FieldErrors, validate_field, validate_form};

/// Shown after an enquiry was stored.
pub const SUCCESS_FEEDBACK: &str =
    "Thank you! Your enquiry has been sent. We'll be in touch soon.";

/// Shown after the persistence collaborator failed. The cause is only logged.
pub const FAILURE_FEEDBACK: &str =
    "Sorry, we couldn't send your enquiry right now. Please try again in a moment.";

/// Outcome of the last completed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionResult {
    Saved,
    Failed,
}

/// User-visible submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// What a call to [`EnquiryController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    Ignored,
    /// At least one field failed validation; nothing was sent.
    Invalid(FieldErrors),
    /// The record was stored and the form was reset.
    Saved,
    /// The persistence collaborator failed; the form was kept for a retry.
    Failed,
}

#[derive(Default)]
struct FormState {
    form: EnquiryForm,
    errors: FieldErrors,
    touched: BTreeSet<Field>,
    submission: Flight<SubmissionResult>,
}

/// Drives the enquiry form from keystrokes to a stored record.
pub struct EnquiryController {
    repository: Arc<dyn EnquiryRepository>,
    state: Mutex<FormState>,
}

impl EnquiryController {
    /// Creates a controller with an empty form.
    pub fn new(repository: Arc<dyn EnquiryRepository>) -> Self {
        Self {
            repository,
            state: Mutex::new(FormState::default()),
        }
    }

    /// Applies one edit to a field.
    ///
    /// A touched field is re-validated; an untouched one just loses any stale
    /// error. A resolved submission status goes back to idle.
    pub async fn set_field(&self, field: Field, value: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.form.set(field, value);

        let error = if state.touched.contains(&field) {
            validate_field(field, state.form.get(field))
        } else {
            None
        };
        state.errors.set(field, error);
        state.submission.acknowledge();
    }

    /// Marks a field as touched and validates it.
    pub async fn blur(&self, field: Field) {
        let mut state = self.state.lock().await;
        state.touched.insert(field);
        let error = validate_field(field, state.form.get(field));
        state.errors.set(field, error);
    }

    /// Validates every field, storing the resulting error map.
    ///
    /// Returns `true` when the form can be submitted.
    pub async fn validate_all(&self) -> bool {
        let mut state = self.state.lock().await;
        Self::validate_all_locked(&mut state)
    }

    fn validate_all_locked(state: &mut FormState) -> bool {
        state.touched.extend(Field::ALL);
        let errors = validate_form(&state.form);
        let valid = errors.is_empty();
        state.errors = errors;
        valid
    }

    /// Validates and, if valid, sends the enquiry to the repository.
    ///
    /// Calls made while a submission is in flight are dropped.
    pub async fn submit(&self) -> SubmitOutcome {
        let record = {
            let mut state = self.state.lock().await;
            if state.submission.is_pending() {
                tracing::warn!("Enquiry submission already in flight, ignoring submit");
                return SubmitOutcome::Ignored;
            }

            if !Self::validate_all_locked(&mut state) {
                state.submission.acknowledge();
                tracing::debug!(
                    "Enquiry rejected by validation ({} field(s))",
                    state.errors.len()
                );
                return SubmitOutcome::Invalid(state.errors.clone());
            }

            let record = match state.form.to_record() {
                Ok(record) => record,
                Err(errors) => {
                    state.errors = errors.clone();
                    return SubmitOutcome::Invalid(errors);
                }
            };
            state.submission.try_begin();
            record
        };

        tracing::info!("Submitting enquiry");
        let result = self.repository.save(&record).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                tracing::info!("Enquiry stored");
                state.form.clear();
                state.errors.clear();
                state.touched.clear();
                state.submission.resolve(SubmissionResult::Saved);
                SubmitOutcome::Saved
            }
            Err(err) => {
                tracing::error!("Failed to store enquiry: {}", err);
                state.submission.resolve(SubmissionResult::Failed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Clears the form, errors and status.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let submission = std::mem::take(&mut state.submission);
        *state = FormState::default();
        // An in-flight submission still owns its slot
        if submission.is_pending() {
            state.submission = submission;
        }
    }

    pub async fn form(&self) -> EnquiryForm {
        self.state.lock().await.form.clone()
    }

    pub async fn errors(&self) -> FieldErrors {
        self.state.lock().await.errors.clone()
    }

    pub async fn status(&self) -> SubmissionStatus {
        match self.state.lock().await.submission {
            Flight::Idle => SubmissionStatus::Idle,
            Flight::Pending => SubmissionStatus::Submitting,
            Flight::Resolved(SubmissionResult::Saved) => SubmissionStatus::Success,
            Flight::Resolved(SubmissionResult::Failed) => SubmissionStatus::Error,
        }
    }

    /// The banner text for the current status, if any.
    pub async fn feedback(&self) -> Option<&'static str> {
        match self.status().await {
            SubmissionStatus::Success => Some(SUCCESS_FEEDBACK),
            SubmissionStatus::Error => Some(FAILURE_FEEDBACK),
            SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enquiry::{EnquiryRecord, FieldError};
    use crate::error::{Result, SherpaError};
    use std::sync::Mutex as StdMutex;

    // Mock EnquiryRepository that records every insert
    struct MockEnquiryRepository {
        saved: StdMutex<Vec<EnquiryRecord>>,
        fail: bool,
    }

    impl MockEnquiryRepository {
        fn new() -> Self {
            Self {
                saved: StdMutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                saved: StdMutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl EnquiryRepository for MockEnquiryRepository {
        async fn save(&self, record: &EnquiryRecord) -> Result<()> {
            self.saved.lock().unwrap().push(record.clone());
            // Give a concurrent caller the chance to run while we are in flight
            tokio::task::yield_now().await;
            if self.fail {
                Err(SherpaError::persistence("connection reset"))
            } else {
                Ok(())
            }
        }
    }

    async fn fill(controller: &EnquiryController) {
        controller.set_field(Field::Name, "Asha Rawat").await;
        controller.set_field(Field::Phone, "9876543210").await;
        controller.set_field(Field::Travelers, "3").await;
        controller.set_field(Field::Message, "December batch?").await;
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let repo = Arc::new(MockEnquiryRepository::new());
        let controller = EnquiryController::new(repo.clone());
        fill(&controller).await;

        assert_eq!(controller.submit().await, SubmitOutcome::Saved);
        assert_eq!(controller.status().await, SubmissionStatus::Success);
        assert!(controller.form().await.is_empty());
        assert!(controller.errors().await.is_empty());
        assert_eq!(controller.feedback().await, Some(SUCCESS_FEEDBACK));

        let saved = repo.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].travelers, Some(3));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_values() {
        let repo = Arc::new(MockEnquiryRepository::failing());
        let controller = EnquiryController::new(repo.clone());
        fill(&controller).await;
        let before = controller.form().await;

        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(controller.status().await, SubmissionStatus::Error);
        assert_eq!(controller.form().await, before);
        assert_eq!(controller.feedback().await, Some(FAILURE_FEEDBACK));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_repository() {
        let repo = Arc::new(MockEnquiryRepository::new());
        let controller = EnquiryController::new(repo.clone());
        controller.set_field(Field::Phone, "12345").await;

        match controller.submit().await {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.get(Field::Name), Some(FieldError::NameRequired));
                assert_eq!(errors.get(Field::Phone), Some(FieldError::PhoneInvalid));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(repo.calls(), 0);
        assert_eq!(controller.status().await, SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_double_submit_sends_once() {
        let repo = Arc::new(MockEnquiryRepository::new());
        let controller = EnquiryController::new(repo.clone());
        fill(&controller).await;

        let (first, second) = tokio::join!(controller.submit(), controller.submit());

        let outcomes = [first, second];
        assert!(outcomes.contains(&SubmitOutcome::Saved));
        assert!(outcomes.contains(&SubmitOutcome::Ignored));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_untouched_field_is_not_revalidated_on_change() {
        let controller = EnquiryController::new(Arc::new(MockEnquiryRepository::new()));
        controller.set_field(Field::Phone, "12").await;
        assert!(controller.errors().await.get(Field::Phone).is_none());

        controller.blur(Field::Phone).await;
        assert_eq!(
            controller.errors().await.get(Field::Phone),
            Some(FieldError::PhoneInvalid)
        );

        // Touched now, so each change re-validates
        controller.set_field(Field::Phone, "9876543210").await;
        assert!(controller.errors().await.get(Field::Phone).is_none());
        controller.set_field(Field::Phone, "98765").await;
        assert_eq!(
            controller.errors().await.get(Field::Phone),
            Some(FieldError::PhoneInvalid)
        );
    }

    #[tokio::test]
    async fn test_edit_after_error_returns_to_idle() {
        let controller = EnquiryController::new(Arc::new(MockEnquiryRepository::failing()));
        fill(&controller).await;
        controller.submit().await;
        assert_eq!(controller.status().await, SubmissionStatus::Error);

        controller.set_field(Field::Message, "Retrying").await;
        assert_eq!(controller.status().await, SubmissionStatus::Idle);
        assert_eq!(controller.feedback().await, None);
    }

    #[tokio::test]
    async fn test_retry_after_failure_submits_again() {
        let repo = Arc::new(MockEnquiryRepository::failing());
        let controller = EnquiryController::new(repo.clone());
        fill(&controller).await;

        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn test_validate_all_marks_fields_touched() {
        let controller = EnquiryController::new(Arc::new(MockEnquiryRepository::new()));
        assert!(!controller.validate_all().await);

        controller.set_field(Field::Name, "X").await;
        assert_eq!(
            controller.errors().await.get(Field::Name),
            Some(FieldError::NameTooShort)
        );
    }
}
