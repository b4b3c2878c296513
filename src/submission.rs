//! # Submission State Machine
//!
//! Drives one pitch submission from form values to a terminal state:
//!
//! ```text
//! INITIAL -> PENDING -> SUCCESS
//!                    -> ERROR   -> PENDING (resubmit)
//! ```
//!
//! The machine validates before anything touches the store, converts every
//! failure into an ERROR state plus a user-facing notice, and never lets a
//! failed submission escape as a transport error. Notices and the redirect
//! signal only come out of terminal transitions.
//!
//! Callers must keep at most one submit in flight per form (the PENDING
//! status is what the submit button disables on); the machine itself does
//! not enforce mutual exclusion.
use serde::{Deserialize, Serialize};

use crate::{
    pitches,
    sessions::Session,
    store::ContentStore,
    validation::{FieldErrors, PitchDraft, validate},
};

pub const VALIDATION_FAILED: &str = "Validation Failed";
pub const UNEXPECTED_ERROR: &str = "Unexpected error has occurred";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Initial,
    Pending,
    Error,
    Success,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub status: SubmissionStatus,

    #[serde(default)]
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl SubmissionState {
    pub fn initial() -> Self {
        Self {
            status: SubmissionStatus::Initial,
            error: String::new(),
            result_id: None,
        }
    }

    /// Entry transition for an attempt, keeps the previous result around.
    pub fn pending(previous: &SubmissionState) -> Self {
        Self {
            status: SubmissionStatus::Pending,
            error: String::new(),
            result_id: previous.result_id.clone(),
        }
    }

    fn error(self, message: &str) -> Self {
        Self {
            status: SubmissionStatus::Error,
            error: message.to_string(),
            ..self
        }
    }

    fn success(self, id: String) -> Self {
        Self {
            status: SubmissionStatus::Success,
            error: String::new(),
            result_id: Some(id),
        }
    }
}

/// Toast payload for the notification UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    fn success(description: &str) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.to_string(),
            destructive: false,
        }
    }

    fn error(description: &str) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.to_string(),
            destructive: true,
        }
    }
}

/// Everything one transition produces: the next state, inline field errors
/// for the form, the notice to toast, and where to navigate on success.
#[derive(Clone, Debug)]
pub struct SubmissionOutcome {
    pub state: SubmissionState,
    pub field_errors: FieldErrors,
    pub notice: Notice,
    pub redirect: Option<String>,
}

pub async fn submit(
    store: &dyn ContentStore,
    session: Option<&Session>,
    draft: &PitchDraft,
    previous: &SubmissionState,
) -> SubmissionOutcome {
    let pending = SubmissionState::pending(previous);

    if let Err(errors) = validate(draft) {
        return SubmissionOutcome {
            state: pending.error(VALIDATION_FAILED),
            field_errors: errors,
            notice: Notice::error("Please check your inputs and try again"),
            redirect: None,
        };
    }

    match pitches::create_pitch(store, session, draft).await {
        Ok(record) => {
            let redirect = format!("/pitches/{}", record.id);

            SubmissionOutcome {
                state: pending.success(record.id),
                field_errors: FieldErrors::new(),
                notice: Notice::success("Your startup pitch has been created successfully"),
                redirect: Some(redirect),
            }
        }
        Err(_) => SubmissionOutcome {
            state: pending.error(UNEXPECTED_ERROR),
            field_errors: FieldErrors::new(),
            notice: Notice::error(UNEXPECTED_ERROR),
            redirect: None,
        },
    }
}
