use std::mem;

use chrono::NaiveDate;

use super::domain::{ApplicationStatus, NewApplication};
use super::validation::{validate_draft, ValidationError};

/// Raw, unvalidated input for a new application. Text fields hold exactly what was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub date: String,
    pub company: String,
    pub role: String,
    pub match_score: String,
    pub status: ApplicationStatus,
    pub followup: String,
    pub salary: String,
    pub tags: String,
    pub link: String,
    pub notes: String,
}

impl DraftForm {
    /// Empty draft with the submission date pre-filled.
    pub fn starting_on(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Replace a single field, leaving the others untouched.
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Date(value) => self.date = value,
            DraftEdit::Company(value) => self.company = value,
            DraftEdit::Role(value) => self.role = value,
            DraftEdit::MatchScore(value) => self.match_score = value,
            DraftEdit::Status(value) => self.status = value,
            DraftEdit::Followup(value) => self.followup = value,
            DraftEdit::Salary(value) => self.salary = value,
            DraftEdit::Tags(value) => self.tags = value,
            DraftEdit::Link(value) => self.link = value,
            DraftEdit::Notes(value) => self.notes = value,
        }
    }
}

/// One field edit coming from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Date(String),
    Company(String),
    Role(String),
    MatchScore(String),
    Status(ApplicationStatus),
    Followup(String),
    Salary(String),
    Tags(String),
    Link(String),
    Notes(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    Open(DraftForm),
    Submitting(DraftForm),
}

impl FormState {
    pub fn label(&self) -> &'static str {
        match self {
            FormState::Closed => "closed",
            FormState::Open(_) => "open",
            FormState::Submitting(_) => "submitting",
        }
    }

    pub fn draft(&self) -> Option<&DraftForm> {
        match self {
            FormState::Closed => None,
            FormState::Open(draft) | FormState::Submitting(draft) => Some(draft),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("the new application form is not open")]
    NotOpen,
    #[error("the new application is already being submitted")]
    AlreadySubmitting,
    #[error("no submission is in progress")]
    NotSubmitting,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Lifecycle of the creation form: `Closed -> Open -> Submitting -> Closed`.
#[derive(Debug, Clone, Default)]
pub struct DraftFormController {
    state: FormState,
}

impl DraftFormController {
    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FormState::Closed)
    }

    /// Open the form with a fresh draft. An already open form keeps its draft.
    pub fn open(&mut self, today: NaiveDate) {
        if matches!(self.state, FormState::Closed) {
            self.state = FormState::Open(DraftForm::starting_on(today));
        }
    }

    /// Close from any state, discarding the draft.
    pub fn close(&mut self) {
        self.state = FormState::Closed;
    }

    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), FormError> {
        match &mut self.state {
            FormState::Open(draft) => {
                draft.apply(edit);
                Ok(())
            }
            FormState::Submitting(_) => Err(FormError::AlreadySubmitting),
            FormState::Closed => Err(FormError::NotOpen),
        }
    }

    /// Validate the draft and move to `Submitting`. On failure the form stays open as it was.
    pub fn begin_submit(&mut self) -> Result<NewApplication, FormError> {
        let draft = match &self.state {
            FormState::Open(draft) => draft,
            FormState::Submitting(_) => return Err(FormError::AlreadySubmitting),
            FormState::Closed => return Err(FormError::NotOpen),
        };

        let payload = validate_draft(draft)?;
        self.state = match mem::take(&mut self.state) {
            FormState::Open(draft) => FormState::Submitting(draft),
            other => other,
        };
        Ok(payload)
    }

    pub fn complete_submit(&mut self) -> Result<(), FormError> {
        match self.state {
            FormState::Submitting(_) => {
                self.state = FormState::Closed;
                Ok(())
            }
            _ => Err(FormError::NotSubmitting),
        }
    }

    /// Return to editing with the draft intact after a failed remote call.
    pub fn abort_submit(&mut self) -> Result<(), FormError> {
        match mem::take(&mut self.state) {
            FormState::Submitting(draft) => {
                self.state = FormState::Open(draft);
                Ok(())
            }
            other => {
                self.state = other;
                Err(FormError::NotSubmitting)
            }
        }
    }
}
