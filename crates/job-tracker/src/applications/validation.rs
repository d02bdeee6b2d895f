use chrono::NaiveDate;

use super::domain::NewApplication;
use super::form::DraftForm;

pub const MIN_MATCH_SCORE: i64 = 0;
pub const MAX_MATCH_SCORE: i64 = 100;

/// Client-side rejection of a draft. The draft itself is never touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be a YYYY-MM-DD date (found '{value}')")]
    InvalidDate { field: &'static str, value: String },
    #[error("match score must be a whole number (found '{value}')")]
    MatchNotNumeric { value: String },
    #[error("match score must be between 0 and 100 (found {value})")]
    MatchOutOfRange { value: i64 },
}

/// Convert raw form input into a payload fit for persistence.
pub fn validate_draft(draft: &DraftForm) -> Result<NewApplication, ValidationError> {
    let date = required_date("date", &draft.date)?;
    let company = required_text("company", &draft.company)?;
    let role = required_text("role", &draft.role)?;
    let match_score = parse_match_score(&draft.match_score)?;
    let followup = optional_date("followup", &draft.followup)?;

    Ok(NewApplication {
        date,
        company,
        role,
        match_score,
        status: draft.status,
        followup,
        salary: optional_text(&draft.salary),
        tags: optional_text(&draft.tags),
        link: optional_text(&draft.link),
        notes: optional_text(&draft.notes),
    })
}

pub fn parse_match_score(raw: &str) -> Result<u8, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field: "match" });
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::MatchNotNumeric {
            value: trimmed.to_string(),
        })?;

    if !(MIN_MATCH_SCORE..=MAX_MATCH_SCORE).contains(&value) {
        return Err(ValidationError::MatchOutOfRange { value });
    }

    Ok(value as u8)
}

fn required_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    optional_text(raw).ok_or(ValidationError::MissingField { field })
}

/// Blank input is absent; anything else is kept exactly as typed.
fn optional_text(raw: &str) -> Option<String> {
    (!raw.trim().is_empty()).then(|| raw.to_string())
}

fn required_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    optional_date(field, raw)?.ok_or(ValidationError::MissingField { field })
}

fn optional_date(field: &'static str, raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}
