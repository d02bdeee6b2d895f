use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier. Held as text whatever the column type on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ApplicationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => ApplicationId(text),
            RawId::Number(number) => ApplicationId(number.to_string()),
        })
    }
}

/// Pipeline position of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Interviewing and Offer both count as having reached interviews.
    pub const fn reached_interview(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interviewing | ApplicationStatus::Offer
        )
    }

    /// Anything past Applied means the employer (or the applicant) responded.
    pub const fn has_response(self) -> bool {
        !matches!(self, ApplicationStatus::Applied)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(trimmed.to_string()))
    }
}

/// One persisted application as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub date: NaiveDate,
    pub company: String,
    pub role: String,
    #[serde(rename = "match")]
    pub match_score: u8,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "empty_string_as_none_date")]
    pub followup: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// The client-editable part of the record, for comparing against what was submitted.
    pub fn payload(&self) -> NewApplication {
        NewApplication {
            date: self.date,
            company: self.company.clone(),
            role: self.role.clone(),
            match_score: self.match_score,
            status: self.status,
            followup: self.followup,
            salary: self.salary.clone(),
            tags: self.tags.clone(),
            link: self.link.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Validated insert payload. Absent optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewApplication {
    pub date: NaiveDate,
    pub company: String,
    pub role: String,
    #[serde(rename = "match")]
    pub match_score: u8,
    pub status: ApplicationStatus,
    pub followup: Option<NaiveDate>,
    pub salary: Option<String>,
    pub tags: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_string_as_none_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_string_as_none(deserializer)? {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
