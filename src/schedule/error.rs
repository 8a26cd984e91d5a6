use thiserror::Error;

/// Failures that can occur while loading or querying a timetable.
///
/// None of these are fatal to the bot: the service layer turns every
/// variant into a user-facing reply for the interaction that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule source unavailable: {source_key}: {reason}")]
    SourceUnavailable { source_key: String, reason: String },

    #[error("unparseable schedule document: {source_key}: {reason}")]
    UnparseableDocument { source_key: String, reason: String },

    #[error("no day/hours header row in {0}")]
    HeaderNotFound(String),

    #[error("group '{0}' not found in any timetable")]
    GroupNotFound(String),

    #[error("date {0} not found in any timetable")]
    DateNotFound(chrono::NaiveDate),

    #[error("unknown day token: '{0}'")]
    UnknownDayToken(String),

    #[error("invalid date: '{0}'")]
    InvalidDate(String),
}

impl ScheduleError {
    pub(crate) fn unavailable(source_key: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_key: source_key.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unparseable(source_key: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnparseableDocument {
            source_key: source_key.into(),
            reason: reason.to_string(),
        }
    }
}
