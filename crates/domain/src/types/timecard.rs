//! Manual time entries.

use chrono::NaiveDate;

use crate::constants::{
    ENTERED_AT_FORMAT, MAX_TIMECARD_HOURS, MAX_TIMECARD_MINUTES_PART, MAX_TIMECARD_TOTAL_MINUTES,
};
use crate::errors::ValidationError;

/// A validated time entry ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimecardEntryRequest {
    task_id: i64,
    entered_at: NaiveDate,
    minutes: u32,
    notes: Option<String>,
}

impl TimecardEntryRequest {
    /// # Errors
    ///
    /// Rejects a missing task and a duration outside `1..=1439` minutes.
    pub fn new(
        task_id: i64,
        entered_at: NaiveDate,
        minutes: u32,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        if task_id <= 0 {
            return Err(ValidationError::MissingTask);
        }
        if minutes == 0 || minutes > MAX_TIMECARD_TOTAL_MINUTES {
            return Err(ValidationError::DurationOutOfRange(minutes));
        }
        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(Self { task_id, entered_at, minutes, notes })
    }

    /// Build an entry from the hour and minute pickers.
    ///
    /// # Errors
    ///
    /// Rejects hours above 23, minutes above 59 and a zero total.
    pub fn from_hours_minutes(
        task_id: i64,
        entered_at: NaiveDate,
        hours: u32,
        minutes: u32,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        if hours > MAX_TIMECARD_HOURS {
            return Err(ValidationError::HoursOutOfRange(hours));
        }
        if minutes > MAX_TIMECARD_MINUTES_PART {
            return Err(ValidationError::MinutesOutOfRange(minutes));
        }
        Self::new(task_id, entered_at, hours * 60 + minutes, notes)
    }

    pub const fn task_id(&self) -> i64 {
        self.task_id
    }

    pub const fn entered_at(&self) -> NaiveDate {
        self.entered_at
    }

    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("taskId".to_string(), self.task_id.to_string()),
            ("enteredAt".to_string(), self.entered_at.format(ENTERED_AT_FORMAT).to_string()),
            ("minutes".to_string(), self.minutes.to_string()),
        ];
        if let Some(notes) = &self.notes {
            query.push(("notes".to_string(), notes.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = TimecardEntryRequest::from_hours_minutes(42, date(), 0, 0, None).unwrap_err();
        assert_eq!(err, ValidationError::DurationOutOfRange(0));
        assert!(TimecardEntryRequest::from_hours_minutes(42, date(), 0, 1, None).is_ok());
    }

    #[test]
    fn test_picker_bounds() {
        assert_eq!(
            TimecardEntryRequest::from_hours_minutes(42, date(), 24, 0, None).unwrap_err(),
            ValidationError::HoursOutOfRange(24)
        );
        assert_eq!(
            TimecardEntryRequest::from_hours_minutes(42, date(), 1, 60, None).unwrap_err(),
            ValidationError::MinutesOutOfRange(60)
        );
        let longest = TimecardEntryRequest::from_hours_minutes(42, date(), 23, 59, None).unwrap();
        assert_eq!(longest.minutes(), 1439);
    }

    #[test]
    fn test_missing_task_rejected() {
        assert_eq!(
            TimecardEntryRequest::new(0, date(), 30, None).unwrap_err(),
            ValidationError::MissingTask
        );
    }

    #[test]
    fn test_query_omits_blank_notes() {
        let entry = TimecardEntryRequest::new(42, date(), 90, Some("   ".into())).unwrap();
        assert_eq!(
            entry.to_query(),
            vec![
                ("taskId".to_string(), "42".to_string()),
                ("enteredAt".to_string(), "2024-03-05".to_string()),
                ("minutes".to_string(), "90".to_string()),
            ]
        );

        let with_notes = TimecardEntryRequest::new(42, date(), 90, Some("site visit".into())).unwrap();
        assert_eq!(with_notes.to_query()[3], ("notes".to_string(), "site visit".to_string()));
    }
}
