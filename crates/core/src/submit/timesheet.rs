//! Manual timecard submission.

use std::sync::Arc;

use chrono::NaiveDate;
use punchclock_domain::{ApiRoute, SubmissionError, TimecardEntryRequest};
use tracing::{info, instrument};

use crate::gateway::{ApiGateway, ApiRequest};
use crate::tasks::ResolvedTask;

pub struct TimesheetSubmitter {
    gateway: Arc<dyn ApiGateway>,
}

impl TimesheetSubmitter {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Submit an already validated entry.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error. Resubmitting the same entry is safe.
    #[instrument(skip(self, entry), fields(task_id = entry.task_id(), minutes = entry.minutes()))]
    pub async fn submit(&self, entry: &TimecardEntryRequest) -> Result<(), SubmissionError> {
        self.gateway
            .request(ApiRequest::new(ApiRoute::Timecard).with_query(entry.to_query()))
            .await?;
        info!("Timecard entry submitted");
        Ok(())
    }

    /// Validate picker input for `task` and submit it.
    ///
    /// # Errors
    ///
    /// `SubmissionError::Invalid` for a zero or out-of-range duration, before
    /// anything is sent; otherwise as [`Self::submit`].
    pub async fn submit_hours(
        &self,
        task: &ResolvedTask,
        entered_at: NaiveDate,
        hours: u32,
        minutes: u32,
        notes: Option<String>,
    ) -> Result<(), SubmissionError> {
        let entry =
            TimecardEntryRequest::from_hours_minutes(task.id(), entered_at, hours, minutes, notes)?;
        self.submit(&entry).await
    }
}
