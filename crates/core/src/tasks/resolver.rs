//! Task lookup by number, barcode or the customer/job hierarchy.

use std::sync::Arc;

use punchclock_domain::{
    ApiError, ApiRoute, Customer, Job, ResolveError, Task, TaskNumber, ValidationError,
};
use tracing::{debug, instrument};

use crate::gateway::{decode_list, ApiGateway, ApiRequest};

/// A task obtained from the backend during the current flow.
///
/// Only [`TaskResolver`] creates these, so a punch or timecard can never be
/// attributed to an id the user typed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask(Task);

impl ResolvedTask {
    pub const fn task(&self) -> &Task {
        &self.0
    }

    pub const fn id(&self) -> i64 {
        self.0.id
    }

    pub fn into_task(self) -> Task {
        self.0
    }
}

pub struct TaskResolver {
    gateway: Arc<dyn ApiGateway>,
}

impl TaskResolver {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Normalize a Code 128 scan into the key used for manual entry.
    ///
    /// # Errors
    ///
    /// Rejects a blank scan.
    pub fn resolve_barcode_scan(raw_value: &str) -> Result<TaskNumber, ValidationError> {
        TaskNumber::parse(raw_value)
    }

    /// Look up a task by its number.
    ///
    /// When the backend returns several matches the first one, in server
    /// order, is used.
    ///
    /// # Errors
    ///
    /// - `ResolveError::Invalid` for a blank number (nothing is sent)
    /// - `ResolveError::NoTaskForNumber` for no match or a 404
    /// - `ResolveError::Api` for any other gateway failure
    #[instrument(skip(self))]
    pub async fn find_by_number(&self, number: &str) -> Result<ResolvedTask, ResolveError> {
        let number = TaskNumber::parse(number)?;
        let request = ApiRequest::new(ApiRoute::SearchTasks).with_param("taskNumber", number.as_str());

        let payload = match self.gateway.request(request).await {
            Ok(payload) => payload,
            Err(ApiError::NotFound) => return Err(ResolveError::NoTaskForNumber(number.to_string())),
            Err(err) => return Err(err.into()),
        };

        let matches: Vec<Task> = decode_list(&payload, "task search")?;
        if matches.len() > 1 {
            debug!(count = matches.len(), "Several tasks match; using the first");
        }
        matches
            .into_iter()
            .next()
            .map(ResolvedTask)
            .ok_or_else(|| ResolveError::NoTaskForNumber(number.to_string()))
    }

    /// Resolve a raw scanner value.
    ///
    /// # Errors
    ///
    /// Same as [`Self::find_by_number`].
    pub async fn find_by_scan(&self, raw_value: &str) -> Result<ResolvedTask, ResolveError> {
        let number = Self::resolve_barcode_scan(raw_value)?;
        self.find_by_number(number.as_str()).await
    }

    /// # Errors
    ///
    /// Propagates the gateway error.
    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>, ResolveError> {
        let payload = self.gateway.request(ApiRequest::new(ApiRoute::Customers)).await?;
        Ok(decode_list(&payload, "customers")?)
    }

    /// # Errors
    ///
    /// Propagates the gateway error.
    #[instrument(skip(self))]
    pub async fn jobs_for_customer(&self, customer_id: i64) -> Result<Vec<Job>, ResolveError> {
        let request =
            ApiRequest::new(ApiRoute::Projects).with_param("customerId", customer_id.to_string());
        let payload = self.gateway.request(request).await?;
        Ok(decode_list(&payload, "jobs")?)
    }

    /// # Errors
    ///
    /// Propagates the gateway error.
    #[instrument(skip(self))]
    pub async fn tasks_for_job(&self, job_id: i64) -> Result<Vec<ResolvedTask>, ResolveError> {
        let request = ApiRequest::new(ApiRoute::Tasks).with_param("jobId", job_id.to_string());
        let payload = self.gateway.request(request).await?;
        let tasks: Vec<Task> = decode_list(&payload, "tasks")?;
        Ok(tasks.into_iter().map(ResolvedTask).collect())
    }
}
