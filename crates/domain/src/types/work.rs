//! Work hierarchy: customer, job and task.
//!
//! A task belongs to a job which belongs to a customer. Lookups return the
//! task with its ancestors embedded so a screen can show all three levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::wire;

fn number_with_name(number: &str, name: &str) -> String {
    format!("{number} - {name}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
}

impl Customer {
    pub fn label(&self) -> String {
        number_with_name(&self.number, &self.name)
    }
}

/// A job, called a project by some endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl Job {
    pub fn label(&self) -> String {
        number_with_name(&self.number, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub job: Option<Job>,
}

impl Task {
    pub fn label(&self) -> String {
        number_with_name(&self.number, &self.name)
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.job.as_ref().and_then(|job| job.customer.as_ref())
    }
}

/// Textual key identifying a task, typed by hand or read from a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskNumber(String);

impl TaskNumber {
    /// Normalize a typed or scanned value.
    ///
    /// Surrounding whitespace and control characters (scanners append a
    /// carriage return) are stripped; nothing else is interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTaskNumber`] for a blank value.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim_matches(|c: char| c.is_whitespace() || c.is_control());
        if normalized.is_empty() {
            return Err(ValidationError::EmptyTaskNumber);
        }
        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a selection list in the manual lookup flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectableItem {
    Customer(Customer),
    Job(Job),
    Task(Task),
    /// A bare number, such as hours or minutes in a duration picker.
    Number(u32),
}

impl SelectableItem {
    pub fn display_label(&self) -> String {
        match self {
            Self::Customer(customer) => customer.label(),
            Self::Job(job) => job.label(),
            Self::Task(task) => task.label(),
            Self::Number(value) => value.to_string(),
        }
    }
}

impl From<Customer> for SelectableItem {
    fn from(value: Customer) -> Self {
        Self::Customer(value)
    }
}

impl From<Job> for SelectableItem {
    fn from(value: Job) -> Self {
        Self::Job(value)
    }
}

impl From<Task> for SelectableItem {
    fn from(value: Task) -> Self {
        Self::Task(value)
    }
}
