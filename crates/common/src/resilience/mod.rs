//! Resilience patterns for transient failures
//!
//! Only retry with backoff is provided. Callers decide per error whether a
//! retry is safe through [`RetryPolicy`]; the executor handles the waiting,
//! the attempt budget and reports the last error back unchanged.

pub mod retry;

pub use retry::{
    retry_with_policy, BackoffStrategy, Jitter, RetryConfig, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
