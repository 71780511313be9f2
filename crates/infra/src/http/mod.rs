//! HTTP transport
//!
//! Thin wrapper around `reqwest` adding per-request timeout and retry with
//! backoff for transport failures.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder, RetryScope};
