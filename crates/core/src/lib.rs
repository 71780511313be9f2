//! # Punchclock Core
//!
//! Session logic of the timeclock client, free of network code.
//!
//! This crate contains:
//! - Port interfaces for the remote API and the credential source
//! - Authentication session and credential storage
//! - The punch session state machine
//! - Task resolution and one-shot submitters
//!
//! ## Architecture Principles
//! - Depends only on `punchclock-common` and `punchclock-domain`
//! - No HTTP or platform code
//! - All I/O through the [`ApiGateway`] port

pub mod auth;
pub mod gateway;
pub mod punch;
pub mod submit;
pub mod tasks;

pub use auth::{AuthSession, CredentialStore};
pub use gateway::{ApiGateway, ApiRequest, CredentialProvider};
pub use punch::{CachedPunchState, LocationCache, PunchSessionManager};
pub use submit::{InventoryConsumptionSubmitter, TimesheetSubmitter};
pub use tasks::{ResolvedTask, TaskResolver};
