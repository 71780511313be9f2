//! Authentication: credential storage and the PIN login session.

pub mod session;
pub mod store;

pub use session::AuthSession;
pub use store::CredentialStore;
