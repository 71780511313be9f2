//! In-memory holder of the session credential.

use parking_lot::RwLock;
use punchclock_domain::Credential;
use tracing::info;

use crate::gateway::CredentialProvider;

/// The single place the bearer credential lives.
///
/// Shared between [`super::AuthSession`], which fills it, and the gateway,
/// which reads it for every authenticated call and clears it on a 401.
#[derive(Debug, Default)]
pub struct CredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    pub fn replace(&self, credential: Credential) {
        *self.credential.write() = Some(credential);
    }

    /// Drop the credential; returns whether one was held.
    pub fn clear(&self) -> bool {
        self.credential.write().take().is_some()
    }

    pub fn is_present(&self) -> bool {
        self.credential.read().is_some()
    }
}

impl CredentialProvider for CredentialStore {
    fn bearer_header(&self) -> Option<String> {
        self.credential.read().as_ref().map(Credential::bearer_header)
    }

    fn invalidate(&self) {
        if self.clear() {
            info!("Credential discarded after the server rejected it");
        }
    }
}
