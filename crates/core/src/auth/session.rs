//! PIN authentication and the signed-in user's profile.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use punchclock_domain::{
    ApiError, ApiRoute, AuthError, AuthenticateResponse, AuthenticatedUser, Credential, PinLogin,
    TimeZoneCatalog,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::store::CredentialStore;
use crate::gateway::{decode, malformed, ApiGateway, ApiRequest, CredentialProvider};

/// Holds the login state of the one user of this client.
pub struct AuthSession {
    gateway: Arc<dyn ApiGateway>,
    store: Arc<CredentialStore>,
    user: RwLock<Option<AuthenticatedUser>>,
}

impl AuthSession {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<CredentialStore>) -> Self {
        Self { gateway, store, user: RwLock::new(None) }
    }

    /// Exchange an organization code and PIN for a bearer credential.
    ///
    /// A previous credential and cached profile are replaced on success and
    /// left untouched on failure.
    ///
    /// # Errors
    ///
    /// - `AuthError::Invalid` for a blank code or PIN (nothing is sent)
    /// - `AuthError::InvalidCredentials` when the server rejects them
    /// - `AuthError::Transport` when the server cannot be reached
    #[instrument(skip_all, fields(organization_code = %organization_code))]
    pub async fn authenticate(
        &self,
        organization_code: &str,
        pin: &str,
    ) -> Result<Credential, AuthError> {
        let login = PinLogin::new(organization_code, pin)?;
        let body = serde_json::to_value(login.to_request())
            .map_err(|err| AuthError::Api(ApiError::Config(err.to_string())))?;

        let payload = self
            .gateway
            .request(ApiRequest::new(ApiRoute::Authenticate).with_body(body))
            .await
            .map_err(|err| {
                warn!(error = %err, "Authentication failed");
                AuthError::from(err)
            })?;

        let response: AuthenticateResponse =
            decode(payload, "authenticate").map_err(AuthError::Api)?;
        if response.token.trim().is_empty() {
            return Err(AuthError::Api(malformed("authenticate", &"empty token")));
        }

        let credential = Credential::new(response.token, Utc::now());
        self.store.replace(credential.clone());
        *self.user.write() = None;
        info!("Authenticated");
        Ok(credential)
    }

    pub fn current_credential(&self) -> Option<Credential> {
        self.store.get()
    }

    pub fn bearer_header(&self) -> Option<String> {
        self.store.bearer_header()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_present()
    }

    /// Fetch and cache the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; `Unauthenticated` without a credential.
    #[instrument(skip(self))]
    pub async fn load_user(&self) -> Result<AuthenticatedUser, ApiError> {
        let payload = self.gateway.request(ApiRequest::new(ApiRoute::Me)).await?;
        let user: AuthenticatedUser = decode(payload, "user")?;
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    /// The cached profile, only while a credential is held.
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        if !self.store.is_present() {
            return None;
        }
        self.user.read().clone()
    }

    /// Fetch the zones the backend accepts for punches.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error.
    #[instrument(skip(self))]
    pub async fn load_time_zones(&self) -> Result<TimeZoneCatalog, ApiError> {
        let payload = self.gateway.request(ApiRequest::new(ApiRoute::TimeZones)).await?;
        if !matches!(payload, Value::Array(_) | Value::Object(_) | Value::Null) {
            return Err(malformed("time zones", &"expected a list"));
        }
        Ok(TimeZoneCatalog::from_payload(&payload))
    }

    /// Forget the credential and profile.
    pub fn logout(&self) {
        self.store.clear();
        *self.user.write() = None;
        info!("Logged out");
    }
}
