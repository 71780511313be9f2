//! Explicit session context
//!
//! [`TimeclockContext`] wires the core services to the HTTP gateway for one
//! client. Screens receive the context instead of reaching for globals; it
//! owns the credential, the punch state cache and the last location fix.

use std::sync::Arc;

use punchclock_core::{
    ApiGateway, AuthSession, CredentialStore, InventoryConsumptionSubmitter, LocationCache,
    PunchSessionManager, TaskResolver, TimesheetSubmitter,
};
use punchclock_domain::{
    AuthError, AuthenticatedUser, ClientConfig, DeviceMetadata, PunchClockError,
};
use tracing::{info, instrument, warn};

use crate::api::HttpApiGateway;
use crate::observability::GatewayMetrics;
use crate::platform;

/// Everything a signed-in timeclock client needs.
pub struct TimeclockContext {
    config: ClientConfig,
    device: DeviceMetadata,
    gateway: Arc<HttpApiGateway>,
    auth: AuthSession,
    punches: PunchSessionManager,
    tasks: TaskResolver,
    timesheets: TimesheetSubmitter,
    inventory: InventoryConsumptionSubmitter,
    locations: LocationCache,
}

impl TimeclockContext {
    /// Build a context, detecting device metadata from the host.
    ///
    /// # Errors
    ///
    /// Returns `PunchClockError::Config` for invalid configuration.
    pub fn new(config: ClientConfig) -> Result<Self, PunchClockError> {
        let device = platform::detect(&config.device);
        Self::with_device(config, device)
    }

    /// Build a context with explicit device metadata.
    ///
    /// # Errors
    ///
    /// Returns `PunchClockError::Config` for invalid configuration.
    pub fn with_device(config: ClientConfig, device: DeviceMetadata) -> Result<Self, PunchClockError> {
        let store = Arc::new(CredentialStore::new());
        let gateway = Arc::new(HttpApiGateway::new(&config, store.clone())?);
        let port: Arc<dyn ApiGateway> = gateway.clone();

        let punches =
            PunchSessionManager::new(port.clone(), device.clone()).with_settings(&config.session);

        Ok(Self {
            auth: AuthSession::new(port.clone(), store),
            tasks: TaskResolver::new(port.clone()),
            timesheets: TimesheetSubmitter::new(port.clone()),
            inventory: InventoryConsumptionSubmitter::new(port, device.hostname.clone()),
            locations: LocationCache::new(),
            punches,
            gateway,
            device,
            config,
        })
    }

    /// Authenticate and load what the punch screen needs.
    ///
    /// Loads the profile, applies its location requirement, restricts punch
    /// zones to the backend catalog and queries the current punch. Only the
    /// authentication and profile steps are fatal.
    ///
    /// # Errors
    ///
    /// Returns the authentication error, or `AuthError::Api` when the
    /// profile cannot be loaded. In that case the fresh credential is
    /// discarded again.
    #[instrument(skip_all)]
    pub async fn sign_in(
        &self,
        organization_code: &str,
        pin: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        self.auth.authenticate(organization_code, pin).await?;
        let user = match self.auth.load_user().await {
            Ok(user) => user,
            Err(err) => {
                self.auth.logout();
                return Err(AuthError::Api(err));
            }
        };
        self.punches.apply_user_profile(&user);

        match self.auth.load_time_zones().await {
            Ok(catalog) if !catalog.is_empty() => self.punches.set_time_zone_catalog(catalog),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "time zone catalog unavailable"),
        }

        if let Err(err) = self.punches.refresh_current_state().await {
            warn!(error = %err, "current punch unavailable after sign-in");
        }

        info!(uses_mobile_app = user.uses_mobile_app, "signed in");
        Ok(user)
    }

    /// End the session: abort pending requests and forget all user state.
    pub fn logout(&self) {
        self.gateway.cancel_in_flight();
        self.auth.logout();
        self.punches.reset();
        self.locations.clear();
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn device(&self) -> &DeviceMetadata {
        &self.device
    }

    pub const fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub const fn punches(&self) -> &PunchSessionManager {
        &self.punches
    }

    pub const fn tasks(&self) -> &TaskResolver {
        &self.tasks
    }

    pub const fn timesheets(&self) -> &TimesheetSubmitter {
        &self.timesheets
    }

    pub const fn inventory(&self) -> &InventoryConsumptionSubmitter {
        &self.inventory
    }

    pub const fn locations(&self) -> &LocationCache {
        &self.locations
    }

    pub fn gateway(&self) -> &HttpApiGateway {
        &self.gateway
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        self.gateway.metrics()
    }
}
