//! Punch session state machine
//!
//! The manager mirrors the server's view of whether the user is on the clock.
//! It never decides a transition on its own: every mutation is forwarded to
//! the backend, and the cached state is either what the server confirmed or
//! `Unknown` after an ambiguous outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use punchclock_domain::{
    ActivePunch, ApiError, ApiRoute, AuthenticatedUser, DeviceMetadata, GeoLocation,
    LocationPolicy, PunchError, PunchInRequest, PunchOutRequest, PunchState, SessionSettings,
    TimeZoneCatalog, ValidationError,
};
use tracing::{debug, error, info, instrument, warn};

use crate::gateway::{ApiGateway, ApiRequest};
use crate::tasks::ResolvedTask;

/// Locally cached punch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedPunchState {
    /// Not queried yet, or the last mutation had an unclear outcome.
    Unknown,
    Known(PunchState),
}

impl CachedPunchState {
    pub const fn known(&self) -> Option<&PunchState> {
        match self {
            Self::Known(state) => Some(state),
            Self::Unknown => None,
        }
    }
}

/// Releases the single-flight flag when a mutation ends, however it ends.
struct MutationGuard<'a>(&'a AtomicBool);

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PunchSessionManager {
    gateway: Arc<dyn ApiGateway>,
    device: DeviceMetadata,
    resync_after_mutation: bool,
    configured_policy: LocationPolicy,
    location_policy: RwLock<LocationPolicy>,
    catalog: RwLock<Option<TimeZoneCatalog>>,
    state: Mutex<CachedPunchState>,
    mutating: AtomicBool,
}

impl PunchSessionManager {
    pub fn new(gateway: Arc<dyn ApiGateway>, device: DeviceMetadata) -> Self {
        let defaults = SessionSettings::default();
        Self {
            gateway,
            device,
            resync_after_mutation: defaults.resync_after_mutation,
            configured_policy: defaults.location_policy,
            location_policy: RwLock::new(defaults.location_policy),
            catalog: RwLock::new(None),
            state: Mutex::new(CachedPunchState::Unknown),
            mutating: AtomicBool::new(false),
        }
    }

    pub fn with_settings(mut self, settings: &SessionSettings) -> Self {
        self.resync_after_mutation = settings.resync_after_mutation;
        self.configured_policy = settings.location_policy;
        *self.location_policy.get_mut() = settings.location_policy;
        self
    }

    /// Restrict punch time zones to a catalog from the backend.
    pub fn set_time_zone_catalog(&self, catalog: TimeZoneCatalog) {
        *self.catalog.write() = Some(catalog);
    }

    pub fn set_location_policy(&self, policy: LocationPolicy) {
        *self.location_policy.write() = policy;
    }

    /// Follow the signed-in user's location requirement.
    ///
    /// A configured `Required` policy is never relaxed by the profile.
    pub fn apply_user_profile(&self, user: &AuthenticatedUser) {
        let policy = if user.requires_location {
            LocationPolicy::Required
        } else {
            self.configured_policy
        };
        self.set_location_policy(policy);
    }

    pub fn cached_state(&self) -> CachedPunchState {
        self.state.lock().clone()
    }

    /// Forget everything learned for the previous user.
    pub fn reset(&self) {
        *self.state.lock() = CachedPunchState::Unknown;
        *self.catalog.write() = None;
        *self.location_policy.write() = self.configured_policy;
    }

    /// Ask the server whether the user is punched in.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error, or `MalformedResponse` when the punch
    /// payload cannot be interpreted. The cached state becomes `Unknown`.
    #[instrument(skip(self))]
    pub async fn refresh_current_state(&self) -> Result<PunchState, ApiError> {
        let result = self
            .gateway
            .request(ApiRequest::new(ApiRoute::CurrentPunch))
            .await
            .and_then(|payload| PunchState::from_current_payload(&payload));

        match result {
            Ok(state) => {
                debug!(punched_in = state.is_punched_in(), "Current punch state refreshed");
                *self.state.lock() = CachedPunchState::Known(state.clone());
                Ok(state)
            }
            Err(err) => {
                if matches!(err, ApiError::MalformedResponse(_)) {
                    error!(error = %err, "Current punch payload could not be interpreted");
                }
                *self.state.lock() = CachedPunchState::Unknown;
                Err(err)
            }
        }
    }

    /// Punch in to a resolved task.
    ///
    /// The call is forwarded even when the cache says punched in; the server
    /// decides.
    ///
    /// # Errors
    ///
    /// - `MutationInProgress` while another punch is running
    /// - `Invalid(MissingTimeZone)`, `UnknownTimeZone`, `LocationRequired`
    ///   for input rejected locally
    /// - `Api` for the gateway error, after which the state is `Unknown`
    #[instrument(skip(self, task, location), fields(task_id = task.id()))]
    pub async fn punch_in(
        &self,
        task: &ResolvedTask,
        time_zone: &str,
        location: Option<GeoLocation>,
    ) -> Result<(), PunchError> {
        let _guard = self.begin_mutation()?;
        let time_zone = self.check_time_zone(time_zone)?;
        self.check_location(location)?;

        let request = PunchInRequest {
            task_id: task.id(),
            time_zone: time_zone.clone(),
            location,
            device: self.device.clone(),
        };
        let outcome =
            self.gateway.request(ApiRequest::new(ApiRoute::PunchIn).with_query(request.to_query())).await;

        if let Err(err) = outcome {
            warn!(error = %err, "Punch in failed; state is unknown until refreshed");
            *self.state.lock() = CachedPunchState::Unknown;
            return Err(err.into());
        }

        info!("Punched in");
        *self.state.lock() = CachedPunchState::Known(PunchState::PunchedIn(ActivePunch {
            task: task.task().clone(),
            since: Utc::now(),
            since_time_zone: time_zone,
        }));
        self.resync().await;
        Ok(())
    }

    /// Punch out of the open punch.
    ///
    /// Rejected locally only when the cache positively knows the user is
    /// punched out; from `Unknown` the server decides.
    ///
    /// # Errors
    ///
    /// Same as [`Self::punch_in`], plus `NotPunchedIn`.
    #[instrument(skip(self, location))]
    pub async fn punch_out(
        &self,
        time_zone: &str,
        location: Option<GeoLocation>,
    ) -> Result<(), PunchError> {
        let _guard = self.begin_mutation()?;
        if matches!(*self.state.lock(), CachedPunchState::Known(PunchState::PunchedOut)) {
            return Err(PunchError::NotPunchedIn);
        }
        let time_zone = self.check_time_zone(time_zone)?;
        self.check_location(location)?;

        let request = PunchOutRequest { time_zone, location, device: self.device.clone() };
        let outcome = self
            .gateway
            .request(ApiRequest::new(ApiRoute::PunchOut).with_query(request.to_query()))
            .await;

        if let Err(err) = outcome {
            warn!(error = %err, "Punch out failed; state is unknown until refreshed");
            *self.state.lock() = CachedPunchState::Unknown;
            return Err(err.into());
        }

        info!("Punched out");
        *self.state.lock() = CachedPunchState::Known(PunchState::PunchedOut);
        self.resync().await;
        Ok(())
    }

    /// Zone to preselect: the punch-in zone while punched in, otherwise the
    /// user's profile zone.
    pub fn suggested_time_zone(&self, user: &AuthenticatedUser) -> Option<String> {
        let captured = self
            .state
            .lock()
            .known()
            .and_then(PunchState::active)
            .map(|active| active.since_time_zone.clone())
            .filter(|zone| !zone.is_empty());
        captured.or_else(|| Some(user.time_zone.clone()).filter(|zone| !zone.is_empty()))
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_>, PunchError> {
        if self
            .mutating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PunchError::MutationInProgress);
        }
        Ok(MutationGuard(&self.mutating))
    }

    fn check_time_zone(&self, time_zone: &str) -> Result<String, PunchError> {
        let time_zone = time_zone.trim();
        if time_zone.is_empty() {
            return Err(ValidationError::MissingTimeZone.into());
        }
        if let Some(catalog) = self.catalog.read().as_ref() {
            if !catalog.is_empty() && !catalog.contains(time_zone) {
                return Err(PunchError::UnknownTimeZone(time_zone.to_string()));
            }
        }
        Ok(time_zone.to_string())
    }

    fn check_location(&self, location: Option<GeoLocation>) -> Result<(), PunchError> {
        if location.is_none() && *self.location_policy.read() == LocationPolicy::Required {
            return Err(PunchError::LocationRequired);
        }
        Ok(())
    }

    async fn resync(&self) {
        if !self.resync_after_mutation {
            return;
        }
        if let Err(err) = self.refresh_current_state().await {
            warn!(error = %err, "Resync after punch failed");
        }
    }
}
