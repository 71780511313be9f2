//! Authentication types
//!
//! The bearer credential issued for a PIN login and the profile of the user it
//! belongs to.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::AUTH_METHOD_PIN;
use crate::errors::ValidationError;
use crate::utils::wire;

/// Bearer token held for the lifetime of a login.
///
/// The server does not report a reliable expiry, so validity is only known
/// negatively: a 401 on any authenticated call ends the credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    bearer_token: String,
    obtained_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(bearer_token: impl Into<String>, obtained_at: DateTime<Utc>) -> Self {
        Self { bearer_token: bearer_token.into(), obtained_at }
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub const fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("bearer_token", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Organization code and PIN typed by the user.
#[derive(Clone)]
pub struct PinLogin {
    organization_code: String,
    pin: String,
}

impl PinLogin {
    /// Validate the login form before anything is sent.
    ///
    /// # Errors
    ///
    /// Rejects a blank organization code or PIN.
    pub fn new(organization_code: &str, pin: &str) -> Result<Self, ValidationError> {
        let organization_code = organization_code.trim();
        let pin = pin.trim();
        if organization_code.is_empty() {
            return Err(ValidationError::EmptyOrganizationCode);
        }
        if pin.is_empty() {
            return Err(ValidationError::EmptyPin);
        }
        Ok(Self { organization_code: organization_code.to_string(), pin: pin.to_string() })
    }

    pub fn organization_code(&self) -> &str {
        &self.organization_code
    }

    /// JSON body for the authenticate endpoint.
    pub fn to_request(&self) -> AuthenticateRequest {
        AuthenticateRequest {
            method: AUTH_METHOD_PIN.to_string(),
            pin_organization_code: self.organization_code.clone(),
            pin_user_pin: self.pin.clone(),
        }
    }
}

impl fmt::Debug for PinLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinLogin")
            .field("organization_code", &self.organization_code)
            .field("pin", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateRequest {
    pub method: String,
    pub pin_organization_code: String,
    pub pin_user_pin: String,
}

#[derive(Clone, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(rename = "AuthToken", alias = "token", alias = "Token", alias = "authToken")]
    pub token: String,
}

/// Profile of the signed-in user, fetched once after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticatedUser {
    #[serde(deserialize_with = "wire::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub email_address: String,
    /// Zone label the user normally punches in.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub time_zone: String,
    #[serde(default, alias = "UsesMobileClock")]
    pub uses_mobile_app: bool,
    #[serde(default, alias = "UsesTimesheets")]
    pub uses_time_cards: bool,
    #[serde(default)]
    pub requires_location: bool,
}
