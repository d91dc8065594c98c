//! # Authentication Endpoints
//!
//! Login is two steps:
//!
//! ```text
//! POST /auth/login-password { phone, password }
//!      └─► { pendingSessionId }
//! POST /auth/otp/verify-2fa { pendingSessionId, code }
//!      └─► { accessToken, refreshToken, user }
//! ```
//!
//! Both are public requests: a 401 here means wrong credentials and never
//! triggers a token refresh.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

use farmstand_core::validation::{
    normalize_phone, validate_display_name, validate_otp_code, validate_password, validate_phone,
};
use farmstand_core::{User, UserRole};

use super::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;

/// Result of the password step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLogin {
    pub pending_session_id: String,
    /// Where the code was sent, masked by the server (e.g. `+2547******01`).
    #[serde(default)]
    pub destination: Option<String>,
}

/// Tokens plus the user they belong to.
pub struct AuthSession {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub user: User,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user.id)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

impl From<AuthResponse> for AuthSession {
    fn from(raw: AuthResponse) -> Self {
        AuthSession {
            access_token: SecretString::from(raw.access_token),
            refresh_token: raw.refresh_token.map(SecretString::from),
            user: raw.user,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordLoginRequest<'a> {
    phone: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyTwoFactorRequest<'a> {
    pending_session_id: &'a str,
    code: &'a str,
}

/// Sign-up form.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
    pub role: UserRole,
    /// Required by the server when `role` is farmer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Password step. Validates locally first.
#[tracing::instrument(skip(client, password), fields(phone = %phone))]
pub async fn login_password(
    client: &ApiClient,
    phone: &str,
    password: &str,
) -> ClientResult<PendingLogin> {
    validate_phone(phone)?;
    validate_password(password)?;

    let phone = normalize_phone(phone);
    let request = ApiRequest::post("/auth/login-password")
        .json(&PasswordLoginRequest {
            phone: &phone,
            password,
        })?
        .public();

    let pending: PendingLogin = client.fetch(request).await?;
    tracing::info!("Password accepted, awaiting one-time code");
    Ok(pending)
}

/// Code step. Returns tokens; persisting them is the caller's job.
#[tracing::instrument(skip(client, code))]
pub async fn verify_two_factor(
    client: &ApiClient,
    pending_session_id: &str,
    code: &str,
) -> ClientResult<AuthSession> {
    validate_otp_code(code)?;

    let request = ApiRequest::post("/auth/otp/verify-2fa")
        .json(&VerifyTwoFactorRequest {
            pending_session_id,
            code: code.trim(),
        })?
        .public();

    let response: AuthResponse = client.fetch(request).await?;
    tracing::info!(user_id = %response.user.id, "Two-factor verification succeeded");
    Ok(response.into())
}

#[tracing::instrument(skip(client, registration), fields(phone = %registration.phone, role = %registration.role))]
pub async fn register(client: &ApiClient, registration: &Registration) -> ClientResult<AuthSession> {
    validate_display_name(&registration.name)?;
    validate_phone(&registration.phone)?;
    validate_password(&registration.password)?;

    let mut body = registration.clone();
    body.phone = normalize_phone(&registration.phone);

    let request = ApiRequest::post("/auth/register").json(&body)?.public();
    let response: AuthResponse = client.fetch(request).await?;
    tracing::info!(user_id = %response.user.id, "Registration succeeded");
    Ok(response.into())
}
