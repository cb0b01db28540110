//! Authentication primitives: credentials, tokens, and sessions.
//!
//! Constructors validate raw strings so handlers reject empty input before
//! anything reaches the upstream API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::User;
use super::action_result::FieldViolation;

/// Length of a token fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Validation failures for login and registration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl FieldViolation for CredentialsValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

fn required_trimmed(
    value: &str,
    error: CredentialsValidationError,
) -> Result<String, CredentialsValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn required_password(value: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if value.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(value.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use department_portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@b.com ", "x").unwrap();
/// assert_eq!(creds.email(), "a@b.com");
/// assert_eq!(creds.password(), "x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login input.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: required_trimmed(email, CredentialsValidationError::EmptyEmail)?,
            password: required_password(password)?,
        })
    }

    /// Email used to sign in.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Validate raw registration input. Fields are checked in form order:
    /// name, email, password.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            name: required_trimmed(name, CredentialsValidationError::EmptyName)?,
            email: required_trimmed(email, CredentialsValidationError::EmptyEmail)?,
            password: required_password(password)?,
        })
    }

    /// Display name for the new account.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email for the new account.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password for the new account.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque bearer credential issued by the upstream API.
///
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token, rejecting empty or whitespace-only values.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Raw token text, sent verbatim in the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated SHA-256 fingerprint safe to log.
    ///
    /// # Examples
    /// ```
    /// use department_portal::domain::SessionToken;
    ///
    /// let token = SessionToken::new("t1").expect("non-empty token");
    /// let fp = token.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

/// The authenticated identity held in the caller's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Credential attached to upstream calls.
    pub token: SessionToken,
    /// Profile shown to the UI.
    pub user: User,
}

/// Upstream reply to `/login` and `/register`.
///
/// Both parts are optional: a reply without a token or without a user is a
/// success that does not establish a session.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AuthResponse {
    /// Issued token.
    #[serde(default)]
    pub token: Option<String>,
    /// Issued user profile.
    #[serde(default)]
    pub user: Option<User>,
    /// Free-text message from the upstream.
    #[serde(default)]
    pub message: Option<String>,
    /// Any other fields the upstream returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthResponse {
    /// Session described by this reply, when it carries both a non-empty
    /// token and a user.
    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        let token = SessionToken::new(self.token.clone()?)?;
        let user = self.user.clone()?;
        Some(AuthSession { token, user })
    }
}

/// What the UI learns about a login or registration attempt.
///
/// The token stays server-side in the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    /// Whether a session was established.
    pub authenticated: bool,
    /// Profile returned by the upstream, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Upstream message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
