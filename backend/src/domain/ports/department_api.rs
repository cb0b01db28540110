//! Driven port for the upstream departments REST API.
//!
//! Adapters own transport details (URLs, headers, JSON encoding); the domain
//! owns the operation set and the error contract. This is the only seam in the
//! portal that raises errors; the Action Layer converts them into
//! [`ActionResult`](crate::domain::ActionResult) values.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{
    AuthResponse, Department, DepartmentId, LoginCredentials, NewDepartment, RegistrationDetails,
    SessionToken,
};

/// Message surfaced when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

define_port_error! {
    /// Failures raised by [`DepartmentApi`] implementations.
    pub enum ApiError {
        /// The request never produced a response.
        Transport { detail: String } => "Network error occurred",
        /// The upstream answered with a non-success status.
        Upstream { message: String, status: u16, data: Value } => "{message}",
        /// The upstream answered successfully with a body of the wrong shape.
        Decode { status: u16, detail: String } => "Unexpected response from server",
    }
}

impl ApiError {
    /// Short message suitable for the UI.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the upstream response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::Upstream { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }

    /// Raw upstream error payload, for upstream failures.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Upstream { data, .. } => Some(data),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Operations exposed by the upstream API.
///
/// `register` and `login` are anonymous; every department operation carries
/// the caller's token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentApi: Send + Sync {
    /// `POST /register`.
    async fn register(&self, details: &RegistrationDetails) -> Result<AuthResponse, ApiError>;

    /// `POST /login`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError>;

    /// `GET /departments`.
    async fn list_departments(&self, token: &SessionToken) -> Result<Vec<Department>, ApiError>;

    /// `GET /department/{id}`; `None` when a successful reply carries no
    /// record (`null` or an empty body).
    async fn get_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Option<Department>, ApiError>;

    /// `POST /add-department`; returns the upstream acknowledgement as-is.
    async fn create_department(
        &self,
        token: &SessionToken,
        department: &NewDepartment,
    ) -> Result<Value, ApiError>;

    /// `DELETE /delete-department/{id}`; returns the upstream acknowledgement
    /// as-is (`null` for an empty body).
    async fn delete_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Value, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn transport_errors_are_generic() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.status(), None);
        assert!(err.data().is_none());
    }

    #[rstest]
    fn upstream_errors_keep_status_and_payload() {
        let payload = json!({ "message": "Invalid credentials" });
        let err = ApiError::upstream("Invalid credentials", 401_u16, payload.clone());
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.data(), Some(&payload));
    }

    #[rstest]
    fn decode_errors_keep_status() {
        let err = ApiError::decode(200_u16, "expected array");
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.message(), "Unexpected response from server");
    }
}
