//! Wire bodies exchanged with the upstream departments API.
//!
//! Request DTOs borrow from validated domain values; responses decode straight
//! into domain types except for error bodies, which are read loosely.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{LoginCredentials, NewDepartment, RegistrationDetails};

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) name: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a RegistrationDetails> for RegisterRequestDto<'a> {
    fn from(details: &'a RegistrationDetails) -> Self {
        Self {
            name: details.name(),
            email: details.email(),
            password: details.password(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for LoginRequestDto<'a> {
    fn from(credentials: &'a LoginCredentials) -> Self {
        Self {
            email: credentials.email(),
            password: credentials.password(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateDepartmentRequestDto<'a> {
    pub(super) dept_name: &'a str,
    pub(super) description: &'a str,
}

impl<'a> From<&'a NewDepartment> for CreateDepartmentRequestDto<'a> {
    fn from(department: &'a NewDepartment) -> Self {
        Self {
            dept_name: department.dept_name(),
            description: department.description(),
        }
    }
}

/// Decode an error body, treating anything that is not JSON as `{}`.
pub(super) fn error_payload(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// Non-empty `message` string from an error payload.
pub(super) fn error_message(payload: &Value) -> Option<&str> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
}
