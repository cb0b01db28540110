//! Domain primitives, ports, and portal use cases.
//!
//! Purpose: define strongly typed values for sessions, credentials, and
//! departments, the ports that reach the upstream API and the caller's
//! session, and the [`PortalActions`] that tie them together. Nothing here
//! knows about HTTP requests or cookies.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ActionResult (alias to `action_result::ActionResult`): action envelope.
//! - PortalActions (alias to `actions::PortalActions`): the Action Layer.
//! - route_guard: path protection rules.

pub mod action_result;
pub mod actions;
pub mod auth;
pub mod department;
pub mod error;
pub mod ports;
pub mod route_guard;
pub mod trace_id;
pub mod user;

pub use self::action_result::{ActionFailure, ActionResult, FieldViolation};
pub use self::actions::{
    AUTH_REQUIRED_MESSAGE, DEPARTMENT_NOT_FOUND_MESSAGE, Operation, PortalActions, require_session,
};
pub use self::auth::{
    AuthOutcome, AuthResponse, AuthSession, CredentialsValidationError, LoginCredentials,
    RegistrationDetails, SessionToken,
};
pub use self::department::{
    DEPARTMENT_NAME_MIN_CHARS, DESCRIPTION_MIN_CHARS, Department, DepartmentId,
    DepartmentValidationError, NewDepartment,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::route_guard::GuardDecision;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::User;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use department_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
