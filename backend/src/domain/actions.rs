//! Action Layer: the operations the UI invokes.
//!
//! Every operation resolves to an [`ActionResult`]; upstream failures are
//! logged and reduced to a short message. Department operations check the
//! caller's session first and never reach the network without a token.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use super::ports::{ApiError, CollectionRefresh, DepartmentApi, SessionStore};
use super::{
    ActionResult, AuthOutcome, AuthResponse, Department, DepartmentId, LoginCredentials,
    NewDepartment, RegistrationDetails, TraceId,
};

/// Message returned when a department action runs without a session.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";

/// Message returned when the upstream answers a lookup without a record.
pub const DEPARTMENT_NOT_FOUND_MESSAGE: &str = "Department not found";

/// Portal operations, named for logs and fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Account registration.
    Register,
    /// Sign-in.
    Login,
    /// Sign-out.
    Logout,
    /// Department listing.
    ListDepartments,
    /// Single department lookup.
    GetDepartment,
    /// Department creation.
    CreateDepartment,
    /// Department deletion.
    DeleteDepartment,
}

impl Operation {
    /// Stable name used in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::ListDepartments => "list_departments",
            Self::GetDepartment => "get_department",
            Self::CreateDepartment => "create_department",
            Self::DeleteDepartment => "delete_department",
        }
    }

    /// Message used when the underlying error carries nothing usable.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::Logout => "Logout failed",
            Self::ListDepartments => "Failed to fetch departments",
            Self::GetDepartment => "Failed to fetch department",
            Self::CreateDepartment => "Failed to create department",
            Self::DeleteDepartment => "Failed to delete department",
        }
    }
}

fn failed<T>(operation: Operation, err: &ApiError) -> ActionResult<T> {
    error!(
        operation = operation.name(),
        status = ?err.status(),
        trace_id = ?TraceId::current().map(|id| id.to_string()),
        error = ?err,
        "portal action failed"
    );
    let message = err.message();
    if message.trim().is_empty() {
        ActionResult::failure(operation.fallback_message())
    } else {
        ActionResult::failure(message)
    }
}

fn auth_required<T>(operation: Operation) -> ActionResult<T> {
    info!(operation = operation.name(), "action rejected without a session");
    ActionResult::failure(AUTH_REQUIRED_MESSAGE)
}

/// Reject a department operation when the caller has no session.
///
/// Inbound adapters call this before validating any input, so an anonymous
/// caller only ever sees [`AUTH_REQUIRED_MESSAGE`].
///
/// # Examples
/// ```
/// use department_portal::domain::ports::InMemorySessionStore;
/// use department_portal::domain::{Operation, require_session};
///
/// let rejected = require_session::<()>(&InMemorySessionStore::new(), Operation::DeleteDepartment)
///     .expect_err("no session");
/// assert_eq!(rejected.error(), Some("Authentication required"));
/// ```
pub fn require_session<T>(
    session: &dyn SessionStore,
    operation: Operation,
) -> Result<(), ActionResult<T>> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(auth_required(operation))
    }
}

/// Create the caller's session from an auth reply when it carries both a
/// token and a user.
fn establish_session(
    operation: Operation,
    session: &dyn SessionStore,
    response: AuthResponse,
) -> AuthOutcome {
    let authenticated = match response.session() {
        Some(auth) => {
            session.create(&auth);
            info!(
                operation = operation.name(),
                user_id = %auth.user.id,
                token_fingerprint = %auth.token.fingerprint(),
                "session established"
            );
            true
        }
        None => {
            warn!(
                operation = operation.name(),
                "auth reply lacked a token or user; no session created"
            );
            false
        }
    };
    AuthOutcome {
        authenticated,
        user: response.user,
        message: response.message,
    }
}

/// The portal's use cases, wired to an upstream API and a refresh signal.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use department_portal::domain::PortalActions;
/// use department_portal::domain::ports::{InMemorySessionStore, NoOpCollectionRefresh};
/// # use department_portal::domain::ports::{ApiError, DepartmentApi};
/// # use department_portal::domain::*;
/// # struct Offline;
/// # #[async_trait::async_trait]
/// # impl DepartmentApi for Offline {
/// #     async fn register(&self, _: &RegistrationDetails) -> Result<AuthResponse, ApiError> { Err(ApiError::transport("offline")) }
/// #     async fn login(&self, _: &LoginCredentials) -> Result<AuthResponse, ApiError> { Err(ApiError::transport("offline")) }
/// #     async fn list_departments(&self, _: &SessionToken) -> Result<Vec<Department>, ApiError> { Err(ApiError::transport("offline")) }
/// #     async fn get_department(&self, _: &SessionToken, _: &DepartmentId) -> Result<Option<Department>, ApiError> { Err(ApiError::transport("offline")) }
/// #     async fn create_department(&self, _: &SessionToken, _: &NewDepartment) -> Result<serde_json::Value, ApiError> { Err(ApiError::transport("offline")) }
/// #     async fn delete_department(&self, _: &SessionToken, _: &DepartmentId) -> Result<serde_json::Value, ApiError> { Err(ApiError::transport("offline")) }
/// # }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let actions = PortalActions::new(Arc::new(Offline), Arc::new(NoOpCollectionRefresh));
/// let result = actions.get_departments(&InMemorySessionStore::new()).await;
/// assert_eq!(result.error(), Some("Authentication required"));
/// # });
/// ```
#[derive(Clone)]
pub struct PortalActions {
    api: Arc<dyn DepartmentApi>,
    refresh: Arc<dyn CollectionRefresh>,
}

impl PortalActions {
    /// Wire the actions to their collaborators.
    pub fn new(api: Arc<dyn DepartmentApi>, refresh: Arc<dyn CollectionRefresh>) -> Self {
        Self { api, refresh }
    }

    /// Register an account and, when the upstream issues one, start a session.
    pub async fn register_user(
        &self,
        session: &dyn SessionStore,
        details: &RegistrationDetails,
    ) -> ActionResult<AuthOutcome> {
        match self.api.register(details).await {
            Ok(response) => ActionResult::success(establish_session(
                Operation::Register,
                session,
                response,
            )),
            Err(err) => failed(Operation::Register, &err),
        }
    }

    /// Sign in and start a session.
    pub async fn login_user(
        &self,
        session: &dyn SessionStore,
        credentials: &LoginCredentials,
    ) -> ActionResult<AuthOutcome> {
        match self.api.login(credentials).await {
            Ok(response) => {
                ActionResult::success(establish_session(Operation::Login, session, response))
            }
            Err(err) => failed(Operation::Login, &err),
        }
    }

    /// End the session. Purely local; succeeds whether or not a session
    /// existed.
    pub fn logout_user(&self, session: &dyn SessionStore) -> ActionResult<()> {
        session.destroy();
        info!(operation = Operation::Logout.name(), "session destroyed");
        ActionResult::done()
    }

    /// List departments visible to the caller.
    pub async fn get_departments(&self, session: &dyn SessionStore) -> ActionResult<Vec<Department>> {
        let operation = Operation::ListDepartments;
        let Some(token) = session.read_token() else {
            return auth_required(operation);
        };
        match self.api.list_departments(&token).await {
            Ok(departments) => ActionResult::success(departments),
            Err(err) => failed(operation, &err),
        }
    }

    /// Fetch one department. An upstream reply without a record reads as
    /// not found.
    pub async fn get_department(
        &self,
        session: &dyn SessionStore,
        id: &DepartmentId,
    ) -> ActionResult<Department> {
        let operation = Operation::GetDepartment;
        let Some(token) = session.read_token() else {
            return auth_required(operation);
        };
        match self.api.get_department(&token, id).await {
            Ok(Some(department)) => ActionResult::success(department),
            Ok(None) => {
                warn!(
                    operation = operation.name(),
                    department_id = %id,
                    "upstream returned no department"
                );
                ActionResult::failure(DEPARTMENT_NOT_FOUND_MESSAGE)
            }
            Err(err) => failed(operation, &err),
        }
    }

    /// Create a department, then signal the collection refresh.
    pub async fn create_department(
        &self,
        session: &dyn SessionStore,
        department: &NewDepartment,
    ) -> ActionResult<Value> {
        let operation = Operation::CreateDepartment;
        let Some(token) = session.read_token() else {
            return auth_required(operation);
        };
        match self.api.create_department(&token, department).await {
            Ok(created) => {
                self.refresh.departments_changed();
                ActionResult::success(created)
            }
            Err(err) => failed(operation, &err),
        }
    }

    /// Delete a department, then signal the collection refresh.
    pub async fn delete_department(
        &self,
        session: &dyn SessionStore,
        id: &DepartmentId,
    ) -> ActionResult<()> {
        let operation = Operation::DeleteDepartment;
        let Some(token) = session.read_token() else {
            return auth_required(operation);
        };
        match self.api.delete_department(&token, id).await {
            Ok(_) => {
                self.refresh.departments_changed();
                ActionResult::done()
            }
            Err(err) => failed(operation, &err),
        }
    }
}

#[cfg(test)]
mod tests;
