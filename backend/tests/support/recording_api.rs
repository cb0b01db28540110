//! Recording `DepartmentApi` double shared by integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use department_portal::domain::ports::{ApiError, DepartmentApi};
use department_portal::domain::{
    AuthResponse, Department, DepartmentId, LoginCredentials, NewDepartment,
    RegistrationDetails, SessionToken, User,
};
use serde_json::{Value, json};

/// One upstream call as the double saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register { email: String },
    Login { email: String },
    List { token: String },
    Get { token: String, id: String },
    Create { token: String, dept_name: String },
    Delete { token: String, id: String },
}

/// Upstream double that answers from fixtures and records every call.
///
/// `login` accepts the password `pw` and issues token `t1`; any other
/// password is refused with a 401 carrying `Invalid credentials`.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    departments: Mutex<Vec<Department>>,
}

impl RecordingApi {
    pub fn with_departments(departments: Vec<Department>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            departments: Mutex::new(departments),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn issue(email: &str) -> AuthResponse {
        AuthResponse {
            token: Some("t1".to_owned()),
            user: Some(User::new("1", "A", email)),
            message: Some("ok".to_owned()),
            ..AuthResponse::default()
        }
    }
}

pub fn department(id: &str, name: &str) -> Department {
    Department {
        id: id.to_owned(),
        department: name.to_owned(),
        description: format!("{name} department"),
        created_at: None,
        updated_at: None,
        version: None,
    }
}

#[async_trait]
impl DepartmentApi for RecordingApi {
    async fn register(&self, details: &RegistrationDetails) -> Result<AuthResponse, ApiError> {
        self.record(Call::Register {
            email: details.email().to_owned(),
        });
        Ok(Self::issue(details.email()))
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.record(Call::Login {
            email: credentials.email().to_owned(),
        });
        if credentials.password() == "pw" {
            Ok(Self::issue(credentials.email()))
        } else {
            Err(ApiError::upstream(
                "Invalid credentials",
                401_u16,
                json!({ "message": "Invalid credentials" }),
            ))
        }
    }

    async fn list_departments(&self, token: &SessionToken) -> Result<Vec<Department>, ApiError> {
        self.record(Call::List {
            token: token.as_str().to_owned(),
        });
        Ok(self
            .departments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn get_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Option<Department>, ApiError> {
        self.record(Call::Get {
            token: token.as_str().to_owned(),
            id: id.as_str().to_owned(),
        });
        self.departments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|dept| dept.id == id.as_str())
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                ApiError::upstream(
                    "Department not found",
                    404_u16,
                    json!({ "message": "Department not found" }),
                )
            })
    }

    async fn create_department(
        &self,
        token: &SessionToken,
        department: &NewDepartment,
    ) -> Result<Value, ApiError> {
        self.record(Call::Create {
            token: token.as_str().to_owned(),
            dept_name: department.dept_name().to_owned(),
        });
        Ok(json!({ "message": "Department added" }))
    }

    async fn delete_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Value, ApiError> {
        self.record(Call::Delete {
            token: token.as_str().to_owned(),
            id: id.as_str().to_owned(),
        });
        self.departments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|dept| dept.id != id.as_str());
        Ok(Value::Null)
    }
}
