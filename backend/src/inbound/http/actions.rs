//! Action Layer handlers.
//!
//! ```text
//! POST   /api/actions/register          {"name":"A","email":"a@b.com","password":"pw"}
//! POST   /api/actions/login             {"email":"a@b.com","password":"pw"}
//! POST   /api/actions/logout
//! GET    /api/actions/departments
//! GET    /api/actions/departments/{id}
//! POST   /api/actions/departments       {"dept_name":"Ops","description":"..."}
//! DELETE /api/actions/departments/{id}
//! ```
//!
//! Every handler answers `200` with an [`ActionResult`] body; only requests
//! rejected before reaching the Action Layer (malformed JSON, refused origin)
//! get another status. Department handlers check the session before the
//! input, so anonymous callers always see `Authentication required`.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiResult;
use super::cache_control::private_no_cache_header;
use super::cookie_session::CookieSessionStore;
use super::state::HttpState;
use crate::domain::{
    ActionResult, CredentialsValidationError, DepartmentId, DepartmentValidationError, Error,
    LoginCredentials, NewDepartment, Operation, RegistrationDetails, require_session,
};

/// Response header carrying the department collection revision.
pub const COLLECTION_REVISION_HEADER: &str = "x-collection-revision";

/// Message returned for request bodies that are not valid JSON of the
/// expected shape.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Registration request body for `POST /api/actions/register`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<RegisterRequest> for RegistrationDetails {
    type Error = CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
    }
}

/// Login request body for `POST /api/actions/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Department creation body for `POST /api/actions/departments`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateDepartmentRequest {
    #[serde(default)]
    pub dept_name: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<CreateDepartmentRequest> for NewDepartment {
    type Error = DepartmentValidationError;

    fn try_from(value: CreateDepartmentRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.dept_name, &value.description)
    }
}

/// JSON extractor configuration shared by the action handlers.
///
/// Unreadable bodies are answered with `400` and the action envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected unreadable action body");
        Error::invalid_request(INVALID_BODY_MESSAGE).into()
    })
}

/// Register the action handlers on an `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(register)
        .service(login)
        .service(logout)
        .service(list_departments)
        .service(get_department)
        .service(create_department)
        .service(delete_department);
}

fn respond<T: Serialize>(result: &ActionResult<T>, session: &CookieSessionStore) -> HttpResponse {
    let mut response = HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(result);
    session.apply_to(&mut response);
    response
}

/// Create an account and start a session when the upstream issues a token.
#[utoipa::path(
    post,
    path = "/api/actions/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Action outcome", body = crate::inbound::http::schemas::ActionResultSchema,
            headers(("Set-Cookie" = String, description = "auth_token and user_data cookies on success"))),
        (status = 400, description = "Unreadable body", body = crate::inbound::http::schemas::RejectionSchema),
        (status = 403, description = "Origin not allowed", body = crate::inbound::http::schemas::RejectionSchema)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/actions/register")]
pub async fn register(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: CookieSessionStore,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    state.origins.check(&req)?;
    let result = match RegistrationDetails::try_from(payload.into_inner()) {
        Ok(details) => state.actions.register_user(&session, &details).await,
        Err(err) => ActionResult::invalid(&err),
    };
    Ok(respond(&result, &session))
}

/// Sign in and start a session.
#[utoipa::path(
    post,
    path = "/api/actions/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Action outcome", body = crate::inbound::http::schemas::ActionResultSchema,
            headers(("Set-Cookie" = String, description = "auth_token and user_data cookies on success"))),
        (status = 400, description = "Unreadable body", body = crate::inbound::http::schemas::RejectionSchema),
        (status = 403, description = "Origin not allowed", body = crate::inbound::http::schemas::RejectionSchema)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/actions/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: CookieSessionStore,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    state.origins.check(&req)?;
    let result = match LoginCredentials::try_from(payload.into_inner()) {
        Ok(credentials) => state.actions.login_user(&session, &credentials).await,
        Err(err) => ActionResult::invalid(&err),
    };
    Ok(respond(&result, &session))
}

/// End the session. Succeeds with or without an existing session.
#[utoipa::path(
    post,
    path = "/api/actions/logout",
    responses(
        (status = 200, description = "Session cleared", body = crate::inbound::http::schemas::ActionResultSchema,
            headers(("Set-Cookie" = String, description = "Removal cookies"))),
        (status = 403, description = "Origin not allowed", body = crate::inbound::http::schemas::RejectionSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/actions/logout")]
pub async fn logout(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: CookieSessionStore,
) -> ApiResult<HttpResponse> {
    state.origins.check(&req)?;
    let result = state.actions.logout_user(&session);
    Ok(respond(&result, &session))
}

/// List departments.
#[utoipa::path(
    get,
    path = "/api/actions/departments",
    responses(
        (status = 200, description = "Action outcome with a department list", body = crate::inbound::http::schemas::ActionResultSchema,
            headers(("X-Collection-Revision" = u64, description = "Department collection revision")))
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/actions/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    session: CookieSessionStore,
) -> HttpResponse {
    let result = state.actions.get_departments(&session).await;
    let mut response = respond(&result, &session);
    response.headers_mut().insert(
        HeaderName::from_static(COLLECTION_REVISION_HEADER),
        HeaderValue::from(state.refresh.departments_revision()),
    );
    response
}

/// Fetch one department.
#[utoipa::path(
    get,
    path = "/api/actions/departments/{id}",
    params(("id" = String, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Action outcome with a department", body = crate::inbound::http::schemas::ActionResultSchema)
    ),
    tags = ["departments"],
    operation_id = "getDepartment"
)]
#[get("/actions/departments/{id}")]
pub async fn get_department(
    state: web::Data<HttpState>,
    session: CookieSessionStore,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(rejected) = require_session::<()>(&session, Operation::GetDepartment) {
        return respond(&rejected, &session);
    }
    let result = match DepartmentId::new(path.into_inner()) {
        Ok(id) => state.actions.get_department(&session, &id).await,
        Err(err) => ActionResult::invalid(&err),
    };
    respond(&result, &session)
}

/// Create a department.
#[utoipa::path(
    post,
    path = "/api/actions/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 200, description = "Action outcome with the upstream acknowledgement", body = crate::inbound::http::schemas::ActionResultSchema),
        (status = 400, description = "Unreadable body", body = crate::inbound::http::schemas::RejectionSchema),
        (status = 403, description = "Origin not allowed", body = crate::inbound::http::schemas::RejectionSchema)
    ),
    tags = ["departments"],
    operation_id = "createDepartment"
)]
#[post("/actions/departments")]
pub async fn create_department(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: CookieSessionStore,
    payload: web::Json<CreateDepartmentRequest>,
) -> ApiResult<HttpResponse> {
    state.origins.check(&req)?;
    if let Err(rejected) = require_session::<()>(&session, Operation::CreateDepartment) {
        return Ok(respond(&rejected, &session));
    }
    let result = match NewDepartment::try_from(payload.into_inner()) {
        Ok(department) => state.actions.create_department(&session, &department).await,
        Err(err) => ActionResult::invalid(&err),
    };
    Ok(respond(&result, &session))
}

/// Delete a department.
#[utoipa::path(
    delete,
    path = "/api/actions/departments/{id}",
    params(("id" = String, Path, description = "Department identifier")),
    responses(
        (status = 200, description = "Action outcome", body = crate::inbound::http::schemas::ActionResultSchema),
        (status = 403, description = "Origin not allowed", body = crate::inbound::http::schemas::RejectionSchema)
    ),
    tags = ["departments"],
    operation_id = "deleteDepartment"
)]
#[delete("/actions/departments/{id}")]
pub async fn delete_department(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: CookieSessionStore,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.origins.check(&req)?;
    if let Err(rejected) = require_session::<()>(&session, Operation::DeleteDepartment) {
        return Ok(respond(&rejected, &session));
    }
    let result = match DepartmentId::new(path.into_inner()) {
        Ok(id) => state.actions.delete_department(&session, &id).await,
        Err(err) => ActionResult::invalid(&err),
    };
    Ok(respond(&result, &session))
}
