//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the portal. It registers:
//!
//! - **Paths**: the Action Layer endpoints and the health probes
//! - **Schemas**: the action envelopes ([`ActionResultSchema`],
//!   [`RejectionSchema`]), request bodies and the payload types carried in
//!   `data`
//! - **Security**: the `auth_token` session cookie
//!
//! The generated document backs Swagger UI in debug builds.

use crate::domain::{AuthOutcome, Department, User};
use crate::inbound::http::actions::{CreateDepartmentRequest, LoginRequest, RegisterRequest};
use crate::inbound::http::schemas::{ActionResultSchema, RejectionSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "auth_token",
                "Session cookie issued by the login and register actions.",
            ))),
        );
    }
}

/// OpenAPI document for the portal.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Department portal API",
        description = "Session-holding front for the departments API: account actions, department actions and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::actions::register,
        crate::inbound::http::actions::login,
        crate::inbound::http::actions::logout,
        crate::inbound::http::actions::list_departments,
        crate::inbound::http::actions::get_department,
        crate::inbound::http::actions::create_department,
        crate::inbound::http::actions::delete_department,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ActionResultSchema,
        RejectionSchema,
        AuthOutcome,
        Department,
        User,
        RegisterRequest,
        LoginRequest,
        CreateDepartmentRequest
    )),
    tags(
        (name = "auth", description = "Account and session actions"),
        (name = "departments", description = "Department actions; require a session"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
