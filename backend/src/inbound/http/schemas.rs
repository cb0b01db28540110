//! OpenAPI schema definitions for the action envelopes.
//!
//! `ActionResult<T>` serialises by hand and is generic, so the documented
//! shape lives here as a plain wrapper registered under a stable name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ActionResult`].
///
/// Outcome of a portal action. `data` is present on success when the action
/// returns something; `error` is present on failure, and `field` names the
/// rejected input for validation failures.
#[derive(ToSchema)]
#[schema(as = ActionResult)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ActionResultSchema {
    /// Whether the action succeeded.
    #[schema(example = true)]
    success: bool,
    /// Action payload (auth outcome, department, department list, or upstream
    /// acknowledgement).
    data: Option<serde_json::Value>,
    /// Short failure message.
    #[schema(example = "Authentication required")]
    error: Option<String>,
    /// Offending input field for validation failures.
    #[schema(example = "dept_name")]
    field: Option<String>,
}

/// OpenAPI schema for requests refused before reaching the Action Layer.
#[derive(ToSchema)]
#[schema(as = Rejection)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RejectionSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Reason for the refusal.
    #[schema(example = "Invalid request body")]
    error: String,
}
