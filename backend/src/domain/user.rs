//! Authenticated user profile as issued by the upstream API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profile of the signed-in user.
///
/// Stored alongside the session token and echoed back to the UI. The upstream
/// owns these records; the portal only carries them.
///
/// # Examples
/// ```
/// use department_portal::domain::User;
///
/// let user: User = serde_json::from_str(r#"{"id":"1","name":"A","email":"a@b.com"}"#)
///     .expect("valid user");
/// assert_eq!(user.email, "a@b.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Upstream identifier.
    #[schema(example = "1")]
    pub id: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address used to sign in.
    #[schema(example = "ada@example.com")]
    pub email: String,
}

impl User {
    /// Build a user from its parts.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}
