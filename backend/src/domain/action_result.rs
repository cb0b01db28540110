//! Uniform result envelope returned by every portal action.
//!
//! Wire shape:
//! ```text
//! {"success":true,"data":...}            data omitted for unit outcomes
//! {"success":false,"error":"...","field":"..."}   field only for validation
//! ```

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Validation errors that can point at the input field they concern.
pub trait FieldViolation: std::fmt::Display {
    /// Name of the offending input field, as the UI submits it.
    fn field(&self) -> &'static str;
}

/// Failure half of an [`ActionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    error: String,
    field: Option<String>,
}

impl ActionFailure {
    /// Short message for the UI.
    #[must_use]
    pub fn error(&self) -> &str {
        self.error.as_str()
    }

    /// Input field the failure concerns, for validation failures.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

/// Outcome of a portal action.
///
/// # Examples
/// ```
/// use department_portal::domain::ActionResult;
///
/// let ok = ActionResult::success(3_u32);
/// assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"success":true,"data":3}"#);
///
/// let failed: ActionResult<u32> = ActionResult::failure("Login failed");
/// assert_eq!(
///     serde_json::to_string(&failed).unwrap(),
///     r#"{"success":false,"error":"Login failed"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The action completed; `None` for actions without a payload.
    Success(Option<T>),
    /// The action failed.
    Failure(ActionFailure),
}

impl<T> ActionResult<T> {
    /// Successful outcome carrying `data`.
    pub fn success(data: T) -> Self {
        Self::Success(Some(data))
    }

    /// Successful outcome without a payload.
    #[must_use]
    pub fn done() -> Self {
        Self::Success(None)
    }

    /// Failed outcome with a short message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(ActionFailure {
            error: error.into(),
            field: None,
        })
    }

    /// Failed outcome describing a rejected input field.
    pub fn invalid<V: FieldViolation + ?Sized>(violation: &V) -> Self {
        Self::Failure(ActionFailure {
            error: violation.to_string(),
            field: Some(violation.field().to_owned()),
        })
    }

    /// Whether the action succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Payload of a successful outcome.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => data.as_ref(),
            Self::Failure(_) => None,
        }
    }

    /// Failure details, if the action failed.
    #[must_use]
    pub fn failure_details(&self) -> Option<&ActionFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Failure message, if the action failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.failure_details().map(ActionFailure::error)
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let len = 1 + usize::from(data.is_some());
                let mut state = serializer.serialize_struct("ActionResult", len)?;
                state.serialize_field("success", &true)?;
                if let Some(data) = data {
                    state.serialize_field("data", data)?;
                }
                state.end()
            }
            Self::Failure(failure) => {
                let len = 2 + usize::from(failure.field.is_some());
                let mut state = serializer.serialize_struct("ActionResult", len)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &failure.error)?;
                if let Some(field) = &failure.field {
                    state.serialize_field("field", field)?;
                }
                state.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ActionResultWire<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ActionResultWire::<T>::deserialize(deserializer)?;
        if wire.success {
            return Ok(Self::Success(wire.data));
        }
        let error = wire
            .error
            .ok_or_else(|| D::Error::missing_field("error"))?;
        Ok(Self::Failure(ActionFailure {
            error,
            field: wire.field,
        }))
    }
}
