//! Department records and the input used to create them.
//!
//! Departments are owned by the upstream API. The portal decodes them
//! leniently: only the identifier and name are required so schema drift
//! upstream does not break listing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::action_result::FieldViolation;

/// Minimum department name length after trimming.
pub const DEPARTMENT_NAME_MIN_CHARS: usize = 2;
/// Minimum description length after trimming.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Validation failures for department input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentValidationError {
    /// Identifier was blank.
    #[error("Department id is required")]
    EmptyId,
    /// Identifier was a bare `.` or `..` path segment.
    #[error("Department id is invalid")]
    InvalidId,
    /// Name was blank.
    #[error("Department name is required")]
    EmptyName,
    /// Name was shorter than [`DEPARTMENT_NAME_MIN_CHARS`].
    #[error("Department name must be at least {min} characters")]
    NameTooShort {
        /// Required minimum.
        min: usize,
    },
    /// Description was blank.
    #[error("Description is required")]
    EmptyDescription,
    /// Description was shorter than [`DESCRIPTION_MIN_CHARS`].
    #[error("Description must be at least {min} characters")]
    DescriptionTooShort {
        /// Required minimum.
        min: usize,
    },
}

impl FieldViolation for DepartmentValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooShort { .. } => "dept_name",
            Self::EmptyDescription | Self::DescriptionTooShort { .. } => "description",
        }
    }
}

/// Identifier of an upstream department.
///
/// # Examples
/// ```
/// use department_portal::domain::DepartmentId;
///
/// assert!(DepartmentId::new("d1").is_ok());
/// assert!(DepartmentId::new("  ").is_err());
/// assert!(DepartmentId::new("..").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepartmentId(String);

impl DepartmentId {
    /// Validate and wrap a raw identifier.
    ///
    /// `.` and `..` are refused: URL path building would collapse them and
    /// address the collection instead of a record.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DepartmentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DepartmentValidationError::EmptyId);
        }
        if matches!(trimmed, "." | "..") {
            return Err(DepartmentValidationError::InvalidId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A department as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Department {
    /// Upstream document identifier.
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2e8b3a4d0012ab34cd")]
    pub id: String,
    /// Department name.
    #[schema(example = "Engineering")]
    pub department: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Creation time.
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// Upstream document version.
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Read an upstream timestamp in whatever shape it arrives.
///
/// Accepts RFC 3339 strings, plain `YYYY-MM-DD` dates and epoch
/// milliseconds. Anything else reads as `None` rather than failing the
/// record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|midnight| midnight.and_utc())
            }),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Validated input for creating a department.
///
/// ## Invariants
/// - `dept_name` is trimmed and at least [`DEPARTMENT_NAME_MIN_CHARS`] long.
/// - `description` is trimmed and at least [`DESCRIPTION_MIN_CHARS`] long.
///
/// # Examples
/// ```
/// use department_portal::domain::NewDepartment;
///
/// let dept = NewDepartment::try_from_parts(" Ops ", "Runs the infrastructure").unwrap();
/// assert_eq!(dept.dept_name(), "Ops");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    dept_name: String,
    description: String,
}

impl NewDepartment {
    /// Validate raw form input. The name is checked before the description.
    pub fn try_from_parts(
        dept_name: &str,
        description: &str,
    ) -> Result<Self, DepartmentValidationError> {
        let dept_name = dept_name.trim();
        if dept_name.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        if dept_name.chars().count() < DEPARTMENT_NAME_MIN_CHARS {
            return Err(DepartmentValidationError::NameTooShort {
                min: DEPARTMENT_NAME_MIN_CHARS,
            });
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(DepartmentValidationError::EmptyDescription);
        }
        if description.chars().count() < DESCRIPTION_MIN_CHARS {
            return Err(DepartmentValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN_CHARS,
            });
        }

        Ok(Self {
            dept_name: dept_name.to_owned(),
            description: description.to_owned(),
        })
    }

    /// Department name.
    #[must_use]
    pub fn dept_name(&self) -> &str {
        self.dept_name.as_str()
    }

    /// Department description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", "A long enough description", DepartmentValidationError::EmptyName)]
    #[case(" x ", "A long enough description", DepartmentValidationError::NameTooShort { min: 2 })]
    #[case("Ops", "   ", DepartmentValidationError::EmptyDescription)]
    #[case("Ops", "too short", DepartmentValidationError::DescriptionTooShort { min: 10 })]
    fn rejects_invalid_input(
        #[case] name: &str,
        #[case] description: &str,
        #[case] expected: DepartmentValidationError,
    ) {
        let err = NewDepartment::try_from_parts(name, description).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(DepartmentValidationError::EmptyName, "dept_name")]
    #[case(DepartmentValidationError::NameTooShort { min: 2 }, "dept_name")]
    #[case(DepartmentValidationError::EmptyDescription, "description")]
    #[case(DepartmentValidationError::DescriptionTooShort { min: 10 }, "description")]
    #[case(DepartmentValidationError::EmptyId, "id")]
    #[case(DepartmentValidationError::InvalidId, "id")]
    fn violations_name_their_field(
        #[case] error: DepartmentValidationError,
        #[case] field: &str,
    ) {
        assert_eq!(error.field(), field);
    }

    #[rstest]
    #[case("", DepartmentValidationError::EmptyId)]
    #[case(" . ", DepartmentValidationError::InvalidId)]
    #[case("..", DepartmentValidationError::InvalidId)]
    fn rejects_unaddressable_ids(#[case] raw: &str, #[case] expected: DepartmentValidationError) {
        assert_eq!(DepartmentId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("...")]
    #[case("..d1")]
    fn keeps_dotted_ids_that_name_a_record(#[case] raw: &str) {
        assert_eq!(DepartmentId::new(raw).map(|id| id.to_string()).as_deref(), Ok(raw));
    }

    #[rstest]
    fn name_length_counts_characters() {
        assert!(NewDepartment::try_from_parts("Ää", "Ten chars!").is_ok());
    }

    #[rstest]
    fn decodes_full_upstream_record() {
        let dept: Department = serde_json::from_value(json!({
            "_id": "d1",
            "department": "Engineering",
            "description": "Builds things",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T10:00:00.000Z",
            "__v": 0
        }))
        .expect("department");
        assert_eq!(dept.id, "d1");
        assert_eq!(dept.version, Some(0));
        assert!(dept.created_at.is_some());
    }

    #[rstest]
    fn tolerates_timestamps_in_other_shapes() {
        let dept: Department = serde_json::from_value(json!({
            "_id": "d1",
            "department": "Ops",
            "createdAt": 1_714_557_600_000_i64,
            "updatedAt": "2024-05-01",
            "__v": 0
        }))
        .expect("department");

        assert_eq!(
            dept.created_at.map(|at| at.timestamp_millis()),
            Some(1_714_557_600_000)
        );
        assert_eq!(
            dept.updated_at.map(|at| at.to_rfc3339()).as_deref(),
            Some("2024-05-01T00:00:00+00:00")
        );
    }

    #[rstest]
    #[case(json!("last tuesday"))]
    #[case(json!(null))]
    #[case(json!({ "$date": 1 }))]
    fn unreadable_timestamps_read_as_absent(#[case] created_at: Value) {
        let dept: Department = serde_json::from_value(json!({
            "_id": "d1",
            "department": "Ops",
            "createdAt": created_at
        }))
        .expect("department");

        assert!(dept.created_at.is_none());
    }

    #[rstest]
    fn decodes_sparse_upstream_record() {
        let dept: Department =
            serde_json::from_value(json!({ "_id": "d1", "department": "Ops" })).expect("department");
        assert!(dept.description.is_empty());
        assert!(dept.updated_at.is_none());
    }
}
