//! Behavioural tests for the portal actions.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    InMemorySessionStore, MockCollectionRefresh, MockDepartmentApi, NoOpCollectionRefresh,
};
use crate::domain::{SessionToken, User};

fn actions_with(api: MockDepartmentApi) -> PortalActions {
    PortalActions::new(Arc::new(api), Arc::new(NoOpCollectionRefresh))
}

fn department(id: &str, name: &str) -> Department {
    Department {
        id: id.to_owned(),
        department: name.to_owned(),
        description: "Runs the infrastructure".to_owned(),
        created_at: None,
        updated_at: None,
        version: None,
    }
}

fn auth_response(token: Option<&str>, user: Option<User>) -> AuthResponse {
    AuthResponse {
        token: token.map(str::to_owned),
        user,
        message: Some("ok".to_owned()),
        ..AuthResponse::default()
    }
}

#[fixture]
fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("a@b.com", "pw").expect("credentials")
}

#[fixture]
fn signed_in() -> InMemorySessionStore {
    InMemorySessionStore::with_raw_entries(Some("t1"), Some(r#"{"id":"1","name":"A","email":"a@b.com"}"#))
}

#[rstest]
#[tokio::test]
async fn login_creates_session_when_token_and_user_present(credentials: LoginCredentials) {
    let mut api = MockDepartmentApi::new();
    api.expect_login()
        .times(1)
        .returning(|_| Ok(auth_response(Some("t1"), Some(User::new("1", "A", "a@b.com")))));
    let session = InMemorySessionStore::new();

    let result = actions_with(api).login_user(&session, &credentials).await;

    let outcome = result.data().expect("outcome");
    assert!(outcome.authenticated);
    assert_eq!(outcome.user, Some(User::new("1", "A", "a@b.com")));
    assert_eq!(session.read_token(), SessionToken::new("t1"));
    assert_eq!(session.read_user(), Some(User::new("1", "A", "a@b.com")));
}

#[rstest]
#[case(None, Some(User::new("1", "A", "a@b.com")))]
#[case(Some("t1"), None)]
#[case(Some(""), Some(User::new("1", "A", "a@b.com")))]
#[tokio::test]
async fn login_without_full_session_succeeds_without_cookies(
    credentials: LoginCredentials,
    #[case] token: Option<&'static str>,
    #[case] user: Option<User>,
) {
    let mut api = MockDepartmentApi::new();
    api.expect_login()
        .returning(move |_| Ok(auth_response(token, user.clone())));
    let session = InMemorySessionStore::new();

    let result = actions_with(api).login_user(&session, &credentials).await;

    assert!(result.is_success());
    assert!(!result.data().expect("outcome").authenticated);
    assert!(!session.is_authenticated());
}

#[rstest]
#[case(ApiError::upstream("Invalid credentials", 401_u16, json!({"message": "Invalid credentials"})), "Invalid credentials")]
#[case(ApiError::transport("connection refused"), "Network error occurred")]
#[case(ApiError::upstream("", 500_u16, json!({})), "Login failed")]
#[tokio::test]
async fn login_failure_surfaces_message(
    credentials: LoginCredentials,
    #[case] error: ApiError,
    #[case] expected: &str,
) {
    let mut api = MockDepartmentApi::new();
    api.expect_login().returning(move |_| Err(error.clone()));
    let session = InMemorySessionStore::new();

    let result = actions_with(api).login_user(&session, &credentials).await;

    assert_eq!(result.error(), Some(expected));
    assert!(!session.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn register_establishes_session() {
    let details = RegistrationDetails::try_from_parts("A", "a@b.com", "pw").expect("details");
    let mut api = MockDepartmentApi::new();
    api.expect_register()
        .withf(|d| d.name() == "A" && d.email() == "a@b.com")
        .returning(|_| Ok(auth_response(Some("t9"), Some(User::new("9", "A", "a@b.com")))));
    let session = InMemorySessionStore::new();

    let result = actions_with(api).register_user(&session, &details).await;

    assert!(result.data().expect("outcome").authenticated);
    assert_eq!(session.read_token(), SessionToken::new("t9"));
}

#[rstest]
#[tokio::test]
async fn register_failure_uses_fallback_for_blank_message() {
    let details = RegistrationDetails::try_from_parts("A", "a@b.com", "pw").expect("details");
    let mut api = MockDepartmentApi::new();
    api.expect_register()
        .returning(|_| Err(ApiError::upstream(" ", 400_u16, json!({}))));

    let result = actions_with(api)
        .register_user(&InMemorySessionStore::new(), &details)
        .await;

    assert_eq!(result.error(), Some("Registration failed"));
}

#[rstest]
fn logout_is_idempotent(signed_in: InMemorySessionStore) {
    let actions = actions_with(MockDepartmentApi::new());

    assert!(actions.logout_user(&signed_in).is_success());
    assert!(actions.logout_user(&signed_in).is_success());
    assert!(!signed_in.is_authenticated());
    assert!(signed_in.read_user().is_none());
}

#[rstest]
#[tokio::test]
async fn department_actions_require_session() {
    let actions = actions_with(MockDepartmentApi::new());
    let session = InMemorySessionStore::new();
    let id = DepartmentId::new("d1").expect("id");
    let new_dept = NewDepartment::try_from_parts("Ops", "Runs the infrastructure").expect("dept");

    assert_eq!(
        actions.get_departments(&session).await.error(),
        Some(AUTH_REQUIRED_MESSAGE)
    );
    assert_eq!(
        actions.get_department(&session, &id).await.error(),
        Some(AUTH_REQUIRED_MESSAGE)
    );
    assert_eq!(
        actions.create_department(&session, &new_dept).await.error(),
        Some(AUTH_REQUIRED_MESSAGE)
    );
    assert_eq!(
        actions.delete_department(&session, &id).await.error(),
        Some(AUTH_REQUIRED_MESSAGE)
    );
}

#[rstest]
#[tokio::test]
async fn list_forwards_session_token(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_list_departments()
        .withf(|token| token.as_str() == "t1")
        .times(1)
        .returning(|_| Ok(vec![department("d1", "Engineering")]));

    let result = actions_with(api).get_departments(&signed_in).await;

    assert_eq!(result.data().map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test]
async fn list_failure_reports_upstream_message(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_list_departments().returning(|_| {
        Err(ApiError::upstream(
            "HTTP error! status: 502",
            502_u16,
            json!({}),
        ))
    });

    let result = actions_with(api).get_departments(&signed_in).await;

    assert_eq!(result.error(), Some("HTTP error! status: 502"));
}

#[rstest]
#[tokio::test]
async fn get_department_passes_id(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_get_department()
        .withf(|token, id| token.as_str() == "t1" && id.as_str() == "d1")
        .returning(|_, _| Ok(Some(department("d1", "Engineering"))));
    let id = DepartmentId::new("d1").expect("id");

    let result = actions_with(api).get_department(&signed_in, &id).await;

    assert_eq!(result.data().map(|d| d.department.as_str()), Some("Engineering"));
}

#[rstest]
#[tokio::test]
async fn empty_department_reply_reads_as_not_found(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_get_department().returning(|_, _| Ok(None));
    let id = DepartmentId::new("d1").expect("id");

    let result = actions_with(api).get_department(&signed_in, &id).await;

    assert_eq!(result.error(), Some(DEPARTMENT_NOT_FOUND_MESSAGE));
}

#[rstest]
fn require_session_rejects_anonymous_callers() {
    let rejected = require_session::<Value>(&InMemorySessionStore::new(), Operation::CreateDepartment)
        .expect_err("no session");

    assert_eq!(rejected.error(), Some(AUTH_REQUIRED_MESSAGE));
}

#[rstest]
fn require_session_admits_signed_in_callers(signed_in: InMemorySessionStore) {
    assert!(require_session::<Value>(&signed_in, Operation::CreateDepartment).is_ok());
}

#[rstest]
#[tokio::test]
async fn create_signals_refresh_after_success(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_create_department()
        .withf(|_, dept| dept.dept_name() == "Ops")
        .returning(|_, _| Ok(json!({"message": "created"})));
    let mut refresh = MockCollectionRefresh::new();
    refresh.expect_departments_changed().times(1).return_const(());
    let actions = PortalActions::new(Arc::new(api), Arc::new(refresh));
    let new_dept = NewDepartment::try_from_parts("Ops", "Runs the infrastructure").expect("dept");

    let result = actions.create_department(&signed_in, &new_dept).await;

    assert_eq!(result.data(), Some(&json!({"message": "created"})));
}

#[rstest]
#[tokio::test]
async fn failed_mutations_do_not_signal_refresh(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_create_department()
        .returning(|_, _| Err(ApiError::transport("reset")));
    api.expect_delete_department()
        .returning(|_, _| Err(ApiError::upstream("Not found", 404_u16, json!({}))));
    let mut refresh = MockCollectionRefresh::new();
    refresh.expect_departments_changed().times(0);
    let actions = PortalActions::new(Arc::new(api), Arc::new(refresh));
    let new_dept = NewDepartment::try_from_parts("Ops", "Runs the infrastructure").expect("dept");
    let id = DepartmentId::new("d1").expect("id");

    let created = actions.create_department(&signed_in, &new_dept).await;
    let deleted = actions.delete_department(&signed_in, &id).await;

    assert_eq!(created.error(), Some("Network error occurred"));
    assert_eq!(deleted.error(), Some("Not found"));
}

#[rstest]
#[tokio::test]
async fn delete_succeeds_without_payload(signed_in: InMemorySessionStore) {
    let mut api = MockDepartmentApi::new();
    api.expect_delete_department()
        .withf(|_, id| id.as_str() == "d1")
        .returning(|_, _| Ok(Value::Null));
    let mut refresh = MockCollectionRefresh::new();
    refresh.expect_departments_changed().times(1).return_const(());
    let actions = PortalActions::new(Arc::new(api), Arc::new(refresh));
    let id = DepartmentId::new("d1").expect("id");

    let result = actions.delete_department(&signed_in, &id).await;

    assert_eq!(result, ActionResult::done());
}

#[rstest]
#[case(Operation::Register, "Registration failed")]
#[case(Operation::Login, "Login failed")]
#[case(Operation::Logout, "Logout failed")]
#[case(Operation::ListDepartments, "Failed to fetch departments")]
#[case(Operation::GetDepartment, "Failed to fetch department")]
#[case(Operation::CreateDepartment, "Failed to create department")]
#[case(Operation::DeleteDepartment, "Failed to delete department")]
fn fallback_messages(#[case] operation: Operation, #[case] expected: &str) {
    assert_eq!(operation.fallback_message(), expected);
}
