//! Reqwest-backed departments API adapter.
//!
//! This adapter owns transport details only: URL building, headers, JSON
//! encoding, and HTTP error mapping into [`ApiError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::dto::{
    CreateDepartmentRequestDto, LoginRequestDto, RegisterRequestDto, error_message, error_payload,
};
use crate::domain::ports::{ApiError, DepartmentApi};
use crate::domain::{
    AuthResponse, Department, DepartmentId, LoginCredentials, NewDepartment, RegistrationDetails,
    SessionToken,
};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Failures building an [`HttpDepartmentApi`].
#[derive(Debug, thiserror::Error)]
pub enum UpstreamConfigError {
    /// The base URL cannot have path segments appended (e.g. `mailto:`).
    #[error("upstream base URL cannot be used as a base: {url}")]
    NotABase {
        /// Offending URL.
        url: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Departments API adapter that talks JSON over HTTP to one base URL.
#[derive(Debug, Clone)]
pub struct HttpDepartmentApi {
    client: Client,
    base_url: Url,
}

impl HttpDepartmentApi {
    /// Build an adapter for `base_url`, optionally bounding each request by
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot carry a path or the reqwest client
    /// cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, UpstreamConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(UpstreamConfigError::NotABase {
                url: base_url.to_string(),
            });
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`; a base URL always yields mutable segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], token: Option<&SessionToken>) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, path = url.path(), authenticated = token.is_some(), "upstream request");
        let request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE);
        match token {
            Some(token) => request.header(AUTHORIZATION, token.as_str()),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok((status, body.to_vec()))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.execute(request).await?;
        decode(status, &body)
    }

    async fn acknowledge(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let (status, body) = self.execute(request).await?;
        decode_acknowledgement(status, &body)
    }
}

#[async_trait]
impl DepartmentApi for HttpDepartmentApi {
    async fn register(&self, details: &RegistrationDetails) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, &["register"], None)
            .json(&RegisterRequestDto::from(details));
        self.fetch(request).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, &["login"], None)
            .json(&LoginRequestDto::from(credentials));
        self.fetch(request).await
    }

    async fn list_departments(&self, token: &SessionToken) -> Result<Vec<Department>, ApiError> {
        self.fetch(self.request(Method::GET, &["departments"], Some(token)))
            .await
    }

    async fn get_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Option<Department>, ApiError> {
        let request = self.request(Method::GET, &["department", id.as_str()], Some(token));
        let (status, body) = self.execute(request).await?;
        if is_blank(&body) {
            return Ok(None);
        }
        decode(status, &body)
    }

    async fn create_department(
        &self,
        token: &SessionToken,
        department: &NewDepartment,
    ) -> Result<Value, ApiError> {
        let request = self
            .request(Method::POST, &["add-department"], Some(token))
            .json(&CreateDepartmentRequestDto::from(department));
        self.acknowledge(request).await
    }

    async fn delete_department(
        &self,
        token: &SessionToken,
        id: &DepartmentId,
    ) -> Result<Value, ApiError> {
        let request = self.request(
            Method::DELETE,
            &["delete-department", id.as_str()],
            Some(token),
        );
        self.acknowledge(request).await
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| {
        ApiError::decode(status.as_u16(), format!("invalid upstream JSON payload: {error}"))
    })
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn decode_acknowledgement(status: StatusCode, body: &[u8]) -> Result<Value, ApiError> {
    if is_blank(body) {
        return Ok(Value::Null);
    }
    decode(status, body)
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport(format!("timed out: {error}"))
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let payload = error_payload(body);
    let message = error_message(&payload)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    ApiError::upstream(message, status.as_u16(), payload)
}
