//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use super::cookie_config::CookiePolicy;
use super::origin::OriginPolicy;
use crate::domain::PortalActions;
use crate::domain::ports::{CollectionRefresh, DepartmentApi};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub api: Arc<dyn DepartmentApi>,
    pub refresh: Arc<dyn CollectionRefresh>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Action Layer.
    pub actions: PortalActions,
    /// Refresh signal, read for the collection revision header.
    pub refresh: Arc<dyn CollectionRefresh>,
    /// Attributes for the session cookies.
    pub cookies: CookiePolicy,
    /// Accepted origins for mutating requests.
    pub origins: OriginPolicy,
}

impl HttpState {
    /// Construct state from ports and request policies.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use department_portal::domain::ports::NoOpCollectionRefresh;
    /// use department_portal::inbound::http::cookie_config::CookiePolicy;
    /// use department_portal::inbound::http::origin::OriginPolicy;
    /// use department_portal::inbound::http::state::{HttpState, HttpStatePorts};
    /// use department_portal::outbound::upstream::HttpDepartmentApi;
    ///
    /// let api = HttpDepartmentApi::new("http://localhost:4000".parse().unwrap(), None).unwrap();
    /// let ports = HttpStatePorts {
    ///     api: Arc::new(api),
    ///     refresh: Arc::new(NoOpCollectionRefresh),
    /// };
    /// let state = HttpState::new(ports, CookiePolicy::default(), OriginPolicy::default());
    /// let _actions = state.actions.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, cookies: CookiePolicy, origins: OriginPolicy) -> Self {
        let HttpStatePorts { api, refresh } = ports;
        Self {
            actions: PortalActions::new(api, refresh.clone()),
            refresh,
            cookies,
            origins,
        }
    }
}
