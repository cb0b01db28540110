//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use department_portal::inbound::http::cookie_config::CookiePolicy;
use department_portal::inbound::http::origin::OriginPolicy;
use department_portal::inbound::http::state::HttpStatePorts;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) ports: HttpStatePorts,
    pub(crate) cookies: CookiePolicy,
    pub(crate) origins: OriginPolicy,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration around the given ports.
    #[must_use]
    pub fn new(ports: HttpStatePorts, cookies: CookiePolicy, bind_addr: SocketAddr) -> Self {
        Self {
            ports,
            cookies,
            origins: OriginPolicy::default(),
            bind_addr,
        }
    }

    /// Accept additional origins on state-changing action requests.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
