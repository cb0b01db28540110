//! Origin allow-list for state-changing action requests.
//!
//! Browsers attach `Origin` to cross-site POST and DELETE requests. A request
//! whose origin is neither the host it was sent to nor a configured host is
//! refused before it can touch the caller's session.

use actix_web::HttpRequest;
use actix_web::http::Method;
use actix_web::http::header::ORIGIN;
use tracing::warn;
use url::Url;

use crate::domain::Error;

/// Message returned for refused origins.
pub const ORIGIN_NOT_ALLOWED: &str = "Origin not allowed";

/// Hosts (optionally with port) accepted as request origins, in addition to
/// the request's own host. An entry of the form `*.example.com` matches any
/// subdomain of `example.com`.
///
/// # Examples
/// ```
/// use department_portal::inbound::http::origin::OriginPolicy;
///
/// let policy = OriginPolicy::new(["portal.example.com", "*.example.org"]);
/// assert!(policy.allows_host("portal.example.com"));
/// assert!(policy.allows_host("hr.example.org"));
/// assert!(!policy.allows_host("example.org"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Build a policy from host entries; blank entries are ignored.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = hosts
            .into_iter()
            .map(|host| host.as_ref().trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        Self { allowed }
    }

    /// Whether `host` (`name` or `name:port`) is on the configured list.
    pub fn allows_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed.iter().any(|entry| match entry.strip_prefix("*.") {
            Some(suffix) => host
                .strip_suffix(suffix)
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
            None => *entry == host,
        })
    }

    /// Refuse mutating requests whose `Origin` is not acceptable.
    ///
    /// Safe methods and requests without `Origin` pass.
    ///
    /// # Errors
    ///
    /// Returns a forbidden [`Error`] when the origin is malformed, repeated,
    /// or not allowed.
    pub fn check(&self, req: &HttpRequest) -> Result<(), Error> {
        if !is_mutating(req.method()) {
            return Ok(());
        }
        let mut origins = req.headers().get_all(ORIGIN);
        let Some(origin) = origins.next() else {
            return Ok(());
        };
        if origins.next().is_some() {
            warn!("rejected action request with multiple Origin headers");
            return Err(Error::forbidden(ORIGIN_NOT_ALLOWED));
        }
        let Some(origin_host) = origin.to_str().ok().and_then(origin_host) else {
            warn!("rejected action request with malformed Origin header");
            return Err(Error::forbidden(ORIGIN_NOT_ALLOWED));
        };

        let request_host = req.connection_info().host().to_ascii_lowercase();
        if origin_host == request_host || self.allows_host(&origin_host) {
            Ok(())
        } else {
            warn!(
                origin = %origin_host,
                host = %request_host,
                "rejected action request due to disallowed Origin"
            );
            Err(Error::forbidden(ORIGIN_NOT_ALLOWED))
        }
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::DELETE | Method::PUT | Method::PATCH)
}

/// `host[:port]` of an origin URL; `None` for opaque or hostless origins.
fn origin_host(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
