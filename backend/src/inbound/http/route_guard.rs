//! Route Guard middleware.
//!
//! Runs [`evaluate`] before any handler and answers redirects itself. Only
//! the presence of the token cookie is checked; the token is never validated
//! here.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::LOCATION;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use super::cookie_session::TOKEN_COOKIE;
use crate::domain::SessionToken;
use crate::domain::route_guard::{GuardDecision, evaluate};

/// Middleware gating page paths on the session cookie.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use department_portal::inbound::http::route_guard::RouteGuard;
///
/// let _app = App::new().wrap(RouteGuard);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteGuard;

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware { service }))
    }
}

/// Service wrapper produced by [`RouteGuard`].
pub struct RouteGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let has_token = req
            .cookie(TOKEN_COOKIE)
            .and_then(|cookie| SessionToken::new(cookie.value()))
            .is_some();

        match evaluate(req.path(), has_token) {
            GuardDecision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            GuardDecision::Redirect(location) => {
                debug!(path = req.path(), location, "route guard redirect");
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((LOCATION, location))
                    .finish();
                let response = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;

    async fn call(path: &str, token: Option<&str>) -> ServiceResponse<EitherBody<actix_web::body::BoxBody>> {
        let app = test::init_service(
            App::new()
                .wrap(RouteGuard)
                .default_service(web::to(|| async { HttpResponse::Ok().body("page") })),
        )
        .await;
        let mut req = test::TestRequest::get().uri(path);
        if let Some(token) = token {
            req = req.cookie(Cookie::new(TOKEN_COOKIE, token.to_owned()));
        }
        test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[case("/departments", None, "/login")]
    #[case("/departments/d1", Some(""), "/login")]
    #[case("/login", Some("t1"), "/departments")]
    #[case("/register", Some("t1"), "/departments")]
    #[actix_web::test]
    async fn redirects_with_temporary_status(
        #[case] path: &str,
        #[case] token: Option<&str>,
        #[case] location: &str,
    ) {
        let res = call(path, token).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            res.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(location)
        );
    }

    #[rstest]
    #[case("/departments", Some("t1"))]
    #[case("/login", None)]
    #[case("/", None)]
    #[case("/api/actions/departments", None)]
    #[case("/health/live", None)]
    #[actix_web::test]
    async fn passes_other_requests_through(#[case] path: &str, #[case] token: Option<&str>) {
        let res = call(path, token).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
