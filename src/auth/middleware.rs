use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Paths under the wrapped scope that are reachable without a session.
const PUBLIC_PATHS: [&str; 2] = ["/api/register", "/api/login"];

/// Authenticates every request that is not in `PUBLIC_PATHS`.
///
/// The session token is read from the session cookie or an
/// `Authorization: Bearer` header; the request passes if either resolves.
/// On success an [`Identity`](crate::auth::Identity) is inserted into the
/// request extensions; otherwise the request is answered with the error
/// response (401) here and never reaches a handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !PUBLIC_PATHS.contains(&req.path()) {
            match authenticate(&req) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                }
                Err(app_err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                    let response = req
                        .into_response(app_err.error_response())
                        .map_into_right_body();
                    return Box::pin(async move { Ok(response) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<crate::auth::Identity, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    // A stale cookie must not shadow a valid bearer token, so every candidate gets a turn.
    let mut last_err = AppError::Unauthorized("Authentication required".into());
    for token in session_tokens(req) {
        match state.resolve_session(&token) {
            Ok(identity) => return Ok(identity),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

/// Session cookie first, then bearer header.
fn session_tokens(req: &ServiceRequest) -> Vec<String> {
    let cookie = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    cookie.into_iter().chain(bearer).collect()
}
