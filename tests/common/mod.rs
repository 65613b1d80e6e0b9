#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::json;
use tasknest::auth::{AuthMiddleware, SESSION_COOKIE};
use tasknest::models::User;
use tasknest::{routes, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory(TEST_SECRET, Duration::hours(1)))
}

/// The same app `main` serves, over the given state.
pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> User {
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(resp).await
}

/// Logs in and returns the session cookie.
pub async fn login_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("login should set the session cookie")
}

/// Registers and logs in, returning the user and their session cookie.
pub async fn sign_up(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> (User, Cookie<'static>) {
    let user = register_user(app, name, email, "password123").await;
    let cookie = login_user(app, email, "password123").await;
    (user, cookie)
}
