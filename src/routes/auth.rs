use crate::{
    auth::{
        hash_password, password::verify_against_dummy, verify_password, AuthenticatedUser,
        LoginRequest, RegisterRequest, SESSION_COOKIE,
    },
    error::AppError,
    models::NewUser,
    state::AppState,
};
use actix_web::{
    cookie::{Cookie, SameSite},
    get, post, web, HttpResponse, Responder,
};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates the account and returns it without the password. Does not log in.
///
/// ## Responses:
/// - `201 Created`: the new `User`.
/// - `400 Bad Request`: body malformed or fails validation.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        name,
        email,
        password,
    } = register_data.into_inner();

    let password_hash = hash_password(&password)?;
    let user = state
        .users
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Verifies the credentials, opens a session and sets the session cookie.
/// Unknown email and wrong password produce the same 401.
///
/// ## Responses:
/// - `200 OK`: the authenticated `User`.
/// - `400 Bad Request`: body malformed or fails validation.
/// - `401 Unauthorized`: invalid credentials.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = match state.users.get_user_by_email(&login_data.email).await? {
        Some(user) if verify_password(&login_data.password, &user.password_hash)? => user,
        Some(user) => {
            log::info!("Failed login for user {}", user.id);
            return Err(invalid_credentials());
        }
        None => {
            verify_against_dummy(&login_data.password);
            log::info!("Failed login for unknown email");
            return Err(invalid_credentials());
        }
    };

    let token = state.start_session(user.id)?;
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().cookie(cookie).json(user))
}

/// Logout user
///
/// Revokes the current session and clears the cookie. The token stops working
/// immediately, even where its signature is still valid.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    state.sessions.revoke(&user.0.session_id);

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    log::info!("User {} logged out", user.user_id());
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Logged out" })))
}

/// Current user
///
/// Returns the `User` bound to the session.
#[get("/user")]
pub async fn current_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .get_user_by_id(user.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session user no longer exists".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use chrono::Duration;
    use serde_json::json;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::in_memory("test-secret", Duration::hours(1)))
    }

    #[actix_rt::test]
    async fn test_register_validation() {
        let app = test::init_service(App::new().app_data(state()).service(register)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "name": "Ann",
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["details"]["email"].is_array());

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "name": "Ann",
                "email": "ann@x.com",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn test_login_sets_http_only_session_cookie() {
        let state = state();
        state
            .users
            .create_user(NewUser {
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                password_hash: hash_password("password123").unwrap(),
            })
            .await
            .unwrap();

        let app = test::init_service(App::new().app_data(state.clone()).service(login)).await;
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "ann@x.com", "password": "password123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert!(state.resolve_session(cookie.value()).is_ok());
        assert_eq!(state.sessions.len(), 1);
    }
}
