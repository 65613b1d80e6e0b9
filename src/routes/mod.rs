pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::error::AppError;

/// Registers the `/api` routes. Mount inside a scope wrapped by `AuthMiddleware`.
///
/// Body and query parse failures are turned into `AppError::BadRequest` so
/// every 400 has the same JSON shape.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(format!("Invalid request body: {}", err)))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(format!("Invalid query string: {}", err)))
    }))
    .service(auth::register)
    .service(auth::login)
    .service(auth::logout)
    .service(auth::current_user)
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
