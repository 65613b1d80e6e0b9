use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Duration;

use tasknest::{auth::AuthMiddleware, config::Config, routes, store::PgStore, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(to_io_error)?;
    let session_ttl = Duration::hours(config.session_ttl_hours);

    let state = match &config.database_url {
        Some(database_url) => {
            let store = PgStore::connect(database_url).await.map_err(to_io_error)?;
            AppState::postgres(store, &config.session_secret, session_ttl)
        }
        None => {
            log::warn!(
                "DATABASE_URL not set, using the in-memory store; data will not survive a restart"
            );
            AppState::in_memory(&config.session_secret, session_ttl)
        }
    };
    let state = web::Data::new(state);

    log::info!(
        "Starting TaskNest server at {} ({} store)",
        config.server_url(),
        state.backend()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

fn to_io_error(err: tasknest::AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
