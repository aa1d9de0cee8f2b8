use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod models;
mod services;
mod store;
#[cfg(test)]
mod test_support;

use config::Config;
use services::calendar::{Clock, SystemClock};
use store::{PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/users/register", post(handlers::users::register))
        .route("/api/users/login", post(handlers::users::login));

    let protected_routes = Router::new()
        // Mood ledger
        .route(
            "/api/mood",
            get(handlers::moods::get_today)
                .post(handlers::moods::check_in)
                .patch(handlers::moods::update_today),
        )
        .route("/api/moods", get(handlers::moods::list_moods))
        .route("/api/moods/:day", get(handlers::moods::get_by_day))
        .route("/api/stats/moods", get(handlers::moods::summary))
        // Content for today's mood
        .route(
            "/api/tasks",
            get(handlers::content::random_task).post(handlers::reference::create_task),
        )
        .route("/api/quotes", get(handlers::content::random_quote))
        .route("/api/avatars", get(handlers::content::random_avatar))
        // Users
        .route("/api/users/me", get(handlers::users::me))
        .route("/api/users/streak", get(handlers::users::streak))
        .route("/api/users/avatar", patch(handlers::users::update_avatar))
        .route("/api/users/reminder", post(handlers::users::set_reminder))
        // Reference data
        .route(
            "/api/mood-types",
            get(handlers::reference::list_mood_types).post(handlers::reference::create_mood_type),
        )
        .route(
            "/api/mood-types/:name",
            delete(handlers::reference::delete_mood_type),
        )
        .route("/api/reasons", get(handlers::reference::list_reasons))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in std::iter::once(&state.config.frontend_url).chain(&state.config.cors_extra_origins) {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"),
        }
    }
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodlog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        clock: Arc::new(SystemClock),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
