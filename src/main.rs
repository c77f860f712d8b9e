use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::from_fn,
};
use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{
    config::config::{CONFIG, StorageKind},
    game::handlers::game_routes,
    health::handlers::health_routes,
    mw::{
        player_mw::{CHAT_ID_HEADER, CHAT_TYPE_HEADER, PLAYER_ID_HEADER, SOURCE_HEADER},
        request_mw::request_mw,
    },
    server::app_state::AppState,
    store::memory::MemoryStore,
};

mod config;
mod game;
mod health;
mod mw;
mod server;
mod session;
mod store;
mod user;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let level = CONFIG
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::DEBUG);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = match CONFIG.storage {
        StorageKind::Postgres => {
            let database_url = CONFIG
                .database_url
                .as_deref()
                .expect("QUIZ__DATABASE_URL is required for postgres storage");

            AppState::from_connection_string(database_url, CONFIG.run_migrations)
                .await
                .unwrap_or_else(|e| panic!("{}", e))
        }
        StorageKind::Memory => {
            let store = MemoryStore::new();
            if let Some(dir) = &CONFIG.seed_dir {
                let count = store
                    .seed_from_dir(dir)
                    .await
                    .unwrap_or_else(|e| panic!("{}", e));
                info!("Seeded {} games from {:?}", count, dir);
            }
            AppState::in_memory(store)
        }
    };

    let app = app(state).layer(cors_layer(&CONFIG.server.cors_origins));

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap_or_else(|e| panic!("Failed to bind listener: {}", e));

    info!(
        "Server listening on address: {:?}",
        listener.local_addr().ok()
    );
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("Server error: {}", e));
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/api/game", game_routes(state))
        .layer(ServiceBuilder::new().layer(from_fn(request_mw)))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok()))
    };

    let player_headers = [
        PLAYER_ID_HEADER,
        SOURCE_HEADER,
        CHAT_ID_HEADER,
        CHAT_TYPE_HEADER,
    ]
    .into_iter()
    .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok());

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list(
            [
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ]
            .into_iter()
            .chain(player_headers),
        ))
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
