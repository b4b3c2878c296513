//! # Pitchboard
//!
//! Startup pitch board backend.
//!
//! Signed-in users submit a pitch (title, description, category, link,
//! body); every pitch tracks a view count that is bumped after each detail
//! render, off the response path.
//!
//! # General Infrastructure
//! - Single axum service, JSON in and out
//! - Sessions are opaque bearer tokens handed out by `POST /api/session`
//! - Pitches and authors live in the content store, in-memory or Redis
//!   behind the same trait
//! - A deferred worker drains post-response work such as view-count writes
//!
//! # Setup
//!
//! Run with defaults (in-memory store on port 3100).
//! ```sh
//! cargo run
//! `````
//!
//! Against Redis.
//! ```sh
//! STORE_BACKEND=redis REDIS_URL=redis://127.0.0.1:6379 cargo run
//! `````
use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod deferred;
pub mod error;
pub mod memory;
pub mod pitches;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod store;
pub mod submission;
pub mod utils;
pub mod validation;
pub mod views;

use routes::{pitch_detail, profile, sign_in, sign_out, submit_pitch};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/pitches", post(submit_pitch))
        .route("/api/pitches/{id}", get(pitch_detail))
        .route("/api/users/{id}", get(profile))
        .route("/api/session", post(sign_in).delete(sign_out))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
