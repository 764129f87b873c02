mod auth;
mod config;
mod constants;
mod credentials;
mod error;
mod handlers;
mod models;
mod t24;
mod tokens;
mod tunnel;

use axum::extract::Extension;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::load_config;
use credentials::CredentialStore;
use handlers::{health, login, nextpage, reset_password, user};
use t24::T24Client;
use tokens::TokenStore;

#[tokio::main]
async fn main() {
    let config = load_config();

    // Initialize syslog logger
    let formatter = syslog::Formatter3164 {
        facility: syslog::Facility::LOG_DAEMON,
        hostname: None,
        process: "t24-bridge".into(),
        pid: std::process::id(),
    };
    match syslog::unix(formatter) {
        Ok(logger) => {
            log::set_boxed_logger(Box::new(syslog::BasicLogger::new(logger)))
                .map(|()| {
                    log::set_max_level(if config.debug_mode {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    })
                })
                .expect("Failed to set syslog logger");
        }
        Err(e) => {
            eprintln!("Failed to connect to syslog: {}, falling back to stderr", e);
        }
    }

    info!("t24-bridge starting up");
    debug!("Config: {:?}", config);

    // Shared HTTP client for tunnel discovery and T24 calls
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_client_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    // In-memory state, lost on restart
    let credential_store = Arc::new(CredentialStore::seeded());
    let token_store = Arc::new(TokenStore::new(config.jwt_secret.clone()));
    let t24_client = Arc::new(T24Client::new(http_client, &config));

    // CORS restricted to the configured frontend origin
    let cors_origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .expect("Invalid CORS_ALLOWED_ORIGIN");
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(cors_origin))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    // Build router with routes
    let app = Router::new()
        .route("/", get(health::default_route))
        .route("/health", get(health::health_check))
        .route("/version", get(health::get_version))
        .route("/api/login", post(login::login))
        .route("/api/user", get(user::get_user))
        .route("/api/reset-password", put(reset_password::reset_password))
        .route("/api/nextpage", get(nextpage::nextpage))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(credential_store))
        .layer(Extension(token_store))
        .layer(Extension(t24_client));

    // Run server with graceful shutdown
    info!("Server listening on {}", config.service_address);
    let server = axum::Server::bind(&config.service_address.parse().unwrap())
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!("Server error: {}", e);
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => { info!("Received Ctrl+C, shutting down"); }
            _ = sigterm.recv() => { info!("Received SIGTERM, shutting down"); }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("Failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down");
    }
}
