//! HTTP endpoint for RSVPs.
//!
//! One resource, served at [`RESOURCE_PATH`] and [`API_RESOURCE_PATH`]:
//!
//! | Method  | Action                         |
//! |---------|--------------------------------|
//! | OPTIONS | CORS preflight, empty 200      |
//! | GET     | list, newest first             |
//! | POST    | create from `{name, attending}`|
//! | DELETE  | remove by `{id}` or `{index}`  |
//!
//! Everything else on the resource is a 405. The endpoint is called from a
//! front end hosted on another origin, so every response allows any origin.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::notify::{self, Notifier};
use crate::storage::{open_store, RsvpStore};

/// Path of the RSVP resource.
pub const RESOURCE_PATH: &str = "/rsvp";

/// Alias under `/api`, where a statically hosted front end expects it.
pub const API_RESOURCE_PATH: &str = "/api/rsvp";

const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where RSVPs live.
    pub store: Arc<dyn RsvpStore>,
    /// Who hears about new RSVPs.
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Bundle a store and a notifier.
    #[must_use]
    pub fn new(store: Arc<dyn RsvpStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    let rsvp = get(handlers::list)
        .post(handlers::submit)
        .delete(handlers::remove)
        .fallback(handlers::method_not_allowed);

    Router::new()
        .route(RESOURCE_PATH, rsvp.clone())
        .route(API_RESOURCE_PATH, rsvp)
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured store and serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: &Config, bind: Option<SocketAddr>) -> Result<()> {
    let store = open_store(config)?;
    let notifier = notify::from_config(&config.notify);

    let addr = match bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };

    let listener = TcpListener::bind(addr).await?;
    info!("Serving RSVPs on http://{}{}", listener.local_addr()?, RESOURCE_PATH);

    axum::serve(listener, router(AppState::new(store, notifier)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
