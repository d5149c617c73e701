//! HTTP surface over the voice workflow.

pub mod error;
pub mod handlers;
pub mod schemas;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use voxclone_core::records::RecordSession;
use voxclone_core::settings::config::ServerSettings;
use voxclone_core::Services;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// One record session per request; it is released when the handler returns.
    pub async fn session(&self) -> Result<Box<dyn RecordSession>, ApiError> {
        self.services.records.open_session().await.map_err(|e| {
            tracing::error!(error = ?e, "Failed to open record session");
            ApiError::Internal("Database is unavailable.".to_string())
        })
    }
}

pub fn router(state: AppState, settings: &ServerSettings) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/voices/", get(handlers::list_voices))
        .route("/speak/", post(handlers::speak))
        .route(
            "/clone-and-speak/",
            post(handlers::clone_and_speak)
                .layer(DefaultBodyLimit::max(settings.upload_limit_bytes)),
        )
        .route("/tune/{voice_id}", post(handlers::tune))
        .layer(cors_layer(&settings.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers mirror the request
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
