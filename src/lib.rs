pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::services::catalog::VideoCatalog;
use crate::services::pages::PageRenderer;
use crate::services::staging::StagingArea;
use crate::services::storage::ObjectStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::videos::list_videos,
        api::handlers::videos::download_video,
        api::handlers::videos::download_url,
        api::handlers::videos::upload_video,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::VideoListResponse,
            models::UploadResponse,
            models::UploadedObject,
            models::UploadForm,
            models::DownloadUrlResponse,
            models::ErrorResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video upload, listing and download"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub catalog: Arc<VideoCatalog>,
    pub staging: Arc<StagingArea>,
    pub pages: Arc<PageRenderer>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        staging: StagingArea,
        pages: PageRenderer,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(VideoCatalog::new(store.clone())),
            store,
            staging: Arc::new(staging),
            pages: Arc::new(pages),
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    // Sits inside the request-id layer so every span carries the final id.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get(&api::middleware::request_id::REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::pages::home))
        .route("/face", get(api::handlers::pages::face))
        .route("/pop_upload", get(api::handlers::pages::pop_upload))
        .route("/face_con", get(api::handlers::pages::face_con))
        .route("/face_complete", get(api::handlers::pages::face_complete))
        .route("/download", get(api::handlers::videos::download_video))
        .route("/download_url", get(api::handlers::videos::download_url))
        .route("/list_videos", get(api::handlers::videos::list_videos))
        .route(
            "/upload",
            post(api::handlers::videos::upload_video).layer(DefaultBodyLimit::max(
                state.config.max_file_size + 10 * 1024 * 1024, // Add 10MB buffer for multipart overhead
            )),
        )
        .route("/health", get(api::handlers::health::health_check))
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(trace_layer)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .with_state(state)
}
