//! HTTP surface of the allpi gallery.

pub mod error;
pub mod gallery;
pub mod routes;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use allpi_github::{CachedTreeSource, GithubClient, TreeSource};
use allpi_layout::{DelegatedResolver, GeminiClassifier, GeminiConfig, LayoutResolver, RuleResolver};
use allpi_runtime_config::{GalleryConfig, LayoutStrategy};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use gallery::GalleryService;

pub const DEFAULT_LOG_FILTER: &str =
    "allpi_server=info,allpi_github=info,allpi_layout=info,tower_http=info";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gallery: Arc<GalleryService>,
}

impl AppState {
    pub fn new(gallery: GalleryService) -> Self {
        Self {
            gallery: Arc::new(gallery),
        }
    }
}

/// `/api` routes, without middleware or static files.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/gallery", get(routes::gallery::gallery))
        .route("/images", get(routes::gallery::images))
        .route("/folders", get(routes::gallery::folders))
        .route("/folders/{*name}", get(routes::gallery::folder))
}

/// Full application: API, optional static web build, tracing and CORS.
pub fn app(state: AppState, web_dir: Option<&Path>) -> Router {
    let mut app = Router::new().nest("/api", api_router());

    if let Some(web_dir) = web_dir.filter(|dir| dir.exists()) {
        tracing::info!("serving static files from {}", web_dir.display());
        let index_html = web_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(web_dir).fallback(ServeFile::new(index_html)));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Tree source for `config`: the GitHub client, behind a cache when a TTL is
/// configured.
pub fn tree_source_from_config(
    config: &GalleryConfig,
    http: reqwest::Client,
    lookup: impl Fn(&str) -> Option<String>,
) -> Arc<dyn TreeSource> {
    let mut github = GithubClient::with_client(http, &config.source.api_base_url);
    if let Some(token) = config.source_token(&lookup) {
        tracing::info!("authenticating to GitHub with ${}", config.source.token_env);
        github.set_auth(token);
    }

    let ttl = Duration::from_secs(config.cache.tree_ttl_secs);
    if ttl.is_zero() {
        Arc::new(github)
    } else {
        tracing::info!("caching tree listings for {}s", ttl.as_secs());
        Arc::new(CachedTreeSource::new(github, ttl))
    }
}

/// Layout resolver for `config`. A delegated resolver reuses `http`.
///
/// A delegated strategy without an API key runs with the rule resolver.
pub fn resolver_from_config(
    config: &GalleryConfig,
    http: reqwest::Client,
    lookup: impl Fn(&str) -> Option<String>,
) -> Arc<dyn LayoutResolver> {
    match config.layout.strategy {
        LayoutStrategy::Delegated => {
            let Some(api_key) = config.layout_api_key(&lookup) else {
                tracing::warn!(
                    "layout strategy is delegated but ${} is not set; using rule layouts",
                    config.layout.api_key_env
                );
                return Arc::new(RuleResolver);
            };
            let classifier = GeminiClassifier::with_client(
                http,
                GeminiConfig {
                    endpoint: config.layout.endpoint.clone(),
                    model: config.layout.model.clone(),
                    api_key,
                    timeout: Duration::from_secs(config.layout.timeout_secs),
                },
            );
            tracing::info!(
                model = %config.layout.model,
                mode = config.layout.mode.as_str(),
                "delegating layouts to classifier"
            );
            Arc::new(DelegatedResolver::new(classifier, config.layout.mode))
        }
        LayoutStrategy::Rule | LayoutStrategy::Unknown => Arc::new(RuleResolver),
    }
}
