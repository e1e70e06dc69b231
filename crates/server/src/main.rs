use std::path::PathBuf;
use std::time::Duration;

use allpi_server::gallery::GalleryService;
use allpi_server::{
    AppState, DEFAULT_LOG_FILTER, app, resolver_from_config, tree_source_from_config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = allpi_runtime_config::load()?;
    let env = |name: &str| std::env::var(name).ok();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.source.timeout_secs))
        .build()?;
    let source = tree_source_from_config(&config, http.clone(), env);
    let resolver = resolver_from_config(&config, http, env);

    let source_config = config.source_config();
    tracing::info!(
        repo = %source_config.repo,
        root = %source_config.root,
        layout = resolver.id(),
        "gallery source configured"
    );

    let state = AppState::new(GalleryService::new(
        source,
        resolver,
        source_config,
        config.classify_options(),
    ));

    let web_dir = PathBuf::from(&config.server.web_dir);
    let app = app(state, Some(web_dir.as_path()));

    let addr = format!("0.0.0.0:{}", config.server.port);
    tracing::info!("starting server at http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
