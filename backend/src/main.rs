use std::sync::Arc;

use backend::{AppState, completion::CompletionClient, config, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,shared=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let prose_config = config::ProseConfig::from_env();
    if prose_config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; /api/generate-prose will answer 500");
    }
    tracing::info!(
        "using completion model {} at {}",
        prose_config.model,
        prose_config.base_url
    );

    let completion = CompletionClient::new(prose_config).expect("build HTTP client");
    let state = AppState {
        completion: Arc::new(completion),
    };
    let app = create_router(state);

    let addr = config::bind_addr().expect("valid BIND_ADDR socket address");
    tracing::info!("starting backend on http://{addr}");
    tracing::info!("  POST /api/generate-prose - narrate a maneuver list");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}
