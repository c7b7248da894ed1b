//! HTTP API server command.

use crate::cli::Output;
use crate::config::Settings;
use crate::server::{build_router, serve, AppState};
use std::sync::Arc;
use std::time::Duration;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_settings(&settings)?);

    if settings.search.api_key.is_none() {
        Output::warning("KEY is not set; video searches will return provider errors.");
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let app = build_router(state, Duration::from_secs(settings.server.timeout_secs));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Postbot API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET       /health");
    Output::kv("Videos", "GET|POST  /postbot_videos?location=");
    Output::kv("Location", "GET|POST  /postbot_location?location=&name=&full_address=");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    serve(listener, app).await
}
