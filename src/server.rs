//! HTTP handlers for the two enrichment endpoints.
//!
//! - `GET|POST /postbot_videos?location=...`
//! - `GET|POST /postbot_location?location=...&name=...&full_address=...`
//!
//! Both answer `400 No location provided` when `location` is missing and
//! `200` JSON otherwise, even when every flow fell back to its empty value.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::flows::{GroundedFlows, LabelCandidate, VideoCandidate, VideoDiscovery};
use crate::gemini::{GenerativeModel, Tool, VertexClient};
use crate::search::{RapidApiSearch, VideoSearch};
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Body returned when `location` is absent.
pub const NO_LOCATION: &str = "No location provided";

/// Shared application state, built once at startup and read-only afterwards.
pub struct AppState {
    pub videos: VideoDiscovery,
    pub grounded: GroundedFlows,
}

impl AppState {
    pub fn new(videos: VideoDiscovery, grounded: GroundedFlows) -> Self {
        Self { videos, grounded }
    }

    /// Wire the Vertex client, search client and prompts from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model: Arc<dyn GenerativeModel> = Arc::new(VertexClient::new(&settings.vertex)?);
        let search: Arc<dyn VideoSearch> = Arc::new(RapidApiSearch::new(&settings.search)?);
        let prompts = Arc::new(Prompts::load_with_variables(
            settings.prompts_dir().as_ref(),
            settings.prompts.variables.clone(),
        )?);

        let videos = VideoDiscovery::new(model.clone(), search, prompts.clone())
            .with_generation_config(settings.generation.videos.to_config());
        let grounded = GroundedFlows::new(model, prompts, Tool::grounding_for(&settings.vertex.model))
            .with_generation(settings.generation.clone());

        Ok(Self::new(videos, grounded))
    }

    /// Run the three grounded flows concurrently and assemble the composite body.
    ///
    /// Each flow falls back on its own, so the body always carries all four keys.
    pub async fn location_report(&self, location: &str, name: &str, address: &str) -> LocationResponse {
        let (links, food_types, labels) = tokio::join!(
            self.grounded.reservation_links(location, name),
            self.grounded.food_types(address),
            self.grounded.dining_labels(address),
        );

        LocationResponse {
            food_types,
            menu: links.menu,
            reservation: links.reservation,
            labels,
        }
    }
}

/// Query parameters accepted by both endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub location: Option<String>,
    pub name: Option<String>,
    pub full_address: Option<String>,
}

impl LocationParams {
    /// `location`, unless missing or blank.
    fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<VideoCandidate>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    #[serde(rename = "foodTypes")]
    pub food_types: Vec<LabelCandidate>,
    pub menu: Option<Vec<String>>,
    pub reservation: Option<Vec<String>>,
    pub labels: Vec<LabelCandidate>,
}

/// Address used by the label flows: `full_address` unless missing or blank.
pub fn resolve_address<'a>(location: &'a str, full_address: Option<&'a str>) -> &'a str {
    full_address.filter(|a| !a.trim().is_empty()).unwrap_or(location)
}

/// Build the router with CORS and the per-request wall-clock ceiling.
pub fn build_router(state: Arc<AppState>, timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/postbot_videos", get(postbot_videos).post(postbot_videos))
        .route("/postbot_location", get(postbot_location).post(postbot_location))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .with_state(state)
}

/// Serve `app` on `listener` until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn postbot_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Response {
    let Some(location) = params.location() else {
        return no_location();
    };
    info!("Finding videos for {}", location);

    let videos = state.videos.discover(location).await;
    Json(VideosResponse { videos }).into_response()
}

async fn postbot_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationParams>,
) -> Response {
    let Some(location) = params.location() else {
        return no_location();
    };
    info!("Getting location info for {}", location);

    let name = params.name.as_deref().unwrap_or_default();
    let address = resolve_address(location, params.full_address.as_deref());

    Json(state.location_report(location, name, address).await).into_response()
}

fn no_location() -> Response {
    (StatusCode::BAD_REQUEST, NO_LOCATION).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{
        function_call_response, text_response, RoutingModel, ScriptedModel, StaticSearch,
    };
    use crate::flows::SEARCH_TOOL_NAME;
    use crate::gemini::Part;
    use serde_json::{json, Value};

    fn state_with(model: Arc<dyn GenerativeModel>, search: Arc<StaticSearch>) -> Arc<AppState> {
        let prompts = Arc::new(Prompts::default());
        Arc::new(AppState::new(
            VideoDiscovery::new(model.clone(), search, prompts.clone()),
            GroundedFlows::new(model, prompts, Tool::grounding_for("gemini-1.5-pro-001")),
        ))
    }

    async fn spawn(state: Arc<AppState>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(state, Duration::from_secs(30));
        tokio::spawn(serve(listener, app));
        format!("http://{}", addr)
    }

    #[test]
    fn test_resolve_address() {
        assert_eq!(resolve_address("Soho", Some("53 Lexington St")), "53 Lexington St");
        assert_eq!(resolve_address("Soho", Some("   ")), "Soho");
        assert_eq!(resolve_address("Soho", None), "Soho");
    }

    #[tokio::test]
    async fn test_blank_full_address_uses_location() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let base = spawn(state_with(model.clone(), Arc::new(StaticSearch::new("[]")))).await;

        let response = reqwest::get(format!("{}/postbot_location?location=Soho&full_address=%20", base))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let prompts: Vec<String> = model
            .requests()
            .iter()
            .filter_map(|r| match r.contents.first().and_then(|c| c.parts.first()) {
                Some(Part::Text { text, .. }) => Some(text.clone()),
                _ => None,
            })
            .filter(|p| p.contains("label that applies"))
            .collect();
        assert_eq!(prompts.len(), 2);
        assert!(prompts.iter().all(|p| p.contains("at this location: Soho.")));
    }

    #[tokio::test]
    async fn test_missing_location_is_rejected() {
        let model = Arc::new(RoutingModel::new(vec![]));
        let search = Arc::new(StaticSearch::new("[]"));
        let base = spawn(state_with(model.clone(), search.clone())).await;
        let client = reqwest::Client::new();

        for url in [
            format!("{}/postbot_videos", base),
            format!("{}/postbot_location?name=Bao", base),
            format!("{}/postbot_videos?location=%20%20", base),
        ] {
            let response = client.get(&url).send().await.unwrap();
            assert_eq!(response.status(), 400);
            assert_eq!(response.text().await.unwrap(), NO_LOCATION);
        }

        assert_eq!(model.request_count(), 0);
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn test_videos_end_to_end() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(function_call_response(SEARCH_TOOL_NAME, json!({"keywords": "cafe,brunch"}))),
            Ok(text_response(
                "```json\n[{\"link\":\"https://www.tiktok.com/@a/video/1\",\"accuracy\":90,\"reason\":\"shows logo\",\"ocr\":\"latte art\",\"thumbnail\":\"https://p16.tiktokcdn.com/1.jpg\"}]\n```",
            )),
        ]));
        let search = Arc::new(StaticSearch::new(
            r#"[{"link":"https://www.tiktok.com/@a/video/1","accuracy":90}]"#,
        ));
        let base = spawn(state_with(model, search.clone())).await;

        let body: Value = reqwest::Client::new()
            .post(format!("{}/postbot_videos?location=123%20Main%20St", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(
            body,
            json!({"videos": [{
                "link": "https://www.tiktok.com/@a/video/1",
                "accuracy": 90,
                "reason": "shows logo",
                "ocr": "latte art",
                "thumbnail": "https://p16.tiktokcdn.com/1.jpg"
            }]})
        );
        assert_eq!(
            search.calls(),
            vec![vec![("keywords".to_string(), "cafe,brunch".to_string())]]
        );
    }

    #[tokio::test]
    async fn test_location_composite() {
        let model = Arc::new(RoutingModel::new(vec![
            (
                "Restaurant Name: Bao",
                r#"{"reservation": ["https://bao.co/book"], "menu": ["https://bao.co/menu"]}"#,
            ),
            (
                "every food label",
                "```json\n[{\"label\": \"Asian\", \"accuracy\": 97, \"reason\": \"bao buns\"}]\n```",
            ),
            (
                "every restaurant label",
                r#"[{"label": "Casual", "accuracy": 88, "reason": "counter seating"}]"#,
            ),
        ]));
        let base = spawn(state_with(model.clone(), Arc::new(StaticSearch::new("[]")))).await;

        let body: Value = reqwest::get(format!(
            "{}/postbot_location?location=Soho&name=Bao&full_address=53%20Lexington%20St",
            base
        ))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

        assert_eq!(
            body,
            json!({
                "foodTypes": [{"label": "Asian", "accuracy": 97, "reason": "bao buns"}],
                "menu": ["https://bao.co/menu"],
                "reservation": ["https://bao.co/book"],
                "labels": [{"label": "Casual", "accuracy": 88, "reason": "counter seating"}]
            })
        );
        assert_eq!(model.request_count(), 3);
    }

    #[tokio::test]
    async fn test_location_all_flows_failed() {
        let model = Arc::new(RoutingModel::new(vec![]));
        let base = spawn(state_with(model, Arc::new(StaticSearch::new("[]")))).await;

        let response = reqwest::get(format!("{}/postbot_location?location=Soho", base))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(
            body,
            json!({
                "foodTypes": [],
                "menu": ["", ""],
                "reservation": ["", ""],
                "labels": []
            })
        );
    }

    #[tokio::test]
    async fn test_location_missing_link_key_is_null() {
        let model = Arc::new(RoutingModel::new(vec![
            ("Restaurant Name:", r#"{"menu": ["https://x.co/menu"]}"#),
            ("every food label", "[]"),
            ("every restaurant label", "[]"),
        ]));
        let base = spawn(state_with(model, Arc::new(StaticSearch::new("[]")))).await;

        let body: Value = reqwest::get(format!("{}/postbot_location?location=Soho", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["reservation"], Value::Null);
        assert_eq!(body["menu"], json!(["https://x.co/menu"]));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let base = spawn(state_with(
            Arc::new(RoutingModel::new(vec![])),
            Arc::new(StaticSearch::new("[]")),
        ))
        .await;

        let response = reqwest::Client::new()
            .get(format!("{}/health", base))
            .header("Origin", "https://app.example.com")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
