use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use marketer_core::{Catalog, Goal, Industry, InputSnapshot, OutputBundle, PlanAssembler};

use crate::render::format_rupiah;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and response types
// ---------------------------------------------------------------------------

pub struct AppState {
    pub catalog: Catalog,
    pub defaults: InputSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub share_code: String,
    pub input: InputSnapshot,
    pub plan: OutputBundle,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/defaults", get(get_defaults))
        .route("/api/catalog", get(get_catalog))
        .route("/api/plan", post(create_plan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(Arc::new(state));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("marketer serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("marketer serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let d = &state.defaults;
    let industries = Industry::ALL
        .iter()
        .map(|i| format!("<li><code>{i}</code> {}</li>", i.label()))
        .collect::<Vec<_>>()
        .join("");
    let goals = Goal::ALL
        .iter()
        .map(|g| format!("<li><code>{g}</code> {}</li>", g.label()))
        .collect::<Vec<_>>()
        .join("");

    Html(format!(
        "<!DOCTYPE html>\
<html><head><title>marketer</title></head><body>\
<h1>marketer</h1>\
<p><a href=\"/api/defaults\">/api/defaults</a> | <a href=\"/api/catalog\">/api/catalog</a> | POST /api/plan</p>\
<p>Defaults: {brand}, {industry}, {goal}, {budget}</p>\
<h2>Industries</h2><ul>{industries}</ul>\
<h2>Goals</h2><ul>{goals}</ul>\
</body></html>",
        brand = d.brand_name(),
        industry = d.industry().label(),
        goal = d.goal().label(),
        budget = format_rupiah(d.budget()),
    ))
}

async fn get_defaults(State(state): State<Arc<AppState>>) -> Json<InputSnapshot> {
    Json(state.defaults.clone())
}

async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}

/// Fields missing from the request body take the server's defaults.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PlanResponse>, AppError> {
    let serde_json::Value::Object(fields) = body else {
        return Err(AppError::unprocessable("request body must be a JSON object"));
    };

    let mut merged = match serde_json::to_value(&state.defaults) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => return Err(AppError::internal(anyhow::anyhow!("defaults are not an object"))),
        Err(e) => return Err(AppError::internal(e.into())),
    };
    merged.extend(fields);

    let snapshot: InputSnapshot = serde_json::from_value(serde_json::Value::Object(merged))
        .map_err(|e| AppError::unprocessable(e.to_string()))?;

    let plan = PlanAssembler::new(&state.catalog).assemble(&snapshot);
    tracing::debug!(share_code = %snapshot.fingerprint(), "plan served");

    Ok(Json(PlanResponse {
        share_code: snapshot.fingerprint(),
        input: snapshot,
        plan,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            catalog: Catalog::builtin().clone(),
            defaults: InputSnapshot::default(),
        })
    }

    async fn send_request(uri: &str) -> axum::response::Response {
        let app = build_router(test_state());
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_plan(body: &str) -> axum::response::Response {
        let app = build_router(test_state());
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/plan")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_html() {
        let resp = send_request("/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
    }

    #[tokio::test]
    async fn test_defaults() {
        let resp = send_request("/api/defaults").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["brandName"], "Nimbus Labs");
        assert_eq!(json["industry"], "saas");
        assert_eq!(json["goal"], "lead");
        assert_eq!(json["budget"], 30_000_000);
    }

    #[tokio::test]
    async fn test_catalog() {
        let resp = send_request("/api/catalog").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["plays"]["lead"].as_array().unwrap().len(), 3);
        assert!(json["archetypes"]["business_owner"].is_object());
    }

    #[tokio::test]
    async fn test_plan_with_partial_body() {
        let resp = post_plan(r#"{"goal": "sales", "budget": 40000000}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["input"]["brandName"], "Nimbus Labs");
        assert_eq!(json["input"]["goal"], "sales");
        assert_eq!(json["plan"]["campaigns"][0]["budget"], 16_000_000);
        assert_eq!(json["plan"]["budgetBand"], "growth");
        assert_eq!(json["shareCode"].as_str().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_plan_empty_body_uses_defaults() {
        let resp = post_plan("{}").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(
            json["shareCode"],
            InputSnapshot::default().fingerprint().as_str()
        );
    }

    #[tokio::test]
    async fn test_plan_unknown_goal_is_422() {
        let resp = post_plan(r#"{"goal": "growth"}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_plan_zero_budget_is_422() {
        let resp = post_plan(r#"{"budget": 0}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("budget"));
    }

    #[tokio::test]
    async fn test_plan_oversized_budget_is_422() {
        let resp = post_plan(r#"{"budget": 18446744073709551615}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("exceeds the maximum"));
    }

    #[tokio::test]
    async fn test_plan_negative_budget_is_422() {
        let resp = post_plan(r#"{"budget": -5}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_plan_non_object_is_422() {
        let resp = post_plan("[1, 2]").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
