use axum::Json;
use serde_json::json;
use serde_json::Value;

/// Liveness probe. Does not touch the credential store.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
