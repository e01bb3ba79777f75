use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /health
/// Returns a static status object with the current UTC timestamp.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Note Generation API is running",
        "timestamp": Utc::now().to_rfc3339()
    }))
}
