use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "ping": cuboid_core::ping(),
        "version": cuboid_core::core_version(),
    }))
}
