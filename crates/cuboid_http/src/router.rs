//! Router construction for the cuboid service.

use crate::handlers::{bags, cuboids, health};
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self as axum_mw, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::time::Instant;

/// Builds the full router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/bags", post(bags::create_bag))
        .route("/bags/:id", get(bags::get_bag))
        .route(
            "/cuboids",
            get(cuboids::list_cuboids).post(cuboids::create_cuboid),
        )
        .route(
            "/cuboids/:id",
            get(cuboids::get_cuboid)
                .put(cuboids::update_cuboid)
                .delete(cuboids::delete_cuboid),
        )
        .layer(axum_mw::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
