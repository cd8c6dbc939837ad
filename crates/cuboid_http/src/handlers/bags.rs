use super::bag_service;
use crate::error::ApiError;
use crate::payload::{parse_id, BagPayload, BagView};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cuboid_core::{BagWithCuboids, NewBag};

pub async fn create_bag(
    State(state): State<AppState>,
    payload: Result<Json<BagPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BagView>), ApiError> {
    let Json(payload) = payload?;
    let request = NewBag::from(payload);

    let bag = state
        .with_connection(move |conn| Ok(bag_service(conn)?.create_bag(&request)?))
        .await?;

    let view = BagView::from(BagWithCuboids {
        bag,
        cuboids: Vec::new(),
    });
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_bag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BagView>, ApiError> {
    let id = parse_id(&id)?;

    state
        .with_connection(move |conn| bag_service(conn)?.get_bag(id).map_err(ApiError::from))
        .await?
        .map(|bag| Json(BagView::from(bag)))
        .ok_or_else(|| ApiError::NotFound(format!("bag not found: {id}")))
}
