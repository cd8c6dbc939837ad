use super::cuboid_service;
use crate::error::ApiError;
use crate::payload::{parse_id, parse_id_list, CuboidPayload, CuboidView, CuboidWithBagView};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cuboid_core::NewCuboid;

pub async fn list_cuboids(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CuboidWithBagView>>, ApiError> {
    let ids = parse_id_list(&pairs)?;

    let items = state
        .with_connection(move |conn| Ok(cuboid_service(conn)?.list_cuboids(&ids)?))
        .await?;

    Ok(Json(items.into_iter().map(CuboidWithBagView::from).collect()))
}

pub async fn get_cuboid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CuboidView>, ApiError> {
    let id = parse_id(&id)?;

    state
        .with_connection(move |conn| Ok(cuboid_service(conn)?.get_cuboid(id)?))
        .await?
        .map(|cuboid| Json(CuboidView::from(cuboid)))
        .ok_or_else(|| ApiError::NotFound(format!("cuboid not found: {id}")))
}

pub async fn create_cuboid(
    State(state): State<AppState>,
    payload: Result<Json<CuboidPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CuboidView>), ApiError> {
    let Json(payload) = payload?;
    let request = NewCuboid::from(payload);

    let cuboid = state
        .with_connection(move |conn| Ok(cuboid_service(conn)?.create_cuboid(&request)?))
        .await?;

    Ok((StatusCode::CREATED, Json(CuboidView::from(cuboid))))
}

pub async fn update_cuboid(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CuboidPayload>, JsonRejection>,
) -> Result<Json<CuboidView>, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let request = NewCuboid::from(payload);

    let cuboid = state
        .with_connection(move |conn| Ok(cuboid_service(conn)?.update_cuboid(id, &request)?))
        .await?;

    Ok(Json(CuboidView::from(cuboid)))
}

pub async fn delete_cuboid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state
        .with_connection(move |conn| Ok(cuboid_service(conn)?.delete_cuboid(id)?))
        .await?;

    Ok(StatusCode::OK)
}
