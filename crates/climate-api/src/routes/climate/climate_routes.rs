use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    db::{DatedValue, Error, StationEntry, TemperatureStats},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "One `{date: prcp}` entry per measurement in the last year of data; prcp may be null", body = Vec<std::collections::HashMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = super::ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DatedValue>>, Error> {
    let values = state.climate_db.precipitation(state.window.cutoff).await?;
    Ok(Json(values))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "All weather stations", body = Vec<StationEntry>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read stations", body = super::ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StationEntry>>, Error> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "One `{date: tobs}` entry per measurement of the most active station in the last year of data", body = Vec<std::collections::HashMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = super::ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DatedValue>>, Error> {
    let values = state
        .climate_db
        .active_station_temperatures(state.window.cutoff)
        .await?;
    Ok(Json(values))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Date present in the dataset, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature stats for every measurement on or after start", body = TemperatureStats),
        (status = NOT_FOUND, description = "Date does not appear in the dataset", body = super::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = super::ErrorBody)
    ))]
pub async fn start_stats(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureStats>, Error> {
    let stats = state.climate_db.stats_from(&start).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Date present in the dataset, YYYY-MM-DD"),
        ("end" = String, Path, description = "Date present in the dataset, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Temperature stats for measurements between start and end inclusive", body = TemperatureStats),
        (status = NOT_FOUND, description = "A date does not appear in the dataset, or the range holds no measurements", body = super::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read measurements", body = super::ErrorBody)
    ))]
pub async fn range_stats(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>, Error> {
    let stats = state.climate_db.stats_between(&start, &end).await?;
    Ok(Json(stats))
}
