use crate::{
    db::{self, ClimateData, ObservationWindow},
    home_handler, precipitation, range_stats, routes, start_stats, stations, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate_db: Arc<dyn ClimateData>,
    /// Fixed for the lifetime of the process
    pub window: ObservationWindow,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::start_stats,
        routes::climate::climate_routes::range_stats,
    ),
    components(
        schemas(
                db::StationEntry,
                db::TemperatureStats,
                routes::climate::ErrorBody,
        )
    ),
    tags(
        (name = "climate api", description = "a read-only RESTful api over historical station precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Reads the newest measurement date once and freezes the observation window
/// every request will use.
pub async fn build_app_state(
    remote_url: String,
    climate_db: Arc<dyn ClimateData>,
) -> Result<AppState, anyhow::Error> {
    let recent_date = climate_db
        .most_recent_date()
        .await
        .map_err(|e| anyhow!("error finding most recent measurement: {}", e))?;
    let window = ObservationWindow::from_recent_date(recent_date);

    info!("observation window: {}", window);

    Ok(AppState {
        remote_url,
        climate_db,
        window,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(start_stats))
        .route("/api/v1.0/{start}/{end}", get(range_stats))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
