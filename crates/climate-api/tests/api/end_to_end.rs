use crate::helpers::{seeded_climate_data, spawn_app, MeasurementRow, STATIONS};
use axum::http::StatusCode;
use climate_api::{ErrorBody, StationEntry, TemperatureStats};
use serde_json::from_slice;
use std::collections::{HashMap, HashSet};

fn measurements() -> Vec<MeasurementRow> {
    vec![
        ("USC00519397", "2010-01-01", Some(0.08), 65.0),
        ("USC00519397", "2016-08-22", Some(0.4), 78.0),
        ("USC00519397", "2016-08-23", Some(0.0), 81.0),
        ("USC00513117", "2016-08-23", Some(0.15), 76.0),
        ("USC00519281", "2016-08-23", None, 77.0),
        ("USC00519281", "2017-01-15", Some(0.02), 68.0),
        ("USC00519281", "2017-08-18", Some(0.06), 79.0),
        ("USC00519281", "2017-08-22", Some(0.5), 77.0),
        ("USC00519281", "2017-08-23", Some(0.45), 76.0),
        ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ]
}

#[tokio::test]
async fn precipitation_has_one_entry_per_row_after_cutoff() {
    let rows = measurements();
    let test_app = spawn_app(seeded_climate_data(&rows).await).await;

    let (status, body) = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);

    let entries: Vec<HashMap<String, Option<f64>>> = from_slice(&body).unwrap();
    let expected = rows.iter().filter(|r| r.1 > "2016-08-22").count();
    assert_eq!(entries.len(), expected);
    assert!(entries.iter().all(|e| e.len() == 1));

    let same_day: Vec<Option<f64>> = entries
        .iter()
        .filter_map(|e| e.get("2016-08-23").copied())
        .collect();
    assert_eq!(same_day, vec![Some(0.0), Some(0.15), None]);
    assert!(entries.iter().all(|e| !e.contains_key("2016-08-22")));
}

#[tokio::test]
async fn stations_match_stored_codes() {
    let test_app = spawn_app(seeded_climate_data(&measurements()).await).await;

    let (status, body) = test_app.get("/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);

    let stations: Vec<StationEntry> = from_slice(&body).unwrap();
    assert_eq!(stations.len(), STATIONS.len());

    let ids: HashSet<&str> = stations.iter().map(|s| s.id.as_str()).collect();
    let expected: HashSet<&str> = STATIONS.iter().map(|(code, _)| *code).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn tobs_follows_most_active_station() {
    let test_app = spawn_app(seeded_climate_data(&measurements()).await).await;

    let (status, body) = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);

    // USC00519281 has 5 rows, all after the cutoff
    let entries: Vec<HashMap<String, f64>> = from_slice(&body).unwrap();
    let dates: Vec<&str> = entries
        .iter()
        .flat_map(|e| e.keys().map(String::as_str))
        .collect();
    assert_eq!(
        dates,
        vec![
            "2016-08-23",
            "2017-01-15",
            "2017-08-18",
            "2017-08-22",
            "2017-08-23"
        ]
    );
}

#[tokio::test]
async fn start_stats_cover_every_later_row() {
    let rows = measurements();
    let test_app = spawn_app(seeded_climate_data(&rows).await).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-23").await;
    assert_eq!(status, StatusCode::OK);

    let stats: TemperatureStats = from_slice(&body).unwrap();
    let later: Vec<f64> = rows
        .iter()
        .filter(|r| r.1 >= "2016-08-23")
        .map(|r| r.3)
        .collect();
    let true_max = later.iter().cloned().fold(f64::MIN, f64::max);
    let true_min = later.iter().cloned().fold(f64::MAX, f64::min);

    assert_eq!(stats.max, true_max);
    assert_eq!(stats.min, true_min);
    assert!(stats.min <= stats.avg && stats.avg <= stats.max);
    assert!((stats.avg - later.iter().sum::<f64>() / later.len() as f64).abs() < 1e-9);
}

#[tokio::test]
async fn start_stats_reject_dates_not_in_dataset() {
    let test_app = spawn_app(seeded_climate_data(&measurements()).await).await;

    for uri in [
        "/api/v1.0/2016-08-24",
        "/api/v1.0/2016-8-23",
        "/api/v1.0/yesterday",
    ] {
        let (status, body) = test_app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        let error: ErrorBody = from_slice(&body).unwrap();
        assert_eq!(error, ErrorBody::new("Invalid date."));
    }
}

#[tokio::test]
async fn range_stats_known_values() {
    let test_app = spawn_app(seeded_climate_data(&measurements()[7..9]).await).await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-22/2017-08-23").await;
    assert_eq!(status, StatusCode::OK);

    let stats: TemperatureStats = from_slice(&body).unwrap();
    assert_eq!(
        stats,
        TemperatureStats {
            min: 76.0,
            max: 77.0,
            avg: 76.5
        }
    );
}

#[tokio::test]
async fn range_stats_same_day_matches_single_day() {
    let test_app = spawn_app(seeded_climate_data(&measurements()).await).await;

    let (status, body) = test_app.get("/api/v1.0/2016-08-23/2016-08-23").await;
    assert_eq!(status, StatusCode::OK);

    let stats: TemperatureStats = from_slice(&body).unwrap();
    assert_eq!(stats.min, 76.0);
    assert_eq!(stats.max, 81.0);
    assert!((stats.avg - 78.0).abs() < 1e-9);
}

#[tokio::test]
async fn range_stats_reversed_range_is_invalid_range() {
    let test_app = spawn_app(seeded_climate_data(&measurements()).await).await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-23/2010-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = from_slice(&body).unwrap();
    assert_eq!(error, ErrorBody::new("Invalid range."));

    let (status, body) = test_app.get("/api/v1.0/2010-01-01/2017-08-24").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = from_slice(&body).unwrap();
    assert_eq!(error, ErrorBody::new("Invalid date."));
}

#[tokio::test]
async fn startup_fails_without_measurements() {
    let climate_data = seeded_climate_data(&[]).await;
    let result =
        climate_api::build_app_state(crate::helpers::REMOTE_URL.to_string(), climate_data).await;
    assert!(result.is_err());
}
