use async_trait::async_trait;
use log::debug;
use sqlx::{FromRow, SqliteConnection};
use std::sync::Arc;
use time::Date;

use super::{format_date, parse_date, DatedValue, Database, StationEntry, TemperatureStats};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid date.")]
    InvalidDate,
    #[error("Invalid range.")]
    InvalidRange,
    #[error("No measurements found in database")]
    NoMeasurements,
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date string: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Failed to parse date string: {0}")]
    DateParse(#[from] time::error::Parse),
}

/// Read operations backing the API routes.
///
/// Every operation runs on a single pooled connection which goes back to the
/// pool when the operation returns, including on validation errors.
#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Newest `measurement.date` in the dataset
    async fn most_recent_date(&self) -> Result<Date, Error>;
    /// Every precipitation reading dated after `cutoff`, one entry per row
    async fn precipitation(&self, cutoff: Date) -> Result<Vec<DatedValue>, Error>;
    async fn stations(&self) -> Result<Vec<StationEntry>, Error>;
    /// Temperature readings after `cutoff` for the station with the most rows
    async fn active_station_temperatures(&self, cutoff: Date) -> Result<Vec<DatedValue>, Error>;
    /// Aggregate over `date >= start`; `start` must match a stored date exactly
    async fn stats_from(&self, start: &str) -> Result<TemperatureStats, Error>;
    /// Aggregate over `start <= date <= end`; both must match stored dates exactly
    async fn stats_between(&self, start: &str, end: &str) -> Result<TemperatureStats, Error>;
}

pub struct ClimateAccess {
    db: Arc<Database>,
}

#[derive(FromRow)]
struct StatsRow {
    min: Option<f64>,
    max: Option<f64>,
    avg: Option<f64>,
}

impl TryFrom<StatsRow> for TemperatureStats {
    type Error = Error;

    fn try_from(row: StatsRow) -> Result<Self, Self::Error> {
        match (row.min, row.max, row.avg) {
            (Some(min), Some(max), Some(avg)) => Ok(TemperatureStats { min, max, avg }),
            _ => Err(Error::InvalidRange),
        }
    }
}

impl ClimateAccess {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

async fn date_exists(conn: &mut SqliteConnection, date: &str) -> Result<bool, sqlx::Error> {
    let matches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurement WHERE date = ?")
        .bind(date)
        .fetch_one(conn)
        .await?;
    Ok(matches > 0)
}

/// Ties on row count go to the lowest station code.
async fn most_active_station(conn: &mut SqliteConnection) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT station FROM measurement
         GROUP BY station
         ORDER BY COUNT(*) DESC, station ASC
         LIMIT 1",
    )
    .fetch_optional(conn)
    .await
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn most_recent_date(&self) -> Result<Date, Error> {
        let mut conn = self.db.pool().acquire().await?;
        let recent: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *conn)
            .await?;

        let recent = recent.ok_or(Error::NoMeasurements)?;
        Ok(parse_date(&recent)?)
    }

    async fn precipitation(&self, cutoff: Date) -> Result<Vec<DatedValue>, Error> {
        let cutoff = format_date(cutoff)?;
        let mut conn = self.db.pool().acquire().await?;

        let rows = sqlx::query_as::<_, DatedValue>(
            "SELECT date, CAST(prcp AS REAL) AS value
             FROM measurement
             WHERE date > ?
             ORDER BY rowid",
        )
        .bind(&cutoff)
        .fetch_all(&mut *conn)
        .await?;

        debug!("precipitation after {}: {} rows", cutoff, rows.len());
        Ok(rows)
    }

    async fn stations(&self) -> Result<Vec<StationEntry>, Error> {
        let mut conn = self.db.pool().acquire().await?;

        let stations = sqlx::query_as::<_, StationEntry>(
            "SELECT name, station AS id FROM station ORDER BY rowid",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(stations)
    }

    async fn active_station_temperatures(&self, cutoff: Date) -> Result<Vec<DatedValue>, Error> {
        let cutoff = format_date(cutoff)?;
        let mut conn = self.db.pool().acquire().await?;

        let Some(station) = most_active_station(&mut conn).await? else {
            return Ok(vec![]);
        };
        debug!("most active station: {}", station);

        let rows = sqlx::query_as::<_, DatedValue>(
            "SELECT date, CAST(tobs AS REAL) AS value
             FROM measurement
             WHERE date > ? AND station = ?
             ORDER BY rowid",
        )
        .bind(&cutoff)
        .bind(&station)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    async fn stats_from(&self, start: &str) -> Result<TemperatureStats, Error> {
        let mut conn = self.db.pool().acquire().await?;

        if !date_exists(&mut conn, start).await? {
            return Err(Error::InvalidDate);
        }

        let row = sqlx::query_as::<_, StatsRow>(
            "SELECT CAST(MIN(tobs) AS REAL) AS min,
                    CAST(MAX(tobs) AS REAL) AS max,
                    AVG(tobs) AS avg
             FROM measurement
             WHERE date >= ?",
        )
        .bind(start)
        .fetch_one(&mut *conn)
        .await?;

        row.try_into()
    }

    async fn stats_between(&self, start: &str, end: &str) -> Result<TemperatureStats, Error> {
        let mut conn = self.db.pool().acquire().await?;

        if !date_exists(&mut conn, start).await? || !date_exists(&mut conn, end).await? {
            return Err(Error::InvalidDate);
        }

        let row = sqlx::query_as::<_, StatsRow>(
            "SELECT CAST(MIN(tobs) AS REAL) AS min,
                    CAST(MAX(tobs) AS REAL) AS max,
                    AVG(tobs) AS avg
             FROM measurement
             WHERE date >= ? AND date <= ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *conn)
        .await?;

        row.try_into()
    }
}
