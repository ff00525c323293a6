pub mod climate_data;
pub mod sqlite;

pub use climate_data::*;
pub use sqlite::*;

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use time::{macros::format_description, Date, Duration};
use utoipa::ToSchema;

/// Days subtracted from the most recent measurement to get the cutoff date
pub const WINDOW_DAYS: i64 = 366;

/// Format a date the way `measurement.date` stores it (`YYYY-MM-DD`)
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// The trailing year of data served by `/precipitation` and `/tobs`.
///
/// Built once at startup from the newest measurement date and never refreshed,
/// so rows ingested while the process runs do not move the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    pub recent_date: Date,
    /// Rows strictly after this date are part of the window
    pub cutoff: Date,
}

impl ObservationWindow {
    pub fn from_recent_date(recent_date: Date) -> Self {
        Self {
            recent_date,
            cutoff: recent_date
                .checked_sub(Duration::days(WINDOW_DAYS))
                .unwrap_or(Date::MIN),
        }
    }
}

impl std::fmt::Display for ObservationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}]", self.cutoff, self.recent_date)
    }
}

/// One measurement row reduced to `{"<date>": value}`.
///
/// Rows are never merged by date: two stations reporting on the same day
/// produce two entries.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DatedValue {
    pub date: String,
    pub value: Option<f64>,
}

impl Serialize for DatedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.value)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StationEntry {
    pub name: String,
    /// Station code, e.g. `USC00519281`
    pub id: String,
}

/// Temperature observation aggregate over a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}
