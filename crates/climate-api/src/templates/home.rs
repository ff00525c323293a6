use maud::{html, Markup};

use crate::db::ObservationWindow;

pub const APP_TITLE: &str = "Climate App";

/// Routes advertised on the home page, with example dates for the stats routes
pub const API_ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/2010-01-01",
    "/api/v1.0/2010-01-01/2017-08-23",
];

pub fn home_page(api_base: &str, window: &ObservationWindow) -> Markup {
    html! {
        (APP_TITLE) br;
        "Available Routes:" br;
        @for route in API_ROUTES {
            a href=(format!("{}{}", api_base, route)) { (route) } br;
        }
        "API docs: " a href=(format!("{}/docs", api_base)) { "/docs" } br;
        "Observations through " (window.recent_date.to_string())
        ", yearly routes start after " (window.cutoff.to_string())
    }
}
