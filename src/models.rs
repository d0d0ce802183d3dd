use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One validated row of the feeding log.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedingEvent {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// `None` when the cell was blank or not a usable number.
    pub volume_ml: Option<f64>,
    pub has_stool: bool,
    pub has_urine: bool,
    pub note: String,
}

/// A CSV record as exported from the spreadsheet, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Dato", default)]
    pub date: String,
    #[serde(rename = "Tid", default)]
    pub time: String,
    #[serde(rename = "Flaske", default)]
    pub volume: String,
    #[serde(rename = "Avføring", default)]
    pub stool: String,
    #[serde(rename = "Urin", default)]
    pub urine: String,
    #[serde(rename = "Notat", default)]
    pub note: String,
}

/// A row that was dropped, or a field that was coerced, while validating the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub line: u64,
    pub field: &'static str,
    pub value: String,
    pub rejected: bool,
}

#[derive(Debug, Serialize)]
pub struct TimeSinceResponse {
    pub formatted: String,
    pub hours: i64,
    pub minutes: i64,
    pub ahead: bool,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub today: String,
    pub total_today: i64,
    pub ideal_now: i64,
    pub meals_today: usize,
    pub largest_daily_total: i64,
    pub largest_day: String,
    pub last_meal: String,
    pub time_since_last_meal: TimeSinceResponse,
    pub urine_today: usize,
    pub stool_today: usize,
    pub suggested_next_meal: i64,
    pub time_since_last_stool: Option<TimeSinceResponse>,
}

#[derive(Debug, Serialize)]
pub struct EventRow {
    pub time: String,
    pub volume_ml: Option<f64>,
    pub cumulative_ml: f64,
    pub stool: bool,
    pub urine: bool,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: String,
    pub minute_of_day: u32,
    pub value: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct DaySeries {
    pub cumulative: Vec<SeriesPoint>,
    pub stool: Vec<SeriesPoint>,
    pub urine: Vec<SeriesPoint>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub total_ml: f64,
    pub events: Vec<EventRow>,
    pub series: DaySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub date: String,
    pub total_ml: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dates: Vec<String>,
    pub selected: String,
    pub summary: SummaryResponse,
    pub day: DayResponse,
    pub history: Vec<BarPoint>,
    pub ideal_line: Vec<SeriesPoint>,
    pub reference_ml: Option<f64>,
    pub issues: Vec<RowIssue>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
}
