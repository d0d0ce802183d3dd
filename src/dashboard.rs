use crate::config::Config;
use crate::dates::{format_date, format_time, parse_date};
use crate::errors::StatsError;
use crate::log::EventLog;
use crate::models::{DashboardResponse, DayResponse, EventRow, SummaryResponse, TimeSinceResponse};
use crate::series::{day_series, history_series, ideal_line};
use crate::stats::{any_event, has_stool, has_urine, TimeSince, TotalStats};
use chrono::{DateTime, NaiveDate, Utc};

pub fn build_dashboard(
    log: &EventLog,
    config: &Config,
    selected: Option<&str>,
) -> Result<DashboardResponse, StatsError> {
    build_dashboard_at(log, config, selected, Utc::now())
}

/// Everything one page refresh shows, computed from a single snapshot.
pub fn build_dashboard_at(
    log: &EventLog,
    config: &Config,
    selected: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DashboardResponse, StatsError> {
    let stats = TotalStats::build(log, config.timezone);
    let summary = build_summary(&stats, now)?;

    let selected = match selected.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => stats.today()?,
    };
    let day = build_day(&stats, selected)?;
    let (_, largest) = stats.largest_daily_total()?;

    Ok(DashboardResponse {
        dates: stats.dates().into_iter().map(format_date).collect(),
        selected: format_date(selected),
        summary,
        day,
        history: history_series(&stats),
        ideal_line: ideal_line(largest),
        reference_ml: config.reference_ml,
        issues: log.issues().to_vec(),
    })
}

pub fn build_summary(stats: &TotalStats, now: DateTime<Utc>) -> Result<SummaryResponse, StatsError> {
    let today = stats.today()?;
    let (largest_day, largest) = stats.largest_daily_total()?;
    let last_meal = stats.last_event_matching(any_event)?;

    let time_since_last_stool = match stats.last_event_matching(has_stool) {
        Ok(event) => Some(time_since_response(stats.time_since_at(event, now))),
        Err(StatsError::NotFound(_)) => None,
        Err(err) => return Err(err),
    };

    Ok(SummaryResponse {
        today: format_date(today),
        total_today: stats.total_today()?.round() as i64,
        ideal_now: stats.ideal_now()?,
        meals_today: stats.meals_today()?,
        largest_daily_total: largest.round() as i64,
        largest_day: format_date(largest_day),
        last_meal: format_time(last_meal.time),
        time_since_last_meal: time_since_response(stats.time_since_at(last_meal, now)),
        urine_today: stats.count_on(today, has_urine),
        stool_today: stats.count_on(today, has_stool),
        suggested_next_meal: stats.suggested_next_meal_at(now)?,
        time_since_last_stool,
    })
}

pub fn build_day(stats: &TotalStats, date: NaiveDate) -> Result<DayResponse, StatsError> {
    let day = stats
        .day(date)
        .ok_or(StatsError::NotFound("entries for the selected date"))?;

    let events = day
        .events
        .iter()
        .zip(&day.cumulative_ml)
        .map(|(event, cumulative)| EventRow {
            time: format_time(event.time),
            volume_ml: event.volume_ml,
            cumulative_ml: *cumulative,
            stool: event.has_stool,
            urine: event.has_urine,
            note: event.note.clone(),
        })
        .collect();

    Ok(DayResponse {
        date: format_date(date),
        total_ml: day.total_ml,
        events,
        series: day_series(day),
    })
}

fn time_since_response(since: TimeSince) -> TimeSinceResponse {
    TimeSinceResponse {
        formatted: since.formatted(),
        hours: since.hours(),
        minutes: since.minutes(),
        ahead: since.ahead,
    }
}
