//! Chart-ready series derived from a [`TotalStats`] snapshot.

use crate::dates::{format_date, format_time};
use crate::models::{BarPoint, DaySeries, FeedingEvent, SeriesPoint};
use crate::stats::{DayAggregate, TotalStats};
use chrono::Timelike;
use tracing::warn;

const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

/// Cumulative intake for one day, with stool and urine overlays.
///
/// The running total is summed in time order, so the line never goes down even when the
/// sheet's rows are out of order. Overlay points are picked out of the same point list as
/// the line, so they always sit on it.
pub fn day_series(day: &DayAggregate) -> DaySeries {
    let mut events: Vec<&FeedingEvent> = day.events.iter().collect();
    if events.windows(2).any(|w| w[0].time > w[1].time) {
        warn!(date = %format_date(day.date), "rows are out of time order, sorting series");
        events.sort_by_key(|event| event.time);
    }

    let mut series = DaySeries::default();
    let mut running = 0.0;
    for event in events {
        running += event.volume_ml.unwrap_or(0.0);
        let point = SeriesPoint {
            time: format_time(event.time),
            minute_of_day: event.time.hour() * 60 + event.time.minute(),
            value: running,
        };
        if event.has_stool {
            series.stool.push(point.clone());
        }
        if event.has_urine {
            series.urine.push(point.clone());
        }
        series.cumulative.push(point);
    }
    series
}

pub fn history_series(stats: &TotalStats) -> Vec<BarPoint> {
    stats
        .days()
        .map(|day| BarPoint {
            date: format_date(day.date),
            total_ml: day.total_ml,
        })
        .collect()
}

/// Straight pace line from nothing at midnight to `largest` at the end of the day.
pub fn ideal_line(largest: f64) -> Vec<SeriesPoint> {
    vec![
        SeriesPoint {
            time: "00:00".to_string(),
            minute_of_day: 0,
            value: 0.0,
        },
        SeriesPoint {
            time: "23:59".to_string(),
            minute_of_day: LAST_MINUTE_OF_DAY,
            value: largest,
        },
    ]
}
