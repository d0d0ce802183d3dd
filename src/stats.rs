use crate::dates::localize;
use crate::errors::StatsError;
use crate::log::EventLog;
use crate::models::FeedingEvent;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Everything derived for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub total_ml: f64,
    pub events: Vec<FeedingEvent>,
    /// Running total after each event, aligned with `events`.
    pub cumulative_ml: Vec<f64>,
    pub urine_count: usize,
    pub stool_count: usize,
}

impl DayAggregate {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_ml: 0.0,
            events: Vec::new(),
            cumulative_ml: Vec::new(),
            urine_count: 0,
            stool_count: 0,
        }
    }

    fn push(&mut self, event: &FeedingEvent) {
        if let Some(volume) = event.volume_ml {
            self.total_ml += volume;
        }
        self.cumulative_ml.push(self.total_ml);
        self.urine_count += usize::from(event.has_urine);
        self.stool_count += usize::from(event.has_stool);
        self.events.push(event.clone());
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Elapsed time since an event, floored to whole minutes.
///
/// Events later than "now" are clamped to zero and flagged with `ahead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSince {
    pub elapsed: Duration,
    pub ahead: bool,
}

impl TimeSince {
    fn from_signed(delta: Duration) -> Self {
        if delta < Duration::zero() {
            debug!(seconds = delta.num_seconds(), "event lies ahead of now, clamping");
            Self {
                elapsed: Duration::zero(),
                ahead: true,
            }
        } else {
            Self {
                elapsed: delta,
                ahead: false,
            }
        }
    }

    pub fn hours(&self) -> i64 {
        self.elapsed.num_minutes() / 60
    }

    pub fn minutes(&self) -> i64 {
        self.elapsed.num_minutes() % 60
    }

    pub fn formatted(&self) -> String {
        crate::dates::format_hours_minutes(self.elapsed)
    }
}

/// Aggregation snapshot over one [`EventLog`].
///
/// All grouping happens in [`TotalStats::build`]; the accessors only read.
#[derive(Debug, Clone)]
pub struct TotalStats {
    tz: Tz,
    events: Vec<FeedingEvent>,
    days: BTreeMap<NaiveDate, DayAggregate>,
    largest: Option<(NaiveDate, f64)>,
}

impl TotalStats {
    pub fn build(log: &EventLog, tz: Tz) -> Self {
        let mut days: BTreeMap<NaiveDate, DayAggregate> = BTreeMap::new();
        for event in log.events() {
            days.entry(event.date)
                .or_insert_with(|| DayAggregate::new(event.date))
                .push(event);
        }

        let largest = days.values().fold(None, |best: Option<(NaiveDate, f64)>, day| {
            match best {
                Some((_, total)) if day.total_ml <= total => best,
                _ => Some((day.date, day.total_ml)),
            }
        });

        debug!(events = log.len(), days = days.len(), "built feeding stats");
        Self {
            tz,
            events: log.events().to_vec(),
            days,
            largest,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn events(&self) -> &[FeedingEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayAggregate> {
        self.days.values()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAggregate> {
        self.days.get(&date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    pub fn total_per_day(&self) -> BTreeMap<NaiveDate, f64> {
        self.days
            .iter()
            .map(|(date, day)| (*date, day.total_ml))
            .collect()
    }

    pub fn last_event(&self) -> Result<&FeedingEvent, StatsError> {
        self.events.last().ok_or(StatsError::EmptyLog)
    }

    /// Date of the last row, which may lag behind the calendar.
    pub fn today(&self) -> Result<NaiveDate, StatsError> {
        self.last_event().map(|event| event.date)
    }

    pub fn total_today(&self) -> Result<f64, StatsError> {
        let today = self.today()?;
        Ok(self.days.get(&today).map_or(0.0, |day| day.total_ml))
    }

    /// Rows of the last date with a usable bottle volume; diaper-only rows are not meals.
    pub fn meals_today(&self) -> Result<usize, StatsError> {
        Ok(self.count_on(self.today()?, has_volume))
    }

    pub fn last_event_matching<P>(&self, predicate: P) -> Result<&FeedingEvent, StatsError>
    where
        P: Fn(&FeedingEvent) -> bool,
    {
        self.events
            .iter()
            .rev()
            .find(|&event| predicate(event))
            .ok_or(StatsError::NotFound("matching event"))
    }

    pub fn time_since(&self, event: &FeedingEvent) -> TimeSince {
        self.time_since_at(event, Utc::now())
    }

    pub fn time_since_at(&self, event: &FeedingEvent, now: DateTime<Utc>) -> TimeSince {
        let then = localize(event.date, event.time, self.tz);
        let now = now.with_timezone(&self.tz);
        TimeSince::from_signed(now.signed_duration_since(then))
    }

    pub fn events_on(&self, date: NaiveDate) -> &[FeedingEvent] {
        self.days
            .get(&date)
            .map_or(&[][..], |day| day.events.as_slice())
    }

    pub fn count_on<P>(&self, date: NaiveDate, predicate: P) -> usize
    where
        P: Fn(&FeedingEvent) -> bool,
    {
        self.events_on(date).iter().filter(|&event| predicate(event)).count()
    }

    /// The biggest daily total and the first date that reached it.
    pub fn largest_daily_total(&self) -> Result<(NaiveDate, f64), StatsError> {
        self.largest.ok_or(StatsError::EmptyLog)
    }

    /// Target intake by the time of day of the last event, paced on the largest day.
    pub fn ideal_now(&self) -> Result<i64, StatsError> {
        let (_, largest) = self.largest_daily_total()?;
        let last = self.last_event()?;
        Ok((largest * day_fraction(last.time)) as i64)
    }

    pub fn suggested_next_meal(&self) -> Result<i64, StatsError> {
        self.suggested_next_meal_at(Utc::now())
    }

    /// Volume due since the last meal, paced on the largest day.
    pub fn suggested_next_meal_at(&self, now: DateTime<Utc>) -> Result<i64, StatsError> {
        let (_, largest) = self.largest_daily_total()?;
        let last_meal = self.last_event()?;
        let since = self.time_since_at(last_meal, now);
        let fraction = since.elapsed.num_seconds() as f64 / SECONDS_PER_DAY;
        Ok((largest * fraction) as i64)
    }
}

fn day_fraction(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / SECONDS_PER_DAY
}

pub fn has_stool(event: &FeedingEvent) -> bool {
    event.has_stool
}

pub fn has_urine(event: &FeedingEvent) -> bool {
    event.has_urine
}

pub fn has_volume(event: &FeedingEvent) -> bool {
    event.volume_ml.is_some()
}

pub fn any_event(_: &FeedingEvent) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{parse_date, parse_time};
    use chrono::TimeZone;
    use chrono_tz::Europe::Oslo;

    fn event(date: &str, time: &str, volume: Option<f64>, stool: bool, urine: bool) -> FeedingEvent {
        FeedingEvent {
            date: parse_date(date).unwrap(),
            time: parse_time(time).unwrap(),
            volume_ml: volume,
            has_stool: stool,
            has_urine: urine,
            note: String::new(),
        }
    }

    fn stats(events: Vec<FeedingEvent>) -> TotalStats {
        TotalStats::build(&EventLog::new(events), Oslo)
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn oslo(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Oslo.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn scenario() -> TotalStats {
        stats(vec![
            event("01.01.2024", "08:00", Some(100.0), false, false),
            event("01.01.2024", "10:00", Some(50.0), true, false),
            event("01.01.2024", "12:00", None, false, true),
        ])
    }

    #[test]
    fn end_to_end_scenario() {
        let stats = scenario();
        let day = date("01.01.2024");

        let totals = stats.total_per_day();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&day], 150.0);
        assert_eq!(stats.day(day).unwrap().cumulative_ml, vec![100.0, 150.0, 150.0]);
        assert_eq!(stats.count_on(day, has_stool), 1);
        assert_eq!(stats.count_on(day, has_urine), 1);
        assert_eq!(stats.day(day).unwrap().event_count(), 3);
    }

    #[test]
    fn daily_totals_sum_to_all_parsable_volumes() {
        let stats = stats(vec![
            event("02.01.2024", "06:00", Some(120.0), false, false),
            event("01.01.2024", "23:00", Some(80.0), false, false),
            event("02.01.2024", "09:00", None, true, true),
            event("03.01.2024", "01:30", Some(35.5), false, false),
        ]);

        let sum: f64 = stats.total_per_day().values().sum();
        let expected: f64 = stats.events().iter().filter_map(|e| e.volume_ml).sum();
        assert_eq!(sum, expected);

        let keys: Vec<_> = stats.total_per_day().into_keys().collect();
        assert_eq!(keys, vec![date("01.01.2024"), date("02.01.2024"), date("03.01.2024")]);
    }

    #[test]
    fn cumulative_series_is_monotone_and_ends_at_total() {
        let stats = stats(vec![
            event("05.01.2024", "06:00", Some(60.0), false, false),
            event("05.01.2024", "08:00", None, false, true),
            event("05.01.2024", "11:00", Some(90.0), false, false),
            event("06.01.2024", "03:00", Some(40.0), false, false),
        ]);

        for day in stats.days() {
            assert!(day.cumulative_ml.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(day.cumulative_ml.last().copied(), Some(day.total_ml));
            assert_eq!(day.cumulative_ml.len(), day.events.len());
        }
        assert_eq!(stats.day(date("06.01.2024")).unwrap().cumulative_ml, vec![40.0]);
    }

    #[test]
    fn day_without_volumes_maps_to_zero() {
        let stats = stats(vec![event("07.01.2024", "10:00", None, false, true)]);
        assert_eq!(stats.total_per_day()[&date("07.01.2024")], 0.0);
        assert_eq!(stats.total_today().unwrap(), 0.0);
    }

    #[test]
    fn empty_log_reports_empty_log() {
        let stats = stats(Vec::new());
        assert_eq!(stats.total_today(), Err(StatsError::EmptyLog));
        assert_eq!(stats.largest_daily_total(), Err(StatsError::EmptyLog));
        assert_eq!(stats.ideal_now(), Err(StatsError::EmptyLog));
        assert!(stats.total_per_day().is_empty());
        assert!(stats.events_on(date("01.01.2024")).is_empty());
    }

    #[test]
    fn single_row_total_today() {
        let stats = stats(vec![event("08.01.2024", "10:00", Some(70.0), false, false)]);
        assert_eq!(stats.total_today().unwrap(), 70.0);
    }

    #[test]
    fn today_is_last_row_not_latest_date() {
        let stats = stats(vec![
            event("10.01.2024", "10:00", Some(70.0), false, false),
            event("09.01.2024", "22:00", Some(30.0), false, false),
        ]);
        assert_eq!(stats.today().unwrap(), date("09.01.2024"));
        assert_eq!(stats.total_today().unwrap(), 30.0);
    }

    #[test]
    fn last_stool_lookup() {
        let without = scenario_without_stool();
        assert_eq!(
            without.last_event_matching(has_stool),
            Err(StatsError::NotFound("matching event"))
        );

        let events: Vec<_> = (0..5)
            .map(|i| event("11.01.2024", &format!("0{i}:00"), Some(10.0), i == 2, false))
            .collect();
        let third = events[2].clone();
        let stats = stats(events);
        assert_eq!(stats.last_event_matching(has_stool).unwrap(), &third);
        assert_eq!(stats.last_event_matching(any_event).unwrap().time, parse_time("04:00").unwrap());
    }

    fn scenario_without_stool() -> TotalStats {
        stats(vec![
            event("12.01.2024", "08:00", Some(100.0), false, true),
            event("12.01.2024", "09:00", Some(20.0), false, false),
        ])
    }

    #[test]
    fn largest_daily_total_picks_biggest_day() {
        let stats = stats(vec![
            event("13.01.2024", "08:00", Some(300.0), false, false),
            event("14.01.2024", "08:00", Some(200.0), false, false),
            event("14.01.2024", "12:00", Some(300.0), false, false),
        ]);
        assert_eq!(stats.largest_daily_total().unwrap(), (date("14.01.2024"), 500.0));
    }

    #[test]
    fn largest_daily_total_ties_keep_first_date() {
        let stats = stats(vec![
            event("16.01.2024", "08:00", Some(400.0), false, false),
            event("15.01.2024", "08:00", Some(400.0), false, false),
        ]);
        assert_eq!(stats.largest_daily_total().unwrap(), (date("15.01.2024"), 400.0));
    }

    #[test]
    fn time_since_floors_minutes_in_oslo() {
        let stats = scenario();
        let last = stats.last_event().unwrap();
        let since = stats.time_since_at(last, oslo(2024, 1, 1, 15, 47) + Duration::seconds(59));
        assert_eq!((since.hours(), since.minutes()), (3, 47));
        assert_eq!(since.formatted(), "03:47");
        assert!(!since.ahead);
    }

    #[test]
    fn time_since_future_event_is_clamped() {
        let stats = scenario();
        let last = stats.last_event().unwrap();
        let since = stats.time_since_at(last, oslo(2024, 1, 1, 11, 0));
        assert!(since.ahead);
        assert_eq!(since.formatted(), "00:00");
        assert_eq!(stats.suggested_next_meal_at(oslo(2024, 1, 1, 11, 0)).unwrap(), 0);
    }

    #[test]
    fn ideal_now_scales_with_last_event_time() {
        // largest day 150 ml, last event at 12:00
        assert_eq!(scenario().ideal_now().unwrap(), 75);

        let morning = stats(vec![
            event("17.01.2024", "06:00", Some(400.0), false, false),
            event("18.01.2024", "08:00", Some(100.0), false, false),
        ]);
        assert_eq!(morning.ideal_now().unwrap(), 133);
    }

    #[test]
    fn suggested_meal_grows_with_elapsed_time() {
        let stats = scenario();
        let mut previous = i64::MIN;
        for minutes in (0..=24 * 60).step_by(37) {
            let now = oslo(2024, 1, 1, 12, 0) + Duration::minutes(minutes);
            let suggested = stats.suggested_next_meal_at(now).unwrap();
            assert!(suggested >= previous);
            previous = suggested;
        }
        assert_eq!(stats.suggested_next_meal_at(oslo(2024, 1, 1, 18, 0)).unwrap(), 37);
        assert_eq!(stats.suggested_next_meal_at(oslo(2024, 1, 2, 12, 0)).unwrap(), 150);
    }

    #[test]
    fn ideal_now_is_monotone_in_time_of_day() {
        let mut previous = i64::MIN;
        for hour in 0..24 {
            let stats = stats(vec![
                event("19.01.2024", "10:00", Some(600.0), false, false),
                event("20.01.2024", &format!("{hour:02}:00"), Some(10.0), false, false),
            ]);
            let ideal = stats.ideal_now().unwrap();
            assert!(ideal >= previous);
            previous = ideal;
        }
    }

    #[test]
    fn meals_today_counts_bottles_of_last_date() {
        let stats = scenario();
        assert_eq!(stats.meals_today().unwrap(), 2);
        assert_eq!(stats.dates(), vec![date("01.01.2024")]);
    }

    #[test]
    fn diaper_only_rows_are_not_meals() {
        let stats = stats(vec![
            event("21.01.2024", "07:15", Some(100.0), false, false),
            event("21.01.2024", "10:30", None, true, true),
            event("21.01.2024", "11:00", Some(110.0), false, false),
        ]);
        assert_eq!(stats.meals_today().unwrap(), 2);
        assert_eq!(stats.events_on(date("21.01.2024")).len(), 3);
    }
}
