//! Reads the spreadsheet export into validated [`FeedingEvent`]s.

use crate::dates::{parse_date, parse_time};
use crate::errors::LoadError;
use crate::models::{FeedingEvent, RawRow, RowIssue};
use std::io::Read;
use tracing::{debug, warn};

const STOOL_MARKER: &str = "A";
const URINE_MARKER: &str = "U";

/// One snapshot of the feeding log, in original row order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FeedingEvent>,
    issues: Vec<RowIssue>,
}

impl EventLog {
    pub fn new(events: Vec<FeedingEvent>) -> Self {
        Self {
            events,
            issues: Vec::new(),
        }
    }

    pub fn from_csv<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["Dato", "Tid"] {
            if !headers.iter().any(|h| h == required) {
                return Err(LoadError::MissingColumn(required));
            }
        }

        let mut log = EventLog::default();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let raw: RawRow = record.deserialize(Some(&headers))?;
            if let Some(event) = validate_row(line, raw, &mut log.issues) {
                log.events.push(event);
            }
        }

        debug!(
            events = log.events.len(),
            issues = log.issues.len(),
            "parsed feeding log"
        );
        Ok(log)
    }

    pub fn events(&self) -> &[FeedingEvent] {
        &self.events
    }

    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn validate_row(line: u64, raw: RawRow, issues: &mut Vec<RowIssue>) -> Option<FeedingEvent> {
    let is_blank = [&raw.date, &raw.time, &raw.volume, &raw.stool, &raw.urine, &raw.note]
        .iter()
        .all(|field| field.is_empty());
    if is_blank {
        return None;
    }

    let date = match parse_date(&raw.date) {
        Ok(date) => date,
        Err(err) => {
            warn!(line, "rejecting row: {err}");
            issues.push(issue(line, "Dato", &raw.date, true));
            return None;
        }
    };
    let time = match parse_time(&raw.time) {
        Ok(time) => time,
        Err(err) => {
            warn!(line, "rejecting row: {err}");
            issues.push(issue(line, "Tid", &raw.time, true));
            return None;
        }
    };

    let volume_ml = match parse_volume(&raw.volume) {
        Some(volume) => volume,
        None => {
            warn!(line, value = %raw.volume, "ignoring unusable volume");
            issues.push(issue(line, "Flaske", &raw.volume, false));
            None
        }
    };

    Some(FeedingEvent {
        date,
        time,
        volume_ml,
        has_stool: raw.stool.eq_ignore_ascii_case(STOOL_MARKER),
        has_urine: raw.urine.eq_ignore_ascii_case(URINE_MARKER),
        note: raw.note,
    })
}

/// `Some(None)` for a blank cell, `None` when the cell holds something unusable.
fn parse_volume(value: &str) -> Option<Option<f64>> {
    if value.is_empty() {
        return Some(None);
    }
    match value.replace(',', ".").parse::<f64>() {
        Ok(volume) if volume.is_finite() && volume >= 0.0 => Some(Some(volume)),
        _ => None,
    }
}

fn issue(line: u64, field: &'static str, value: &str, rejected: bool) -> RowIssue {
    RowIssue {
        line,
        field,
        value: value.to_string(),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
Dato,Tid,Flaske,Avføring,Urin,Notat
01.01.2024,08:00,100,,,
01.01.2024,10:00,50,A,,
01.01.2024,12:00,,,U,sleepy
";

    #[test]
    fn parses_spreadsheet_export() {
        let log = EventLog::from_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(log.len(), 3);
        assert!(log.issues().is_empty());

        let events = log.events();
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(events[0].volume_ml, Some(100.0));
        assert!(events[1].has_stool);
        assert!(!events[1].has_urine);
        assert_eq!(events[2].volume_ml, None);
        assert!(events[2].has_urine);
        assert_eq!(events[2].note, "sleepy");
    }

    #[test]
    fn coerces_bad_volume_and_flags_it() {
        let csv = "Dato,Tid,Flaske\n02.01.2024,09:15,lots\n02.01.2024,11:00,-20\n";
        let log = EventLog::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.events().iter().all(|e| e.volume_ml.is_none()));
        assert_eq!(log.issues().len(), 2);
        assert_eq!(log.issues()[0].field, "Flaske");
        assert_eq!(log.issues()[0].line, 2);
        assert!(!log.issues()[0].rejected);
    }

    #[test]
    fn rejects_rows_with_bad_date_or_time() {
        let csv = "Dato,Tid,Flaske\n2024-01-02,09:15,80\n02.01.2024,noon,80\n02.01.2024,13:00,80\n";
        let log = EventLog::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(log.len(), 1);
        let fields: Vec<_> = log.issues().iter().map(|i| (i.field, i.rejected)).collect();
        assert_eq!(fields, vec![("Dato", true), ("Tid", true)]);
    }

    #[test]
    fn skips_blank_padding_rows() {
        let csv = "Dato,Tid,Flaske,Avføring,Urin,Notat\n03.01.2024,07:00,90,,,\n,,,,,\n";
        let log = EventLog::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.issues().is_empty());
    }

    #[test]
    fn accepts_decimal_comma_and_lowercase_markers() {
        let csv = "Dato,Tid,Flaske,Avføring,Urin\n04.01.2024,07:00,\"47,5\",a,u\n";
        let log = EventLog::from_csv(csv.as_bytes()).unwrap();
        let event = &log.events()[0];
        assert_eq!(event.volume_ml, Some(47.5));
        assert!(event.has_stool && event.has_urine);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = EventLog::from_csv("Dato,Flaske\n01.01.2024,10\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Tid")));
    }
}
