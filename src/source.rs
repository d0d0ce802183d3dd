use crate::errors::LoadError;
use crate::log::EventLog;
use reqwest::Client;
use std::{fmt, path::PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Where the spreadsheet export is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Remote(String),
    File(PathBuf),
}

impl LogSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            LogSource::Remote(value.to_string())
        } else {
            LogSource::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Remote(url) => f.write_str(url),
            LogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches a fresh snapshot of the log. Nothing is cached between calls.
pub async fn fetch_log(client: &Client, source: &LogSource) -> Result<EventLog, LoadError> {
    let body = match source {
        LogSource::Remote(url) => {
            debug!(%url, "downloading feeding log");
            client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?
        }
        LogSource::File(path) => fs::read_to_string(path).await?,
    };

    let log = EventLog::from_csv(body.as_bytes())?;
    info!(source = %source, events = log.len(), issues = log.issues().len(), "loaded feeding log");
    Ok(log)
}
