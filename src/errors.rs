use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    Date,
    Time,
}

impl fmt::Display for ParseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseKind::Date => f.write_str("date (expected DD.MM.YYYY)"),
            ParseKind::Time => f.write_str("time (expected HH:MM)"),
        }
    }
}

/// A date or time string that does not match the log's format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {input:?}")]
pub struct ParseError {
    pub kind: ParseKind,
    pub input: String,
}

impl ParseError {
    pub fn date(input: &str) -> Self {
        Self {
            kind: ParseKind::Date,
            input: input.to_string(),
        }
    }

    pub fn time(input: &str) -> Self {
        Self {
            kind: ParseKind::Time,
            input: input.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("the feeding log is empty")]
    EmptyLog,

    #[error("no {0} found in the feeding log")]
    NotFound(&'static str),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch log: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("log is missing the {0:?} column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),

    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Parse(_) => Self::bad_request(err.to_string()),
            StatsError::EmptyLog | StatsError::NotFound(_) => Self::not_found(err.to_string()),
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        error!("failed to load feeding log: {err}");
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
