pub mod app;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod log;
pub mod models;
pub mod series;
pub mod source;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use log::EventLog;
pub use state::AppState;
pub use stats::TotalStats;
