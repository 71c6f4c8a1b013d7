//! Classification of the server's structured log buffer (`getLog: "global"`).

mod classifier;
mod log_collector;
mod record;
mod watermark;

pub use classifier::{
    parse_remote,
    AuthenticationState,
    ConnectionState,
    LogClassifier,
    LogEvent,
};
pub use log_collector::LogCollector;
pub use record::LogRecord;
pub use watermark::Watermark;
