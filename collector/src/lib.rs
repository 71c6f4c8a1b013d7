//! # MongoDB collector
//!
//! Periodically polls a MongoDB deployment through administrative commands and turns the replies
//! into Prometheus metrics.
//!
//! ## Architecture
//!
//! - **`document`**: dotted-path access to decoded replies, with numeric coercion and fallbacks
//! - **`metrics`**: the metric catalogue and the [`MetricSink`](metrics::MetricSink) collectors write to
//! - **`client`**: the [`AdminClient`](client::AdminClient) seam over the MongoDB driver
//! - **`collectors`**: database, collection and server status collectors
//! - **`logs`**: log record decoding, classification and the watermark that keeps counts exact
//! - **`scheduler`**: jittered, non-overlapping task loops with a startup stagger
//! - **`tasks`**: maps configured task kinds to collectors

#[macro_use]
extern crate tracing;

pub mod client;
pub mod collectors;
pub mod document;
pub mod error;
pub mod logs;
pub mod metrics;
pub mod scheduler;
pub mod tasks;
#[cfg(test)]
pub(crate) mod test_logs;

pub use client::{
    AdminClient,
    AdminCommand,
    MongoAdminClient,
};
pub use document::{
    Document,
    Node,
    SENTINEL,
};
pub use error::{
    Error,
    ParseError,
    Result,
};
pub use metrics::{
    Metric,
    MetricSink,
    PrometheusSink,
};
pub use scheduler::{
    start_task,
    ScheduledTask,
    Scheduler,
};
