use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;
use strum::Display;

/// The polling responsibilities the exporter knows how to schedule.
#[derive(Debug, Clone, Copy, Display, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    /// Classifies new entries of the server's `getLog` buffer.
    Logs,
    /// Disk usage per database from `listDatabases`.
    Databases,
    /// Host, connection and operation counters from `serverStatus`.
    ServerStatus,
    /// Per-collection sizes from `collStats`.
    CollectionStats,
}

/// Cadence of one task: every pass waits a random interval in `[min_interval, max_interval]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchedule {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub run_immediately: bool,
}

impl TaskSchedule {
    pub fn new(min_interval: Duration, max_interval: Duration, run_immediately: bool) -> Self {
        Self {
            min_interval,
            max_interval,
            run_immediately,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskConfig {
    pub task: TaskKind,
    #[serde(with = "humantime_serde")]
    pub min_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub max_interval: Duration,
    #[serde(default)]
    pub run_immediately: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TaskConfig {
    pub fn schedule(&self) -> TaskSchedule {
        TaskSchedule::new(self.min_interval, self.max_interval, self.run_immediately)
    }
}
