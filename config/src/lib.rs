#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod log_messages;
mod tasks;

pub use app_config::get_config_dir;
pub use args::Args;
use eyre::{
    bail,
    Result,
};
pub use log_messages::LogMessageCatalog;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::HashSet,
    net::SocketAddr,
    time::Duration,
};
pub use tasks::{
    TaskConfig,
    TaskKind,
    TaskSchedule,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub mongodb_url: String,
    pub listen_address: SocketAddr,
    pub metrics_path: String,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub startup_stagger: Duration,
    #[serde(default)]
    pub excluded_databases: Vec<String>,
    pub tasks: Vec<TaskConfig>,
    #[serde(default)]
    pub log_messages: LogMessageCatalog,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");
const ENV_PREFIX: &str = "MONGO_EXPORTER";
/// Reserved for the health check.
pub const HEALTH_PATH: &str = "/healthz";

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the built-in defaults, the config directory's `config.yaml`, the `--config` file,
    /// `MONGO_EXPORTER_*` environment variables and the command-line arguments.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(
                config::File::from(config_dir.join("config.yaml"))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );

        if let Some(path) = &args.config {
            debug!(?path, "Reading configuration file");
            builder = builder.add_source(config::File::from(path.clone()).format(config::FileFormat::Yaml));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .add_source(args);

        builder.build()?.try_deserialize()
    }

    /// Rejects configurations the exporter cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.mongodb_url.trim().is_empty() {
            bail!("mongodb_url is required");
        }
        if self.metrics_path.is_empty() || !self.metrics_path.starts_with('/') {
            bail!("metrics_path must start with '/', got {:?}", self.metrics_path);
        }
        if self.metrics_path == HEALTH_PATH {
            bail!("metrics_path cannot be {HEALTH_PATH}");
        }
        if self.enabled_tasks().next().is_none() {
            bail!("at least one task must be enabled");
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.task) {
                bail!("task {} is configured more than once", task.task);
            }
            if task.max_interval.is_zero() {
                bail!("task {}: max_interval must be greater than zero", task.task);
            }
            if task.min_interval > task.max_interval {
                bail!(
                    "task {}: min_interval ({:?}) is greater than max_interval ({:?})",
                    task.task,
                    task.min_interval,
                    task.max_interval
                );
            }
        }
        Ok(())
    }

    /// Enabled tasks in registration order.
    pub fn enabled_tasks(&self) -> impl Iterator<Item = &TaskConfig> {
        self.tasks.iter().filter(|task| task.enabled)
    }
}
