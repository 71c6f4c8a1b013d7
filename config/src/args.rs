use clap::Parser;
use std::{
    net::SocketAddr,
    path::PathBuf,
};

/// MongoDB Prometheus exporter
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// MongoDB URL in the format `mongodb://[user:pass@]host:port[/db]`.
    #[arg(long, env = "MONGODB_URL")]
    pub mongodb_url: Option<String>,

    /// Address the metrics endpoint listens on.
    #[arg(long, env = "MONGO_EXPORTER_LISTEN_ADDRESS")]
    pub listen_address: Option<SocketAddr>,

    /// HTTP path of the metrics endpoint.
    #[arg(long)]
    pub metrics_path: Option<String>,

    /// Additional configuration file (yaml). Takes precedence over the one in the config directory.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl config::Source for Args {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = config::Map::<String, config::Value>::new();
        if let Some(url) = &self.mongodb_url {
            cache.insert("mongodb_url".to_string(), url.clone().into());
        }
        if let Some(address) = &self.listen_address {
            cache.insert("listen_address".to_string(), address.to_string().into());
        }
        if let Some(path) = &self.metrics_path {
            cache.insert("metrics_path".to_string(), path.clone().into());
        }
        Ok(cache)
    }
}
