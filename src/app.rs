use crate::redact_url;
use color_eyre::Result;
use mongo_exporter_collector::{
    tasks::scheduled_tasks,
    AdminClient,
    MetricSink,
    MongoAdminClient,
    PrometheusSink,
    Scheduler,
};
use mongo_exporter_config::{
    Args,
    Config,
};
use mongo_exporter_http::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub struct App {
    config: Config,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::new(args)?;
        config.validate()?;
        Ok(Self { config })
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config;

        info!(url = %redact_url(&config.mongodb_url), "Connecting to MongoDB");
        let client = MongoAdminClient::connect(&config.mongodb_url, config.connect_timeout).await?;
        info!("Connected to MongoDB");

        let sink = PrometheusSink::new()?;
        let cancel = CancellationToken::new();
        let listener = TcpListener::bind(config.listen_address).await?;

        let mut scheduler = Scheduler::new(cancel.clone(), config.startup_stagger);
        let client: Arc<dyn AdminClient> = Arc::new(client);
        let shared_sink: Arc<dyn MetricSink> = Arc::new(sink.clone());
        for task in scheduled_tasks(&config, client, shared_sink) {
            scheduler.register(task);
        }
        info!(tasks = scheduler.len(), stagger = ?config.startup_stagger, "Starting collectors");
        let collectors = scheduler.start();

        info!(address = %config.listen_address, path = %config.metrics_path, "Serving metrics");

        tokio::spawn(shutdown_signal(cancel.clone()));
        let shutdown = cancel.clone();
        let served = axum::serve(listener, create_router(sink, &config.metrics_path))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

        cancel.cancel();
        collectors.await?;
        served?;
        info!("Stopped");
        Ok(())
    }
}

/// Cancels `cancel` on Ctrl-C or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(%err, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested");
    cancel.cancel();
}
