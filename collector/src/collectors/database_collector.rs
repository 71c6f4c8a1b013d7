use crate::{
    client::{
        ensure_ok,
        AdminClient,
        AdminCommand,
        ADMIN_DATABASE,
    },
    collectors::Collector,
    error::Result,
    metrics::{
        Metric,
        MetricBatch,
        MetricPoint,
        MetricSink,
    },
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};

/// Publishes on-disk size per database, with a per-shard breakdown on sharded clusters.
pub struct DatabaseCollector {
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
    excluded_databases: Vec<String>,
}

impl DatabaseCollector {
    pub fn new(client: Arc<dyn AdminClient>, sink: Arc<dyn MetricSink>, excluded_databases: Vec<String>) -> Self {
        Self {
            client,
            sink,
            excluded_databases,
        }
    }

    async fn gather(&self) -> Result<MetricBatch> {
        let command = AdminCommand::ListDatabases;
        let response = self.client.run_command(ADMIN_DATABASE, &command).await?;
        ensure_ok(&response, &command)?;

        let mut batch = MetricBatch::new();
        for database in response.get("databases").items() {
            let name = database.string("name");
            if self.excluded_databases.contains(&name) {
                continue;
            }

            batch.push(MetricPoint::new(
                Metric::DatabaseDiskBytes,
                [name.as_str()],
                database.f64("sizeOnDisk"),
            ));
            for (shard, size) in database.get("shards").entries() {
                batch.push(MetricPoint::new(
                    Metric::DatabaseShardDiskBytes,
                    [name.as_str(), shard],
                    size.number(),
                ));
            }
        }
        Ok(batch)
    }
}

impl Collector for DatabaseCollector {
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let batch = self.gather().await?;
            debug!(points = batch.len(), "Database sizes collected");
            self.sink.publish(batch);
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "databases"
    }
}
