use crate::{
    client::{
        ensure_ok,
        AdminClient,
        AdminCommand,
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

/// Publishes document counts and storage sizes for every collection of every non-system database.
pub struct CollectionCollector {
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
    excluded_databases: Vec<String>,
}

impl CollectionCollector {
    pub fn new(client: Arc<dyn AdminClient>, sink: Arc<dyn MetricSink>, excluded_databases: Vec<String>) -> Self {
        Self {
            client,
            sink,
            excluded_databases,
        }
    }

    async fn gather(&self) -> Result<MetricBatch> {
        let mut batch = MetricBatch::new();

        for db in self.client.list_database_names().await? {
            if self.excluded_databases.contains(&db) {
                continue;
            }

            for collection in self.client.list_collection_names(&db).await? {
                debug!(%db, %collection, "Generating stats for collection");
                self.gather_collection(&db, &collection, &mut batch).await?;
            }
        }
        Ok(batch)
    }

    async fn gather_collection(&self, db: &str, collection: &str, batch: &mut MetricBatch) -> Result<()> {
        let command = AdminCommand::CollStats {
            collection: collection.to_string(),
        };
        let stats = self.client.run_command(db, &command).await?;
        ensure_ok(&stats, &command)?;

        let labels = [db, collection];

        batch.push(MetricPoint::new(Metric::CollectionDocCount, labels, stats.f64("count")));
        batch.push(MetricPoint::new(Metric::CollectionUncompressedBytes, labels, stats.f64("size")));
        batch.push(MetricPoint::new(Metric::CollectionDiskBytes, labels, stats.f64("totalSize")));
        batch.push(MetricPoint::new(Metric::CollectionIndexesBytes, labels, stats.f64("totalIndexSize")));

        for (shard, shard_stats) in stats.get("shards").entries() {
            let labels = [db, collection, shard];
            batch.push(MetricPoint::new(Metric::CollectionShardDocCount, labels, shard_stats.f64("count")));
            batch.push(MetricPoint::new(Metric::CollectionShardDiskBytes, labels, shard_stats.f64("totalSize")));
        }
        Ok(())
    }
}

impl Collector for CollectionCollector {
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let batch = self.gather().await?;
            debug!(points = batch.len(), "Collection stats collected");
            self.sink.publish(batch);
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "collection_stats"
    }
}
