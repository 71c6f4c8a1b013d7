use super::{
    LogClassifier,
    LogRecord,
    Watermark,
};
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
        MetricBatch,
        MetricSink,
    },
};
use mongo_exporter_config::LogMessageCatalog;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};

/// Tails the server's global log buffer and counts every record exactly once.
pub struct LogCollector {
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
    classifier: LogClassifier,
    watermark: Watermark,
}

impl LogCollector {
    pub fn new(client: Arc<dyn AdminClient>, sink: Arc<dyn MetricSink>, catalog: LogMessageCatalog) -> Self {
        Self {
            client,
            sink,
            classifier: LogClassifier::new(catalog),
            watermark: Watermark::new(),
        }
    }

    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }

    async fn gather(&self) -> Result<(MetricBatch, Watermark)> {
        let command = AdminCommand::GetLog;
        let response = self.client.run_command(ADMIN_DATABASE, &command).await?;
        ensure_ok(&response, &command)?;

        let mut batch = MetricBatch::new();
        let mut watermark = self.watermark.clone();
        let mut already_counted = 0usize;

        for entry in response.get("log").items() {
            let record = match LogRecord::from_node(entry) {
                Ok(record) => record,
                Err(err) => {
                    warn!(%err, "Skipping unreadable log entry");
                    continue;
                }
            };
            if watermark.covers(&record.timestamp) {
                already_counted += 1;
                continue;
            }
            batch.extend(self.classifier.points(&record));
            watermark.advance(&record.timestamp);
        }

        debug!(already_counted, watermark = ?watermark.get(), "Log buffer scanned");
        Ok((batch, watermark))
    }
}

impl Collector for LogCollector {
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let (batch, watermark) = self.gather().await?;
            self.sink.publish(batch);
            self.watermark = watermark;
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "logs"
    }
}
