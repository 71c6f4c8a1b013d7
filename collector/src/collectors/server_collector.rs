use crate::{
    client::{
        ensure_ok,
        AdminClient,
        AdminCommand,
        ADMIN_DATABASE,
    },
    collectors::Collector,
    document::Document,
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

/// Publishes identity, uptime, connection counts, request and operation totals from `serverStatus`.
pub struct ServerCollector {
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
}

impl ServerCollector {
    pub fn new(client: Arc<dyn AdminClient>, sink: Arc<dyn MetricSink>) -> Self {
        Self { client, sink }
    }

    async fn gather(&self) -> Result<MetricBatch> {
        let command = AdminCommand::ServerStatus;
        let status = self.client.run_command(ADMIN_DATABASE, &command).await?;
        ensure_ok(&status, &command)?;
        Ok(server_points(&status))
    }
}

fn server_points(status: &Document) -> MetricBatch {
    let host = status.label("host");
    let mut batch = MetricBatch::new();

    batch.push(MetricPoint::new(
        Metric::ServerUptimeSeconds,
        [host.clone(), status.string("version"), status.string("process")],
        status.f64("uptime"),
    ));

    for (kind, count) in status.get("connections").entries() {
        batch.push(MetricPoint::new(Metric::Connections, [host.as_str(), kind], count.number()));
    }

    batch.push(MetricPoint::new(
        Metric::NetworkRequestsTotal,
        [host.as_str()],
        status.f64("network.numRequests"),
    ));

    for (operation, total) in status.get("opcounters").entries() {
        batch.push(MetricPoint::new(Metric::OpcountersTotal, [host.as_str(), operation], total.number()));
    }

    batch
}

impl Collector for ServerCollector {
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let batch = self.gather().await?;
            debug!(points = batch.len(), "Server status collected");
            self.sink.publish(batch);
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "server_status"
    }
}
