use crate::{
    client::AdminClient,
    collectors::{
        CollectionCollector,
        Collector,
        DatabaseCollector,
        ServerCollector,
    },
    logs::LogCollector,
    metrics::MetricSink,
    scheduler::ScheduledTask,
};
use mongo_exporter_config::{
    Config,
    TaskKind,
};
use std::sync::Arc;

/// Builds the collector behind a task kind. All collectors share one client and one sink.
pub fn collector_for(
    kind: TaskKind,
    config: &Config,
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
) -> Box<dyn Collector> {
    match kind {
        TaskKind::Logs => Box::new(LogCollector::new(client, sink, config.log_messages.clone())),
        TaskKind::Databases => Box::new(DatabaseCollector::new(client, sink, config.excluded_databases.clone())),
        TaskKind::ServerStatus => Box::new(ServerCollector::new(client, sink)),
        TaskKind::CollectionStats => Box::new(CollectionCollector::new(
            client,
            sink,
            config.excluded_databases.clone(),
        )),
    }
}

/// The enabled tasks, in configured order.
pub fn scheduled_tasks(
    config: &Config,
    client: Arc<dyn AdminClient>,
    sink: Arc<dyn MetricSink>,
) -> Vec<ScheduledTask> {
    config
        .enabled_tasks()
        .map(|task| {
            let collector = collector_for(task.task, config, client.clone(), sink.clone());
            ScheduledTask::new(task.schedule(), collector)
        })
        .collect()
}
