use strum::EnumIter;

/// How a metric's values combine over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Last write wins.
    Gauge,
    /// Monotonic total, incremented by each point's value.
    Counter,
    /// Monotonic total reported by the server; each point carries the new total.
    SettableCounter,
    /// Each point is one measurement in a distribution.
    Observation,
}

/// Every metric the exporter publishes. Label sets are fixed per metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Metric {
    CollectionDocCount,
    CollectionUncompressedBytes,
    CollectionDiskBytes,
    CollectionIndexesBytes,
    CollectionShardDocCount,
    CollectionShardDiskBytes,
    DatabaseDiskBytes,
    DatabaseShardDiskBytes,
    ServerUptimeSeconds,
    Connections,
    NetworkRequestsTotal,
    OpcountersTotal,
    LogTotal,
    LogConnectionTotal,
    LogAuthenticationTotal,
    LogClientMetadataTotal,
    LogSlowQuerySeconds,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::CollectionDocCount => "mongo_collection_doc_count",
            Metric::CollectionUncompressedBytes => "mongo_collection_uncompressed_bytes",
            Metric::CollectionDiskBytes => "mongo_collection_disk_bytes",
            Metric::CollectionIndexesBytes => "mongo_collection_indexes_bytes",
            Metric::CollectionShardDocCount => "mongo_collection_shard_doc_count",
            Metric::CollectionShardDiskBytes => "mongo_collection_shard_disk_bytes",
            Metric::DatabaseDiskBytes => "mongo_database_disk_bytes",
            Metric::DatabaseShardDiskBytes => "mongo_database_shard_disk_bytes",
            Metric::ServerUptimeSeconds => "mongo_server_uptime_seconds",
            Metric::Connections => "mongo_connections",
            Metric::NetworkRequestsTotal => "mongo_network_requests_total",
            Metric::OpcountersTotal => "mongo_opcounters_total",
            Metric::LogTotal => "mongo_log_total",
            Metric::LogConnectionTotal => "mongo_log_connection_total",
            Metric::LogAuthenticationTotal => "mongo_log_authentication_total",
            Metric::LogClientMetadataTotal => "mongo_log_client_metadata_total",
            Metric::LogSlowQuerySeconds => "mongo_log_slowquery_seconds",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Metric::CollectionDocCount => "Collection document count",
            Metric::CollectionUncompressedBytes => "Collection document sizes uncompressed in bytes",
            Metric::CollectionDiskBytes => "Collection total disk storage size (documents + indexes) in bytes",
            Metric::CollectionIndexesBytes => "Collection total index size in bytes",
            Metric::CollectionShardDocCount => "Collection document count per shard",
            Metric::CollectionShardDiskBytes => "Collection total storage per shard",
            Metric::DatabaseDiskBytes => "Size of database in disk in bytes",
            Metric::DatabaseShardDiskBytes => "Size of database shard in disk in bytes",
            Metric::ServerUptimeSeconds => "Basic server info and uptime in seconds",
            Metric::Connections => "Number of connections on server",
            Metric::NetworkRequestsTotal => "Number of network requests processed",
            Metric::OpcountersTotal => "Number of operations executed by op type",
            Metric::LogTotal => "Number of log messages",
            Metric::LogConnectionTotal => "Number of log messages about connections",
            Metric::LogAuthenticationTotal => "Number of log messages about authentication",
            Metric::LogClientMetadataTotal => "Number of log messages about client metadata",
            Metric::LogSlowQuerySeconds => "Duration of slow queries reported in the server log",
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Metric::CollectionDocCount
            | Metric::CollectionUncompressedBytes
            | Metric::CollectionDiskBytes
            | Metric::CollectionIndexesBytes => &["db", "collection"],
            Metric::CollectionShardDocCount | Metric::CollectionShardDiskBytes => &["db", "collection", "shard"],
            Metric::DatabaseDiskBytes => &["db"],
            Metric::DatabaseShardDiskBytes => &["db", "shard"],
            Metric::ServerUptimeSeconds => &["host", "version", "process"],
            Metric::Connections => &["host", "type"],
            Metric::NetworkRequestsTotal => &["host"],
            Metric::OpcountersTotal => &["host", "type"],
            Metric::LogTotal => &["level", "component"],
            Metric::LogConnectionTotal => &["level", "component", "state"],
            Metric::LogAuthenticationTotal => &["level", "component", "state", "mechanism", "db", "principal", "remote"],
            Metric::LogClientMetadataTotal => &["level", "component", "remote", "driver"],
            Metric::LogSlowQuerySeconds => &["level", "component", "db", "collection", "command"],
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::ServerUptimeSeconds | Metric::NetworkRequestsTotal | Metric::OpcountersTotal => {
                MetricKind::SettableCounter
            }
            Metric::LogTotal
            | Metric::LogConnectionTotal
            | Metric::LogAuthenticationTotal
            | Metric::LogClientMetadataTotal => MetricKind::Counter,
            Metric::LogSlowQuerySeconds => MetricKind::Observation,
            _ => MetricKind::Gauge,
        }
    }
}
