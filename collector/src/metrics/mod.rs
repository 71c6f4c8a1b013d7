mod catalogue;
mod point;
mod sink;

pub use catalogue::{
    Metric,
    MetricKind,
};
pub use point::{
    MetricBatch,
    MetricPoint,
};
pub use sink::{
    MetricSink,
    PrometheusSink,
    SLOW_QUERY_BUCKETS,
};
