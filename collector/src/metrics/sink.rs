use super::{
    Metric,
    MetricBatch,
    MetricKind,
    MetricPoint,
};
use prometheus::{
    proto::MetricFamily,
    CounterVec,
    Encoder,
    GaugeVec,
    HistogramOpts,
    HistogramVec,
    Opts,
    Registry,
    TextEncoder,
};
use std::{
    collections::HashMap,
    sync::Arc,
};
use strum::IntoEnumIterator;

/// Buckets for slow query durations, in seconds.
pub const SLOW_QUERY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

/// Accepts metric points from collectors. Implementations must tolerate concurrent callers.
pub trait MetricSink: Send + Sync {
    fn record(&self, point: &MetricPoint);

    fn publish(&self, batch: MetricBatch) {
        for point in batch.iter() {
            self.record(point);
        }
    }
}

#[derive(Clone)]
enum Recorder {
    Gauge(GaugeVec),
    Counter(CounterVec),
    Histogram(HistogramVec),
}

/// A [`MetricSink`] backed by a prometheus [`Registry`] holding the whole catalogue.
#[derive(Clone)]
pub struct PrometheusSink {
    registry: Registry,
    recorders: Arc<HashMap<Metric, Recorder>>,
}

impl PrometheusSink {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let mut recorders = HashMap::new();

        for metric in Metric::iter() {
            let recorder = match metric.kind() {
                MetricKind::Gauge => {
                    let vec = GaugeVec::new(Opts::new(metric.name(), metric.help()), metric.labels())?;
                    registry.register(Box::new(vec.clone()))?;
                    Recorder::Gauge(vec)
                }
                MetricKind::Counter | MetricKind::SettableCounter => {
                    let vec = CounterVec::new(Opts::new(metric.name(), metric.help()), metric.labels())?;
                    registry.register(Box::new(vec.clone()))?;
                    Recorder::Counter(vec)
                }
                MetricKind::Observation => {
                    let opts = HistogramOpts::new(metric.name(), metric.help()).buckets(SLOW_QUERY_BUCKETS.to_vec());
                    let vec = HistogramVec::new(opts, metric.labels())?;
                    registry.register(Box::new(vec.clone()))?;
                    Recorder::Histogram(vec)
                }
            };
            recorders.insert(metric, recorder);
        }

        Ok(Self {
            registry,
            recorders: Arc::new(recorders),
        })
    }

    /// Renders every registered series in the text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }

    /// Current value of a gauge or counter series, or the sum of an observation series.
    pub fn value(&self, metric: Metric, labels: &[&str]) -> Option<f64> {
        let family = self.family(metric)?;
        let series = find_series(&family, metric, labels)?;
        Some(match metric.kind() {
            MetricKind::Gauge => series.get_gauge().get_value(),
            MetricKind::Counter | MetricKind::SettableCounter => series.get_counter().get_value(),
            MetricKind::Observation => series.get_histogram().get_sample_sum(),
        })
    }

    pub fn observation_count(&self, metric: Metric, labels: &[&str]) -> Option<u64> {
        let family = self.family(metric)?;
        find_series(&family, metric, labels).map(|series| series.get_histogram().get_sample_count())
    }

    /// Number of distinct label sets recorded for `metric`.
    pub fn series_count(&self, metric: Metric) -> usize {
        self.family(metric)
            .map(|family| family.get_metric().len())
            .unwrap_or_default()
    }

    fn family(&self, metric: Metric) -> Option<MetricFamily> {
        self.registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == metric.name())
    }
}

fn find_series<'a>(
    family: &'a MetricFamily,
    metric: Metric,
    labels: &[&str],
) -> Option<&'a prometheus::proto::Metric> {
    family.get_metric().iter().find(|series| {
        metric.labels().iter().zip(labels).all(|(name, value)| {
            series
                .get_label()
                .iter()
                .any(|pair| pair.get_name() == *name && pair.get_value() == *value)
        })
    })
}

/// Moves a counter to a server-reported total. A decrease means the server restarted, so the
/// series is recreated at the new value.
fn set_counter(vec: &CounterVec, labels: &[&str], value: f64) -> prometheus::Result<()> {
    let counter = vec.get_metric_with_label_values(labels)?;
    let current = counter.get();
    if value >= current {
        counter.inc_by(value - current);
        return Ok(());
    }
    vec.remove_label_values(labels)?;
    vec.get_metric_with_label_values(labels)?.inc_by(value);
    Ok(())
}

impl MetricSink for PrometheusSink {
    fn record(&self, point: &MetricPoint) {
        let Some(recorder) = self.recorders.get(&point.metric) else {
            return;
        };
        let name = point.metric.name();

        if point.value.is_nan() {
            warn!(metric = name, "Dropping NaN metric point");
            return;
        }
        if matches!(recorder, Recorder::Counter(_)) && point.value < 0.0 {
            warn!(metric = name, value = point.value, "Dropping negative counter value");
            return;
        }

        let labels: Vec<&str> = point.labels.iter().map(String::as_str).collect();
        let outcome = match recorder {
            Recorder::Gauge(vec) => vec
                .get_metric_with_label_values(&labels)
                .map(|gauge| gauge.set(point.value)),
            Recorder::Counter(vec) if point.kind() == MetricKind::SettableCounter => {
                set_counter(vec, &labels, point.value)
            }
            Recorder::Counter(vec) => vec
                .get_metric_with_label_values(&labels)
                .map(|counter| counter.inc_by(point.value)),
            Recorder::Histogram(vec) => vec
                .get_metric_with_label_values(&labels)
                .map(|histogram| histogram.observe(point.value)),
        };

        if let Err(err) = outcome {
            warn!(metric = name, %err, "Dropping metric point");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registers_the_whole_catalogue() {
        let sink = PrometheusSink::new().unwrap();
        for metric in Metric::iter() {
            assert_eq!(sink.series_count(metric), 0, "{}", metric.name());
        }
        assert_eq!(Metric::iter().count(), 17);
    }

    #[test]
    fn gauges_keep_the_last_value() {
        let sink = PrometheusSink::new().unwrap();
        sink.record(&MetricPoint::new(Metric::DatabaseDiskBytes, ["sales"], 100.0));
        sink.record(&MetricPoint::new(Metric::DatabaseDiskBytes, ["sales"], 80.0));
        sink.record(&MetricPoint::new(Metric::DatabaseDiskBytes, ["hr"], -1.0));
        assert_eq!(sink.value(Metric::DatabaseDiskBytes, &["sales"]), Some(80.0));
        assert_eq!(sink.value(Metric::DatabaseDiskBytes, &["hr"]), Some(-1.0));
        assert_eq!(sink.series_count(Metric::DatabaseDiskBytes), 2);
    }

    #[test]
    fn counters_accumulate_increments() {
        let sink = PrometheusSink::new().unwrap();
        let labels = ["I", "NETWORK"];
        sink.record(&MetricPoint::increment(Metric::LogTotal, labels));
        sink.record(&MetricPoint::increment(Metric::LogTotal, labels));
        sink.record(&MetricPoint::new(Metric::LogTotal, labels, -3.0));
        assert_eq!(sink.value(Metric::LogTotal, &labels), Some(2.0));
    }

    #[test]
    fn settable_counters_follow_the_server_total() {
        let sink = PrometheusSink::new().unwrap();
        let labels = ["db-0:27017", "insert"];
        sink.record(&MetricPoint::new(Metric::OpcountersTotal, labels, 10.0));
        sink.record(&MetricPoint::new(Metric::OpcountersTotal, labels, 25.0));
        assert_eq!(sink.value(Metric::OpcountersTotal, &labels), Some(25.0));

        sink.record(&MetricPoint::new(Metric::OpcountersTotal, labels, 4.0));
        assert_eq!(sink.value(Metric::OpcountersTotal, &labels), Some(4.0));
    }

    #[test]
    fn observations_build_a_distribution() {
        let sink = PrometheusSink::new().unwrap();
        let labels = ["I", "COMMAND", "sales", "sales.orders", "find"];
        sink.record(&MetricPoint::new(Metric::LogSlowQuerySeconds, labels, 0.25));
        sink.record(&MetricPoint::new(Metric::LogSlowQuerySeconds, labels, 1.5));
        assert_eq!(sink.observation_count(Metric::LogSlowQuerySeconds, &labels), Some(2));
        assert_eq!(sink.value(Metric::LogSlowQuerySeconds, &labels), Some(1.75));
    }

    #[test]
    fn label_arity_mismatch_is_dropped() {
        let sink = PrometheusSink::new().unwrap();
        sink.record(&MetricPoint::new(Metric::Connections, ["only-host"], 3.0));
        assert_eq!(sink.series_count(Metric::Connections), 0);
    }

    #[test]
    fn publish_records_every_point() {
        let sink = PrometheusSink::new().unwrap();
        let mut batch = MetricBatch::new();
        batch.push(MetricPoint::new(Metric::Connections, ["db-0", "current"], 5.0));
        batch.push(MetricPoint::new(Metric::Connections, ["db-0", "available"], 95.0));
        sink.publish(batch);
        assert_eq!(sink.value(Metric::Connections, &["db-0", "current"]), Some(5.0));
        assert_eq!(sink.value(Metric::Connections, &["db-0", "available"]), Some(95.0));
    }

    #[test]
    fn encodes_text_exposition() {
        let sink = PrometheusSink::new().unwrap();
        sink.record(&MetricPoint::new(Metric::CollectionDocCount, ["sales", "orders"], 42.0));
        let text = sink.encode().unwrap();
        assert!(text.contains("# HELP mongo_collection_doc_count Collection document count"));
        assert!(text.contains("# TYPE mongo_collection_doc_count gauge"));
        assert!(text.contains(r#"mongo_collection_doc_count{collection="orders",db="sales"} 42"#));
    }
}
