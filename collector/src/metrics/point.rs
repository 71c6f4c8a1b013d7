use super::{
    Metric,
    MetricKind,
};

/// One value for one labeled series. Label values are in the order of [`Metric::labels`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub metric: Metric,
    pub labels: Vec<String>,
    pub value: f64,
}

impl MetricPoint {
    pub fn new<I, S>(metric: Metric, labels: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metric,
            labels: labels.into_iter().map(Into::into).collect(),
            value,
        }
    }

    /// A counter increment of one.
    pub fn increment<I, S>(metric: Metric, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(metric, labels, 1.0)
    }

    pub fn kind(&self) -> MetricKind {
        self.metric.kind()
    }
}

/// Points gathered during one pass, published together once the pass succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricBatch {
    points: Vec<MetricPoint>,
}

impl MetricBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: MetricPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricPoint> {
        self.points.iter()
    }
}

impl Extend<MetricPoint> for MetricBatch {
    fn extend<T: IntoIterator<Item = MetricPoint>>(&mut self, iter: T) {
        self.points.extend(iter);
    }
}

impl IntoIterator for MetricBatch {
    type Item = MetricPoint;
    type IntoIter = std::vec::IntoIter<MetricPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
