use crate::error::Result;
use std::{
    future::Future,
    pin::Pin,
};

/// One unit of scheduled work: a single pass over a data source.
pub trait Collector: Send {
    /// Runs one pass. Metric points are published only when the whole pass succeeds.
    fn collect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
