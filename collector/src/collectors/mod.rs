//! # Collectors
//!
//! Each collector issues administrative commands through an [`AdminClient`](crate::client::AdminClient),
//! checks the `ok` indicator and turns the response into metric points. A pass either publishes
//! everything it gathered or, on the first command failure, nothing at all.

pub mod collection_collector;
pub mod collector;
pub mod database_collector;
pub mod server_collector;

pub use collection_collector::CollectionCollector;
pub use collector::Collector;
pub use database_collector::DatabaseCollector;
pub use server_collector::ServerCollector;
