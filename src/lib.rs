#[macro_use]
extern crate tracing;

mod app;
mod logging;
mod redact;

pub use app::App;
pub use logging::{
    init_errors,
    init_logging,
};
pub use mongo_exporter_config::Args;
pub use redact::redact_url;
