pub mod error;
pub mod router;

pub use router::create_router;
