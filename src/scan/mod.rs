//! The scan pipeline: collection, alias extraction, aggregation.

mod aggregate;
mod collect;
mod engine;
mod extract;
mod visibility;

pub use aggregate::{aggregate_usage, UNNAMED_LAYER};
pub use collect::{collect_bound_nodes, CollectionError, ScanScope};
pub use engine::{ScanConfig, ScanEngine, ScanError, ScanPhase, DEFAULT_CHUNK_SIZE};
pub use extract::extract_aliases;
pub use visibility::effective_visibility;
