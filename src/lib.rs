//! Varlens - design-variable usage scanner.
//!
//! Varlens scans a hierarchical document of visual design nodes for every
//! binding to a shared, named design variable and produces an aggregated
//! report: per variable, how many distinct layers reference it and which ones,
//! including their effective visibility. A companion operation focuses a host
//! UI on one layer by id.
//!
//! # Architecture
//!
//! - `document`: in-memory document snapshot; node arena and binding structures
//! - `scan`: the pipeline - node collection, alias extraction, aggregation,
//!   and the engine driving one request through its phases
//! - `resolve`: batched variable-metadata resolution over a session cache
//! - `host`: traits for the collaborators a real host environment provides
//! - `navigate`: layer focus (container switch, selection, viewport framing)
//! - `report`: wire shapes and output formatting (pretty, JSON)
//!
//! Scans are cooperative: collection, extraction, and resolution all yield to
//! the scheduler between bounded units of work, so a long scan never starves
//! the host.

pub mod cli;
pub mod document;
pub mod host;
pub mod navigate;
pub mod report;
pub mod resolve;
pub mod scan;

pub use document::{BindingValue, Document, DocumentSnapshot};
pub use host::{ContainerLoader, VariableStore, Workbench};
pub use navigate::focus_layer;
pub use report::{LayerRef, ScanFailure, UsageEntry};
pub use resolve::{VariableCache, VariableMetadata, VariableResolver, VariableType};
pub use scan::{CollectionError, ScanConfig, ScanEngine, ScanError, ScanPhase, ScanScope};
