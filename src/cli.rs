//! Command-line interface for varlens.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use crate::document::{ContainerIdx, Document, DocumentSnapshot, NodeIdx};
use crate::host::{NoDeferredContainers, SnapshotVariableStore, Workbench};
use crate::navigate;
use crate::report;
use crate::resolve::DEFAULT_FETCH_BATCH_SIZE;
use crate::scan::{ScanConfig, ScanEngine, ScanScope, DEFAULT_CHUNK_SIZE};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Design-variable usage scanner.
///
/// Varlens scans a document snapshot for every binding to a shared design
/// variable and reports, per variable, which layers reference it and how
/// often.
#[derive(Parser)]
#[command(name = "varlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a document snapshot for variable usages
    Scan(ScanArgs),
    /// Preview the navigation effects of focusing one layer
    Focus(FocusArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to a document snapshot (JSON)
    pub document: PathBuf,

    /// Scan scope: page (active container only) or file (whole document)
    #[arg(short, long, default_value = "page")]
    pub scope: String,

    /// Container id to treat as the active page
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Nodes processed between suspension points during extraction
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Metadata fetches issued concurrently per batch
    #[arg(long, default_value_t = DEFAULT_FETCH_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Arguments for the focus command.
#[derive(Parser)]
pub struct FocusArgs {
    /// Path to a document snapshot (JSON)
    pub document: PathBuf,

    /// Id of the layer to focus
    pub layer: String,
}

/// Read and parse a document snapshot from disk.
pub fn load_snapshot(path: &Path) -> anyhow::Result<DocumentSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read document {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid document snapshot {}", path.display()))
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let scope = match args.scope.as_str() {
        "page" => ScanScope::ActiveContainer,
        "file" => ScanScope::Document,
        other => {
            eprintln!("Error: invalid scope {:?}, must be 'page' or 'file'", other);
            return Ok(EXIT_ERROR);
        }
    };

    let mut snapshot = load_snapshot(&args.document)?;
    let variables = std::mem::take(&mut snapshot.variables);
    let mut doc = Document::from_snapshot(snapshot);

    if let Some(page) = &args.page {
        match doc.container_by_id(page) {
            Some(idx) => doc.set_active_container(idx),
            None => {
                eprintln!("Error: no container with id {:?} in document", page);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let config = ScanConfig {
        chunk_size: args.chunk_size,
        fetch_batch_size: args.batch_size,
    };
    let mut engine = ScanEngine::with_config(SnapshotVariableStore::new(variables), config);

    let spinner = if args.format == "pretty" {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Scanning variables...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(engine.scan(&mut doc, scope, &NoDeferredContainers));

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(entries) => {
            if args.format == "json" {
                report::write_json(&entries)?;
            } else {
                report::write_pretty(&entries);
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            if args.format == "json" {
                report::write_json_failure(&e)?;
            } else {
                report::write_pretty_failure(&e);
            }
            Ok(EXIT_FAILED)
        }
    }
}

/// Run the focus command.
///
/// A snapshot file has no live UI to drive, so the workbench prints each
/// navigation effect instead of performing it.
pub fn run_focus(args: &FocusArgs) -> anyhow::Result<i32> {
    let snapshot = load_snapshot(&args.document)?;
    let doc = Document::from_snapshot(snapshot);

    let mut workbench = PrintingWorkbench {
        doc: &doc,
        active: doc.active_container(),
    };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(navigate::focus_layer(&doc, &mut workbench, &args.layer));

    Ok(EXIT_SUCCESS)
}

struct PrintingWorkbench<'d> {
    doc: &'d Document,
    active: ContainerIdx,
}

impl Workbench for PrintingWorkbench<'_> {
    async fn node_by_id(&self, id: &str) -> Option<NodeIdx> {
        self.doc.node_by_id(id)
    }

    fn active_container(&self) -> ContainerIdx {
        self.active
    }

    async fn switch_container(&mut self, container: ContainerIdx) {
        self.active = container;
        println!("switch to container {}", self.doc.container(container).id);
    }

    fn set_selection(&mut self, node: NodeIdx) {
        println!("select layer {}", self.doc.node(node).id);
    }

    fn frame_in_viewport(&mut self, node: NodeIdx) {
        println!("frame layer {}", self.doc.node(node).id);
    }
}
