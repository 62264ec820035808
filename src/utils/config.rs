//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Optional per-directory config file (e.g. `.rdf2nt.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Batching ----

/// Triples per output batch. Bounds the emitter's memory regardless of input size.
pub const BATCH_SIZE: usize = 10_000;

// ---- Producer/consumer channel ----

/// Triple channel sizing and stall detection.
pub struct TripleChannelConsts;

impl TripleChannelConsts {
    /// Triples buffered between parser and emitter before the parser blocks.
    pub const CAPACITY: usize = 100_000;
    /// One poll waits this long for the parser (milliseconds).
    pub const POLL_TIMEOUT_MS: u64 = 300;
    /// Consecutive empty polls before the parser is declared stalled (300 ms x 1000 = 5 min).
    pub const MAX_POLLS: usize = 1_000;
}

// ---- Archives ----

/// Sizing of the chunk queue that carries one tar member's bytes to the active job.
pub struct ArchiveConsts;

impl ArchiveConsts {
    /// Bytes per chunk read from a tar member.
    pub const CHUNK_SIZE: usize = 64 * 1024;
    /// Chunks buffered ahead of the parser.
    pub const CHUNK_QUEUE: usize = 16;
}

// ---- Traversal ----

/// Names starting with this are hidden: never converted, never descended into.
pub const HIDDEN_PREFIX: char = '.';

/// Path argument meaning "read standard input".
pub const STDIN_PATH: &str = "-";
