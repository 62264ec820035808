//! Public and internal types for the rdf2nt API and pipeline.

use std::fmt;
use std::io::Read;

use crate::utils::config::{BATCH_SIZE, TripleChannelConsts};

/// One graph statement. Treated as an opaque 3-tuple; duplicates pass through untouched.
pub use oxrdf::Triple;

/// Input notations recognized by extension. Not every notation has a bundled decoder
/// (see [`RdfDecoder`](crate::engine::decoder::RdfDecoder)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notation {
    Turtle,
    NTriples,
    NQuads,
    TriG,
    N3,
    RdfXml,
    JsonLd,
    TriX,
    RdfJson,
}

impl Notation {
    /// Human-readable notation name (used in diagnostics).
    pub fn name(&self) -> &'static str {
        match self {
            Notation::Turtle => "Turtle",
            Notation::NTriples => "N-Triples",
            Notation::NQuads => "N-Quads",
            Notation::TriG => "TriG",
            Notation::N3 => "N3",
            Notation::RdfXml => "RDF/XML",
            Notation::JsonLd => "JSON-LD",
            Notation::TriX => "TriX",
            Notation::RdfJson => "RDF/JSON",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression layer around a byte stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Xz => "xz",
        }
    }
}

/// Whether an input unit is a graph file or a container that must be walked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Container {
    #[default]
    Plain,
    Tar,
}

/// Routing metadata for one input unit. Computed once by the resolver; never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Name used in diagnostics (path or archive member name).
    pub display_name: String,
    /// Target notation, or `None` when the extension is unknown or missing.
    pub notation: Option<Notation>,
    /// Codecs to apply, outermost first.
    pub compression: Vec<Compression>,
    pub container: Container,
}

impl SourceDescriptor {
    pub fn is_archive(&self) -> bool {
        self.container == Container::Tar
    }
}

/// What a decoder reads from: a byte stream with a known notation, or an in-memory
/// string whose notation may be sniffed from its content.
pub enum InputSource {
    Stream {
        reader: Box<dyn Read + Send>,
        notation: Notation,
        strict: bool,
    },
    Literal {
        text: String,
        notation: Option<Notation>,
        strict: bool,
    },
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stream {
                notation, strict, ..
            } => f
                .debug_struct("Stream")
                .field("notation", notation)
                .field("strict", strict)
                .finish_non_exhaustive(),
            InputSource::Literal {
                text,
                notation,
                strict,
            } => f
                .debug_struct("Literal")
                .field("len", &text.len())
                .field("notation", notation)
                .field("strict", strict)
                .finish(),
        }
    }
}

/// How one conversion job ended. Failures are values, not errors: the run carries on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    /// Structural parse error. Triples decoded before it were still emitted.
    ParseFailed {
        line: Option<u64>,
        column: Option<u64>,
        message: String,
    },
    /// No decoder for the notation, or the source could not be found.
    Unavailable(String),
    /// Byte-level read failure (corrupt compression, truncated archive member, ...).
    Io(String),
    /// The producer delivered nothing for `polls` consecutive poll attempts.
    Stalled { polls: usize },
    /// Writing a batch to the output sink failed.
    SinkFailed(String),
    /// The producer thread panicked.
    Panicked,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Completed => f.write_str("completed"),
            JobOutcome::ParseFailed {
                line: Some(line),
                column: Some(column),
                message,
            } => write!(
                f,
                "parse error at line {line}, column {column}: {message}"
            ),
            JobOutcome::ParseFailed { message, .. } => write!(f, "parse error: {message}"),
            JobOutcome::Unavailable(msg) => write!(f, "format error: {msg}"),
            JobOutcome::Io(msg) => write!(f, "read error: {msg}"),
            JobOutcome::Stalled { polls } => {
                write!(f, "producer stalled (no triple after {polls} polls)")
            }
            JobOutcome::SinkFailed(msg) => write!(f, "output error: {msg}"),
            JobOutcome::Panicked => f.write_str("parser thread panicked"),
        }
    }
}

/// Result of one conversion job.
#[derive(Clone, Debug)]
pub struct JobReport {
    pub name: String,
    /// Triples written to the sink.
    pub triples: usize,
    /// Batches written to the sink.
    pub batches: usize,
    pub outcome: JobOutcome,
}

/// What happened across a whole run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Units converted without error.
    pub converted: Vec<String>,
    /// Units that failed, with the diagnostic message.
    pub failed: Vec<(String, String)>,
    /// Top-level units skipped with a diagnostic (unknown notation).
    pub skipped: Vec<String>,
    pub triples: usize,
    pub batches: usize,
}

impl RunSummary {
    /// Fold one job's report into the summary.
    pub fn record(&mut self, report: JobReport) {
        self.triples += report.triples;
        self.batches += report.batches;
        if report.outcome.is_success() {
            self.converted.push(report.name);
        } else {
            self.failed.push((report.name, report.outcome.to_string()));
        }
    }
}

/// Run configuration (CLI and lib). Immutable once a run starts.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Strict structural checking in the decoder.
    pub strict: bool,
    /// Extension (e.g. `ttl`) forcing the notation of every unit instead of its name.
    pub format: Option<String>,
    /// Triples per output batch.
    pub batch_size: usize,
    /// Capacity of the producer/consumer channel.
    pub channel_cap: usize,
    /// How long one poll waits for the producer, in milliseconds.
    pub poll_timeout_ms: u64,
    /// Consecutive empty polls before the producer is treated as stalled.
    pub max_polls: usize,
    /// Debug logging and end-of-run summary.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            recursive: false,
            strict: false,
            format: None,
            batch_size: BATCH_SIZE,
            channel_cap: TripleChannelConsts::CAPACITY,
            poll_timeout_ms: TripleChannelConsts::POLL_TIMEOUT_MS,
            max_polls: TripleChannelConsts::MAX_POLLS,
            verbose: false,
        }
    }
}
