//! rdf2nt: streaming conversion of RDF files, compressed files, tar archives and directory
//! trees into batched N-Triples.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use anyhow::{Context, bail};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use engine::{BatchSink, NTriplesSink, RdfDecoder, TripleDecoder};
use pipeline::{RunContext, convert_text, dispatch_reader, notation_for_extension, resolve_source, walk_dir};
use utils::config::STDIN_PATH;

/// Result alias used by public rdf2nt API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Convert `path` (file, directory, or `-` for stdin) to N-Triples on stdout.
///
/// Per-unit failures are reported on stderr and collected in the returned [`RunSummary`];
/// only a missing or unreadable `path` is an error.
pub fn convert_path(path: &Path, opts: &Opts) -> Result<RunSummary> {
    let mut sink = NTriplesSink::stdout();
    convert_path_with(path, opts, Arc::new(RdfDecoder), &mut sink)
}

/// Same as [`convert_path`] with a caller-provided decoder and sink.
pub fn convert_path_with(
    path: &Path,
    opts: &Opts,
    decoder: Arc<dyn TripleDecoder>,
    sink: &mut dyn BatchSink,
) -> Result<RunSummary> {
    log_config(opts);
    check_format_override(opts)?;
    let mut ctx = RunContext::new(opts, decoder, sink);

    if path == Path::new(STDIN_PATH) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read standard input")?;
        let notation = ctx.format_override().and_then(notation_for_extension);
        convert_text(&mut ctx, "<stdin>", text, notation);
        return Ok(ctx.into_summary());
    }

    let meta = std::fs::metadata(path).with_context(|| format!("Can't read {}", path.display()))?;
    if meta.is_dir() {
        std::fs::read_dir(path).with_context(|| format!("Can't read {}", path.display()))?;
        debug!("Converting directory {}", path.display());
        walk_dir(&mut ctx, path);
    } else {
        let file = File::open(path).with_context(|| format!("Can't read {}", path.display()))?;
        let name = path.display().to_string();
        let descriptor = resolve_source(&name, ctx.format_override());
        dispatch_reader(&mut ctx, &descriptor, Box::new(BufReader::new(file)));
    }
    Ok(ctx.into_summary())
}

/// Convert one in-memory document. `notation: None` sniffs the notation from the content.
pub fn convert_literal_with(
    name: &str,
    text: String,
    notation: Option<Notation>,
    opts: &Opts,
    decoder: Arc<dyn TripleDecoder>,
    sink: &mut dyn BatchSink,
) -> RunSummary {
    let mut ctx = RunContext::new(opts, decoder, sink);
    convert_text(&mut ctx, name, text, notation);
    ctx.into_summary()
}

fn log_config(opts: &Opts) {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);
}

fn check_format_override(opts: &Opts) -> Result<()> {
    if let Some(ref ext) = opts.format
        && notation_for_extension(ext).is_none()
    {
        bail!("Unknown notation extension for --format: {ext}");
    }
    Ok(())
}
