//! Dispatch and traversal: turn paths, directories and archives into conversion jobs, one
//! at a time, isolating every failure to its own unit.

use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::tools::{is_hidden, member_display_name};
use crate::pipeline::archive::{ArchiveMember, ArchiveMembers};
use crate::pipeline::context::RunContext;
use crate::pipeline::error_handler::{report_unknown_notation, report_unreadable};
use crate::pipeline::job::run_job;
use crate::pipeline::resolver::{open_source, resolve_source};
use crate::{InputSource, Notation, SourceDescriptor};

/// One result from a directory walk: a file to dispatch or an error with optional path.
pub enum WalkOutcome {
    File(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Directories yield nothing; the walk
/// itself decides whether to descend.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if entry.file_type().is_file() => Some(WalkOutcome::File(entry.into_path())),
        Ok(_) => None,
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Children of `root` in name order, skipping hidden entries. Subdirectories are entered
/// only when `recursive`; otherwise they are skipped silently.
fn walkdir_iter(root: &Path, recursive: bool) -> impl Iterator<Item = WalkOutcome> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.path()))
        .filter_map(to_outcome_walkdir)
}

/// Convert every visible file under `root`.
pub fn walk_dir(ctx: &mut RunContext<'_>, root: &Path) {
    for outcome in walkdir_iter(root, ctx.recursive) {
        match outcome {
            WalkOutcome::File(path) => dispatch_file(ctx, &path),
            WalkOutcome::Err { msg, path } => {
                let name = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                report_unreadable(&name, &msg);
                ctx.summary.failed.push((name, msg));
            }
        }
    }
}

/// Top-level dispatch of one file: archive, graph file, or unknown (diagnosed).
pub fn dispatch_file(ctx: &mut RunContext<'_>, path: &Path) {
    let name = path.display().to_string();
    let descriptor = resolve_source(&name, ctx.format_override());
    if !descriptor.is_archive() && descriptor.notation.is_none() {
        report_unknown_notation(&name);
        ctx.summary.skipped.push(name);
        return;
    }
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            report_unreadable(&name, &e.to_string());
            ctx.summary.failed.push((name, e.to_string()));
            return;
        }
    };
    dispatch_reader(ctx, &descriptor, Box::new(BufReader::new(file)));
}

/// Dispatch an already opened raw stream described by `descriptor`.
pub fn dispatch_reader(
    ctx: &mut RunContext<'_>,
    descriptor: &SourceDescriptor,
    raw: Box<dyn Read + Send>,
) {
    let reader = open_source(raw, descriptor);
    if descriptor.is_archive() {
        walk_archive(ctx, &descriptor.display_name, reader);
        return;
    }
    let Some(notation) = descriptor.notation else {
        report_unknown_notation(&descriptor.display_name);
        ctx.summary.skipped.push(descriptor.display_name.clone());
        return;
    };
    convert_stream(ctx, &descriptor.display_name, reader, notation);
}

/// Convert each recognized member of a tar stream, in container order.
pub fn walk_archive(ctx: &mut RunContext<'_>, archive_name: &str, reader: Box<dyn Read + Send>) {
    debug!("{archive_name}: walking archive");
    let members = ArchiveMembers::open(reader, ctx.format_override().map(str::to_string));
    for member in members {
        let member = match member {
            Ok(m) => m,
            Err(e) => {
                report_unreadable(archive_name, &e.to_string());
                ctx.summary
                    .failed
                    .push((archive_name.to_string(), e.to_string()));
                return;
            }
        };
        let ArchiveMember {
            name,
            descriptor,
            stream,
            feed,
        } = member;
        let Some(notation) = descriptor.notation else {
            continue;
        };
        let name = member_display_name(archive_name, &name);
        convert_stream(ctx, &name, Box::new(stream), notation);
        // A stalled parser may still hold the stream; release the reader thread anyway.
        drop(feed);
    }
}

/// Run one job over a decompressed stream and record its report.
pub fn convert_stream(
    ctx: &mut RunContext<'_>,
    name: &str,
    reader: Box<dyn Read + Send>,
    notation: Notation,
) {
    let source = InputSource::Stream {
        reader,
        notation,
        strict: ctx.strict,
    };
    let report = run_job(name, source, &ctx.decoder, &mut *ctx.sink, &ctx.tuning);
    ctx.summary.record(report);
}

/// Run one job over an in-memory document; `notation: None` sniffs it from the content.
pub fn convert_text(ctx: &mut RunContext<'_>, name: &str, text: String, notation: Option<Notation>) {
    let source = InputSource::Literal {
        text,
        notation,
        strict: ctx.strict,
    };
    let report = run_job(name, source, &ctx.decoder, &mut *ctx.sink, &ctx.tuning);
    ctx.summary.record(report);
}
