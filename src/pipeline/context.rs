//! Run context and tuning: what every dispatch and job needs, built once per run.

use std::sync::Arc;
use std::time::Duration;

use crate::engine::decoder::TripleDecoder;
use crate::engine::serializer::BatchSink;
use crate::{Opts, RunSummary};

/// Per-job sizing derived from [`Opts`]. Sizes are clamped to at least 1.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub batch_size: usize,
    pub channel_cap: usize,
    pub poll_timeout: Duration,
    pub max_polls: usize,
}

impl From<&Opts> for PipelineTuning {
    fn from(o: &Opts) -> Self {
        PipelineTuning {
            batch_size: o.batch_size.max(1),
            channel_cap: o.channel_cap.max(1),
            poll_timeout: Duration::from_millis(o.poll_timeout_ms.max(1)),
            max_polls: o.max_polls.max(1),
        }
    }
}

/// Shared state for one run: options, the decoder, the output sink, and the summary
/// being accumulated. Jobs borrow the sink one at a time.
pub struct RunContext<'a> {
    pub recursive: bool,
    pub strict: bool,
    pub format: Option<String>,
    pub tuning: PipelineTuning,
    pub decoder: Arc<dyn TripleDecoder>,
    pub sink: &'a mut dyn BatchSink,
    pub summary: RunSummary,
}

impl<'a> RunContext<'a> {
    pub fn new(opts: &Opts, decoder: Arc<dyn TripleDecoder>, sink: &'a mut dyn BatchSink) -> Self {
        Self {
            recursive: opts.recursive,
            strict: opts.strict,
            format: opts.format.clone(),
            tuning: PipelineTuning::from(opts),
            decoder,
            sink,
            summary: RunSummary::default(),
        }
    }

    /// Notation override as an extension, without a leading dot.
    pub fn format_override(&self) -> Option<&str> {
        self.format.as_deref().map(|f| f.trim_start_matches('.'))
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }
}
