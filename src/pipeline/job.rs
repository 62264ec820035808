use log::debug;
use std::sync::Arc;

use crate::engine::decoder::TripleDecoder;
use crate::engine::serializer::BatchSink;
use crate::pipeline::channel::triple_channel;
use crate::pipeline::context::PipelineTuning;
use crate::pipeline::emitter::{BatchEmitter, EmitOutcome};
use crate::pipeline::error_handler::report_outcome;
use crate::pipeline::producer::spawn_producer;
use crate::{InputSource, JobOutcome, JobReport};

/// Convert one input unit: parser thread → channel → batched output on this thread.
///
/// Never fails: every problem becomes a diagnostic plus a [`JobOutcome`] in the report.
/// The parser thread is joined before returning, except after a stall, where it is left
/// to exit on its own (its next push fails because the receiver is gone).
pub fn run_job(
    name: &str,
    source: InputSource,
    decoder: &Arc<dyn TripleDecoder>,
    sink: &mut dyn BatchSink,
    tuning: &PipelineTuning,
) -> JobReport {
    debug!("{name}: converting ({source:?})");
    let (tx, mut rx) = triple_channel(tuning.channel_cap);
    let producer = spawn_producer(name.to_string(), source, Arc::clone(decoder), tx);

    let mut emitter = BatchEmitter::new(sink, tuning.batch_size);
    let emitted = emitter.drain(&mut rx, tuning.poll_timeout, tuning.max_polls);
    let (triples, batches) = (emitter.triples(), emitter.batches());
    // Dropping the receiver unblocks a producer stuck on a full channel.
    drop(rx);

    let outcome = match emitted {
        EmitOutcome::Drained => producer.join().unwrap_or(JobOutcome::Panicked),
        EmitOutcome::Stalled { polls } => {
            drop(producer);
            let outcome = JobOutcome::Stalled { polls };
            report_outcome(name, &outcome);
            outcome
        }
        EmitOutcome::SinkFailed(e) => {
            let _ = producer.join();
            let outcome = JobOutcome::SinkFailed(e.to_string());
            report_outcome(name, &outcome);
            outcome
        }
    };
    if outcome == JobOutcome::Panicked {
        report_outcome(name, &outcome);
    }
    debug!("{name}: {triples} triples in {batches} batches");

    JobReport {
        name: name.to_string(),
        triples,
        batches,
        outcome,
    }
}
