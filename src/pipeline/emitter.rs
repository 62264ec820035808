use std::io;
use std::time::Duration;

use crate::Triple;
use crate::engine::serializer::BatchSink;
use crate::pipeline::channel::{Polled, TripleReceiver};

/// How [`BatchEmitter::drain`] stopped.
#[derive(Debug)]
pub enum EmitOutcome {
    /// Channel finished and the last partial batch (if any) was flushed.
    Drained,
    /// `polls` consecutive polls came back empty.
    Stalled { polls: usize },
    /// The sink rejected a batch; the rest of this unit is dropped.
    SinkFailed(io::Error),
}

/// Consumer side: accumulates triples into one batch and flushes it whenever it is full.
pub struct BatchEmitter<'a> {
    sink: &'a mut dyn BatchSink,
    batch: Vec<Triple>,
    batch_size: usize,
    triples: usize,
    batches: usize,
}

impl<'a> BatchEmitter<'a> {
    pub fn new(sink: &'a mut dyn BatchSink, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            batch: Vec::with_capacity(batch_size.min(crate::utils::config::BATCH_SIZE)),
            batch_size,
            triples: 0,
            batches: 0,
        }
    }

    /// Triples written so far.
    pub fn triples(&self) -> usize {
        self.triples
    }

    /// Batches written so far.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Poll `rx` until it finishes, flushing full batches as they fill.
    pub fn drain(
        &mut self,
        rx: &mut TripleReceiver,
        poll_timeout: Duration,
        max_polls: usize,
    ) -> EmitOutcome {
        let max_polls = max_polls.max(1);
        let mut misses = 0_usize;
        loop {
            match rx.poll(poll_timeout) {
                Polled::Item(triple) => {
                    misses = 0;
                    self.batch.push(triple);
                    if self.batch.len() >= self.batch_size
                        && let Err(e) = self.flush()
                    {
                        return EmitOutcome::SinkFailed(e);
                    }
                }
                Polled::Empty => {
                    misses += 1;
                    if misses >= max_polls {
                        self.batch.clear();
                        return EmitOutcome::Stalled { polls: misses };
                    }
                }
                Polled::Finished => break,
            }
        }
        if !self.batch.is_empty()
            && let Err(e) = self.flush()
        {
            return EmitOutcome::SinkFailed(e);
        }
        EmitOutcome::Drained
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.sink.write_batch(&self.batch);
        let n = self.batch.len();
        self.batch.clear();
        result?;
        self.triples += n;
        self.batches += 1;
        Ok(())
    }
}
