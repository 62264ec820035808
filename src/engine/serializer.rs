//! Output sinks for emitted batches.

use oxttl::NTriplesSerializer;
use std::io::{self, Write};

use crate::Triple;

/// Receives full batches from the emitter. Append-only: a batch is never revisited.
pub trait BatchSink {
    fn write_batch(&mut self, batch: &[Triple]) -> io::Result<()>;
}

/// Canonical output: N-Triples, one batch per call, flushed after each batch.
pub struct NTriplesSink<W: Write> {
    writer: W,
}

impl<W: Write> NTriplesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl NTriplesSink<io::BufWriter<io::Stdout>> {
    pub fn stdout() -> Self {
        Self::new(io::BufWriter::new(io::stdout()))
    }
}

impl<W: Write> BatchSink for NTriplesSink<W> {
    fn write_batch(&mut self, batch: &[Triple]) -> io::Result<()> {
        let mut serializer = NTriplesSerializer::new().for_writer(&mut self.writer);
        for triple in batch {
            serializer.serialize_triple(triple)?;
        }
        serializer.finish();
        self.writer.flush()
    }
}

/// Keeps every batch in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<Vec<Triple>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All triples across batches, in emission order.
    pub fn triples(&self) -> Vec<Triple> {
        self.batches.iter().flatten().cloned().collect()
    }
}

impl BatchSink for MemorySink {
    fn write_batch(&mut self, batch: &[Triple]) -> io::Result<()> {
        self.batches.push(batch.to_vec());
        Ok(())
    }
}
