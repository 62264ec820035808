use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::decoder::{DecodeError, TripleDecoder};
use crate::pipeline::channel::TripleSender;
use crate::pipeline::error_handler::report_outcome;
use crate::{InputSource, JobOutcome};

/// Run `decoder` over `source` on its own thread, pushing every triple into `tx`.
///
/// The channel is closed before the thread returns on every path, including decoder
/// errors. Parse and format failures are reported here; the triples pushed before the
/// failure stay valid. If the consumer drops its end, decoding stops quietly.
pub fn spawn_producer(
    name: String,
    source: InputSource,
    decoder: Arc<dyn TripleDecoder>,
    mut tx: TripleSender,
) -> JoinHandle<JobOutcome> {
    thread::spawn(move || {
        let result = decoder.decode(source, &mut |triple| tx.push(triple).is_ok());
        tx.close();
        let outcome = match result {
            Ok(()) => JobOutcome::Completed,
            Err(DecodeError::Syntax {
                line,
                column,
                message,
            }) => JobOutcome::ParseFailed {
                line,
                column,
                message,
            },
            Err(DecodeError::Unavailable { message }) => JobOutcome::Unavailable(message),
            Err(DecodeError::Io(e)) => JobOutcome::Io(e.to_string()),
        };
        if !outcome.is_success() {
            report_outcome(&name, &outcome);
        }
        outcome
    })
}
