//! Pipeline tests: channel semantics, batching, stall detection, failure isolation inside one job.

use crossbeam_channel::{Receiver, bounded};
use oxrdf::{Literal, NamedNode};
use rdf2nt::engine::{BatchSink, DecodeError, MemorySink, NTriplesSink, RdfDecoder, TripleDecoder};
use rdf2nt::pipeline::{
    BatchEmitter, EmitOutcome, PipelineTuning, Polled, run_job, triple_channel,
};
use rdf2nt::{InputSource, JobOutcome, Notation, Opts, Triple, convert_literal_with};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn triple(i: usize) -> Triple {
    Triple::new(
        NamedNode::new_unchecked(format!("http://example.org/s{i}")),
        NamedNode::new_unchecked("http://example.org/p"),
        Literal::new_simple_literal(i.to_string()),
    )
}

fn empty_source() -> InputSource {
    InputSource::Literal {
        text: String::new(),
        notation: None,
        strict: false,
    }
}

fn tuning(batch_size: usize) -> PipelineTuning {
    PipelineTuning {
        batch_size,
        channel_cap: 16,
        poll_timeout: Duration::from_millis(200),
        max_polls: 50,
    }
}

/// Emits `n` synthetic triples, then optionally fails.
struct SyntheticDecoder {
    n: usize,
    fail_with: Option<fn() -> DecodeError>,
}

impl SyntheticDecoder {
    fn ok(n: usize) -> Arc<dyn TripleDecoder> {
        Arc::new(Self { n, fail_with: None })
    }
}

impl TripleDecoder for SyntheticDecoder {
    fn decode(
        &self,
        _source: InputSource,
        emit: &mut dyn FnMut(Triple) -> bool,
    ) -> Result<(), DecodeError> {
        for i in 0..self.n {
            if !emit(triple(i)) {
                return Ok(());
            }
        }
        match self.fail_with {
            Some(f) => Err(f()),
            None => Ok(()),
        }
    }
}

/// Never pushes; blocks until the test drops the release sender.
struct StallingDecoder {
    release: Receiver<()>,
}

impl TripleDecoder for StallingDecoder {
    fn decode(
        &self,
        _source: InputSource,
        _emit: &mut dyn FnMut(Triple) -> bool,
    ) -> Result<(), DecodeError> {
        let _ = self.release.recv();
        Ok(())
    }
}

struct FailingSink {
    calls: usize,
}

impl BatchSink for FailingSink {
    fn write_batch(&mut self, _batch: &[Triple]) -> io::Result<()> {
        self.calls += 1;
        Err(io::Error::other("disk full"))
    }
}

// --- channel ---

#[test]
fn test_channel_delivers_in_push_order() {
    let (tx, mut rx) = triple_channel(8);
    for i in 0..5 {
        tx.push(triple(i)).unwrap();
    }
    drop(tx);
    for i in 0..5 {
        assert_eq!(rx.poll(Duration::from_millis(10)), Polled::Item(triple(i)));
    }
    assert_eq!(rx.poll(Duration::from_millis(10)), Polled::Finished);
}

#[test]
fn test_channel_close_is_idempotent() {
    let (mut tx, mut rx) = triple_channel(4);
    tx.push(triple(0)).unwrap();
    tx.close();
    tx.close();
    assert!(tx.is_closed());
    assert!(tx.push(triple(1)).is_err());
    assert_eq!(rx.poll(Duration::from_millis(10)), Polled::Item(triple(0)));
    assert_eq!(rx.poll(Duration::from_millis(10)), Polled::Finished);
}

#[test]
fn test_channel_finished_does_not_block() {
    let (tx, mut rx) = triple_channel(4);
    drop(tx);
    assert_eq!(rx.poll(Duration::from_secs(5)), Polled::Finished);
    assert!(rx.is_finished());
    let start = Instant::now();
    assert_eq!(rx.poll(Duration::from_secs(5)), Polled::Finished);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_channel_poll_times_out_while_producer_alive() {
    let (_tx, mut rx) = triple_channel(4);
    assert_eq!(rx.poll(Duration::from_millis(5)), Polled::Empty);
    assert!(!rx.is_finished());
}

#[test]
fn test_push_fails_after_receiver_dropped() {
    let (tx, rx) = triple_channel(4);
    drop(rx);
    assert!(tx.push(triple(0)).is_err());
}

#[test]
fn test_push_blocks_when_full_until_drained() {
    let (tx, mut rx) = triple_channel(2);
    let producer = thread::spawn(move || {
        for i in 0..10 {
            tx.push(triple(i)).unwrap();
        }
    });
    let mut got = Vec::new();
    while let Polled::Item(t) = rx.poll(Duration::from_secs(2)) {
        got.push(t);
    }
    producer.join().unwrap();
    assert_eq!(got, (0..10).map(triple).collect::<Vec<_>>());
}

// --- emitter batching ---

#[test]
fn test_emitter_batch_completeness() {
    for (n, batch_size, expected) in [
        (25, 10, vec![10, 10, 5]),
        (20, 10, vec![10, 10]),
        (3, 10, vec![3]),
        (0, 10, vec![]),
        (4, 1, vec![1, 1, 1, 1]),
    ] {
        let (tx, mut rx) = triple_channel(64);
        for i in 0..n {
            tx.push(triple(i)).unwrap();
        }
        drop(tx);
        let mut sink = MemorySink::new();
        let mut emitter = BatchEmitter::new(&mut sink, batch_size);
        let outcome = emitter.drain(&mut rx, Duration::from_millis(50), 3);
        assert!(matches!(outcome, EmitOutcome::Drained));
        assert_eq!(emitter.triples(), n);
        assert_eq!(emitter.batches(), expected.len());

        let sizes: Vec<usize> = sink.batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, expected, "n={n} batch_size={batch_size}");
        assert_eq!(sink.triples(), (0..n).map(triple).collect::<Vec<_>>());
    }
}

#[test]
fn test_emitter_never_exceeds_batch_size() {
    let (tx, mut rx) = triple_channel(1000);
    for i in 0..1000 {
        tx.push(triple(i)).unwrap();
    }
    drop(tx);
    let mut sink = MemorySink::new();
    BatchEmitter::new(&mut sink, 64).drain(&mut rx, Duration::from_millis(50), 3);
    assert!(sink.batches.iter().all(|b| b.len() <= 64));
    assert_eq!(sink.batches.len(), 1000_usize.div_ceil(64));
}

#[test]
fn test_emitter_stall_after_exact_poll_count() {
    let (_tx, mut rx) = triple_channel(4);
    let mut sink = MemorySink::new();
    let mut emitter = BatchEmitter::new(&mut sink, 10);
    let outcome = emitter.drain(&mut rx, Duration::from_millis(2), 7);
    assert!(matches!(outcome, EmitOutcome::Stalled { polls: 7 }));
}

#[test]
fn test_emitter_reports_sink_failure() {
    let (tx, mut rx) = triple_channel(8);
    for i in 0..5 {
        tx.push(triple(i)).unwrap();
    }
    drop(tx);
    let mut sink = FailingSink { calls: 0 };
    let mut emitter = BatchEmitter::new(&mut sink, 2);
    let outcome = emitter.drain(&mut rx, Duration::from_millis(50), 3);
    assert!(matches!(outcome, EmitOutcome::SinkFailed(_)));
    assert_eq!(emitter.triples(), 0);
    assert_eq!(sink.calls, 1);
}

// --- run_job ---

#[test]
fn test_job_emits_everything_in_order() {
    let mut sink = MemorySink::new();
    let report = run_job(
        "synthetic",
        empty_source(),
        &SyntheticDecoder::ok(2_500),
        &mut sink,
        &tuning(1_000),
    );
    assert_eq!(report.outcome, JobOutcome::Completed);
    assert_eq!(report.triples, 2_500);
    assert_eq!(report.batches, 3);
    assert_eq!(sink.triples(), (0..2_500).map(triple).collect::<Vec<_>>());
}

#[test]
fn test_job_keeps_prefix_on_parse_error() {
    let decoder: Arc<dyn TripleDecoder> = Arc::new(SyntheticDecoder {
        n: 3,
        fail_with: Some(|| DecodeError::Syntax {
            line: Some(4),
            column: Some(1),
            message: "unexpected token".to_string(),
        }),
    });
    let mut sink = MemorySink::new();
    let report = run_job("broken", empty_source(), &decoder, &mut sink, &tuning(10));
    assert_eq!(
        report.outcome,
        JobOutcome::ParseFailed {
            line: Some(4),
            column: Some(1),
            message: "unexpected token".to_string(),
        }
    );
    assert_eq!(sink.triples(), (0..3).map(triple).collect::<Vec<_>>());
}

#[test]
fn test_job_reports_unavailable_source() {
    let decoder: Arc<dyn TripleDecoder> = Arc::new(SyntheticDecoder {
        n: 0,
        fail_with: Some(|| DecodeError::Unavailable {
            message: "not found".to_string(),
        }),
    });
    let mut sink = MemorySink::new();
    let report = run_job("missing", empty_source(), &decoder, &mut sink, &tuning(10));
    assert_eq!(report.outcome, JobOutcome::Unavailable("not found".to_string()));
    assert!(sink.batches.is_empty());
}

#[test]
fn test_job_detects_stalled_producer() {
    let (release_tx, release_rx) = bounded::<()>(0);
    let decoder: Arc<dyn TripleDecoder> = Arc::new(StallingDecoder {
        release: release_rx,
    });
    let tuning = PipelineTuning {
        batch_size: 10,
        channel_cap: 4,
        poll_timeout: Duration::from_millis(5),
        max_polls: 4,
    };
    let mut sink = MemorySink::new();
    let start = Instant::now();
    let report = run_job("hung", empty_source(), &decoder, &mut sink, &tuning);
    assert_eq!(report.outcome, JobOutcome::Stalled { polls: 4 });
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(sink.batches.is_empty());
    drop(release_tx);
}

#[test]
fn test_job_sink_failure_unblocks_producer() {
    // Channel far smaller than the input: the producer is blocked on push when the sink
    // fails, and must be released by the job dropping its receiver.
    let tuning = PipelineTuning {
        batch_size: 5,
        channel_cap: 2,
        poll_timeout: Duration::from_millis(200),
        max_polls: 50,
    };
    let mut sink = FailingSink { calls: 0 };
    let report = run_job(
        "unwritable",
        empty_source(),
        &SyntheticDecoder::ok(10_000),
        &mut sink,
        &tuning,
    );
    assert!(matches!(report.outcome, JobOutcome::SinkFailed(_)));
    assert_eq!(report.triples, 0);
    assert_eq!(sink.calls, 1);
}

// --- RdfDecoder through a job ---

#[test]
fn test_rdf_decoder_ntriples_stream() {
    let text = "<http://example.org/a> <http://example.org/p> \"1\" .\n\
                <http://example.org/b> <http://example.org/p> \"2\" .\n";
    let source = InputSource::Stream {
        reader: Box::new(io::Cursor::new(text.as_bytes().to_vec())),
        notation: Notation::NTriples,
        strict: true,
    };
    let decoder: Arc<dyn TripleDecoder> = Arc::new(RdfDecoder);
    let mut sink = MemorySink::new();
    let report = run_job("two.nt", source, &decoder, &mut sink, &tuning(10));
    assert_eq!(report.outcome, JobOutcome::Completed);
    assert_eq!(report.triples, 2);
}

#[test]
fn test_rdf_decoder_parse_error_keeps_valid_prefix() {
    let text = "<http://example.org/a> <http://example.org/p> \"1\" .\n\
                <http://example.org/b> <http://example.org/p> \"2\" .\n\
                <http://example.org/c> <http://example.org/p> .\n\
                <http://example.org/d> <http://example.org/p> \"4\" .\n";
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "broken.nt",
        text.to_string(),
        Some(Notation::NTriples),
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "broken.nt");
    let subjects: Vec<String> = sink
        .triples()
        .iter()
        .map(|t| t.subject.to_string())
        .collect();
    assert_eq!(
        subjects,
        vec!["<http://example.org/a>", "<http://example.org/b>"]
    );
}

#[test]
fn test_rdf_decoder_parse_error_location_is_one_based() {
    let text = "<http://example.org/a> <http://example.org/p> \"1\" .\n\
                <http://example.org/c> <http://example.org/p> .\n";
    let decoder: Arc<dyn TripleDecoder> = Arc::new(RdfDecoder);
    let source = InputSource::Literal {
        text: text.to_string(),
        notation: Some(Notation::NTriples),
        strict: false,
    };
    let mut sink = MemorySink::new();
    let report = run_job("broken.nt", source, &decoder, &mut sink, &tuning(10));
    match report.outcome {
        JobOutcome::ParseFailed { line, .. } => {
            if let Some(line) = line {
                assert_eq!(line, 2);
            }
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn test_rdf_decoder_literal_sniffs_turtle() {
    let text = "@prefix ex: <http://example.org/> .\nex:a ex:p ex:b , ex:c .\n";
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "<inline>",
        text.to_string(),
        None,
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert_eq!(summary.converted, vec!["<inline>".to_string()]);
    assert_eq!(summary.triples, 2);
}

#[test]
fn test_rdf_decoder_literal_sniffs_rdfxml() {
    let text = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/a"><ex:p>1</ex:p></rdf:Description>
</rdf:RDF>
"#;
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "<inline>",
        text.to_string(),
        None,
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert!(summary.failed.is_empty(), "{:?}", summary.failed);
    assert_eq!(summary.triples, 1);
}

#[test]
fn test_rdf_decoder_quads_drop_graph_name() {
    let text = "<http://example.org/a> <http://example.org/p> \"1\" <http://example.org/g> .\n";
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "q.nq",
        text.to_string(),
        Some(Notation::NQuads),
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert_eq!(summary.triples, 1);
    assert_eq!(sink.triples()[0].subject.to_string(), "<http://example.org/a>");
}

#[test]
fn test_rdf_decoder_without_parser_is_unavailable() {
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "doc.jsonld",
        "{}".to_string(),
        Some(Notation::JsonLd),
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].1.contains("JSON-LD"));
}

#[test]
fn test_duplicates_pass_through() {
    let text = "<http://example.org/a> <http://example.org/p> \"1\" .\n\
                <http://example.org/a> <http://example.org/p> \"1\" .\n";
    let mut sink = MemorySink::new();
    let summary = convert_literal_with(
        "dup.nt",
        text.to_string(),
        Some(Notation::NTriples),
        &Opts::default(),
        Arc::new(RdfDecoder),
        &mut sink,
    );
    assert_eq!(summary.triples, 2);
}

// --- NTriplesSink ---

#[test]
fn test_ntriples_sink_writes_one_line_per_triple() {
    let mut sink = NTriplesSink::new(Vec::new());
    sink.write_batch(&[triple(0), triple(1)]).unwrap();
    sink.write_batch(&[triple(2)]).unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "<http://example.org/s0> <http://example.org/p> \"0\" ."
    );
    assert!(lines[2].starts_with("<http://example.org/s2>"));
}
