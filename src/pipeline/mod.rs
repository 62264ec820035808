//! Pipeline components: channel, parser/emitter pair, job, resolution, traversal.

pub mod archive;
pub mod channel;
pub mod context;
pub mod emitter;
pub mod error_handler;
pub mod job;
pub mod producer;
pub mod resolver;
pub mod walk;

pub use archive::{ArchiveMember, ArchiveMembers, MemberFeed, MemberStream};
pub use channel::{ChannelClosed, Polled, TripleReceiver, TripleSender, triple_channel};
pub use context::{PipelineTuning, RunContext};
pub use emitter::{BatchEmitter, EmitOutcome};
pub use error_handler::{log_summary, report_outcome};
pub use job::run_job;
pub use producer::spawn_producer;
pub use resolver::{
    COMPRESSION_SUFFIXES, NOTATION_EXTENSIONS, notation_for_extension, open_source,
    resolve_member, resolve_source,
};
pub use walk::{
    WalkOutcome, convert_stream, convert_text, dispatch_file, dispatch_reader, to_outcome_walkdir,
    walk_archive, walk_dir,
};
