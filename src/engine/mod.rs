//! Engine module: collaborators the pipeline drives (decoders, codecs, sinks) and the CLI

pub mod arg_parser;
pub mod cli;
pub mod codecs;
pub mod decoder;
pub mod serializer;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use decoder::{DecodeError, RdfDecoder, TripleDecoder, sniff_notation};
pub use serializer::{BatchSink, MemorySink, NTriplesSink};
pub use tools::{extension_of, is_hidden, member_display_name};
