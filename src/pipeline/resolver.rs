//! Source resolution: from a name alone, work out compression layers, container type and
//! notation, then open the matching decoder chain.

use log::debug;
use std::io::Read;

use crate::engine::codecs::wrap_chain;
use crate::engine::tools::extension_of;
use crate::{Compression, Container, Notation, SourceDescriptor};

/// Extension → notation. Matched case-insensitively against the last extension.
pub static NOTATION_EXTENSIONS: &[(&str, Notation)] = &[
    ("ttl", Notation::Turtle),
    ("nt", Notation::NTriples),
    ("nq", Notation::NQuads),
    ("trig", Notation::TriG),
    ("n3", Notation::N3),
    ("rdf", Notation::RdfXml),
    ("owl", Notation::RdfXml),
    ("xml", Notation::RdfXml),
    ("jsonld", Notation::JsonLd),
    ("trix", Notation::TriX),
    ("rj", Notation::RdfJson),
];

/// Compression suffixes in priority order. The second field replaces the stripped suffix:
/// composite tar suffixes leave `.tar` behind so the inner name is recognized as a container.
pub static COMPRESSION_SUFFIXES: &[(&str, &str, Compression)] = &[
    (".gz", "", Compression::Gzip),
    (".bz2", "", Compression::Bzip2),
    (".xz", "", Compression::Xz),
    (".tgz", ".tar", Compression::Gzip),
    (".taz", ".tar", Compression::Gzip),
    (".tbz2", ".tar", Compression::Bzip2),
    (".tbz", ".tar", Compression::Bzip2),
    (".txz", ".tar", Compression::Xz),
];

const TAR_SUFFIX: &str = ".tar";

/// Look up the notation for an extension (with or without the leading dot).
pub fn notation_for_extension(ext: &str) -> Option<Notation> {
    let ext = ext.trim_start_matches('.');
    NOTATION_EXTENSIONS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, n)| *n)
}

/// Strip one known compression suffix from `lower`, returning the codec and the inner name.
fn strip_compression(lower: &str) -> Option<(Compression, String)> {
    COMPRESSION_SUFFIXES.iter().find_map(|(suffix, replacement, codec)| {
        lower
            .strip_suffix(suffix)
            .filter(|inner| !inner.is_empty())
            .map(|inner| (*codec, format!("{inner}{replacement}")))
    })
}

/// Resolve a top-level unit (file path or display name).
///
/// Pure: the same inputs always give the same descriptor. `format` (an extension such as
/// `ttl`) overrides the notation derived from the name; it never changes compression or
/// container detection.
pub fn resolve_source(display_name: &str, format: Option<&str>) -> SourceDescriptor {
    let file_name = display_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(display_name);
    let mut inner = file_name.to_ascii_lowercase();
    let mut compression = Vec::new();
    while let Some((codec, stripped)) = strip_compression(&inner) {
        compression.push(codec);
        inner = stripped;
    }

    if inner.ends_with(TAR_SUFFIX) && inner.len() > TAR_SUFFIX.len() {
        return SourceDescriptor {
            display_name: display_name.to_string(),
            notation: None,
            compression,
            container: Container::Tar,
        };
    }

    let notation = match format {
        Some(ext) => notation_for_extension(ext),
        None => extension_of(&inner).and_then(|ext| notation_for_extension(&ext)),
    };
    SourceDescriptor {
        display_name: display_name.to_string(),
        notation,
        compression,
        container: Container::Plain,
    }
}

/// Resolve an archive member by notation only: members arrive already decompressed by
/// the outer layer and are never walked as containers.
pub fn resolve_member(entry_name: &str, format: Option<&str>) -> SourceDescriptor {
    let notation = match format {
        Some(ext) => notation_for_extension(ext),
        None => extension_of(entry_name).and_then(|ext| notation_for_extension(&ext)),
    };
    SourceDescriptor {
        display_name: entry_name.to_string(),
        notation,
        compression: Vec::new(),
        container: Container::Plain,
    }
}

/// Wrap a raw byte stream in the descriptor's decompression chain.
pub fn open_source(reader: Box<dyn Read + Send>, descriptor: &SourceDescriptor) -> Box<dyn Read + Send> {
    if !descriptor.compression.is_empty() {
        let chain: Vec<&str> = descriptor.compression.iter().map(Compression::name).collect();
        debug!("{}: decompressing via {}", descriptor.display_name, chain.join(" -> "));
    }
    wrap_chain(reader, &descriptor.compression)
}
