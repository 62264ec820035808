//! Notation decoders: turn an [`InputSource`] into a sequence of triples.

use oxrdfio::{RdfFormat, RdfParseError, RdfParser};
use std::io::{self, Cursor, Read};
use thiserror::Error;

use crate::{InputSource, Notation, Triple};

/// Why a decoder stopped before the end of its input.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed content. `line`/`column` are 1-based when the decoder knows them.
    #[error("{message}")]
    Syntax {
        line: Option<u64>,
        column: Option<u64>,
        message: String,
    },
    /// No decoder for the notation, or the source does not exist.
    #[error("{message}")]
    Unavailable { message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A pluggable notation decoder.
///
/// `emit` is called once per decoded triple, in input order. When it returns `false` the
/// consumer has gone away and the decoder should stop and return `Ok(())`.
pub trait TripleDecoder: Send + Sync {
    fn decode(
        &self,
        source: InputSource,
        emit: &mut dyn FnMut(Triple) -> bool,
    ) -> Result<(), DecodeError>;
}

/// Decoder backed by `oxrdfio`. Quads are reduced to triples by dropping the graph name.
#[derive(Clone, Copy, Debug, Default)]
pub struct RdfDecoder;

impl TripleDecoder for RdfDecoder {
    fn decode(
        &self,
        source: InputSource,
        emit: &mut dyn FnMut(Triple) -> bool,
    ) -> Result<(), DecodeError> {
        let (reader, notation, strict): (Box<dyn Read + Send>, Notation, bool) = match source {
            InputSource::Stream {
                reader,
                notation,
                strict,
            } => (reader, notation, strict),
            InputSource::Literal {
                text,
                notation,
                strict,
            } => {
                let notation = notation.unwrap_or_else(|| sniff_notation(&text));
                (Box::new(Cursor::new(text.into_bytes())), notation, strict)
            }
        };

        let format = rdf_format(notation).ok_or_else(|| DecodeError::Unavailable {
            message: format!("no parser available for {notation}"),
        })?;

        let mut parser = RdfParser::from_format(format);
        if !strict {
            parser = parser.unchecked();
        }
        for quad in parser.for_reader(reader) {
            let quad = quad?;
            if !emit(Triple::from(quad)) {
                break;
            }
        }
        Ok(())
    }
}

impl From<RdfParseError> for DecodeError {
    fn from(e: RdfParseError) -> Self {
        match e {
            RdfParseError::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                DecodeError::Unavailable {
                    message: e.to_string(),
                }
            }
            RdfParseError::Io(e) => DecodeError::Io(e),
            RdfParseError::Syntax(e) => {
                let start = e.location().map(|range| range.start);
                DecodeError::Syntax {
                    line: start.as_ref().map(|p| p.line + 1),
                    column: start.as_ref().map(|p| p.column + 1),
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Bundled parser format for a notation, if there is one.
pub fn rdf_format(notation: Notation) -> Option<RdfFormat> {
    match notation {
        Notation::Turtle => Some(RdfFormat::Turtle),
        Notation::NTriples => Some(RdfFormat::NTriples),
        Notation::NQuads => Some(RdfFormat::NQuads),
        Notation::TriG => Some(RdfFormat::TriG),
        Notation::N3 => Some(RdfFormat::N3),
        Notation::RdfXml => Some(RdfFormat::RdfXml),
        Notation::JsonLd | Notation::TriX | Notation::RdfJson => None,
    }
}

/// Guess the notation of an in-memory document from its first significant content.
///
/// XML → RDF/XML; prefix/base declarations or graph blocks → TriG (accepts Turtle);
/// anything else → N-Quads (accepts N-Triples).
pub fn sniff_notation(text: &str) -> Notation {
    let head = text.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with("<?xml") || head.starts_with("<rdf:RDF") {
        return Notation::RdfXml;
    }
    let declares = text.lines().map(str::trim_start).any(|line| {
        line.starts_with("@prefix")
            || line.starts_with("@base")
            || starts_with_keyword(line, "PREFIX")
            || starts_with_keyword(line, "BASE")
    });
    if declares || text.contains('{') {
        Notation::TriG
    } else {
        Notation::NQuads
    }
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && line[keyword.len()..].starts_with(char::is_whitespace)
}
