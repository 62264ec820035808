//! Decompression decorators around byte streams.

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::io::{BufReader, Read};
use xz2::read::XzDecoder;

use crate::Compression;

/// Wrap `reader` in the decoder for one compression layer.
pub fn wrap(reader: Box<dyn Read + Send>, codec: Compression) -> Box<dyn Read + Send> {
    match codec {
        Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
        Compression::Xz => Box::new(XzDecoder::new_multi_decoder(reader)),
    }
}

/// Apply a codec chain, outermost first, and buffer the result for the parser.
pub fn wrap_chain(reader: Box<dyn Read + Send>, chain: &[Compression]) -> Box<dyn Read + Send> {
    let inner = chain.iter().fold(reader, |r, codec| wrap(r, *codec));
    if chain.is_empty() {
        inner
    } else {
        Box::new(BufReader::new(inner))
    }
}
