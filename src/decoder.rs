//! Container decoding: whole-blob and single-chunk entry points.
//!
//! Decoders are stateless; the algorithm is auto-detected from the header and
//! every call builds its backend state locally, so concurrent chunk decodes
//! of one container share nothing but the input bytes.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};
use crate::header::{align_to_u32, Algorithm, ContainerHeader, CHUNK_SIZE, HEADER_SIZE};

/// Decompress the entire payload into `out`, whose length must be the exact
/// uncompressed size.
pub fn decompress_into(container: &[u8], out: &mut [u8]) -> Result<()> {
    assert!(!out.is_empty(), "decompressed output cannot be empty");
    let header = ContainerHeader::parse(container)?;
    let payload = payload_bytes(container, &header)?;

    match header.algorithm {
        Algorithm::Deflate => inflate_segment(payload, out, true),
        Algorithm::Zstd => {
            // The payload is a concatenation of complete frames, one per
            // chunk; one-shot decoding walks them all.
            let written = zstd::bulk::decompress_to_buffer(payload, out)
                .map_err(|_| Error::Corrupt("zstd payload"))?;
            if written != out.len() {
                return Err(Error::Corrupt("decoded size mismatch"));
            }
            Ok(())
        }
    }
}

/// Decompress one chunk into `out`, whose length must be the chunk's exact
/// uncompressed size (`CHUNK_SIZE` for all but possibly the last chunk).
pub fn decompress_chunk_into(container: &[u8], chunk: usize, out: &mut [u8]) -> Result<()> {
    assert!(!out.is_empty(), "decompressed output cannot be empty");
    assert!(out.len() <= CHUNK_SIZE, "chunk output larger than a chunk");
    let header = ContainerHeader::parse(container)?;
    let payload_end = HEADER_SIZE + header.compressed_bytes as usize;
    let table = offset_table(container, &header)?;
    if chunk >= table.len() / 4 {
        return Err(Error::Truncated("chunk index past offset table"));
    }

    let start = if chunk == 0 {
        HEADER_SIZE
    } else {
        offset_entry(table, chunk - 1)
    };
    let end = offset_entry(table, chunk);
    if start >= end || end > payload_end {
        return Err(Error::Corrupt("chunk segment out of range"));
    }
    let segment = &container[start..end];
    let last_chunk = end == payload_end;

    match header.algorithm {
        Algorithm::Deflate => inflate_segment(segment, out, last_chunk),
        Algorithm::Zstd => {
            // Each chunk is its own frame.
            let written = zstd::bulk::decompress_to_buffer(segment, out)
                .map_err(|_| Error::Corrupt("zstd chunk segment"))?;
            if written != out.len() {
                return Err(Error::Corrupt("decoded chunk size mismatch"));
            }
            Ok(())
        }
    }
}

/// Raw-inflate `segment`, expecting it to fill `out` exactly. Terminal
/// segments carry the stream end marker; non-terminal segments end at a
/// full-flush boundary instead.
fn inflate_segment(segment: &[u8], out: &mut [u8], terminal: bool) -> Result<()> {
    let mut inflater = Decompress::new(false);
    if terminal {
        let status = inflater
            .decompress(segment, out, FlushDecompress::Finish)
            .map_err(|_| Error::Corrupt("deflate stream"))?;
        if status != Status::StreamEnd {
            return Err(Error::Corrupt("deflate stream missing end marker"));
        }
    } else {
        inflater
            .decompress(segment, out, FlushDecompress::None)
            .map_err(|_| Error::Corrupt("deflate stream"))?;
    }
    if inflater.total_in() != segment.len() as u64 || inflater.total_out() != out.len() as u64 {
        return Err(Error::Corrupt("decoded size mismatch"));
    }
    Ok(())
}

fn payload_bytes<'a>(container: &'a [u8], header: &ContainerHeader) -> Result<&'a [u8]> {
    let payload_end = HEADER_SIZE + header.compressed_bytes as usize;
    if container.len() < payload_end {
        return Err(Error::Truncated("payload extends past container"));
    }
    Ok(&container[HEADER_SIZE..payload_end])
}

fn offset_table<'a>(container: &'a [u8], header: &ContainerHeader) -> Result<&'a [u8]> {
    let table_start = align_to_u32(HEADER_SIZE + header.compressed_bytes as usize);
    if container.len() < table_start + 4 {
        return Err(Error::Truncated("offset table missing"));
    }
    Ok(&container[table_start..])
}

fn offset_entry(table: &[u8], index: usize) -> usize {
    let at = index * 4;
    u32::from_le_bytes(table[at..at + 4].try_into().expect("slice length")) as usize
}
