//! Chunked random-access compression for in-memory script source.
//!
//! A byte blob is compressed into a self-describing container: an 8-byte
//! header, a compressed payload, zero padding to u32 alignment, and a table
//! of per-chunk end offsets. Chunks cover `CHUNK_SIZE` uncompressed bytes
//! each and every chunk decodes on its own, so a host engine can keep source
//! text compressed and inflate only the 64 KiB window it needs.
//!
//! Two backends sit behind one streaming driver: raw deflate and zstd,
//! chosen per compress call and auto-detected from the header on decode.
//! The driver suspends with [`Status::MoreOutput`] when the caller-owned
//! output buffer fills; [`compress`] wraps that grow-and-retry loop for
//! callers that just want a `Vec<u8>`.

pub mod chunk;
mod codec;
pub mod compressor;
pub mod decoder;
pub mod error;
pub mod header;

pub use chunk::{chunk_count, chunk_len, chunk_range};
pub use compressor::{Compressor, Status};
pub use decoder::{decompress_chunk_into, decompress_into};
pub use error::{Error, Result};
pub use header::{Algorithm, ContainerHeader, CHUNK_SIZE, HEADER_SIZE};

/// Compress `input` into a freshly allocated container.
pub fn compress(input: &[u8], algorithm: Algorithm, level: u8) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(input, algorithm, level);
    compressor.init()?;

    let mut buf = vec![0u8; initial_capacity(input.len())];
    loop {
        match compressor.compress_more(&mut buf)? {
            Status::Continue => {}
            Status::MoreOutput => {
                let grown = buf.len() + (buf.len() / 2).max(64);
                buf.resize(grown, 0);
            }
            Status::Done => break,
        }
    }

    let total = compressor.total_bytes_needed();
    buf.resize(total, 0);
    compressor.finish(&mut buf);
    log::trace!(
        "compressed {} bytes to {} ({:?}, {} chunks)",
        input.len(),
        total,
        algorithm,
        chunk_count(input.len()),
    );
    Ok(buf)
}

/// Decompress a whole container; `decompressed_len` is the caller-tracked
/// uncompressed size (the container does not store it).
pub fn decompress(container: &[u8], decompressed_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; decompressed_len];
    decompress_into(container, &mut out)?;
    Ok(out)
}

/// Decompress a single chunk; `chunk_len` is its exact uncompressed size,
/// available to callers via [`chunk_len`](chunk::chunk_len).
pub fn decompress_chunk(container: &[u8], chunk: usize, chunk_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; chunk_len];
    decompress_chunk_into(container, chunk, &mut out)?;
    Ok(out)
}

/// Initial output allocation: input size plus slack plus room for the offset
/// table. A guess, not a bound; the growth protocol covers the rest.
fn initial_capacity(input_len: usize) -> usize {
    HEADER_SIZE + input_len + 64 + 4 * chunk_count(input_len)
}
