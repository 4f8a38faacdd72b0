//! Step-wise compression driver.
//!
//! The driver walks the input in caller-controlled steps, asks the codec to
//! seal a chunk boundary every `CHUNK_SIZE` uncompressed bytes, and suspends
//! whenever the caller-owned output buffer runs out. It never allocates
//! output; the caller grows the buffer and re-enters with the produced prefix
//! intact.

use crate::chunk::{chunk_count, ChunkLedger};
use crate::codec::{Codec, Directive};
use crate::error::{Error, Result};
use crate::header::{align_to_u32, Algorithm, ContainerHeader, CHUNK_SIZE, HEADER_SIZE};

/// Upper bound on uncompressed bytes handed to the codec per step, shared by
/// both backends. Keeps single calls short so the caller regains control at a
/// steady cadence.
pub(crate) const MAX_STEP_BYTES: usize = 2 * 1024;

/// Progress report from [`Compressor::compress_more`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// More input remains; call again.
    Continue,
    /// The output buffer is full. Grow it, keeping the first
    /// [`Compressor::out_written`] bytes, then call again. Not an error and
    /// no input position is lost.
    MoreOutput,
    /// The stream is complete; size the destination with
    /// [`Compressor::total_bytes_needed`] and call [`Compressor::finish`].
    Done,
}

pub struct Compressor<'a> {
    input: &'a [u8],
    algorithm: Algorithm,
    level: u8,
    codec: Option<Codec>,
    cursor: usize,
    /// Container bytes produced so far, header reservation included.
    outbytes: usize,
    ledger: ChunkLedger,
    finished: bool,
}

impl<'a> Compressor<'a> {
    /// Backend state is not allocated until [`init`](Self::init).
    ///
    /// # Panics
    ///
    /// Panics if `input` is empty or `level` is outside the backend's range
    /// (0 always means the backend default).
    pub fn new(input: &'a [u8], algorithm: Algorithm, level: u8) -> Self {
        assert!(!input.is_empty(), "input to compress must not be empty");
        assert!(
            level <= algorithm.max_level(),
            "level {level} out of range for {algorithm:?}"
        );
        Self {
            input,
            algorithm,
            level,
            codec: None,
            cursor: 0,
            outbytes: HEADER_SIZE,
            ledger: ChunkLedger::new(),
            finished: false,
        }
    }

    /// Allocate backend stream state.
    pub fn init(&mut self) -> Result<()> {
        debug_assert!(self.codec.is_none(), "init called twice");
        if self.input.len() as u64 > u32::MAX as u64 {
            return Err(Error::InputTooLarge);
        }
        self.codec = Some(Codec::new(self.algorithm, self.level)?);
        Ok(())
    }

    /// Container bytes produced so far (header reservation included). After
    /// [`Status::MoreOutput`], the caller must carry this prefix of the old
    /// buffer into the grown one.
    pub fn out_written(&self) -> usize {
        self.outbytes
    }

    /// Advance the state machine by one step, writing into `out` past the
    /// bytes already produced.
    ///
    /// `out` must be the same logical buffer across calls: at least
    /// [`out_written`](Self::out_written) bytes long, with that prefix intact,
    /// and longer than the container header.
    pub fn compress_more(&mut self, out: &mut [u8]) -> Result<Status> {
        assert!(!self.finished, "compress_more called after completion");
        assert!(out.len() > HEADER_SIZE, "output buffer too small for any payload");
        let codec = self.codec.as_mut().expect("compressor not initialized");

        let remaining = self.input.len() - self.cursor;
        let mut step = remaining.min(MAX_STEP_BYTES);
        // Clamp the step at the chunk border so no chunk outgrows CHUNK_SIZE.
        let mut flush = false;
        if self.ledger.current() + step >= CHUNK_SIZE {
            step = CHUNK_SIZE - self.ledger.current();
            flush = true;
        }
        let done = step == remaining;
        let directive = if done {
            Directive::Finish
        } else if flush {
            Directive::Flush
        } else {
            Directive::Feed
        };

        let input = &self.input[self.cursor..self.cursor + step];
        let outcome = codec.step(input, &mut out[self.outbytes..], directive)?;
        self.outbytes += outcome.written;
        self.cursor += outcome.consumed;
        self.ledger.advance(outcome.consumed);

        if outcome.more_output {
            return Ok(Status::MoreOutput);
        }

        if (done && outcome.finished) || (!done && self.ledger.current() == CHUNK_SIZE) {
            let end_offset = u32::try_from(self.outbytes).map_err(|_| Error::InputTooLarge)?;
            self.ledger.complete_chunk(end_offset);
        }

        if done && outcome.finished {
            debug_assert_eq!(self.ledger.completed(), chunk_count(self.input.len()));
            self.finished = true;
            return Ok(Status::Done);
        }
        Ok(Status::Continue)
    }

    /// Exact container size once [`Status::Done`] has been returned.
    pub fn total_bytes_needed(&self) -> usize {
        debug_assert!(self.finished, "container size is only known after Done");
        align_to_u32(self.outbytes) + 4 * self.ledger.completed()
    }

    /// Stamp the header, zero the alignment padding, and append the chunk
    /// offset table. `dest` must be exactly
    /// [`total_bytes_needed`](Self::total_bytes_needed) long and hold the
    /// payload produced by stepping in its first
    /// [`out_written`](Self::out_written) bytes.
    pub fn finish(self, dest: &mut [u8]) {
        assert!(self.finished, "finish called before compression completed");
        assert_eq!(dest.len(), self.total_bytes_needed(), "destination size mismatch");

        let header = ContainerHeader {
            compressed_bytes: (self.outbytes - HEADER_SIZE) as u32,
            algorithm: self.algorithm,
            level: self.level,
        };
        dest[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

        // Zero the padding: downstream caches hash the whole container.
        let aligned = align_to_u32(self.outbytes);
        dest[self.outbytes..aligned].fill(0);

        let mut at = aligned;
        for offset in self.ledger.offsets() {
            dest[at..at + 4].copy_from_slice(&offset.to_le_bytes());
            at += 4;
        }
        debug_assert_eq!(at, dest.len());
    }
}
