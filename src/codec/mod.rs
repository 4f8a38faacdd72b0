//! Streaming codec backends behind one step contract.
//!
//! The compressor driver is backend-agnostic: each step it hands the codec an
//! input slice, the unused tail of the output buffer, and a directive, and the
//! codec reports how far it got. Chunk accounting and buffer growth stay in
//! the driver.

mod deflate;
mod zstd;

use crate::error::Result;
use crate::header::Algorithm;

/// What the driver wants from this step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Directive {
    /// Consume input, emit output as convenient.
    Feed,
    /// Consume input, then seal a chunk boundary: everything emitted so far
    /// must be decodable on its own and the stream re-synchronized.
    Flush,
    /// Consume input, then end the stream.
    Finish,
}

/// What a step accomplished.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StepOutcome {
    pub consumed: usize,
    pub written: usize,
    /// The output buffer filled up before the directive completed. The caller
    /// must grow the buffer; no input position is lost.
    pub more_output: bool,
    /// The stream end marker is fully emitted (Finish only).
    pub finished: bool,
}

pub(crate) enum Codec {
    Deflate(flate2::Compress),
    Zstd(Box<::zstd::stream::raw::Encoder<'static>>),
}

impl Codec {
    pub fn new(algorithm: Algorithm, level: u8) -> Result<Self> {
        match algorithm {
            Algorithm::Deflate => Ok(Codec::Deflate(deflate::new_stream(level))),
            Algorithm::Zstd => Ok(Codec::Zstd(Box::new(zstd::new_stream(level)?))),
        }
    }

    pub fn step(
        &mut self,
        input: &[u8],
        out: &mut [u8],
        directive: Directive,
    ) -> Result<StepOutcome> {
        match self {
            Codec::Deflate(stream) => deflate::step(stream, input, out, directive),
            Codec::Zstd(stream) => zstd::step(stream, input, out, directive),
        }
    }
}
