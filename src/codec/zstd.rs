//! Zstd backend via the raw streaming encoder.
//!
//! A chunk boundary ends the current zstd frame and re-arms the encoder, so
//! the payload is a concatenation of complete frames, one per chunk. Flushing
//! without ending the frame would leave later chunks as mid-frame blocks that
//! no fresh decoder can parse, breaking per-chunk decoding.

use zstd::stream::raw::{Encoder, InBuffer, Operation, OutBuffer};

use crate::codec::{Directive, StepOutcome};
use crate::error::{Error, Result};

const DEFAULT_LEVEL: i32 = 3;

pub(crate) fn new_stream(level: u8) -> Result<Encoder<'static>> {
    let level = if level == 0 {
        DEFAULT_LEVEL
    } else {
        i32::from(level)
    };
    Encoder::new(level).map_err(Error::Codec)
}

pub(crate) fn step(
    encoder: &mut Encoder<'static>,
    input: &[u8],
    out: &mut [u8],
    directive: Directive,
) -> Result<StepOutcome> {
    let space = out.len();
    let mut src = InBuffer::around(input);
    let mut dst = OutBuffer::around(out);
    let mut outcome = StepOutcome::default();

    if !input.is_empty() {
        encoder.run(&mut src, &mut dst).map_err(Error::Codec)?;
    }
    outcome.consumed = src.pos;

    match directive {
        Directive::Feed => {
            outcome.more_output = dst.pos() == space || outcome.consumed < input.len();
        }
        Directive::Flush => {
            if outcome.consumed < input.len() {
                outcome.more_output = true;
            } else {
                // End the frame; the next chunk starts a fresh one.
                let remaining = encoder.finish(&mut dst, true).map_err(Error::Codec)?;
                if remaining == 0 {
                    encoder.reinit().map_err(Error::Codec)?;
                } else {
                    outcome.more_output = true;
                }
            }
        }
        Directive::Finish => {
            if outcome.consumed < input.len() {
                outcome.more_output = true;
            } else {
                let remaining = encoder.finish(&mut dst, true).map_err(Error::Codec)?;
                if remaining == 0 {
                    outcome.finished = true;
                } else {
                    outcome.more_output = true;
                }
            }
        }
    }

    outcome.written = dst.pos();
    Ok(outcome)
}
