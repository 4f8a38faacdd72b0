//! Raw-deflate backend via flate2.
//!
//! The stream uses raw deflate framing (no zlib header or trailer): chunked
//! decoding restarts an inflater mid-payload, which only works without the
//! wrapper. Full-flush markers at chunk boundaries re-synchronize the stream
//! so each chunk's segment inflates from a fresh state.

use std::io;

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::codec::{Directive, StepOutcome};
use crate::error::{Error, Result};

pub(crate) fn new_stream(level: u8) -> Compress {
    // Level 0 requests the backend default: the fastest setting, not
    // deflate's "store uncompressed".
    let compression = if level == 0 {
        Compression::fast()
    } else {
        Compression::new(u32::from(level))
    };
    Compress::new(compression, false)
}

pub(crate) fn step(
    stream: &mut Compress,
    input: &[u8],
    out: &mut [u8],
    directive: Directive,
) -> Result<StepOutcome> {
    let flush = match directive {
        Directive::Feed => FlushCompress::None,
        Directive::Flush => FlushCompress::Full,
        Directive::Finish => FlushCompress::Finish,
    };

    let space = out.len();
    let in_before = stream.total_in();
    let out_before = stream.total_out();
    let status = stream
        .compress(input, out, flush)
        .map_err(|err| Error::Codec(io::Error::new(io::ErrorKind::Other, err)))?;

    let mut outcome = StepOutcome {
        consumed: (stream.total_in() - in_before) as usize,
        written: (stream.total_out() - out_before) as usize,
        ..StepOutcome::default()
    };

    match status {
        Status::StreamEnd => outcome.finished = true,
        Status::Ok => outcome.more_output = outcome.written == space,
        Status::BufError => {
            // zlib reports Z_BUF_ERROR when it cannot make progress. On an
            // empty retry of a full flush with output room to spare, that
            // means the marker already drained completely; everywhere else
            // the output is full.
            let flush_drained = directive == Directive::Flush
                && input.is_empty()
                && outcome.written == 0
                && space > 0;
            outcome.more_output = !flush_drained;
        }
    }
    Ok(outcome)
}
