use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    InputTooLarge,
    Codec(io::Error),
    UnknownAlgorithm(u8),
    Corrupt(&'static str),
    Truncated(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputTooLarge => write!(f, "input too large for a u32-addressed container"),
            Error::Codec(err) => write!(f, "codec error: {err}"),
            Error::UnknownAlgorithm(tag) => write!(f, "unknown algorithm tag: {tag}"),
            Error::Corrupt(msg) => write!(f, "corrupt container: {msg}"),
            Error::Truncated(msg) => write!(f, "truncated container: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Codec(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
