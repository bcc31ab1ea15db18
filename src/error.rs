//! Error taxonomy for the codec.
//!
//! The reader's framing checks (`ShortBuffer`, `BadStartMarker`,
//! `BadEndMarker`, `BadMbrMarker`) are deliberately NOT variants here: those
//! failures are reported as `Ok(None)` from [`crate::reader::Reader::read`],
//! not as an `Err`. This enum only covers failures that mean the bytes
//! claimed to be a valid frame but are structurally broken past that point.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpatialiteError {
    #[error("malformed endian marker at offset {offset}: {value:#04x}")]
    MalformedEndian { offset: usize, value: u8 },

    #[error("malformed geometry type code {value} at offset {offset}")]
    MalformedType { offset: usize, value: i32 },

    #[error("expected entity marker 0x69 at offset {offset}, found {value:#04x}")]
    MissingEntityMarker { offset: usize, value: u8 },

    #[error("child kind mismatch at offset {offset}: expected {expected}, got {got}")]
    ChildKindMismatch {
        offset: usize,
        expected: u32,
        got: u32,
    },

    #[error("unsupported combination: {reason}")]
    UnsupportedCombination { reason: &'static str },

    /// Truncation discovered while decoding a payload that already passed
    /// the initial framing checks, e.g. a declared vertex count that runs
    /// past the end of the buffer. Framing-level shortness (the blob is
    /// under the 45-byte minimum) is not this variant; it is the `Ok(None)`
    /// soft return from [`crate::reader::Reader::read`].
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
