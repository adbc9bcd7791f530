//! Crate-wide error type.
//!
//! Per the error handling design, malformed wire data is never propagated as a hard error: codecs
//! return `bool`/`Option` and the caller drops the packet. This [`Error`] type is reserved for the
//! smaller set of conditions that are genuinely exceptional (peeking a packing-peeking MMIE,
//! application-bridge queue plumbing) and that a caller may want to match on.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by [`crate::mmie::PackingPeeking::packed_size_by_peeking`].
///
/// These are the only MMIE-layer errors that propagate as `Err` rather than as a dropped packet,
/// because the caller (the streaming decoder) needs to distinguish "keep decoding" from "abandon
/// the rest of this transport block" -- see [`crate::mac_pdu::decoder`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PeekError {
    #[error("non-reserved field was set to a reserved value")]
    NonreservedSetToReserved,
    #[error("non-reserved field was set to an unsupported value")]
    NonreservedSetToUnsupported,
    #[error("reserved field was not zero")]
    ReservedFieldNotZero,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("HARQ process pool exhausted")]
    HarqUnavailable,
    #[error("application queue is full")]
    QueueFull,
    #[error("identity is reserved or otherwise invalid: {0}")]
    InvalidIdentity(&'static str),
    #[error("peer short RD ID {0:#06x} conflicts with a known contact")]
    IdentityClash(u16),
    #[error("hardware layer reported an error: {0}")]
    Hw(String),
}
