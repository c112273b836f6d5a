use thiserror::Error;

use crate::entity::PartitionState;

/// Errors raised while framing or unframing bytes on the wire.
///
/// All of these are locally recoverable: the caller flushes the input and
/// keeps going (spec section "Failure semantics").
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("invalid start byte: {0:#04x}")]
    InvalidStart(u8),
    #[error("invalid escape sequence after 0x7d: {0:#04x}")]
    InvalidEscape(u8),
    #[error("frame length mismatch: expected {expected} trailing bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("checksum mismatch: expected {expected:#06x}, got {actual:#06x}")]
    ChecksumMismatch { expected: u16, actual: u16 },
    #[error("payload length {actual} does not match catalog length {expected} for type {msg_type:#04x}")]
    PayloadLength {
        msg_type: u8,
        expected: usize,
        actual: usize,
    },
    #[error("serial transport error")]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding a frame's payload into a semantic message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown message type code: {0:#04x}")]
    UnknownType(u8),
    #[error("message length {actual} disagrees with the catalog entry {expected} for type {msg_type:#04x}")]
    LengthMismatch {
        msg_type: u8,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised by the controller while orchestrating synchronization,
/// transition dispatch and high-level intents.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("panel did not enable required capability: {0}")]
    CapabilityMissing(&'static str),
    #[error("attempted to create a {0} after synchronization completed")]
    LateCreation(&'static str),
    #[error("partition index {0} out of range 1..=8")]
    PartitionIndexRange(u8),
    #[error("zone index {0} out of configured range")]
    ZoneIndexRange(u16),
    #[error("invalid PIN length {0}: must be 4 or 6 decimal digits")]
    InvalidPinLength(usize),
    #[error("invalid PIN: {0:?} is not all decimal digits")]
    InvalidPinDigit(String),
    #[error("no authentication method configured (no default PIN or user number)")]
    NoAuthConfigured,
    #[error("refusing to {action} partition {partition}: already in state {state:?}")]
    InvalidStateTransition {
        partition: u8,
        state: PartitionState,
        action: &'static str,
    },
    #[error("no live partition {0}")]
    UnknownPartition(u8),
    #[error("command {0} rejected by panel")]
    CommandRejected(&'static str),
    #[error("command {0} abandoned after exhausting retries")]
    CommandAbandoned(&'static str),
    #[error(transparent)]
    Framing(#[from] FramingError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
