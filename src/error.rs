//! Error types for the IEC 60870-5-104 APCI codec.

use thiserror::Error;

use crate::types::FrameType;

/// Result type alias for APCI codec operations.
pub type Result<T> = std::result::Result<T, Iec104Error>;

/// APCI codec error types.
#[derive(Debug, Error)]
pub enum Iec104Error {
    /// ASDU exceeds the maximum I-frame payload
    #[error("ASDU too large: {size} bytes (max {max})")]
    AsduTooLarge { size: usize, max: usize },

    /// Fewer bytes than a complete APCI header
    #[error("Frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },

    /// Start byte is not 0x68 (strict validation)
    #[error("Invalid start byte: 0x{0:02X}")]
    InvalidStartByte(u8),

    /// Declared APDU length disagrees with the bytes present (strict validation)
    #[error("APDU length mismatch: declared {declared}, actual {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Reserved control field bits are set in an S- or U-frame (strict validation)
    #[error("Reserved bits set in {frame_type} control field: 0x{byte:02X}")]
    ReservedBitsSet { frame_type: FrameType, byte: u8 },

    /// S- or U-frame carries payload bytes (strict validation)
    #[error("{frame_type} must not carry payload ({len} bytes found)")]
    UnexpectedPayload { frame_type: FrameType, len: usize },

    /// U-frame function matches none of the six defined functions (strict validation)
    #[error("Unknown U-frame function: 0x{0:02X}")]
    UnknownUFunction(u8),

    /// I/O error from the underlying transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Iec104Error {
    /// Create an oversize ASDU error.
    pub fn asdu_too_large(size: usize, max: usize) -> Self {
        Self::AsduTooLarge { size, max }
    }

    /// Create a short frame error.
    pub fn frame_too_short(expected: usize, actual: usize) -> Self {
        Self::FrameTooShort { expected, actual }
    }

    /// Check if this error describes malformed frame content rather than
    /// a transport or build problem.
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::InvalidStartByte(_)
                | Self::LengthMismatch { .. }
                | Self::ReservedBitsSet { .. }
                | Self::UnexpectedPayload { .. }
                | Self::UnknownUFunction(_)
        )
    }
}
