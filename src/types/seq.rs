//! 15-bit APCI sequence numbers.
//!
//! I-frames carry a send and a receive sequence number, S-frames a receive
//! sequence number. Each occupies 15 bits of the control field, split into
//! 7 low bits (shifted left past the frame-type bit) and 8 high bits:
//!
//! ```text
//!   low byte:  | b6 b5 b4 b3 b2 b1 b0 | tag |
//!   high byte: | b14 ...            b7      |
//! ```

/// Sequence numbers count modulo 2^15.
pub const SEQ_MODULO: u16 = 32768;

/// Largest valid sequence number.
pub const MAX_SEQ: u16 = SEQ_MODULO - 1;

/// Pack a sequence number into its two control field bytes.
///
/// Bit 0 of the low byte is left clear for the frame-type tag. Bit 15 of
/// `seq` is discarded.
#[inline]
pub const fn encode_seq(seq: u16) -> [u8; 2] {
    [(seq << 1) as u8, (seq >> 7) as u8]
}

/// Unpack a sequence number from its two control field bytes.
///
/// Bit 0 of `low` is the frame-type tag and is ignored. The result is
/// always in `0..=MAX_SEQ`.
#[inline]
pub const fn decode_seq(low: u8, high: u8) -> u16 {
    ((low >> 1) as u16) | ((high as u16) << 7)
}

/// A sequence number in `0..=32767`.
///
/// The codec only encodes and decodes these values. The arithmetic helpers
/// are for the session layer, which owns the send/receive counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SeqNumber(u16);

impl SeqNumber {
    /// Zero, the value both counters start at after connecting.
    pub const ZERO: Self = Self(0);

    /// Create a sequence number, discarding bit 15.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value & MAX_SEQ)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The following sequence number, wrapping 32767 to 0.
    #[inline]
    pub const fn next(self) -> Self {
        self.wrapping_add(1)
    }

    /// Add `n` modulo 32768.
    #[inline]
    pub const fn wrapping_add(self, n: u16) -> Self {
        Self(((self.0 as u32 + n as u32) % SEQ_MODULO as u32) as u16)
    }

    /// Number of increments needed to get from `self` to `other`.
    ///
    /// A peer acknowledging `other` while our oldest unconfirmed frame is
    /// `self` confirms exactly this many frames.
    #[inline]
    pub const fn distance_to(self, other: Self) -> u16 {
        ((other.0 as u32 + SEQ_MODULO as u32 - self.0 as u32) % SEQ_MODULO as u32) as u16
    }

    /// Control field bytes for this number.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 2] {
        encode_seq(self.0)
    }

    /// Parse from control field bytes.
    #[inline]
    pub const fn from_bytes(low: u8, high: u8) -> Self {
        Self(decode_seq(low, high))
    }
}

impl From<SeqNumber> for u16 {
    fn from(seq: SeqNumber) -> Self {
        seq.0
    }
}

impl std::fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
