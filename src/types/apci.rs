//! IEC 60870-5-104 APCI (Application Protocol Control Information).
//!
//! APCI is the 6-byte header of an APDU, containing frame type and sequence numbers.

use crate::error::{Iec104Error, Result};
use crate::types::seq::{decode_seq, encode_seq};

/// Start byte for IEC 104 frames.
pub const START_BYTE: u8 = 0x68;

/// APCI header length (start byte + length byte + control field).
pub const APCI_LENGTH: usize = 6;

/// Control field length.
pub const CONTROL_FIELD_LENGTH: usize = 4;

/// Minimum APDU length field value (control field only, no ASDU).
pub const MIN_APDU_LENGTH: usize = CONTROL_FIELD_LENGTH;

/// Maximum APDU length field value.
pub const MAX_APDU_LENGTH: usize = 253;

/// Maximum APDU size on the wire, including start and length bytes.
pub const MAX_APDU_SIZE: usize = MAX_APDU_LENGTH + 2;

/// Maximum ASDU size carried by an I-frame.
pub const MAX_ASDU_SIZE: usize = MAX_APDU_LENGTH - CONTROL_FIELD_LENGTH;

/// Mask selecting the frame-type tag bits of the first control byte.
const FRAME_TAG_MASK: u8 = 0x03;

/// Mask selecting the U-frame function bits of the first control byte.
const U_FUNCTION_MASK: u8 = 0xFC;

/// APCI frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// I-frame: Information transfer
    IFrame,
    /// S-frame: Supervisory (acknowledgment)
    SFrame,
    /// U-frame: Unnumbered (control)
    UFrame,
}

impl std::fmt::Display for FrameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::IFrame => "I-frame",
            Self::SFrame => "S-frame",
            Self::UFrame => "U-frame",
        };
        f.write_str(name)
    }
}

/// U-frame function codes.
///
/// Each defined function is a single bit in the six high bits of the first
/// control byte. `STARTDT` and `STOPDT` move a connection between the
/// stopped and started data-transfer states, `TESTFR` is a keepalive usable
/// in either state. Which function may follow which is decided by the
/// session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UFunction {
    /// STARTDT act (Start Data Transfer activation)
    StartDtActive,
    /// STARTDT con (Start Data Transfer confirmation)
    StartDtConfirm,
    /// STOPDT act (Stop Data Transfer activation)
    StopDtActive,
    /// STOPDT con (Stop Data Transfer confirmation)
    StopDtConfirm,
    /// TESTFR act (Test Frame activation)
    TestFrActive,
    /// TESTFR con (Test Frame confirmation)
    TestFrConfirm,
    /// Any other bit pattern. Structurally valid, but not a defined function.
    Unknown(UnknownBits),
}

/// U-frame function bits matching none of the defined functions.
///
/// Only [`UFunction::from_bits`] creates these, so every control byte maps
/// to exactly one `UFunction` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownBits(u8);

impl UnknownBits {
    /// Get the function bits (tag bits clear).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl UFunction {
    /// All six defined functions.
    pub const ALL: [UFunction; 6] = [
        Self::StartDtActive,
        Self::StartDtConfirm,
        Self::StopDtActive,
        Self::StopDtConfirm,
        Self::TestFrActive,
        Self::TestFrConfirm,
    ];

    /// Get the function bits (tag bits clear).
    #[inline]
    pub const fn bits(&self) -> u8 {
        match self {
            Self::StartDtActive => 0x04,  // 0000 0100
            Self::StartDtConfirm => 0x08, // 0000 1000
            Self::StopDtActive => 0x10,   // 0001 0000
            Self::StopDtConfirm => 0x20,  // 0010 0000
            Self::TestFrActive => 0x40,   // 0100 0000
            Self::TestFrConfirm => 0x80,  // 1000 0000
            Self::Unknown(unknown) => unknown.bits(),
        }
    }

    /// Classify function bits. The two tag bits are ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & U_FUNCTION_MASK {
            0x04 => Self::StartDtActive,
            0x08 => Self::StartDtConfirm,
            0x10 => Self::StopDtActive,
            0x20 => Self::StopDtConfirm,
            0x40 => Self::TestFrActive,
            0x80 => Self::TestFrConfirm,
            other => Self::Unknown(UnknownBits(other)),
        }
    }

    /// Get the complete first control byte (function bits plus `11` tag).
    #[inline]
    pub const fn control_byte(&self) -> u8 {
        self.bits() | FRAME_TAG_MASK
    }

    /// Diagnostic name of the function.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartDtActive => "StartDtActive",
            Self::StartDtConfirm => "StartDtConfirm",
            Self::StopDtActive => "StopDtActive",
            Self::StopDtConfirm => "StopDtConfirm",
            Self::TestFrActive => "TestFrActive",
            Self::TestFrConfirm => "TestFrConfirm",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Check if this is one of the six defined functions.
    #[inline]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Check if this is an activation (`act`) function.
    #[inline]
    pub const fn is_activation(&self) -> bool {
        matches!(
            self,
            Self::StartDtActive | Self::StopDtActive | Self::TestFrActive
        )
    }

    /// Check if this is a confirmation (`con`) function.
    #[inline]
    pub const fn is_confirmation(&self) -> bool {
        matches!(
            self,
            Self::StartDtConfirm | Self::StopDtConfirm | Self::TestFrConfirm
        )
    }

    /// The confirmation a peer answers this activation with.
    pub const fn confirmation(&self) -> Option<Self> {
        match self {
            Self::StartDtActive => Some(Self::StartDtConfirm),
            Self::StopDtActive => Some(Self::StopDtConfirm),
            Self::TestFrActive => Some(Self::TestFrConfirm),
            _ => None,
        }
    }
}

impl std::fmt::Display for UFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classified APCI control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// I-frame with send and receive sequence numbers.
    IFrame {
        /// Send sequence number (0-32767)
        send_seq: u16,
        /// Receive sequence number (0-32767)
        recv_seq: u16,
    },
    /// S-frame with receive sequence number only.
    SFrame {
        /// Receive sequence number (0-32767)
        recv_seq: u16,
    },
    /// U-frame with function code.
    UFrame {
        /// U-frame function
        function: UFunction,
    },
}

impl Frame {
    /// Create a new I-frame.
    #[inline]
    pub fn i_frame(send_seq: u16, recv_seq: u16) -> Self {
        Self::IFrame { send_seq, recv_seq }
    }

    /// Create a new S-frame.
    #[inline]
    pub fn s_frame(recv_seq: u16) -> Self {
        Self::SFrame { recv_seq }
    }

    /// Create a new U-frame.
    #[inline]
    pub fn u_frame(function: UFunction) -> Self {
        Self::UFrame { function }
    }

    /// Get the frame type.
    #[inline]
    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::IFrame { .. } => FrameType::IFrame,
            Self::SFrame { .. } => FrameType::SFrame,
            Self::UFrame { .. } => FrameType::UFrame,
        }
    }

    /// Encode to the 4 control field bytes.
    #[inline]
    pub fn control_field(&self) -> [u8; 4] {
        match self {
            Self::IFrame { send_seq, recv_seq } => {
                let [cf1, cf2] = encode_seq(*send_seq);
                let [cf3, cf4] = encode_seq(*recv_seq);
                [cf1, cf2, cf3, cf4]
            }
            Self::SFrame { recv_seq } => {
                let [cf3, cf4] = encode_seq(*recv_seq);
                [0x01, 0x00, cf3, cf4]
            }
            Self::UFrame { function } => [function.control_byte(), 0x00, 0x00, 0x00],
        }
    }

    /// Check if this is an I-frame.
    #[inline]
    pub fn is_i_frame(&self) -> bool {
        matches!(self, Self::IFrame { .. })
    }

    /// Check if this is an S-frame.
    #[inline]
    pub fn is_s_frame(&self) -> bool {
        matches!(self, Self::SFrame { .. })
    }

    /// Check if this is a U-frame.
    #[inline]
    pub fn is_u_frame(&self) -> bool {
        matches!(self, Self::UFrame { .. })
    }

    /// Get the send sequence number (I-frame only).
    #[inline]
    pub fn send_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { send_seq, .. } => Some(*send_seq),
            _ => None,
        }
    }

    /// Get the receive sequence number (I-frame and S-frame).
    #[inline]
    pub fn recv_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { recv_seq, .. } | Self::SFrame { recv_seq } => Some(*recv_seq),
            _ => None,
        }
    }

    /// Get the U-frame function (U-frame only).
    #[inline]
    pub fn function(&self) -> Option<UFunction> {
        match self {
            Self::UFrame { function } => Some(*function),
            _ => None,
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IFrame { send_seq, recv_seq } => {
                write!(f, "I[sendNo: {}, recvNo: {}]", send_seq, recv_seq)
            }
            Self::SFrame { recv_seq } => write!(f, "S[recvNo: {}]", recv_seq),
            Self::UFrame { function } => write!(f, "U[function: {}]", function),
        }
    }
}

/// APCI (Application Protocol Control Information).
///
/// The raw 6-byte header of an IEC 104 APDU, kept verbatim so that
/// permissive parsing never loses information.
///
/// ```text
/// +--------+--------+--------+--------+--------+--------+
/// | 0x68   | Length | CF1    | CF2    | CF3    | CF4    |
/// +--------+--------+--------+--------+--------+--------+
///   Start    APDU     Control Field (4 bytes)
///   Byte     Length
/// ```
///
/// `apdu_len` counts the control field plus the ASDU, so the frame occupies
/// `apdu_len + 2` bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Apci {
    /// Start byte (0x68 on well-formed input)
    pub start: u8,
    /// APDU length field
    pub apdu_len: u8,
    /// Control field octet 1 (frame-type tag in bits 0-1)
    pub cf1: u8,
    /// Control field octet 2
    pub cf2: u8,
    /// Control field octet 3
    pub cf3: u8,
    /// Control field octet 4
    pub cf4: u8,
}

impl Apci {
    /// Build the header for `frame` followed by `asdu_len` ASDU bytes.
    ///
    /// Fails if `asdu_len` exceeds [`MAX_ASDU_SIZE`].
    pub fn new(frame: Frame, asdu_len: usize) -> Result<Self> {
        if asdu_len > MAX_ASDU_SIZE {
            return Err(Iec104Error::asdu_too_large(asdu_len, MAX_ASDU_SIZE));
        }
        let [cf1, cf2, cf3, cf4] = frame.control_field();
        Ok(Self {
            start: START_BYTE,
            apdu_len: (CONTROL_FIELD_LENGTH + asdu_len) as u8,
            cf1,
            cf2,
            cf3,
            cf4,
        })
    }

    /// Create an I-frame header for an ASDU of `asdu_len` bytes.
    #[inline]
    pub fn i_frame(send_seq: u16, recv_seq: u16, asdu_len: usize) -> Result<Self> {
        Self::new(Frame::i_frame(send_seq, recv_seq), asdu_len)
    }

    /// Create an S-frame header.
    #[inline]
    pub fn s_frame(recv_seq: u16) -> Self {
        Self::without_asdu(Frame::s_frame(recv_seq))
    }

    /// Create a U-frame header.
    #[inline]
    pub fn u_frame(function: UFunction) -> Self {
        Self::without_asdu(Frame::u_frame(function))
    }

    fn without_asdu(frame: Frame) -> Self {
        let [cf1, cf2, cf3, cf4] = frame.control_field();
        Self {
            start: START_BYTE,
            apdu_len: CONTROL_FIELD_LENGTH as u8,
            cf1,
            cf2,
            cf3,
            cf4,
        }
    }

    /// Read the header from the first 6 bytes of `data`, verbatim.
    #[inline]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match data {
            [start, apdu_len, cf1, cf2, cf3, cf4, ..] => Ok(Self {
                start: *start,
                apdu_len: *apdu_len,
                cf1: *cf1,
                cf2: *cf2,
                cf3: *cf3,
                cf4: *cf4,
            }),
            _ => Err(Iec104Error::frame_too_short(APCI_LENGTH, data.len())),
        }
    }

    /// Encode to the 6 header bytes.
    #[inline]
    pub fn to_bytes(&self) -> [u8; APCI_LENGTH] {
        [
            self.start,
            self.apdu_len,
            self.cf1,
            self.cf2,
            self.cf3,
            self.cf4,
        ]
    }

    /// Classify the control field.
    ///
    /// Total over every header: the two low bits of `cf1` always select
    /// exactly one frame type. Reserved bits are not checked here, see
    /// [`Apci::validate_strict`].
    #[inline]
    pub fn frame(&self) -> Frame {
        if self.cf1 & 0x01 == 0 {
            // I-frame: bit 0 = 0
            Frame::IFrame {
                send_seq: decode_seq(self.cf1, self.cf2),
                recv_seq: decode_seq(self.cf3, self.cf4),
            }
        } else if self.cf1 & FRAME_TAG_MASK == 0x01 {
            // S-frame: bits 0-1 = 01
            Frame::SFrame {
                recv_seq: decode_seq(self.cf3, self.cf4),
            }
        } else {
            // U-frame: bits 0-1 = 11
            Frame::UFrame {
                function: UFunction::from_bits(self.cf1),
            }
        }
    }

    /// Get the frame type.
    #[inline]
    pub fn frame_type(&self) -> FrameType {
        self.frame().frame_type()
    }

    /// Declared ASDU length (`apdu_len` minus the control field).
    #[inline]
    pub fn asdu_len(&self) -> usize {
        (self.apdu_len as usize).saturating_sub(CONTROL_FIELD_LENGTH)
    }

    /// Declared size of the whole APDU on the wire.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.apdu_len as usize + 2
    }

    /// Check the header against the fixed values of a well-formed frame.
    ///
    /// `payload_len` is the number of bytes that actually followed the
    /// header. Checks, in order: start byte, length field, reserved control
    /// field octets of S- and U-frames, absence of payload on S- and
    /// U-frames, and that a U-frame names a defined function.
    pub fn validate_strict(&self, payload_len: usize) -> Result<()> {
        if self.start != START_BYTE {
            return Err(Iec104Error::InvalidStartByte(self.start));
        }

        let actual = CONTROL_FIELD_LENGTH + payload_len;
        if self.apdu_len as usize != actual {
            return Err(Iec104Error::LengthMismatch {
                declared: self.apdu_len as usize,
                actual,
            });
        }

        let frame = self.frame();
        let reserved = match frame {
            Frame::IFrame { .. } => None,
            Frame::SFrame { .. } => [(self.cf1, 0x01), (self.cf2, 0x00)]
                .into_iter()
                .find(|(actual, expected)| actual != expected)
                .map(|(actual, _)| actual),
            Frame::UFrame { .. } => [self.cf2, self.cf3, self.cf4]
                .into_iter()
                .find(|&b| b != 0),
        };
        if let Some(byte) = reserved {
            return Err(Iec104Error::ReservedBitsSet {
                frame_type: frame.frame_type(),
                byte,
            });
        }

        if !frame.is_i_frame() && payload_len > 0 {
            return Err(Iec104Error::UnexpectedPayload {
                frame_type: frame.frame_type(),
                len: payload_len,
            });
        }

        if let Frame::UFrame {
            function: UFunction::Unknown(unknown),
        } = frame
        {
            return Err(Iec104Error::UnknownUFunction(unknown.bits()));
        }

        Ok(())
    }
}

impl std::fmt::Display for Apci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.frame())
    }
}
