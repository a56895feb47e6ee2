//! IEC 60870-5-104 codec for tokio.
//!
//! This module provides a codec implementation for framing IEC 104 APDUs on
//! a byte stream using the tokio-util codec framework. ASDUs are carried as
//! opaque bytes.

use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};

use crate::builder::{new_i_frame_into, new_s_frame_into, new_u_frame_into};
use crate::config::CodecConfig;
use crate::error::Iec104Error;
use crate::parser::{parse_apdu, parse_apdu_strict};
use crate::types::{Frame, UFunction, APCI_LENGTH, MAX_APDU_LENGTH, MIN_APDU_LENGTH, START_BYTE};

/// An IEC 104 APDU (Application Protocol Data Unit).
///
/// Contains the classified control field and, for I-frames, the ASDU bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    /// Classified APCI control field
    pub frame: Frame,
    /// ASDU bytes - empty for S-frames and U-frames
    pub asdu: Bytes,
}

impl Apdu {
    /// Create a new I-frame APDU with ASDU.
    pub fn i_frame(send_seq: u16, recv_seq: u16, asdu: impl Into<Bytes>) -> Self {
        Self {
            frame: Frame::i_frame(send_seq, recv_seq),
            asdu: asdu.into(),
        }
    }

    /// Create a new S-frame APDU.
    pub fn s_frame(recv_seq: u16) -> Self {
        Self {
            frame: Frame::s_frame(recv_seq),
            asdu: Bytes::new(),
        }
    }

    /// Create a new U-frame APDU.
    pub fn u_frame(function: UFunction) -> Self {
        Self {
            frame: Frame::u_frame(function),
            asdu: Bytes::new(),
        }
    }

    /// Check if this is an I-frame.
    pub fn is_i_frame(&self) -> bool {
        self.frame.is_i_frame()
    }

    /// Check if this is an S-frame.
    pub fn is_s_frame(&self) -> bool {
        self.frame.is_s_frame()
    }

    /// Check if this is a U-frame.
    pub fn is_u_frame(&self) -> bool {
        self.frame.is_u_frame()
    }
}

impl std::fmt::Display for Apdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.frame)?;
        if self.is_i_frame() {
            write!(f, " ASDU({} bytes)", self.asdu.len())?;
        }
        Ok(())
    }
}

/// IEC 60870-5-104 codec.
///
/// Frame boundaries are found from the start byte and the APDU length
/// field. Bytes before a start byte, and start bytes followed by an
/// impossible length, are skipped.
///
/// With [`CodecConfig::strict`] set, a frame failing
/// [`Apci::validate_strict`](crate::types::Apci::validate_strict) is
/// returned as an error, which ends a `Framed` stream.
///
/// # Example
///
/// ```rust,ignore
/// use futures::{SinkExt, StreamExt};
/// use iec104_apci::{codec, Apdu, CodecConfig, UFunction};
///
/// let stream = TcpStream::connect("192.168.1.100:2404").await?;
/// let mut framed = codec::framed(stream, CodecConfig::default());
///
/// framed.send(Apdu::u_frame(UFunction::StartDtActive)).await?;
///
/// while let Some(apdu) = framed.next().await {
///     println!("Received: {}", apdu?);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Iec104Codec {
    config: CodecConfig,
    state: DecodeState,
}

#[derive(Debug, Clone, Default)]
#[allow(clippy::enum_variant_names)]
enum DecodeState {
    #[default]
    WaitingForStart,
    WaitingForLength,
    WaitingForData {
        length: usize,
    },
}

impl Iec104Codec {
    /// Create a new IEC 104 codec with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with the given configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            state: DecodeState::default(),
        }
    }

    /// Get the codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// Wrap a transport in a [`Framed`] using [`Iec104Codec`].
pub fn framed<T>(io: T, config: CodecConfig) -> Framed<T, Iec104Codec>
where
    T: AsyncRead + AsyncWrite,
{
    Framed::new(io, Iec104Codec::with_config(config))
}

#[cfg(feature = "tracing-support")]
fn log_discarded(count: usize, reason: &'static str) {
    tracing::debug!(count, reason, "IEC 104 codec discarded bytes");
}

#[cfg(not(feature = "tracing-support"))]
fn log_discarded(_count: usize, _reason: &'static str) {}

impl Decoder for Iec104Codec {
    type Item = Apdu;
    type Error = Iec104Error;

    fn decode(
        &mut self,
        src: &mut BytesMut,
    ) -> std::result::Result<Option<Self::Item>, Self::Error> {
        loop {
            match &self.state {
                DecodeState::WaitingForStart => {
                    // Skip bytes until we find the start byte
                    let skip = src
                        .iter()
                        .position(|&b| b == START_BYTE)
                        .unwrap_or(src.len());
                    if skip > 0 {
                        log_discarded(skip, "no start byte");
                        src.advance(skip);
                    }

                    if src.is_empty() {
                        return Ok(None);
                    }

                    self.state = DecodeState::WaitingForLength;
                }

                DecodeState::WaitingForLength => {
                    // Need at least 2 bytes (start + length)
                    if src.len() < 2 {
                        return Ok(None);
                    }

                    let length = src[1] as usize;

                    if !(MIN_APDU_LENGTH..=MAX_APDU_LENGTH).contains(&length) {
                        // Invalid length, skip start byte and restart
                        log_discarded(1, "invalid APDU length");
                        src.advance(1);
                        self.state = DecodeState::WaitingForStart;
                        continue;
                    }

                    self.state = DecodeState::WaitingForData { length };
                }

                DecodeState::WaitingForData { length } => {
                    let total_length = 2 + length; // start + length byte + APDU content

                    if src.len() < total_length {
                        src.reserve(total_length - src.len());
                        return Ok(None);
                    }

                    // We have a complete frame
                    let data = src.split_to(total_length).freeze();
                    self.state = DecodeState::WaitingForStart;

                    let (apci, _) = if self.config.strict {
                        parse_apdu_strict(&data)?
                    } else {
                        parse_apdu(&data)?
                    };
                    let frame = apci.frame();

                    let asdu = if frame.is_i_frame() {
                        data.slice(APCI_LENGTH..)
                    } else {
                        Bytes::new()
                    };

                    #[cfg(feature = "tracing-support")]
                    tracing::trace!(%frame, asdu_len = asdu.len(), "decoded APDU");

                    return Ok(Some(Apdu { frame, asdu }));
                }
            }
        }
    }
}

impl Encoder<Apdu> for Iec104Codec {
    type Error = Iec104Error;

    fn encode(&mut self, item: Apdu, dst: &mut BytesMut) -> std::result::Result<(), Self::Error> {
        // S-frames and U-frames have no room for an ASDU
        if !item.frame.is_i_frame() && !item.asdu.is_empty() {
            return Err(Iec104Error::UnexpectedPayload {
                frame_type: item.frame.frame_type(),
                len: item.asdu.len(),
            });
        }

        match item.frame {
            Frame::IFrame { send_seq, recv_seq } => new_i_frame_into(
                dst,
                &item.asdu,
                send_seq,
                recv_seq,
                self.config.max_asdu_size,
            )?,
            Frame::SFrame { recv_seq } => new_s_frame_into(dst, recv_seq),
            Frame::UFrame { function } => new_u_frame_into(dst, function),
        }

        #[cfg(feature = "tracing-support")]
        tracing::trace!(frame = %item.frame, asdu_len = item.asdu.len(), "encoded APDU");

        Ok(())
    }
}
