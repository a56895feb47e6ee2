//! APDU builders.
//!
//! Each builder returns a complete frame ready to be written to the
//! transport. The `_into` variants append to an existing buffer and are used
//! by [`Iec104Codec`](crate::codec::Iec104Codec).

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Iec104Error, Result};
use crate::types::{Apci, UFunction, APCI_LENGTH, MAX_ASDU_SIZE};

/// Build an I-frame carrying `asdu`.
///
/// Fails with [`Iec104Error::AsduTooLarge`] if `asdu` is longer than
/// [`MAX_ASDU_SIZE`] (249 bytes).
///
/// # Example
///
/// ```
/// use iec104_apci::builder::new_i_frame;
///
/// let frame = new_i_frame(&[0xAA, 0xBB], 1, 0).unwrap();
/// assert_eq!(&frame[..], &[0x68, 0x06, 0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB]);
/// ```
pub fn new_i_frame(asdu: &[u8], send_seq: u16, recv_seq: u16) -> Result<Bytes> {
    new_i_frame_with_limit(asdu, send_seq, recv_seq, MAX_ASDU_SIZE)
}

/// Build an I-frame, enforcing a negotiated ASDU size limit.
///
/// `max_asdu_size` is clamped to [`MAX_ASDU_SIZE`].
pub fn new_i_frame_with_limit(
    asdu: &[u8],
    send_seq: u16,
    recv_seq: u16,
    max_asdu_size: usize,
) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(APCI_LENGTH + asdu.len());
    new_i_frame_into(&mut buf, asdu, send_seq, recv_seq, max_asdu_size)?;
    Ok(buf.freeze())
}

/// Append an I-frame to `dst`. Nothing is written on error.
pub fn new_i_frame_into(
    dst: &mut BytesMut,
    asdu: &[u8],
    send_seq: u16,
    recv_seq: u16,
    max_asdu_size: usize,
) -> Result<()> {
    let max = max_asdu_size.min(MAX_ASDU_SIZE);
    if asdu.len() > max {
        return Err(Iec104Error::asdu_too_large(asdu.len(), max));
    }

    let header = Apci::i_frame(send_seq, recv_seq, asdu.len())?;
    dst.reserve(APCI_LENGTH + asdu.len());
    dst.put_slice(&header.to_bytes());
    dst.put_slice(asdu);
    Ok(())
}

/// Build an S-frame acknowledging everything before `recv_seq`.
///
/// ```
/// use iec104_apci::builder::new_s_frame;
///
/// assert_eq!(&new_s_frame(5)[..], &[0x68, 0x04, 0x01, 0x00, 0x0A, 0x00]);
/// ```
pub fn new_s_frame(recv_seq: u16) -> Bytes {
    Bytes::copy_from_slice(&Apci::s_frame(recv_seq).to_bytes())
}

/// Append an S-frame to `dst`.
pub fn new_s_frame_into(dst: &mut BytesMut, recv_seq: u16) {
    dst.put_slice(&Apci::s_frame(recv_seq).to_bytes());
}

/// Build a U-frame.
///
/// ```
/// use iec104_apci::builder::new_u_frame;
/// use iec104_apci::UFunction;
///
/// let frame = new_u_frame(UFunction::StartDtActive);
/// assert_eq!(&frame[..], &[0x68, 0x04, 0x07, 0x00, 0x00, 0x00]);
/// ```
pub fn new_u_frame(function: UFunction) -> Bytes {
    Bytes::copy_from_slice(&Apci::u_frame(function).to_bytes())
}

/// Append a U-frame to `dst`.
pub fn new_u_frame_into(dst: &mut BytesMut, function: UFunction) {
    dst.put_slice(&Apci::u_frame(function).to_bytes());
}
