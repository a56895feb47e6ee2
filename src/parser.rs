//! APDU parser.
//!
//! Splits one complete APDU into its header and payload and classifies the
//! header. The input must be exactly one frame; finding frame boundaries in
//! a byte stream is the job of [`Iec104Codec`](crate::codec::Iec104Codec).

use crate::error::Result;
use crate::types::{Apci, Frame, APCI_LENGTH};

/// Split an APDU into its header and payload.
///
/// Permissive: the start byte, length field and reserved control bits are
/// not checked. Input shorter than 6 bytes is rejected with
/// [`Iec104Error::FrameTooShort`](crate::Iec104Error::FrameTooShort).
///
/// # Example
///
/// ```
/// use iec104_apci::parse_apdu;
/// use iec104_apci::Frame;
///
/// let (apci, asdu) = parse_apdu(&[0x68, 0x06, 0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB]).unwrap();
/// assert_eq!(apci.frame(), Frame::i_frame(1, 0));
/// assert_eq!(asdu, &[0xAA, 0xBB]);
/// ```
pub fn parse_apdu(data: &[u8]) -> Result<(Apci, &[u8])> {
    let apci = Apci::from_bytes(data)?;
    Ok((apci, &data[APCI_LENGTH..]))
}

/// Split an APDU and check it with [`Apci::validate_strict`].
pub fn parse_apdu_strict(data: &[u8]) -> Result<(Apci, &[u8])> {
    let (apci, payload) = parse_apdu(data)?;
    apci.validate_strict(payload.len())?;
    Ok((apci, payload))
}

/// Split and classify an APDU.
pub fn parse_frame(data: &[u8]) -> Result<(Frame, &[u8])> {
    let (apci, payload) = parse_apdu(data)?;
    Ok((apci.frame(), payload))
}
