//! IEC 60870-5-104 APCI type definitions.
//!
//! - `Apci` - the raw 6-byte APDU header
//! - `Frame` - classified control field (I, S or U)
//! - `UFunction` - U-frame control functions
//! - `SeqNumber` - 15-bit sequence numbers

mod apci;
mod seq;

pub use apci::*;
pub use seq::*;
