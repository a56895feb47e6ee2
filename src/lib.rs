//! # iec104_apci
//!
//! IEC 60870-5-104 APCI frame codec for Rust.
//!
//! This crate implements the transport sub-layer of the IEC 60870-5-104
//! telecontrol protocol: parsing and building the 6-byte APCI header, frame
//! classification, 15-bit sequence number encoding and the U-frame control
//! functions. ASDUs are carried as opaque bytes; sequence counters, timers
//! and the STARTDT/STOPDT/TESTFR decisions belong to the session layer.
//!
//! ## Features
//!
//! - **Bit-exact**: I-frames, S-frames, U-frames exactly as on the wire
//! - **Total classification**: every header decodes to exactly one frame type
//! - **Permissive or strict**: reserved bits are ignored unless strict validation is requested
//! - **tokio-util codec**: stream framing via `Decoder`/`Encoder`
//!
//! ## Quick Start
//!
//! ```rust
//! use iec104_apci::{builder, parse_frame, Frame, UFunction};
//!
//! let bytes = builder::new_u_frame(UFunction::StartDtActive);
//! assert_eq!(&bytes[..], &[0x68, 0x04, 0x07, 0x00, 0x00, 0x00]);
//!
//! let (frame, asdu) = parse_frame(&bytes)?;
//! assert_eq!(frame, Frame::u_frame(UFunction::StartDtActive));
//! assert!(asdu.is_empty());
//! assert_eq!(frame.to_string(), "U[function: StartDtActive]");
//! # Ok::<(), iec104_apci::Iec104Error>(())
//! ```
//!
//! ## Protocol Overview
//!
//! IEC 60870-5-104 uses TCP/IP for communication (default port 2404).
//! The protocol defines three frame types:
//!
//! - **I-frame**: Information transfer (contains ASDU)
//! - **S-frame**: Supervisory (acknowledgment)
//! - **U-frame**: Unnumbered (control: STARTDT, STOPDT, TESTFR)
//!
//! ### APDU Structure
//!
//! ```text
//! APCI (6 bytes):
//! +--------+--------+--------+--------+--------+--------+
//! | 0x68   | Length | Control Field (4 bytes)           |
//! +--------+--------+--------+--------+--------+--------+
//!
//! CF1 bits 0-1:  x0 = I-frame, 01 = S-frame, 11 = U-frame
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod parser;
pub mod types;

// Re-export main types
pub use builder::{new_i_frame, new_s_frame, new_u_frame};
pub use codec::{Apdu, Iec104Codec};
pub use config::CodecConfig;
pub use error::{Iec104Error, Result};
pub use parser::{parse_apdu, parse_apdu_strict, parse_frame};
pub use types::*;
