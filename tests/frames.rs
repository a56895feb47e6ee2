//! Wire-level frame tests against known byte sequences.

use iec104_apci::{
    builder, parse_apdu, parse_frame, Apci, Frame, FrameType, Iec104Error, SeqNumber, UFunction,
    MAX_ASDU_SIZE, MAX_SEQ,
};

#[test]
fn test_supervisory_frame_scenario() {
    let bytes = builder::new_s_frame(5);
    assert_eq!(&bytes[..], &[0x68, 0x04, 0x01, 0x00, 0x0A, 0x00]);

    let (frame, asdu) = parse_frame(&bytes).unwrap();
    assert_eq!(frame, Frame::SFrame { recv_seq: 5 });
    assert!(asdu.is_empty());
}

#[test]
fn test_startdt_scenario() {
    let bytes = builder::new_u_frame(UFunction::StartDtActive);
    assert_eq!(&bytes[..], &[0x68, 0x04, 0x07, 0x00, 0x00, 0x00]);

    let (frame, _) = parse_frame(&bytes).unwrap();
    assert_eq!(frame.to_string(), "U[function: StartDtActive]");
}

#[test]
fn test_information_frame_scenario() {
    let bytes = builder::new_i_frame(&[0xAA, 0xBB], 1, 0).unwrap();
    assert_eq!(
        &bytes[..],
        &[0x68, 0x06, 0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB]
    );

    let (frame, asdu) = parse_frame(&bytes).unwrap();
    assert_eq!(
        frame,
        Frame::IFrame {
            send_seq: 1,
            recv_seq: 0
        }
    );
    assert_eq!(asdu, &[0xAA, 0xBB]);
    assert_eq!(frame.to_string(), "I[sendNo: 1, recvNo: 0]");
}

#[test]
fn test_information_frame_roundtrip() {
    let payloads: [&[u8]; 4] = [&[], &[0x01], &[0x10; 100], &[0xEE; MAX_ASDU_SIZE]];
    let mut seq = SeqNumber::new(32700);

    // Walk send numbers across the wrap point
    for step in 0..200u16 {
        let send_seq = seq.value();
        let recv_seq = step.wrapping_mul(331) % 32768;
        let payload = payloads[step as usize % payloads.len()];

        let bytes = builder::new_i_frame(payload, send_seq, recv_seq).unwrap();
        assert_eq!(bytes.len(), 6 + payload.len());

        let (frame, asdu) = parse_frame(&bytes).unwrap();
        assert_eq!(frame, Frame::i_frame(send_seq, recv_seq));
        assert_eq!(asdu, payload);

        seq = seq.next();
    }
    assert_eq!(seq.value(), 132);
}

#[test]
fn test_sequence_extremes_roundtrip() {
    for recv_seq in [0, 1, 127, 128, 255, 256, 16383, 16384, 32766, MAX_SEQ] {
        let (frame, _) = parse_frame(&builder::new_s_frame(recv_seq)).unwrap();
        assert_eq!(frame.recv_seq(), Some(recv_seq));

        let bytes = builder::new_i_frame(&[], MAX_SEQ, recv_seq).unwrap();
        assert_eq!(bytes[2], 0xFE);
        assert_eq!(bytes[3], 0xFF);
        let (frame, _) = parse_frame(&bytes).unwrap();
        assert_eq!(frame.send_seq(), Some(MAX_SEQ));
        assert_eq!(frame.recv_seq(), Some(recv_seq));
    }
}

#[test]
fn test_unnumbered_roundtrip() {
    for function in UFunction::ALL {
        let bytes = builder::new_u_frame(function);
        let (frame, asdu) = parse_frame(&bytes).unwrap();
        assert_eq!(frame.function(), Some(function));
        assert!(asdu.is_empty());
    }
}

#[test]
fn test_unknown_function_roundtrip() {
    for bits in [0x00, 0x0C, 0x14, 0xC0, 0xFC] {
        let function = UFunction::from_bits(bits);
        assert!(!function.is_known());

        let bytes = builder::new_u_frame(function);
        assert_eq!(bytes[2], bits | 0x03);

        let (frame, _) = parse_frame(&bytes).unwrap();
        assert_eq!(frame, Frame::u_frame(function));
        assert_eq!(frame.to_string(), "U[function: Unknown]");
    }
}

#[test]
fn test_every_cf1_classifies() {
    for cf1 in 0..=u8::MAX {
        let (apci, _) = parse_apdu(&[0x68, 0x04, cf1, 0x00, 0x00, 0x00]).unwrap();
        let frame = apci.frame();

        match frame.frame_type() {
            FrameType::IFrame => assert_eq!(cf1 & 0x01, 0),
            FrameType::SFrame => assert_eq!(cf1 & 0x03, 0x01),
            FrameType::UFrame => {
                assert_eq!(cf1 & 0x03, 0x03);
                assert_eq!(frame.function().unwrap().bits(), cf1 & 0xFC);
            }
        }
    }
}

#[test]
fn test_asdu_size_boundary() {
    assert!(builder::new_i_frame(&[0; MAX_ASDU_SIZE], 0, 0).is_ok());

    let err = builder::new_i_frame(&[0; MAX_ASDU_SIZE + 1], 0, 0).unwrap_err();
    assert!(matches!(err, Iec104Error::AsduTooLarge { .. }));
}

#[test]
fn test_short_input_is_rejected() {
    // Reading fewer than 6 bytes is a validation error, never an out-of-bounds read
    let err = parse_apdu(&[0x68, 0x04, 0x07, 0x00, 0x00]).unwrap_err();
    assert!(err.is_framing_error());
    assert!(matches!(
        err,
        Iec104Error::FrameTooShort {
            expected: 6,
            actual: 5
        }
    ));
}

#[test]
fn test_header_preserved_verbatim() {
    let data = [0x42, 0x99, 0x0D, 0x7F, 0x3C, 0xA5];
    let (apci, _) = parse_apdu(&data).unwrap();
    assert_eq!(apci.to_bytes(), data);
    assert_eq!(apci, Apci::from_bytes(&data).unwrap());
}

#[test]
fn test_acknowledgment_window_arithmetic() {
    // Session side: oldest unconfirmed is 32766, peer acknowledges up to 3
    let oldest = SeqNumber::new(32766);
    let (frame, _) = parse_frame(&builder::new_s_frame(3)).unwrap();
    let acked = SeqNumber::new(frame.recv_seq().unwrap());
    assert_eq!(oldest.distance_to(acked), 5);
}
