//! Stream framing tests over a mock transport.

use futures::{SinkExt, StreamExt};
use iec104_apci::{codec, Apdu, CodecConfig, Frame, Iec104Error, UFunction};
use tokio_test::io::Builder;

#[tokio::test]
async fn test_startdt_then_data() {
    let mock = Builder::new()
        .write(&[0x68, 0x04, 0x07, 0x00, 0x00, 0x00])
        .read(&[
            0x68, 0x04, 0x0B, 0x00, 0x00, 0x00, // STARTDT con
            0x68, 0x05, 0x00, 0x00, 0x02, 0x00, 0x2A, // I(0, 1)
        ])
        .write(&[0x68, 0x04, 0x01, 0x00, 0x02, 0x00])
        .build();
    let mut framed = codec::framed(mock, CodecConfig::default());

    framed
        .send(Apdu::u_frame(UFunction::StartDtActive))
        .await
        .unwrap();

    let con = framed.next().await.unwrap().unwrap();
    assert_eq!(con.frame, Frame::u_frame(UFunction::StartDtConfirm));
    assert_eq!(
        UFunction::StartDtActive.confirmation(),
        con.frame.function()
    );

    let data = framed.next().await.unwrap().unwrap();
    assert_eq!(data.frame, Frame::i_frame(0, 1));
    assert_eq!(&data.asdu[..], &[0x2A]);

    // Acknowledge the received I-frame
    let next_recv = data.frame.send_seq().unwrap() + 1;
    framed.send(Apdu::s_frame(next_recv)).await.unwrap();

    assert!(framed.next().await.is_none());
}

#[tokio::test]
async fn test_frame_split_across_reads() {
    let mock = Builder::new()
        .read(&[0x13, 0x68, 0x06, 0x02])
        .read(&[0x00, 0x00, 0x00, 0xAA])
        .read(&[0xBB])
        .build();
    let mut framed = codec::framed(mock, CodecConfig::default());

    let apdu = framed.next().await.unwrap().unwrap();
    assert_eq!(apdu.frame, Frame::i_frame(1, 0));
    assert_eq!(&apdu.asdu[..], &[0xAA, 0xBB]);

    assert!(framed.next().await.is_none());
}

#[tokio::test]
async fn test_testfr_keepalive_reply() {
    let mock = Builder::new()
        .read(&[0x68, 0x04, 0x43, 0x00, 0x00, 0x00])
        .write(&[0x68, 0x04, 0x83, 0x00, 0x00, 0x00])
        .build();
    let mut framed = codec::framed(mock, CodecConfig::default());

    let probe = framed.next().await.unwrap().unwrap();
    let function = probe.frame.function().unwrap();
    assert!(function.is_activation());

    let reply = function.confirmation().unwrap();
    framed.send(Apdu::u_frame(reply)).await.unwrap();
}

#[tokio::test]
async fn test_strict_mode_reports_malformed_frame() {
    let mock = Builder::new()
        .read(&[0x68, 0x04, 0x01, 0x80, 0x02, 0x00])
        .build();
    let mut framed = codec::framed(mock, CodecConfig::new().strict(true));

    let err = framed.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Iec104Error::ReservedBitsSet { byte: 0x80, .. }));
}

#[tokio::test]
async fn test_permissive_mode_accepts_same_frame() {
    let mock = Builder::new()
        .read(&[0x68, 0x04, 0x01, 0x80, 0x02, 0x00])
        .build();
    let mut framed = codec::framed(mock, CodecConfig::default());

    let apdu = framed.next().await.unwrap().unwrap();
    assert_eq!(apdu.frame, Frame::s_frame(1));
}

#[tokio::test]
async fn test_oversize_send_fails_without_writing() {
    // No write expected: the mock panics on any unexpected write
    let mock = Builder::new().build();
    let mut framed = codec::framed(mock, CodecConfig::new().max_asdu_size(8));

    let err = framed
        .send(Apdu::i_frame(0, 0, vec![0u8; 9]))
        .await
        .unwrap_err();
    assert!(matches!(err, Iec104Error::AsduTooLarge { size: 9, max: 8 }));
}
