// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing and JSON encoding.

use super::*;

const TIMEOUT: Duration = Duration::from_secs(1);

#[test]
fn encode_returns_json_without_length_prefix() {
    let encoded = encode(&Response::Pong).expect("encode failed");

    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert_eq!(json_str, r#"{"type":"Pong"}"#);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_returns_frame_body() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"hello world").await.expect("write failed");
    write_message(&mut buffer, b"second").await.expect("write failed");

    let mut cursor = std::io::Cursor::new(buffer);
    assert_eq!(read_message(&mut cursor).await.expect("read failed"), b"hello world");
    assert_eq!(read_message(&mut cursor).await.expect("read failed"), b"second");
    assert!(matches!(read_message(&mut cursor).await, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn truncated_body_is_connection_closed() {
    let mut buffer = 10u32.to_be_bytes().to_vec();
    buffer.extend_from_slice(b"short");

    let mut cursor = std::io::Cursor::new(buffer);
    assert!(matches!(read_message(&mut cursor).await, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn oversized_prefix_is_rejected_before_reading_body() {
    let buffer = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes().to_vec();

    let mut cursor = std::io::Cursor::new(buffer);
    match read_message(&mut cursor).await {
        Err(ProtocolError::MessageTooLarge { size, max }) => {
            assert_eq!(size, MAX_MESSAGE_SIZE + 1);
            assert_eq!(max, MAX_MESSAGE_SIZE);
        }
        other => panic!("expected MessageTooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn request_and_response_over_a_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    write_request(&mut client, &Request::Ping, TIMEOUT).await.unwrap();
    assert_eq!(read_request(&mut server, TIMEOUT).await.unwrap(), Request::Ping);

    write_response(&mut server, &Response::QueueIsEmpty, TIMEOUT).await.unwrap();
    assert_eq!(read_response(&mut client, TIMEOUT).await.unwrap(), Response::QueueIsEmpty);
}

#[tokio::test(start_paused = true)]
async fn silent_peer_times_out() {
    let (_client, mut server) = tokio::io::duplex(64);
    let result = read_request(&mut server, Duration::from_secs(5)).await;
    assert!(matches!(result, Err(ProtocolError::Timeout)));
}

#[tokio::test]
async fn garbage_body_is_a_json_error() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"not json").await.unwrap();
    let mut cursor = std::io::Cursor::new(buffer);
    assert!(matches!(read_request(&mut cursor, TIMEOUT).await, Err(ProtocolError::Json(_))));
}
