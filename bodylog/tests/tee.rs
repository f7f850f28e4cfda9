use std::io::Write;

use bodylog::{ExchangeContext, TeeBody, TeeWriter};
use bodylog_test::{chunked, failing_after};
use bytes::Bytes;
use http::{Method, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};

fn server_ok() -> ExchangeContext {
    ExchangeContext::server_response(StatusCode::OK)
}

#[test]
fn test_writer_forwards_and_records_identical_bytes() {
    let mut tee = TeeWriter::new(Vec::new(), server_ok());

    tee.write_all(b"{\"a\":").unwrap();
    tee.write_all(b"\"eugene\"}").unwrap();
    tee.flush().unwrap();

    assert_eq!(tee.get_ref().as_slice(), b"{\"a\":\"eugene\"}");
    assert_eq!(tee.captured_text(), "{\"a\":\"eugene\"}");
}

#[test]
fn test_writer_single_bytes_keep_order() {
    let mut tee = TeeWriter::new(Vec::new(), server_ok());
    for byte in b"hello" {
        tee.write_all(&[*byte]).unwrap();
    }
    let (sink, buffer) = tee.into_parts();
    assert_eq!(sink, b"hello");
    assert_eq!(buffer.captured(), b"hello");
}

#[test]
fn test_writer_captured_text_is_idempotent() {
    let mut tee = TeeWriter::new(Vec::new(), server_ok());
    tee.write_all("grüße".as_bytes()).unwrap();

    let first = tee.captured_text();
    let second = tee.captured_text();
    assert_eq!(first, second);
    assert_eq!(first, "grüße");
}

#[test]
fn test_writer_context_is_returned_unchanged() {
    let context = ExchangeContext::client_request(Method::POST, "http://localhost:5008/send");
    let tee = TeeWriter::new(Vec::new(), context.clone());
    assert_eq!(tee.context(), &context);
    tee.close().unwrap();
}

#[test]
fn test_writer_non_utf8_is_decoded_lossily() {
    let mut tee = TeeWriter::new(Vec::new(), server_ok());
    tee.write_all(&[b'o', b'k', 0xff, 0xfe]).unwrap();
    assert_eq!(tee.captured_text(), "ok\u{fffd}\u{fffd}");
    assert_eq!(tee.get_ref().as_slice(), &[b'o', b'k', 0xff, 0xfe]);
}

#[test]
fn test_writer_propagates_sink_errors() {
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut tee = TeeWriter::new(Broken, server_ok());
    let err = tee.write(b"lost").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    assert_eq!(tee.captured_text(), "");
}

#[tokio::test]
async fn test_body_yields_every_chunk_and_records_them() {
    let mut tee = TeeBody::new(chunked(["chunk1", "chunk2", "chunk3"]), server_ok());

    let mut forwarded = Vec::new();
    while let Some(frame) = tee.frame().await {
        forwarded.push(frame.unwrap().into_data().unwrap());
    }

    assert_eq!(
        forwarded,
        vec![
            Bytes::from("chunk1"),
            Bytes::from("chunk2"),
            Bytes::from("chunk3"),
        ]
    );
    assert_eq!(tee.captured_text(), "chunk1chunk2chunk3");
    assert_eq!(tee.captured_text(), "chunk1chunk2chunk3");
}

#[tokio::test]
async fn test_body_collects_to_original_bytes() {
    let tee = TeeBody::new(Full::new(Bytes::from("hello")), server_ok());
    assert!(!tee.is_end_stream());
    assert_eq!(tee.size_hint().exact(), Some(5));

    let collected = tee.collect().await.unwrap().to_bytes();
    assert_eq!(collected, Bytes::from("hello"));
}

#[tokio::test]
async fn test_body_forwards_errors_and_keeps_prefix() {
    let mut tee = TeeBody::new(failing_after(["partial"]), server_ok());

    let frame = tee.frame().await.unwrap().unwrap();
    assert_eq!(frame.into_data().unwrap(), Bytes::from("partial"));

    let err = tee.frame().await.unwrap().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::ConnectionReset);
    assert_eq!(tee.buffer().captured(), b"partial");
}
