//! Round trips through the in-memory loopback host.

use std::io::{Read, Write};
use std::sync::Arc;

use quickcheck::{QuickCheck, TestResult};
use sockbridge_core::error::BridgeError;
use sockbridge_stream::{BridgeStream, Dialer, LoopbackHost};

#[test]
fn test_round_trip_fidelity() {
    fn prop(data: Vec<u8>) -> bool {
        let host = LoopbackHost::new();
        let mut stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();

        stream.write_all(&data).unwrap();
        let mut back = vec![0u8; data.len()];
        stream.read_exact(&mut back).unwrap();

        back == data && host.violations() == 0
    }

    QuickCheck::new()
        .tests(64)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

#[test]
fn test_interleaved_calls_never_overlap() {
    // `true` writes a chunk of `n` bytes, `false` reads up to `n` bytes.
    // Reads are only issued while echoed bytes are pending, since a read on
    // an empty loopback socket waits for data.
    fn prop(ops: Vec<(bool, u8)>) -> TestResult {
        let host = LoopbackHost::new();
        let stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();

        let mut sent = Vec::new();
        let mut received = Vec::new();
        let mut next = 0u8;

        for (is_write, n) in ops {
            let n = usize::from(n % 32) + 1;
            if is_write || sent.len() == received.len() {
                let chunk: Vec<u8> = (0..n)
                    .map(|_| {
                        next = next.wrapping_add(1);
                        next
                    })
                    .collect();
                assert_eq!(stream.write(&chunk).unwrap(), n);
                sent.extend_from_slice(&chunk);
            } else {
                let mut buf = vec![0u8; n];
                let result = stream.read_chunk(&mut buf).unwrap();
                assert!(!result.end_of_stream);
                received.extend_from_slice(&buf[..result.n]);
            }
        }

        let calls = host.calls();
        stream.close().unwrap();

        TestResult::from_bool(
            host.violations() == 0
                && sent.starts_with(&received)
                && calls.connect == 1
                && host.calls().disconnect == 1,
        )
    }

    QuickCheck::new()
        .tests(64)
        .quickcheck(prop as fn(Vec<(bool, u8)>) -> TestResult);
}

#[test]
fn test_shared_stream_serializes_threads() {
    let host = Arc::new(LoopbackHost::new());
    let stream = Arc::new(BridgeStream::open(Arc::clone(&host), "127.0.0.1", 9000).unwrap());

    let writers: Vec<_> = (0..4u8)
        .map(|id| {
            let stream = Arc::clone(&stream);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    stream.write(&[id; 10]).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(host.violations(), 0);
    assert_eq!(host.calls().write, 100);
    assert_eq!(host.buffered(stream.socket()), 1000);

    // Each write lands whole: every 10-byte run comes from one writer.
    host.shutdown_write(stream.socket());
    let mut echoed = Vec::new();
    (&*stream).read_to_end(&mut echoed).unwrap();
    assert_eq!(echoed.len(), 1000);
    for run in echoed.chunks(10) {
        assert!(run.iter().all(|b| *b == run[0]));
    }
}

#[test]
fn test_end_of_stream_after_shutdown() {
    let host = LoopbackHost::new();
    let stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();

    stream.write(b"last words").unwrap();
    host.shutdown_write(stream.socket());

    let mut buf = [0u8; 64];
    let result = stream.read_chunk(&mut buf).unwrap();
    assert_eq!(result.n, 10);
    assert!(result.end_of_stream);
    assert_eq!(&buf[..10], b"last words");
}

#[test]
fn test_severed_socket_poisons_stream() {
    let host = LoopbackHost::new();
    let stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();
    host.sever(stream.socket());

    assert!(matches!(
        stream.write(b"void"),
        Err(BridgeError::CompletionDropped { op: "write" })
    ));
    assert!(matches!(stream.write(b"void"), Err(BridgeError::Poisoned)));
    assert!(matches!(
        stream.close(),
        Err(BridgeError::CompletionDropped { op: "disconnect" })
    ));
}

#[test]
fn test_dialer_opens_streams() {
    let host = Arc::new(LoopbackHost::new());
    let dialer = Dialer::new(Arc::clone(&host));

    let first = dialer.dial("127.0.0.1:9000").unwrap();
    let second = dialer.dial("[::1]:9001").unwrap();
    assert_ne!(first.socket(), second.socket());
    assert_eq!(second.endpoint().host(), "::1");
    assert_eq!(host.open_sockets(), 2);

    assert!(matches!(
        dialer.dial("no-port"),
        Err(BridgeError::InvalidEndpoint(_))
    ));
    assert!(matches!(
        dialer.dial("127.0.0.1:http"),
        Err(BridgeError::InvalidPort(_))
    ));
    assert_eq!(host.calls().connect, 2);

    drop(first);
    drop(second);
    assert_eq!(host.open_sockets(), 0);
}

#[test]
fn test_refused_dial() {
    let host = Arc::new(LoopbackHost::new());
    host.refuse_connections(-102);
    let dialer = Dialer::new(Arc::clone(&host));

    let err = dialer.dial("127.0.0.1:9000").unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(
        err.to_string(),
        "Connect to 127.0.0.1:9000 failed: CONNECTION_REFUSED (status -102)"
    );
}

#[test]
fn test_writer_adapter_flushes() {
    let host = LoopbackHost::new();
    let mut stream = BridgeStream::open(&host, "127.0.0.1", 9000).unwrap();
    write!(stream, "{}-{}", "a", 1).unwrap();
    stream.flush().unwrap();
    assert_eq!(host.buffered(stream.socket()), 3);
}
