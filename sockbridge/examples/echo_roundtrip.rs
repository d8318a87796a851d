//! Echo round trip over the loopback host
//!
//! Dials an in-memory host, writes a payload, reads it back and closes the
//! stream. Every primitive the stream issues is logged when `RUST_LOG` is
//! set.
//!
//! # Run
//!
//! ```sh
//! RUST_LOG=sockbridge_stream=trace cargo run --example echo_roundtrip
//! ```

use std::io::Read;
use std::sync::Arc;

use sockbridge::dev_tracing::init_tracing;
use sockbridge::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("=== Echo Round Trip ===\n");

    let (events_tx, events) = create_monitor();
    let host = Arc::new(LoopbackHost::new());
    let dialer = Dialer::with_options(
        Arc::clone(&host),
        StreamOptions::new().with_monitor(events_tx),
    );

    // 1. Dial
    println!("1. Dialing 127.0.0.1:9000...");
    let stream = dialer
        .dial("127.0.0.1:9000")
        .map_err(|e| format!("could not dial: {e}"))?;
    println!("   ✓ Connected as {}\n", stream.socket());

    // 2. Write
    let payload = b"hello";
    println!("2. Writing {:?}...", String::from_utf8_lossy(payload));
    stream
        .write(payload)
        .map_err(|e| format!("could not write data: {e}"))?;
    println!("   ✓ Wrote {} bytes\n", payload.len());

    // 3. Read back until the peer shuts its side
    println!("3. Reading back...");
    host.shutdown_write(stream.socket());
    let mut echoed = Vec::new();
    (&stream)
        .read_to_end(&mut echoed)
        .map_err(|e| format!("could not read data: {e}"))?;
    if echoed != payload {
        return Err(format!("got different data back: {payload:?} != {echoed:?}").into());
    }
    println!("   ✓ Read {:?}\n", String::from_utf8_lossy(&echoed));

    // 4. Close
    println!("4. Closing...");
    stream
        .close()
        .map_err(|e| format!("could not close stream: {e}"))?;
    println!("   ✓ Closed\n");

    // 5. Same thing through the helper, against an address that is refused
    println!("5. Verifying a refused address...");
    host.refuse_connections(sockbridge::net_error::CONNECTION_REFUSED);
    match verify_echo(&dialer, "127.0.0.1:9001", payload) {
        Ok(_) => println!("   ✗ Unexpectedly succeeded\n"),
        Err(e) => println!("   ✓ {e}\n"),
    }

    println!("Lifecycle events:");
    for event in events.try_iter() {
        println!("   - {event}");
    }
    println!("\nHost saw {:?}", host.calls());

    Ok(())
}
