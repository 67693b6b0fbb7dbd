//! Minimal worker — accepts one host connection and echoes every request
//! body back as the response content.
//!
//! Run with:
//!   cargo run --example echo-worker -- /tmp/workerbridge-demo.sock
//!
//! The host side then connects to the same path and drives calls through
//! `channel::Channel`.

use std::os::unix::net::UnixListener;

use workerbridge::frame::{FrameReader, FrameWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sock_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/workerbridge-demo.sock".to_string());

    // Ensure no stale socket
    let _ = std::fs::remove_file(&sock_path);

    let listener = UnixListener::bind(&sock_path)?;
    eprintln!("Worker listening on {sock_path}");

    let (stream, _addr) = listener.accept()?;
    eprintln!("Host connected");

    let mut reader = FrameReader::new(stream.try_clone()?);
    let mut writer = FrameWriter::new(stream);

    loop {
        match reader.read_frame() {
            Ok(frame) => {
                eprintln!("Received {} byte request", frame.payload.len());
                writer.send(frame.payload.as_ref())?;
            }
            Err(e) => {
                eprintln!("Host disconnected: {e}");
                break;
            }
        }
    }

    let _ = std::fs::remove_file(&sock_path);
    Ok(())
}
