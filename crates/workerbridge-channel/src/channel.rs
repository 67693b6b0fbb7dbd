use std::io::{Read, Write};

use tracing::debug;
use workerbridge_frame::{
    read_message, write_message, FrameConfig, FrameReader, FrameWriter, Request, Response,
};

use crate::config::BridgeConfig;
use crate::error::{ChannelError, Result};

/// Call progress on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call in flight; the next operation must write a request.
    Idle,
    /// A request frame has been written; the next frame read is its response.
    AwaitingResponse,
    /// A call failed. The stream may hold a torn frame, so the peers'
    /// framing can no longer be trusted and the channel refuses all use.
    Faulted,
}

/// One host-side channel to the worker process.
///
/// Owns both halves of a connected duplex stream and enforces strict
/// request/response alternation: frames carry no correlation identifier, so
/// a channel supports exactly one in-flight call, and the kind of the next
/// inbound frame is known from the alternation alone. Exclusive `&mut`
/// access keeps unsynchronized callers from interleaving frame bytes.
///
/// Channels are handed an already-connected stream; they never dial,
/// listen, or reconnect. A faulted channel is discarded, not repaired.
pub struct Channel<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    state: CallState,
}

impl<R: Read, W: Write> Channel<R, W> {
    /// Build a channel from separate read and write halves of one stream.
    pub fn from_halves(reader: R, writer: W, config: &BridgeConfig) -> Self {
        let frame_config = FrameConfig {
            max_payload_size: config.max_payload_size,
        };
        Self {
            reader: FrameReader::with_config(reader, frame_config.clone()),
            writer: FrameWriter::with_config(writer, frame_config),
            state: CallState::Idle,
        }
    }

    /// Write one request frame.
    ///
    /// Transitions `Idle → AwaitingResponse`. Any failure faults the channel.
    pub fn send_request(&mut self, request: &Request) -> Result<()> {
        self.check_idle()?;
        if let Err(err) = write_message(&mut self.writer, request) {
            self.state = CallState::Faulted;
            return Err(err.into());
        }
        self.state = CallState::AwaitingResponse;
        debug!(len = request.body().len(), "request written, awaiting response");
        Ok(())
    }

    /// Read the pending response frame.
    ///
    /// Transitions `AwaitingResponse → Idle`. Any failure faults the channel.
    pub fn read_response(&mut self) -> Result<Response> {
        match self.state {
            CallState::AwaitingResponse => {}
            CallState::Idle => return Err(ChannelError::NoCallInFlight),
            CallState::Faulted => return Err(ChannelError::Faulted),
        }
        match read_message(&mut self.reader) {
            Ok(response) => {
                self.state = CallState::Idle;
                debug!(len = response.content().len(), "response received");
                Ok(response)
            }
            Err(err) => {
                self.state = CallState::Faulted;
                Err(err.into())
            }
        }
    }

    /// Issue one request and block until its response arrives.
    pub fn call(&mut self, request: &Request) -> Result<Response> {
        self.send_request(request)?;
        self.read_response()
    }

    /// Current call state.
    pub fn state(&self) -> CallState {
        self.state
    }

    /// Whether a previous failure has made this channel unusable.
    pub fn is_faulted(&self) -> bool {
        self.state == CallState::Faulted
    }

    /// Consume the channel and return the two stream halves.
    pub fn into_halves(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    fn check_idle(&self) -> Result<()> {
        match self.state {
            CallState::Idle => Ok(()),
            CallState::AwaitingResponse => Err(ChannelError::CallInFlight),
            CallState::Faulted => Err(ChannelError::Faulted),
        }
    }
}

#[cfg(unix)]
impl Channel<std::os::unix::net::UnixStream, std::os::unix::net::UnixStream> {
    /// Wrap an already-connected stream, cloning it into read and write
    /// halves.
    ///
    /// The stream must be the one dialed (or accepted) at
    /// `config.socket_path`; this constructor does not connect.
    pub fn from_stream(
        stream: std::os::unix::net::UnixStream,
        config: &BridgeConfig,
    ) -> Result<Self> {
        if let Some((uid, gid, pid)) = crate::creds::peer_credentials(&stream) {
            debug!(uid, gid, pid, path = ?config.socket_path, "bridge channel connected");
        }
        let read_half = stream.try_clone().map_err(ChannelError::Split)?;
        Ok(Self::from_halves(read_half, stream, config))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Cursor;
    use std::os::unix::net::UnixStream;
    use std::thread;

    use workerbridge_frame::{FrameError, FrameReader, FrameWriter};

    use super::*;

    /// Spawn a worker-side echo: read one frame, send its payload back.
    fn echo_once(stream: UnixStream) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let read_half = stream.try_clone().unwrap();
            let mut reader = FrameReader::new(read_half);
            let mut writer = FrameWriter::new(stream);

            let frame = reader.read_frame().unwrap();
            writer.send(frame.payload.as_ref()).unwrap();
        })
    }

    #[test]
    fn call_roundtrip() {
        let (host, worker) = UnixStream::pair().unwrap();
        let echo = echo_once(worker);

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        let response = channel.call(&Request::new("ping-hello!")).unwrap();

        assert_eq!(response.content(), b"ping-hello!");
        assert_eq!(channel.state(), CallState::Idle);

        echo.join().unwrap();
    }

    #[test]
    fn two_step_call_transitions() {
        let (host, worker) = UnixStream::pair().unwrap();
        let echo = echo_once(worker);

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        assert_eq!(channel.state(), CallState::Idle);

        channel.send_request(&Request::new("status")).unwrap();
        assert_eq!(channel.state(), CallState::AwaitingResponse);

        let response = channel.read_response().unwrap();
        assert_eq!(response.content(), b"status");
        assert_eq!(channel.state(), CallState::Idle);

        echo.join().unwrap();
    }

    #[test]
    fn second_request_while_in_flight_rejected() {
        let (host, worker) = UnixStream::pair().unwrap();

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        channel.send_request(&Request::new("first")).unwrap();

        let err = channel.send_request(&Request::new("second")).unwrap_err();
        assert!(matches!(err, ChannelError::CallInFlight));
        // The rejected request must not have touched the stream.
        assert_eq!(channel.state(), CallState::AwaitingResponse);

        drop(worker);
    }

    #[test]
    fn read_without_request_rejected() {
        let (host, _worker) = UnixStream::pair().unwrap();

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        let err = channel.read_response().unwrap_err();
        assert!(matches!(err, ChannelError::NoCallInFlight));
        assert_eq!(channel.state(), CallState::Idle);
    }

    #[test]
    fn peer_close_mid_frame_faults_channel() {
        let (host, worker) = UnixStream::pair().unwrap();

        // Worker sends a header promising 64 bytes, then disconnects.
        let tease = thread::spawn(move || {
            use std::io::Write;
            let mut worker = worker;
            let mut reader = FrameReader::new(worker.try_clone().unwrap());
            let _ = reader.read_frame().unwrap();
            worker.write_all(&64i32.to_be_bytes()).unwrap();
            drop(worker);
        });

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        let err = channel.call(&Request::new("hello")).unwrap_err();

        assert!(matches!(
            err,
            ChannelError::Frame(FrameError::ConnectionClosed)
        ));
        assert!(channel.is_faulted());

        tease.join().unwrap();
    }

    #[test]
    fn faulted_channel_refuses_reuse() {
        let (host, worker) = UnixStream::pair().unwrap();
        drop(worker);

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        let first = channel.call(&Request::new("hello")).unwrap_err();
        assert!(matches!(first, ChannelError::Frame(_)));
        assert!(channel.is_faulted());

        let err = channel.send_request(&Request::new("again")).unwrap_err();
        assert!(matches!(err, ChannelError::Faulted));
        let err = channel.read_response().unwrap_err();
        assert!(matches!(err, ChannelError::Faulted));
    }

    #[test]
    fn oversized_request_faults_channel() {
        let (host, worker) = UnixStream::pair().unwrap();

        let config = BridgeConfig {
            max_payload_size: 8,
            ..BridgeConfig::default()
        };
        let mut channel = Channel::from_stream(host, &config).unwrap();
        let err = channel.call(&Request::new("way past the cap")).unwrap_err();

        assert!(matches!(
            err,
            ChannelError::Frame(FrameError::PayloadTooLarge { .. })
        ));
        assert!(channel.is_faulted());

        drop(worker);
    }

    #[test]
    fn oversized_inbound_frame_faults_channel() {
        let (host, worker) = UnixStream::pair().unwrap();

        let feed = thread::spawn(move || {
            use std::io::Write;
            let mut worker = worker;
            let mut reader = FrameReader::new(worker.try_clone().unwrap());
            let _ = reader.read_frame().unwrap();
            // Response header claiming more than the host accepts.
            worker.write_all(&1024i32.to_be_bytes()).unwrap();
        });

        let config = BridgeConfig {
            max_payload_size: 64,
            ..BridgeConfig::default()
        };
        let mut channel = Channel::from_stream(host, &config).unwrap();
        let err = channel.call(&Request::new("hi")).unwrap_err();

        assert!(matches!(
            err,
            ChannelError::Frame(FrameError::PayloadTooLarge { size: 1024, max: 64 })
        ));
        assert!(channel.is_faulted());

        feed.join().unwrap();
    }

    #[test]
    fn from_halves_with_in_memory_streams() {
        // Response frame already buffered on the read side.
        let mut wire = Vec::new();
        wire.extend_from_slice(&2i32.to_be_bytes());
        wire.extend_from_slice(b"ok");

        let mut channel = Channel::from_halves(
            Cursor::new(wire),
            Cursor::new(Vec::<u8>::new()),
            &BridgeConfig::default(),
        );

        let response = channel.call(&Request::new("anything")).unwrap();
        assert_eq!(response.content(), b"ok");

        let (_read, write) = channel.into_halves();
        let written = write.into_inner();
        assert_eq!(&written[..4], &[0x00, 0x00, 0x00, 0x08]);
        assert_eq!(&written[4..], b"anything");
    }

    #[test]
    fn sequential_calls_reuse_the_channel() {
        let (host, worker) = UnixStream::pair().unwrap();

        let echo_twice = thread::spawn(move || {
            let read_half = worker.try_clone().unwrap();
            let mut reader = FrameReader::new(read_half);
            let mut writer = FrameWriter::new(worker);
            for _ in 0..2 {
                let frame = reader.read_frame().unwrap();
                writer.send(frame.payload.as_ref()).unwrap();
            }
        });

        let mut channel = Channel::from_stream(host, &BridgeConfig::default()).unwrap();
        let first = channel.call(&Request::new("one")).unwrap();
        let second = channel.call(&Request::new("two")).unwrap();

        assert_eq!(first.content(), b"one");
        assert_eq!(second.content(), b"two");

        echo_twice.join().unwrap();
    }
}
