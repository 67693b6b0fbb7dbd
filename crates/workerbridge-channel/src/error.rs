use workerbridge_frame::FrameError;

/// Errors that can occur in channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Frame codec or stream failure underneath this channel.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A request has been written and its response is still pending.
    #[error("a call is already in flight on this channel")]
    CallInFlight,

    /// No request has been written, so there is no response to read.
    #[error("no call in flight on this channel")]
    NoCallInFlight,

    /// A previous failure left the stream's framing indeterminate; the
    /// channel must not be reused.
    #[error("channel is faulted and must not be reused")]
    Faulted,

    /// Failed to clone the stream into read and write halves.
    #[error("failed to split stream: {0}")]
    Split(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
