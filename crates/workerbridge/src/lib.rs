//! Framed request/response bridge between a runtime host and an
//! out-of-process worker.
//!
//! workerbridge carries cross-process calls over a Unix domain socket as
//! length-prefixed frames: the host writes a request, blocks for the
//! response, and treats any framing failure as fatal to the channel.
//!
//! # Crate Structure
//!
//! - [`frame`] — Length-prefixed message framing and the Request/Response
//!   message model
//! - [`channel`] — Call-ordering policy, addressing configuration, and the
//!   channel fault model
//!
//! Connection establishment is deliberately absent: whoever supervises the
//! worker process dials (or accepts) and hands the connected stream to
//! [`channel::Channel::from_stream`].

/// Re-export frame types.
pub mod frame {
    pub use workerbridge_frame::*;
}

/// Re-export channel types.
pub mod channel {
    pub use workerbridge_channel::*;
}
