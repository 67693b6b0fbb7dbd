//! Call-ordering policy for the host/worker bridge.
//!
//! The frame codec makes no promises about who may write when. This crate
//! adds the contract: a [`Channel`] owns one connected duplex stream and
//! enforces strict request/response alternation, because frames carry no
//! correlation identifier. A failed call leaves the stream's framing
//! indeterminate, so the channel faults permanently instead of guessing.
//!
//! Addressing (socket path, transport family) is injected via
//! [`BridgeConfig`] at construction — there is no process-wide constant, so
//! independent bridges can coexist.
//!
//! Connection establishment is not provided here: a transport-setup
//! collaborator dials or accepts and hands the connected stream to
//! [`Channel::from_stream`].

pub mod channel;
pub mod config;
pub mod error;

#[cfg(unix)]
pub mod creds;

pub use channel::{CallState, Channel};
pub use config::{BridgeConfig, TransportFamily};
pub use error::{ChannelError, Result};

#[cfg(unix)]
pub use creds::peer_credentials;
