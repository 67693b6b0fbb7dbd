//! Length-prefixed message framing for the host/worker bridge.
//!
//! This is the codec layer of workerbridge. Every message is framed with a
//! 4-byte big-endian signed payload length followed by exactly that many
//! payload bytes. No magic bytes, no channel ids: the bridge connects exactly
//! two fixed peers, and correlation comes from the strict request/response
//! alternation enforced one layer up.
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use message::{read_message, write_message, Message, Request, Response};
pub use reader::FrameReader;
pub use writer::FrameWriter;
