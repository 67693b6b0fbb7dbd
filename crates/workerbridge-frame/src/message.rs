use std::borrow::Cow;
use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::Result;
use crate::reader::FrameReader;
use crate::writer::FrameWriter;

/// Serialization capability required of messages crossing the bridge.
///
/// The codec never looks inside a message; only its serialized payload
/// matters.
pub trait Message {
    /// Serialize this message to its wire payload.
    fn to_payload(&self) -> Bytes;
}

/// An outbound call description sent by the host to the worker.
///
/// Opaque to the codec. Whatever textual or binary encoding the body carries
/// is between the two bridge endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    body: Bytes,
}

impl Request {
    /// Create a request from its serialized body.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self { body: body.into() }
    }

    /// The serialized body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl Message for Request {
    fn to_payload(&self) -> Bytes {
        self.body.clone()
    }
}

/// A reply produced by the worker.
///
/// `content` is byte-for-byte what the peer framed, so it is held as raw
/// bytes; [`Response::text`] gives a lossy view for the common textual case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    content: Bytes,
}

impl Response {
    /// Create a response from its content bytes.
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The raw content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as text, replacing any invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Consume the response and return its content.
    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Message for Response {
    fn to_payload(&self) -> Bytes {
        self.content.clone()
    }
}

/// Serialize a message and send it as one frame (blocking).
pub fn write_message<T: Write, M: Message>(writer: &mut FrameWriter<T>, message: &M) -> Result<()> {
    writer.send(message.to_payload().as_ref())
}

/// Read one complete frame and wrap its payload as a [`Response`] (blocking).
///
/// The read side decodes responses only: exactly one endpoint initiates
/// calls, and the initiator never receives requests. Request decoding is the
/// responder's own concern and deliberately not provided here.
pub fn read_message<T: Read>(reader: &mut FrameReader<T>) -> Result<Response> {
    let frame = reader.read_frame()?;
    Ok(Response::new(frame.payload))
}
