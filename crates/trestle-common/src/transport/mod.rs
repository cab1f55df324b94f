//! Transport layer for bridge messages.
//!
//! The core never moves bytes itself: the hosting layer (a webview, an
//! embedded script engine, a test harness) supplies delivery. This module
//! provides the pieces that sit at that seam:
//!
//! - **[`MessageSink`]**: the "deliver an outbound message" primitive the
//!   core emits into.
//! - **[`Codec`]** / **[`JsonCodec`]**: encode/decode protocol messages to
//!   JSON bytes for hosts whose delivery channel is byte-oriented.
//! - **[`MemoryTransport`]**: an in-process queue sink for tests and for
//!   hosts that pump messages into a script context themselves.

pub mod codec;
pub mod memory;

pub use codec::{Codec, JsonCodec};
pub use memory::MemoryTransport;


use crate::protocol::{Message, Result};

/// Outbound delivery primitive supplied by the hosting layer.
///
/// The dispatcher emits every native-origin message (callback resolutions
/// and broadcasts) through this trait. Implementations must tolerate calls
/// from any thread; per-handle delivery order follows emission order.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, message: Message) -> Result<()>;
}
