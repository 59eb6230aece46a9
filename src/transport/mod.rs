//! The `transport` module speaks the backend's pub/sub wire protocol.
//!
//! It defines the JSON frames exchanged with the push feed and drives a
//! single WebSocket session, leaving connection lifecycle and reconnection to
//! the `client` module.

pub mod message;
pub mod websocket;

pub use message::{ClientMessage, Envelope, ServerMessage, decode_frame};
