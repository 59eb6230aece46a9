//! The `client` module is the dashboard's side of the push feed.
//!
//! A `Connection` declares topics, keeps them declared across reconnects and
//! turns pushed frames into typed `Envelope`s. `ReconnectPolicy` decides
//! whether and when a closed connection is dialled again.

pub mod connection;
pub mod state;

pub use connection::Connection;
pub use state::{ConnectionState, ReconnectPolicy};
