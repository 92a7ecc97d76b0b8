//! Backend RPC: wire envelope, transports, payload types and the typed client.

pub mod client;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::Client;
pub use transport::{EventStream, MemoryTransport, SocketTransport, Transport};
pub use types::*;
