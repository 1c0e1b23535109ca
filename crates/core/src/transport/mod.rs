//! Network transport for RTSP signaling.
//!
//! The negotiator speaks to the server through a single [`Connection`]
//! opened by a [`Connector`]. Each [`Connection::send`] writes one request
//! and blocks for one response; there is no pipelining, so responses are
//! matched to requests by program order alone.
//!
//! - **TCP** ([`tcp`]): the production transport over `std::net::TcpStream`
//!   with configurable deadlines and a bounded receive buffer.
//!
//! The traits exist so the negotiation can be driven by scripted test
//! doubles without a socket.

pub mod tcp;

use crate::address::StreamAddress;
use crate::error::Result;

pub use tcp::{TcpConnection, TcpConnector, TransportConfig};

/// One open RTSP control connection.
pub trait Connection {
    /// Local port of the control socket, used to derive the client port pair.
    fn local_port(&self) -> Result<u16>;

    /// Write one request and block for its raw response text.
    fn send(&mut self, request: &str) -> Result<String>;

    /// Close the connection. Called exactly once by the negotiator.
    fn close(&mut self);
}

/// Opens [`Connection`]s to stream addresses.
pub trait Connector {
    type Connection: Connection;

    /// Resolve the address host and connect (default port 554).
    fn connect(&self, address: &StreamAddress) -> Result<Self::Connection>;
}
