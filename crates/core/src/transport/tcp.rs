use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::address::StreamAddress;
use crate::error::{ParseErrorKind, Result, RtspError};
use crate::transport::{Connection, Connector};

/// Default receive buffer size in bytes. A response that fills it is
/// rejected rather than truncated.
pub const DEFAULT_BUFFER_SIZE: usize = 5000;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Socket-level settings for the control connection.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Deadline for the TCP connect. `None` blocks until the OS gives up.
    pub connect_timeout: Option<Duration>,
    /// Deadline for each response read.
    pub read_timeout: Option<Duration>,
    /// Deadline for each request write.
    pub write_timeout: Option<Duration>,
    /// Maximum size of a single response, in bytes.
    pub buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_TIMEOUT),
            read_timeout: Some(DEFAULT_TIMEOUT),
            write_timeout: Some(DEFAULT_TIMEOUT),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Opens blocking TCP control connections.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    config: TransportConfig,
}

impl TcpConnector {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    fn resolve(address: &StreamAddress) -> Result<Vec<SocketAddr>> {
        let host = address.host();
        let resolved: Vec<SocketAddr> = (host, address.port())
            .to_socket_addrs()
            .map_err(|source| RtspError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        if resolved.is_empty() {
            return Err(RtspError::Resolve {
                host: host.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses found for host",
                ),
            });
        }
        Ok(resolved)
    }

    fn connect_addr(&self, addr: &SocketAddr) -> std::io::Result<TcpStream> {
        match self.config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        }
    }
}

impl Connector for TcpConnector {
    type Connection = TcpConnection;

    fn connect(&self, address: &StreamAddress) -> Result<TcpConnection> {
        let mut last_err = None;

        for addr in Self::resolve(address)? {
            match self.connect_addr(&addr) {
                Ok(stream) => {
                    stream.set_read_timeout(self.config.read_timeout)?;
                    stream.set_write_timeout(self.config.write_timeout)?;
                    tracing::debug!(%addr, local = ?stream.local_addr().ok(), "control connection open");
                    return Ok(TcpConnection {
                        stream: Some(stream),
                        peer_addr: addr,
                        buffer_size: self.config.buffer_size,
                    });
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(RtspError::Io(last_err.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotConnected, "no address to connect to")
        })))
    }
}

/// A blocking RTSP control connection over TCP.
pub struct TcpConnection {
    stream: Option<TcpStream>,
    peer_addr: SocketAddr,
    buffer_size: usize,
}

impl TcpConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(|| {
            RtspError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "connection already closed",
            ))
        })
    }

    /// Read one response into a bounded buffer.
    ///
    /// Reads until the header block is terminated and any `Content-Length`
    /// body has arrived, or the peer closes. Filling the buffer is an error.
    fn read_response(&mut self) -> Result<String> {
        let capacity = self.buffer_size;
        let mut buf = vec![0u8; capacity];
        let mut filled = 0;

        let stream = self.stream()?;
        loop {
            let n = stream.read(&mut buf[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Err(RtspError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "connection closed by server",
                    )));
                }
                break;
            }
            filled += n;
            if filled == capacity {
                return Err(RtspError::parse(ParseErrorKind::ResponseTooLarge {
                    capacity,
                }));
            }
            if message_complete(&buf[..filled]) {
                break;
            }
        }

        Ok(latin1(&buf[..filled]))
    }
}

impl Connection for TcpConnection {
    fn local_port(&self) -> Result<u16> {
        let stream = self.stream.as_ref().ok_or_else(|| {
            RtspError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "connection already closed",
            ))
        })?;
        Ok(stream.local_addr()?.port())
    }

    fn send(&mut self, request: &str) -> Result<String> {
        let stream = self.stream()?;
        stream.write_all(request.as_bytes())?;
        stream.flush()?;
        self.read_response()
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                tracing::trace!(peer = %self.peer_addr, error = %e, "shutdown on close");
            }
            tracing::debug!(peer = %self.peer_addr, "control connection closed");
        }
    }
}

/// Whether `data` holds a full response: headers terminated by a blank line
/// plus `Content-Length` bytes of body.
fn message_complete(data: &[u8]) -> bool {
    let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let body_start = header_end + 4;
    let head = latin1(&data[..header_end]);

    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    data.len() - body_start >= content_length
}

/// Decode bytes as ISO-8859-1; every byte maps to the same code point.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
