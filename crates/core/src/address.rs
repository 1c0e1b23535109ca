//! RTSP stream addresses (`rtsp://host[:port]/path`).

use std::fmt;

use crate::error::{Result, RtspError};

/// URL scheme every stream address must start with.
pub const SCHEME: &str = "rtsp://";

/// RTSP well-known port (RFC 2326 §3.2), used when the address omits one.
pub const DEFAULT_PORT: u16 = 554;

/// Marker that selects multicast transport in SETUP.
const MULTICAST_HINT: &str = "multicast=true";

/// A validated stream address.
///
/// The original text is kept untouched: it goes on the wire as the
/// Request-URI and is returned as-is when it turns out to be the final
/// delivery address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamAddress {
    raw: String,
    host: String,
    port: u16,
    path: String,
}

impl StreamAddress {
    /// Parse and validate an address.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtsp_redirect::StreamAddress;
    ///
    /// let addr = StreamAddress::parse("rtsp://10.0.0.5/stream?multicast=true").unwrap();
    /// assert_eq!(addr.host(), "10.0.0.5");
    /// assert_eq!(addr.port(), 554);
    /// assert!(addr.is_multicast());
    ///
    /// assert!(StreamAddress::parse("http://10.0.0.5/stream").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || RtspError::InvalidAddress {
            address: raw.to_string(),
        };

        let after_scheme = raw.strip_prefix(SCHEME).ok_or_else(invalid)?;
        let authority_end = after_scheme
            .find(['/', '?', '#'])
            .unwrap_or(after_scheme.len());
        let (authority, path) = after_scheme.split_at(authority_end);

        // Drop any userinfo; credentials are not used.
        let host_port = authority.rsplit('@').next().unwrap_or(authority);

        let (host, port) = if let Some(rest) = host_port.strip_prefix('[') {
            let close = rest.find(']').ok_or_else(invalid)?;
            let host = &rest[..close];
            let port = match &rest[close + 1..] {
                "" => None,
                p => Some(p.strip_prefix(':').ok_or_else(invalid)?),
            };
            (host, port)
        } else {
            match host_port.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (host_port, None),
            }
        };

        if host.trim().is_empty() {
            return Err(invalid());
        }

        let port = match port {
            None | Some("") => DEFAULT_PORT,
            Some(p) => p.parse::<u16>().map_err(|_| invalid())?,
        };

        Ok(StreamAddress {
            raw: raw.to_string(),
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path, query and fragment following the authority (may be empty).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the address carries the `multicast=true` hint.
    pub fn is_multicast(&self) -> bool {
        self.raw.contains(MULTICAST_HINT)
    }
}

impl fmt::Display for StreamAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
