use std::fmt;

use crate::error::{Result, RtspError};

/// Client RTP/RTCP receive ports advertised in SETUP.
///
/// RTP wants an even port and RTCP takes the next one (RFC 3550 §11).
/// No socket is bound to these ports: the resolver never receives media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientPorts {
    pub rtp: u16,
    pub rtcp: u16,
}

impl ClientPorts {
    /// Derive the pair from the control connection's local port: one above
    /// it, bumped to the next even number.
    ///
    /// ```
    /// use rtsp_redirect::session::transport::ClientPorts;
    ///
    /// let ports = ClientPorts::from_local_port(50000).unwrap();
    /// assert_eq!((ports.rtp, ports.rtcp), (50002, 50003));
    ///
    /// let ports = ClientPorts::from_local_port(50001).unwrap();
    /// assert_eq!((ports.rtp, ports.rtcp), (50002, 50003));
    /// ```
    pub fn from_local_port(local_port: u16) -> Result<Self> {
        let mut rtp = u32::from(local_port) + 1;
        if rtp % 2 == 1 {
            rtp += 1;
        }
        let rtp = u16::try_from(rtp).map_err(|_| RtspError::PortRangeExhausted)?;
        let rtcp = rtp.checked_add(1).ok_or(RtspError::PortRangeExhausted)?;
        Ok(ClientPorts { rtp, rtcp })
    }
}

/// Delivery mode requested in the `Transport` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastMode {
    Unicast,
    Multicast,
}

impl CastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastMode::Unicast => "unicast",
            CastMode::Multicast => "multicast",
        }
    }
}

/// The `Transport` header sent with SETUP (RFC 2326 §12.39).
///
/// ```text
/// Transport: RTP/AVP;unicast;client_port=50002-50003
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportHeader {
    pub mode: CastMode,
    pub client_ports: ClientPorts,
}

impl TransportHeader {
    pub fn new(multicast: bool, client_ports: ClientPorts) -> Self {
        let mode = if multicast {
            CastMode::Multicast
        } else {
            CastMode::Unicast
        };
        TransportHeader { mode, client_ports }
    }

    /// Parse a `Transport` header value of the form this client sends.
    ///
    /// Looks for the cast mode and `client_port=RTP-RTCP` among
    /// semicolon-separated parameters.
    ///
    /// ```
    /// use rtsp_redirect::session::transport::{CastMode, TransportHeader};
    ///
    /// let th = TransportHeader::parse("RTP/AVP;multicast;client_port=8000-8001").unwrap();
    /// assert_eq!(th.mode, CastMode::Multicast);
    /// assert_eq!(th.client_ports.rtp, 8000);
    ///
    /// assert!(TransportHeader::parse("RTP/AVP;unicast").is_none());
    /// ```
    pub fn parse(header: &str) -> Option<Self> {
        let mut mode = CastMode::Unicast;
        let mut client_ports = None;

        for part in header.split(';') {
            let part = part.trim();
            if part == "multicast" {
                mode = CastMode::Multicast;
            } else if let Some(ports) = part.strip_prefix("client_port=") {
                let (rtp, rtcp) = ports.split_once('-')?;
                client_ports = Some(ClientPorts {
                    rtp: rtp.parse().ok()?,
                    rtcp: rtcp.parse().ok()?,
                });
            }
        }

        Some(TransportHeader {
            mode,
            client_ports: client_ports?,
        })
    }
}

impl fmt::Display for TransportHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RTP/AVP;{};client_port={}-{}",
            self.mode.as_str(),
            self.client_ports.rtp,
            self.client_ports.rtcp
        )
    }
}
