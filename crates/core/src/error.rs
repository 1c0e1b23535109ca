//! Error types for the RTSP redirect resolver.

use std::fmt;

/// Errors that can end a redirect negotiation.
///
/// Every variant is terminal for the call. The `Display` text is what a
/// caller shows to the operator, so several variants render the raw server
/// response verbatim.
///
/// - **Address**: [`InvalidAddress`](Self::InvalidAddress).
/// - **Connection**: [`Resolve`](Self::Resolve), [`Io`](Self::Io).
/// - **Server**: [`Protocol`](Self::Protocol), [`Teardown`](Self::Teardown).
/// - **Parsing**: [`Parse`](Self::Parse).
/// - **Redirects**: [`RedirectExhausted`](Self::RedirectExhausted).
#[derive(Debug, thiserror::Error)]
pub enum RtspError {
    /// The stream address does not start with `rtsp://` or has no usable authority.
    #[error("Error: Expecting a URL in form of \"rtsp://....\"")]
    InvalidAddress { address: String },

    /// The host part of the address could not be resolved to a socket address.
    #[error("IPEndPoint Error: {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket failure during connect, send or receive.
    #[error("Socket Error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with a non-200 status. Displays the raw response.
    #[error("{response}")]
    Protocol { status: u16, response: String },

    /// A response was missing a field the negotiation depends on.
    #[error("{kind}")]
    Parse { kind: ParseErrorKind },

    /// Every PLAY within the redirect budget answered 302.
    #[error("Error: Gave up after {hops} redirects without a successful PLAY")]
    RedirectExhausted { hops: u32 },

    /// The final TEARDOWN failed after the redirect address was already known.
    #[error("{response}")]
    Teardown { status: u16, response: String },

    /// The client RTP/RTCP pair derived from the local port does not fit in 16 bits.
    #[error("port range exhausted (client port pair beyond u16 range)")]
    PortRangeExhausted,
}

impl RtspError {
    pub(crate) fn parse(kind: ParseErrorKind) -> Self {
        RtspError::Parse { kind }
    }
}

/// Specific kind of response parse failure.
#[derive(Debug)]
pub enum ParseErrorKind {
    /// The response does not carry the `RTSP/1.0` version token.
    MissingVersion,
    /// The three status digits after the version token are not a number.
    InvalidStatusLine,
    /// A header line did not contain a colon separator.
    InvalidHeader,
    /// The response filled the whole receive buffer.
    ResponseTooLarge { capacity: usize },
    /// SETUP succeeded but the response had no usable `Session` header.
    MissingSession { response: String },
    /// DESCRIBE advertised a relative control attribute without `Content-Base`.
    MissingContentBase,
    /// DESCRIBE advertised an absolute control URI and the policy rejects it.
    AbsoluteControlUri { control: String },
    /// PLAY answered 302 without a `Location` header.
    MissingLocation { response: String },
    /// PLAY answered 302 with a `Location` that is not an `rtsp://` address.
    MalformedLocation { location: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersion => write!(f, "Error: Response is missing the RTSP/1.0 version"),
            Self::InvalidStatusLine => write!(f, "Error: Invalid status line in response"),
            Self::InvalidHeader => write!(f, "Error: Invalid header line in response"),
            Self::ResponseTooLarge { capacity } => write!(
                f,
                "Socket Error: Response filled the {capacity}-byte receive buffer; increase the buffer size"
            ),
            Self::MissingSession { response } => {
                write!(f, "Error: Unable to get session id\r\n{response}")
            }
            Self::MissingContentBase => write!(f, "Error: Cannot find Content-Base in Describe"),
            Self::AbsoluteControlUri { control } => {
                write!(f, "Error: Absolute control URI not supported: {control}")
            }
            Self::MissingLocation { response } => write!(
                f,
                "Error: No redirect address and one was expected\r\n{response}"
            ),
            Self::MalformedLocation { location } => {
                write!(f, "Error: Malformed redirect address: {location}")
            }
        }
    }
}

/// Convenience alias for `Result<T, RtspError>`.
pub type Result<T> = std::result::Result<T, RtspError>;
