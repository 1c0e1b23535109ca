use crate::address::StreamAddress;
use crate::error::{ParseErrorKind, Result, RtspError};
use crate::protocol::{AbsoluteControl, Method, RtspRequest, RtspResponse, resolve_control_uri};
use crate::session::{ClientPorts, Session, SessionState};
use crate::transport::{Connection, Connector, TcpConnector, TransportConfig};

/// Upper bound on PLAY attempts while following redirects.
pub const DEFAULT_MAX_REDIRECTS: u32 = 20;

/// Client identification string sent in every request (RFC 2326 §12.41).
pub const USER_AGENT: &str = concat!("rtsp-redirect/", env!("CARGO_PKG_VERSION"));

/// `Scale` header value requesting reverse playback from live (RFC 2326 §12.34).
const PLAYBACK_SCALE: &str = "-1.000000";

/// Negotiation settings.
#[derive(Debug, Clone)]
pub struct RedirectConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Maximum number of PLAY requests before giving up on redirects.
    pub max_redirects: u32,
    /// Handling of absolute `a=control:` values in DESCRIBE.
    pub absolute_control: AbsoluteControl,
    /// Socket deadlines and receive buffer size.
    pub transport: TransportConfig,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            absolute_control: AbsoluteControl::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// Resolves the address a stream is actually delivered from.
///
/// Runs OPTIONS → DESCRIBE → SETUP → PLAY over one control connection and
/// follows `302` answers to PLAY: each hop tears the current session down
/// and repeats the handshake against the `Location` target on the same
/// connection, with the `CSeq` counter carried over. The connection is
/// closed exactly once on every path after it was opened.
pub struct Negotiator<C: Connector = TcpConnector> {
    connector: C,
    config: RedirectConfig,
}

impl Negotiator<TcpConnector> {
    pub fn new() -> Self {
        Self::with_config(RedirectConfig::default())
    }

    /// Create a TCP negotiator with custom settings.
    pub fn with_config(config: RedirectConfig) -> Self {
        Self {
            connector: TcpConnector::new(config.transport.clone()),
            config,
        }
    }
}

impl Default for Negotiator<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Negotiator<C> {
    /// Create a negotiator over a custom transport.
    pub fn with_connector(connector: C, config: RedirectConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Negotiate `address` and return the final delivery address.
    ///
    /// With `playback` set, PLAY asks for reverse playback from live
    /// (`Scale: -1.000000`) instead of the live stream.
    pub fn obtain_redirect(&self, address: &str, playback: bool) -> Result<String> {
        let target = StreamAddress::parse(address)?;

        tracing::info!(address = %target, playback, "negotiating stream address");

        let mut conn = self.connector.connect(&target)?;
        let result = self.negotiate(&mut conn, target, playback);
        conn.close();

        match &result {
            Ok(resolved) => tracing::info!(address, %resolved, "redirect resolved"),
            Err(e) => tracing::warn!(address, error = %e, "negotiation failed"),
        }
        result
    }

    fn negotiate(
        &self,
        conn: &mut C::Connection,
        target: StreamAddress,
        playback: bool,
    ) -> Result<String> {
        let client_ports = ClientPorts::from_local_port(conn.local_port()?)?;
        let mut exchange = Exchange {
            conn,
            config: &self.config,
            session: Session::new(target, client_ports, playback),
        };

        let result = exchange.run();
        if result.is_err() {
            exchange.session.set_state(SessionState::Failed);
        }
        result
    }
}

/// Resolve `address` with default settings over TCP.
pub fn obtain_redirect(address: &str, playback: bool) -> Result<String> {
    Negotiator::new().obtain_redirect(address, playback)
}

enum PlayOutcome {
    Playing,
    Redirect(StreamAddress),
}

/// One negotiation in flight: the connection, the settings and the session.
struct Exchange<'a, T: Connection> {
    conn: &'a mut T,
    config: &'a RedirectConfig,
    session: Session,
}

impl<T: Connection> Exchange<'_, T> {
    fn run(&mut self) -> Result<String> {
        self.handshake()?;

        for attempt in 1..=self.config.max_redirects {
            match self.play()? {
                PlayOutcome::Playing => {
                    let resolved = self.session.target.as_str().to_string();
                    self.final_teardown()?;
                    return Ok(resolved);
                }
                PlayOutcome::Redirect(next) => {
                    tracing::info!(
                        hop = attempt,
                        from = %self.session.target,
                        to = %next,
                        "following redirect"
                    );
                    self.teardown()?;
                    self.session.retarget(next);
                    self.handshake()?;
                }
            }
        }

        if let Err(e) = self.teardown() {
            tracing::warn!(error = %e, "teardown after redirect limit failed");
        }
        Err(RtspError::RedirectExhausted {
            hops: self.config.max_redirects,
        })
    }

    /// OPTIONS → DESCRIBE → SETUP against the current target.
    fn handshake(&mut self) -> Result<()> {
        self.options()?;
        self.describe()?;
        self.setup()
    }

    fn request(&mut self, method: Method, uri: &str) -> RtspRequest {
        RtspRequest::new(method, uri)
            .cseq(self.session.next_cseq())
            .header("User-Agent", &self.config.user_agent)
    }

    fn send(&mut self, request: RtspRequest) -> Result<RtspResponse> {
        tracing::debug!(
            method = %request.method,
            uri = %request.uri,
            cseq = request.get_header("CSeq").unwrap_or(""),
            "request"
        );

        let raw = self.conn.send(&request.serialize())?;
        let response = RtspResponse::parse(&raw)?;

        tracing::debug!(
            method = %request.method,
            status = response.status_code,
            "response"
        );
        Ok(response)
    }

    fn session_header(&self) -> String {
        self.session.session_id.clone().unwrap_or_default()
    }

    fn options(&mut self) -> Result<()> {
        let uri = self.session.target.as_str().to_string();
        let request = self.request(Method::Options, &uri);
        let response = self.send(request)?;

        if matches!(response.status_code, 301 | 302) {
            tracing::warn!(status = response.status_code, "redirect on OPTIONS is not followed");
        }
        expect_ok(response)?;

        self.session.set_state(SessionState::OptionsOk);
        Ok(())
    }

    fn describe(&mut self) -> Result<()> {
        let uri = self.session.target.as_str().to_string();
        let request = self
            .request(Method::Describe, &uri)
            .header("Accept", "application/sdp");
        let response = expect_ok(self.send(request)?)?;

        self.session.control_uri = resolve_control_uri(&response, self.config.absolute_control)?;
        tracing::debug!(setup_uri = self.session.setup_uri(), "control URI resolved");

        self.session.set_state(SessionState::Described);
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        let uri = self.session.setup_uri().to_string();
        let transport = self.session.transport_header().to_string();
        let request = self
            .request(Method::Setup, &uri)
            .header("Transport", &transport);
        let response = expect_ok(self.send(request)?)?;

        let session_id = response.session_id().ok_or_else(|| {
            RtspError::parse(ParseErrorKind::MissingSession {
                response: response.raw.clone(),
            })
        })?;
        tracing::debug!(session_id, "session established");
        self.session.session_id = Some(session_id);

        self.session.set_state(SessionState::SetupOk);
        Ok(())
    }

    fn play(&mut self) -> Result<PlayOutcome> {
        let uri = self.session.target.as_str().to_string();
        let session_id = self.session_header();
        let mut request = self
            .request(Method::Play, &uri)
            .header("Session", &session_id);
        if self.session.playback {
            request = request.header("Scale", PLAYBACK_SCALE);
        }
        let response = self.send(request)?;

        match response.status_code {
            200 => {
                self.session.set_state(SessionState::Playing);
                Ok(PlayOutcome::Playing)
            }
            302 => {
                let location = response.location().ok_or_else(|| {
                    RtspError::parse(ParseErrorKind::MissingLocation {
                        response: response.raw.clone(),
                    })
                })?;
                let next = StreamAddress::parse(location).map_err(|_| {
                    RtspError::parse(ParseErrorKind::MalformedLocation {
                        location: location.to_string(),
                    })
                })?;
                self.session.set_state(SessionState::RedirectPending);
                Ok(PlayOutcome::Redirect(next))
            }
            _ => Err(protocol_error(response)),
        }
    }

    fn teardown(&mut self) -> Result<()> {
        let uri = self.session.target.as_str().to_string();
        let session_id = self.session_header();
        let request = self
            .request(Method::Teardown, &uri)
            .header("Session", &session_id);
        expect_ok(self.send(request)?)?;
        tracing::debug!(session_id, "session torn down");
        Ok(())
    }

    /// TEARDOWN after a successful PLAY. A non-200 here fails the whole call.
    fn final_teardown(&mut self) -> Result<()> {
        match self.teardown() {
            Err(RtspError::Protocol { status, response }) => {
                Err(RtspError::Teardown { status, response })
            }
            Err(e) => Err(e),
            Ok(()) => {
                self.session.set_state(SessionState::TornDown);
                Ok(())
            }
        }
    }
}

fn expect_ok(response: RtspResponse) -> Result<RtspResponse> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(protocol_error(response))
    }
}

fn protocol_error(response: RtspResponse) -> RtspError {
    RtspError::Protocol {
        status: response.status_code,
        response: response.raw,
    }
}
