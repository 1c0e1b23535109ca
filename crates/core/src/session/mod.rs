//! Client-side RTSP session state for one negotiation.
//!
//! A [`Session`] lives exactly as long as one
//! [`Negotiator::obtain_redirect`](crate::Negotiator::obtain_redirect) call.
//! It tracks:
//!
//! - The current target address (replaced on every redirect hop).
//! - The control URI advertised by DESCRIBE (may be empty).
//! - The server-assigned session ID, set by SETUP.
//! - The `CSeq` counter, shared by every request of the call and never reset.
//! - The client port pair and transport/playback flags.
//!
//! ## Negotiation lifecycle
//!
//! ```text
//! Start ──OPTIONS──> OptionsOk ──DESCRIBE──> Described ──SETUP──> SetupOk
//! SetupOk ──PLAY 200──> Playing ──TEARDOWN──> TornDown
//! SetupOk ──PLAY 302──> RedirectPending ──TEARDOWN, OPTIONS, ...──> SetupOk
//! any state ──error──> Failed
//! ```

pub mod transport;

use crate::address::StreamAddress;
pub use transport::{ClientPorts, TransportHeader};

/// Negotiation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Address validated, connection open, nothing sent yet.
    Start,
    /// OPTIONS answered 200.
    OptionsOk,
    /// DESCRIBE answered 200 and the SETUP target is known.
    Described,
    /// SETUP answered 200 with a session ID.
    SetupOk,
    /// PLAY answered 200; the current target is the result.
    Playing,
    /// PLAY answered 302; the session is being replaced.
    RedirectPending,
    /// Final TEARDOWN answered 200.
    TornDown,
    /// A terminal error occurred.
    Failed,
}

/// Mutable per-call negotiation state.
#[derive(Debug)]
pub struct Session {
    /// Address OPTIONS/DESCRIBE/PLAY/TEARDOWN are sent to.
    pub target: StreamAddress,
    /// Absolute control URI from the last DESCRIBE, if any.
    pub control_uri: Option<String>,
    /// Server session ID from the last SETUP (lower-cased, no parameters).
    pub session_id: Option<String>,
    pub client_ports: ClientPorts,
    pub multicast: bool,
    /// Request reverse playback from live instead of live delivery.
    pub playback: bool,
    cseq: u32,
    state: SessionState,
}

impl Session {
    pub fn new(target: StreamAddress, client_ports: ClientPorts, playback: bool) -> Self {
        let multicast = target.is_multicast();
        Session {
            target,
            control_uri: None,
            session_id: None,
            client_ports,
            multicast,
            playback,
            cseq: 0,
            state: SessionState::Start,
        }
    }

    /// Return the `CSeq` for the next request and advance the counter.
    pub fn next_cseq(&mut self) -> u32 {
        let cseq = self.cseq;
        self.cseq += 1;
        cseq
    }

    /// Number of requests issued so far.
    pub fn requests_sent(&self) -> u32 {
        self.cseq
    }

    /// URI for SETUP: the control URI when DESCRIBE advertised one.
    pub fn setup_uri(&self) -> &str {
        self.control_uri
            .as_deref()
            .unwrap_or_else(|| self.target.as_str())
    }

    /// Point the session at a redirect target. The session ID and control
    /// URI belong to the old target and are dropped.
    pub fn retarget(&mut self, target: StreamAddress) {
        tracing::debug!(from = %self.target, to = %target, "retargeting session");
        self.target = target;
        self.control_uri = None;
        self.session_id = None;
    }

    /// `Transport` header value for SETUP.
    pub fn transport_header(&self) -> TransportHeader {
        TransportHeader::new(self.multicast, self.client_ports)
    }

    pub fn set_state(&mut self, state: SessionState) {
        tracing::trace!(old_state = ?self.state, new_state = ?state, "state transition");
        self.state = state;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
