//! RTSP protocol text handling (RFC 2326), client side.
//!
//! This module builds requests, parses responses, and pulls the video
//! control URL out of DESCRIBE bodies.
//!
//! ## RTSP message format (RFC 2326 §4)
//!
//! ```text
//! PLAY rtsp://server/stream RTSP/1.0\r\n
//! CSeq: 3\r\n
//! User-Agent: rtsp-redirect/0.1.0\r\n
//! Session: 12345678\r\n
//! \r\n
//! ```
//!
//! ## Methods issued
//!
//! | Method | RFC section | Purpose |
//! |--------|-------------|---------|
//! | OPTIONS | §10.1 | Capability probe |
//! | DESCRIBE | §10.2 | Retrieve SDP, find the video control URL |
//! | SETUP | §10.4 | Create a session for the control URL |
//! | PLAY | §10.5 | Start delivery, or receive a 302 redirect |
//! | TEARDOWN | §10.7 | Destroy the session |

pub mod control;
pub mod request;
pub mod response;
pub mod sdp;

pub use control::{AbsoluteControl, resolve_control_uri};
pub use request::{Method, RtspRequest};
pub use response::RtspResponse;
