use crate::error::{ParseErrorKind, Result, RtspError};

/// Protocol version token every response must carry.
pub const RTSP_VERSION: &str = "RTSP/1.0";

/// Byte offset of the three status digits in the status line
/// (`RTSP/1.0 200 OK` → `200`).
const STATUS_OFFSET: usize = 9;

/// A parsed RTSP response (RFC 2326 §7).
///
/// ```text
/// RTSP/1.0 200 OK\r\n
/// CSeq: 2\r\n
/// Session: 12345678;timeout=60\r\n
/// \r\n
/// ```
///
/// The raw text is retained because non-200 responses are surfaced to the
/// operator verbatim. Header lookup is case-insensitive per RFC 2326 §4.2.
#[derive(Debug, Clone)]
pub struct RtspResponse {
    pub status_code: u16,
    pub status_text: String,
    /// Headers as ordered (name, value) pairs, names as received.
    pub headers: Vec<(String, String)>,
    /// Everything after the blank line (SDP for DESCRIBE).
    pub body: String,
    pub raw: String,
}

impl RtspResponse {
    /// Parse a complete response.
    ///
    /// Fails with [`ParseErrorKind::MissingVersion`] if the status line does
    /// not start with `RTSP/1.0`, and [`ParseErrorKind::InvalidStatusLine`] if
    /// the digits at the fixed status offset are not a number.
    pub fn parse(raw: &str) -> Result<Self> {
        let (head, body) = match raw.find("\r\n\r\n") {
            Some(pos) => (&raw[..pos], &raw[pos + 4..]),
            None => match raw.find("\n\n") {
                Some(pos) => (&raw[..pos], &raw[pos + 2..]),
                None => (raw, ""),
            },
        };

        let mut lines = head.lines();
        let status_line = lines.next().unwrap_or("");

        if !status_line.starts_with(RTSP_VERSION) {
            return Err(RtspError::parse(ParseErrorKind::MissingVersion));
        }

        let status_code = status_line
            .get(STATUS_OFFSET..STATUS_OFFSET + 3)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u16>().ok())
            .ok_or(RtspError::parse(ParseErrorKind::InvalidStatusLine))?;
        let status_text = status_line
            .get(STATUS_OFFSET + 3..)
            .unwrap_or("")
            .trim()
            .to_string();

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let colon_pos = line
                .find(':')
                .ok_or(RtspError::parse(ParseErrorKind::InvalidHeader))?;
            let name = line[..colon_pos].trim().to_string();
            let value = line[colon_pos + 1..].trim().to_string();
            headers.push((name, value));
        }

        Ok(RtspResponse {
            status_code,
            status_text,
            headers,
            body: body.to_string(),
            raw: raw.to_string(),
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// Look up a header value by name (case-insensitive, per RFC 2326 §4.2).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Session identifier from the `Session` header (RFC 2326 §12.37).
    ///
    /// Lower-cased and stripped of `;timeout=...` style parameters, which
    /// must not be echoed back on later requests. An empty identifier is
    /// treated as absent.
    pub fn session_id(&self) -> Option<String> {
        self.get_header("Session")
            .map(|s| s.split(';').next().unwrap_or(s).trim().to_ascii_lowercase())
            .filter(|id| !id.is_empty())
    }

    /// Redirect target from the `Location` header (RFC 2326 §12.25).
    pub fn location(&self) -> Option<&str> {
        self.get_header("Location").filter(|l| !l.is_empty())
    }

    /// Base URI for relative control attributes (RFC 2326 §12.11).
    pub fn content_base(&self) -> Option<&str> {
        self.get_header("Content-Base").filter(|b| !b.is_empty())
    }
}
