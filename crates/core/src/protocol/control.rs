//! Control-URI resolution for SETUP (RFC 2326 §C.1.1).

use crate::error::{ParseErrorKind, Result, RtspError};
use crate::protocol::response::RtspResponse;
use crate::protocol::sdp::{self, VideoControl};

/// What to do when the video `a=control:` attribute is already absolute
/// (contains `//`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsoluteControl {
    /// Leave the control URI empty and SETUP the request address instead.
    #[default]
    Ignore,
    /// SETUP the absolute control URI as advertised.
    Use,
    /// Fail the negotiation with [`ParseErrorKind::AbsoluteControlUri`].
    Reject,
}

/// Compute the SETUP target advertised by a DESCRIBE response.
///
/// Returns `Ok(None)` when the request address itself should be used: no
/// video section, no control attribute, or an absolute control value under
/// [`AbsoluteControl::Ignore`]. A relative value is joined onto
/// `Content-Base` with exactly one `/` between them; a relative value with
/// no `Content-Base` is an error.
pub fn resolve_control_uri(
    describe: &RtspResponse,
    policy: AbsoluteControl,
) -> Result<Option<String>> {
    let control = match sdp::video_control(&describe.body) {
        VideoControl::NoVideo | VideoControl::NoControl => return Ok(None),
        VideoControl::Control(control) => control,
    };

    if control.contains("//") {
        tracing::debug!(%control, ?policy, "absolute control URI in DESCRIBE");
        return match policy {
            AbsoluteControl::Ignore => Ok(None),
            AbsoluteControl::Use => Ok(Some(control)),
            AbsoluteControl::Reject => Err(RtspError::parse(
                ParseErrorKind::AbsoluteControlUri { control },
            )),
        };
    }

    let base = describe
        .content_base()
        .ok_or(RtspError::parse(ParseErrorKind::MissingContentBase))?;

    let separator = if base.ends_with('/') { "" } else { "/" };
    Ok(Some(format!("{base}{separator}{control}")))
}
