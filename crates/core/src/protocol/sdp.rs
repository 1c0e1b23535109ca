//! SDP (Session Description Protocol) scanning (RFC 4566 / RFC 8866).
//!
//! Only the piece the negotiator needs is extracted: the `a=control:`
//! attribute of the video media section.
//!
//! ```text
//! v=0
//! o=- 0 0 IN IP4 10.0.0.5
//! s=Stream
//! t=0 0
//! m=video 0 RTP/AVP 96          ← media section starts
//! a=rtpmap:96 H264/90000
//! a=control:track1              ← track control URL
//! m=audio 0 RTP/AVP 97          ← next section, scan stops here
//! ```

/// What the video media section says about its control URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoControl {
    /// No `m=video` line in the description.
    NoVideo,
    /// The video section has no `a=control:` attribute.
    NoControl,
    /// The raw attribute value (relative or absolute).
    Control(String),
}

const VIDEO_MEDIA: &str = "m=video";
const CONTROL_ATTR: &str = "a=control:";

/// Find the control attribute of the first video media section.
pub fn video_control(sdp: &str) -> VideoControl {
    let mut lines = sdp.lines().map(str::trim);

    if !lines.any(|line| line.starts_with(VIDEO_MEDIA)) {
        return VideoControl::NoVideo;
    }

    for line in lines {
        if line.starts_with("m=") {
            break;
        }
        if let Some(value) = line.strip_prefix(CONTROL_ATTR) {
            return VideoControl::Control(value.trim().to_string());
        }
    }

    VideoControl::NoControl
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDP: &str = "v=0\r\n\
                       o=- 0 0 IN IP4 10.0.0.5\r\n\
                       s=Stream\r\n\
                       a=control:*\r\n\
                       t=0 0\r\n\
                       m=video 0 RTP/AVP 96\r\n\
                       a=rtpmap:96 H264/90000\r\n\
                       a=control:track1\r\n\
                       m=audio 0 RTP/AVP 97\r\n\
                       a=control:track2\r\n";

    #[test]
    fn finds_video_control() {
        assert_eq!(video_control(SDP), VideoControl::Control("track1".into()));
    }

    #[test]
    fn session_level_control_is_ignored() {
        let sdp = "v=0\r\na=control:*\r\nm=video 0 RTP/AVP 96\r\na=rtpmap:96 H264/90000\r\n";
        assert_eq!(video_control(sdp), VideoControl::NoControl);
    }

    #[test]
    fn control_from_other_section_is_ignored() {
        let sdp = "v=0\r\nm=video 0 RTP/AVP 96\r\nm=audio 0 RTP/AVP 97\r\na=control:track2\r\n";
        assert_eq!(video_control(sdp), VideoControl::NoControl);
    }

    #[test]
    fn audio_only() {
        let sdp = "v=0\r\nm=audio 0 RTP/AVP 97\r\na=control:track2\r\n";
        assert_eq!(video_control(sdp), VideoControl::NoVideo);
        assert_eq!(video_control(""), VideoControl::NoVideo);
    }

    #[test]
    fn absolute_control_kept_verbatim() {
        let sdp = "m=video 0 RTP/AVP 96\r\na=control:rtsp://10.0.0.5/stream/trackID=0\r\n";
        assert_eq!(
            video_control(sdp),
            VideoControl::Control("rtsp://10.0.0.5/stream/trackID=0".into())
        );
    }
}
