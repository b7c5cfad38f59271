//! YouTube URL parsing. The rest of the crate never stores a raw URL: the one
//! thing we keep is the canonical video identifier, extracted and validated
//! here, so every downstream consumer can assume it is well-formed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Every canonical YouTube video identifier is exactly this many characters.
/// The length check is the only plausibility validation we perform; whether
/// the video actually exists is not our problem to verify.
const VIDEO_ID_LEN: usize = 11;

/// The input did not contain a recognizable video identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not a valid YouTube URL")]
pub struct InvalidUrl;

/// Canonical 11-character video identifier. Values only come out of
/// [`VideoId::new`] or [`extract_video_id`], so holding one implies the
/// length invariant already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare identifier, enforcing the length invariant.
    pub fn new<S: Into<String>>(id: S) -> Result<Self, InvalidUrl> {
        let id = id.into();
        if id.chars().count() == VIDEO_ID_LEN {
            Ok(Self(id))
        } else {
            Err(InvalidUrl)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL, the form we hand to the system browser.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Markers that precede a video identifier in the URL shapes we accept:
/// `youtu.be/<id>`, `/v/<id>`, `/u/<channel>/<id>`, `/embed/<id>`, and the
/// `v=` query parameter. The candidate token runs until the next `#`, `&`,
/// or `?`.
fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:youtu\.be/|/v/|/u/\w/|/embed/|[?&]v=)([^#&?]*)")
            .expect("video id pattern is valid")
    })
}

/// Pull the canonical video identifier out of an arbitrary URL-ish string.
///
/// When several markers appear in one string the last one wins, so a later
/// `v=` parameter overrides an earlier one. The extraction succeeds only if
/// the token after the marker is exactly eleven characters; anything else is
/// an [`InvalidUrl`].
pub fn extract_video_id(url: &str) -> Result<VideoId, InvalidUrl> {
    let token = id_pattern()
        .captures_iter(url)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
        .ok_or(InvalidUrl)?;

    VideoId::new(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn extracts_from_short_url() {
        let id = extract_video_id("https://youtu.be/6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn extracts_from_embed_url() {
        let id = extract_video_id("https://www.youtube.com/embed/6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn extracts_from_v_path() {
        let id = extract_video_id("https://www.youtube.com/v/6hzrDeceEKc?version=3").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn extracts_from_channel_path() {
        let id = extract_video_id("https://www.youtube.com/u/w/6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn extracts_from_ampersand_parameter() {
        let id = extract_video_id("https://www.youtube.com/watch?list=abc&v=6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn later_parameter_wins() {
        let id = extract_video_id("https://www.youtube.com/watch?v=short&v=6hzrDeceEKc").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn token_stops_at_fragment() {
        let id = extract_video_id("https://youtu.be/6hzrDeceEKc#t=42").unwrap();
        assert_eq!(id.as_str(), "6hzrDeceEKc");
    }

    #[test]
    fn rejects_wrong_length_token() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=tooshort"),
            Err(InvalidUrl)
        );
        assert_eq!(
            extract_video_id("https://youtu.be/waaaaaaaaaytoolong"),
            Err(InvalidUrl)
        );
    }

    #[test]
    fn rejects_unrecognized_strings() {
        assert_eq!(extract_video_id(""), Err(InvalidUrl));
        assert_eq!(extract_video_id("not a url"), Err(InvalidUrl));
        assert_eq!(
            extract_video_id("https://vimeo.com/123456789"),
            Err(InvalidUrl)
        );
    }

    #[test]
    fn video_id_rejects_bad_lengths() {
        assert!(VideoId::new("6hzrDeceEKc").is_ok());
        assert_eq!(VideoId::new("short"), Err(InvalidUrl));
        assert_eq!(VideoId::new(""), Err(InvalidUrl));
    }

    #[test]
    fn watch_url_round_trip() {
        let id = VideoId::new("6hzrDeceEKc").unwrap();
        assert_eq!(
            extract_video_id(&id.watch_url()).unwrap().as_str(),
            "6hzrDeceEKc"
        );
    }
}
