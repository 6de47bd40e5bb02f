//! Content-link detection for the summary pipeline.

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{5,})")
        .expect("video link pattern is valid")
});

static WEB_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>()]+").expect("web link pattern is valid"));

/// A recognized content link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLink {
    /// A video with an extractable id; summarized via the transcript service.
    Video { video_id: String },
    /// Any other URL; summarized by the web-summary service directly.
    Web { url: String },
}

/// Detect the first summarizable link in a message. Video links win over
/// the generic URL match so a video is never summarized as a web page.
pub fn detect(content: &str) -> Option<ContentLink> {
    if let Some(video_id) = extract_video_id(content) {
        return Some(ContentLink::Video { video_id });
    }

    extract_url(content).map(|url| ContentLink::Web { url })
}

/// Extract a video id from a video URL, if present.
pub fn extract_video_id(content: &str) -> Option<String> {
    VIDEO_LINK
        .captures(content)
        .map(|capture| capture[1].to_string())
}

/// Extract the first URL, if present.
pub fn extract_url(content: &str) -> Option<String> {
    WEB_LINK.find(content).map(|found| found.as_str().to_string())
}
