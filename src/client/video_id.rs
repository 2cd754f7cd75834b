use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::error::ClientError;

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("valid video id regex"));

static URL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/|/live/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("valid video url regex")
});

/// An 11-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts a bare id or a youtube.com / youtu.be URL.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let input = input.trim();
        if BARE_ID.is_match(input) {
            return Ok(Self(input.to_string()));
        }
        if input.contains("youtube.com") || input.contains("youtu.be") {
            if let Some(id) = URL_ID.captures(input).and_then(|c| c.get(1)) {
                return Ok(Self(id.as_str().to_string()));
            }
        }
        Err(ClientError::InvalidVideoId(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
