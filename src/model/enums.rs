//! Closed enums for the service's string-typed wire values.
//!
//! Request-side enums ([`TextFormat`], [`Sort`]) render to query parameter
//! values; response-side enums ([`Role`], [`TextColor`]) parse known tags
//! and serialize back to their underlying scalar. Unknown role tags are
//! skipped by callers rather than failing a whole construction.

use serde::Serialize;

/// Body representation requested from text-bearing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Plain,
    Html,
    Markdown,
    Dom,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Dom => "dom",
        }
    }
}

/// Ordering for artist album/track listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Popularity,
    Title,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Title => "title",
        }
    }
}

/// Display roles attached to users and hidden-track visibility lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Contributor,
    Editor,
    Mediator,
    Moderator,
    Staff,
    Transcriber,
    VerifiedArtist,
}

impl Role {
    /// Parse a wire tag (`"verified_artist"`, `"staff"`, ...). Unknown tags
    /// yield `None`; upstream may introduce roles we have never seen.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "contributor" => Some(Self::Contributor),
            "editor" => Some(Self::Editor),
            "mediator" => Some(Self::Mediator),
            "moderator" => Some(Self::Moderator),
            "staff" => Some(Self::Staff),
            "transcriber" => Some(Self::Transcriber),
            "verified_artist" => Some(Self::VerifiedArtist),
            _ => None,
        }
    }
}

/// Text color of track artwork, reduced to the service's two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextColor {
    #[serde(rename = "#fff")]
    White,
    #[serde(rename = "#000")]
    Black,
}

impl TextColor {
    /// The service reports `#fff` for white; every other value is black.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "#fff" { Self::White } else { Self::Black }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format_values() {
        assert_eq!(TextFormat::Plain.as_str(), "plain");
        assert_eq!(TextFormat::Dom.as_str(), "dom");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_tag("verified_artist"), Some(Role::VerifiedArtist));
        assert_eq!(Role::from_tag("staff"), Some(Role::Staff));
        assert_eq!(Role::from_tag("astronaut"), None);
    }

    #[test]
    fn test_role_serializes_camel_case() {
        let json = serde_json::to_string(&Role::VerifiedArtist).unwrap();
        assert_eq!(json, "\"verifiedArtist\"");
    }

    #[test]
    fn test_text_color() {
        assert_eq!(TextColor::from_tag("#fff"), TextColor::White);
        assert_eq!(TextColor::from_tag("#1a1a1a"), TextColor::Black);
        assert_eq!(serde_json::to_string(&TextColor::White).unwrap(), "\"#fff\"");
    }
}
