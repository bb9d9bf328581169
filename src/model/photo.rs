//! Shared photo/header capability.
//!
//! Several entities carry the same pair of image URLs. The pair is
//! composed by value and flattened into each entity's serialized form.

use serde::Serialize;
use serde_json::Value;

use crate::payload::str_field;
use crate::text::parse_photo;

/// Photo and header image URLs, query strings stripped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhotoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl PhotoFields {
    /// Build from the payload keys holding the two image URLs.
    pub(crate) fn from_payload(payload: &Value, photo_key: &str, header_key: &str) -> Self {
        Self {
            photo: parse_photo(str_field(payload, photo_key).as_deref()),
            header: parse_photo(str_field(payload, header_key).as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_strips_query() {
        let payload = json!({
            "song_art_image_url": "https://img.example/a.jpg?w=300",
            "header_image_url": "https://img.example/h.jpg",
        });
        let photo = PhotoFields::from_payload(&payload, "song_art_image_url", "header_image_url");
        assert_eq!(photo.photo.as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(photo.header.as_deref(), Some("https://img.example/h.jpg"));
    }

    #[test]
    fn test_missing_keys_stay_absent() {
        let photo = PhotoFields::from_payload(&json!({}), "image_url", "header_image_url");
        assert!(photo.photo.is_none());
        assert!(photo.header.is_none());
        assert_eq!(serde_json::to_string(&photo).unwrap(), "{}");
    }
}
