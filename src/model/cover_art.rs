//! Album cover art.

use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::Album;
use crate::payload::{bool_field, obj_field, require_id, str_field};
use crate::text::parse_photo;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverArt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated: Option<bool>,
    /// Owning album; its own cover-art list is always cleared so the pair
    /// keeps a single direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<Box<Album>>,
    pub id: u64,
    pub url: String,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl CoverArt {
    /// Materialize a standalone cover-art payload. An embedded `album`
    /// object is materialized as the back-reference.
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let album = match obj_field(payload, "album") {
            Some(nested) => Some(Album::from_payload(nested, ctx)?),
            None => None,
        };
        Self::with_album(payload, album, ctx)
    }

    /// Materialize with an already-built album back-reference (used while
    /// the album itself is under construction).
    pub(crate) fn with_album(
        payload: &Value,
        album: Option<Album>,
        ctx: &Context,
    ) -> Result<Self, MaterializeError> {
        let album = album.map(|mut album| {
            album.cover_arts = None;
            Box::new(album)
        });

        let id = require_id(payload, "/album_cover_arts/", "CoverArt")?;

        Ok(Self {
            photo: parse_photo(str_field(payload, "image_url").as_deref()),
            annotated: bool_field(payload, "annotated"),
            album,
            id,
            url: format!("{WEB_BASE}album_cover_arts/{id}"),
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload() {
        let payload = json!({
            "id": 77,
            "image_url": "https://img.example/cover.png?x=1",
            "annotated": false,
        });
        let art = CoverArt::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(art.photo.as_deref(), Some("https://img.example/cover.png"));
        assert_eq!(art.annotated, Some(false));
        assert_eq!(art.url, "https://genius.com/album_cover_arts/77");
        assert!(art.album.is_none());
    }
}
