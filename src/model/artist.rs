//! Artist entity.

use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::{Album, PhotoFields, Stats, Track, User};
use crate::payload::{
    arr_field, bool_field, collapse_stats, f64_field, obj_field, one_of, require_id, resolve_text,
    str_field, u64_field, vec_of,
};
use crate::text::clean_artists;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_nicknames: Option<Vec<String>>,
    #[serde(flatten)]
    pub photo: PhotoFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
    /// The user account behind a verified artist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    /// Performance role label when credited through a custom role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Artist {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let alternative_nicknames = arr_field(payload, "alternate_names").map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|name| clean_artists(Some(name)))
                .collect::<Vec<_>>()
        });

        let domain = str_field(payload, "slug");
        let url = domain.as_ref().map(|d| format!("{WEB_BASE}artists/{d}"));

        Ok(Self {
            nickname: clean_artists(str_field(payload, "name").as_deref()),
            alternative_nicknames: alternative_nicknames.filter(|names| !names.is_empty()),
            photo: PhotoFields::from_payload(payload, "image_url", "header_image_url"),
            description: resolve_text(obj_field(payload, "description")),
            index_character: str_field(payload, "index_character"),
            meme_verified: bool_field(payload, "is_meme_verified"),
            verified: bool_field(payload, "is_verified"),
            translation: bool_field(payload, "translation_artist"),
            instagram: str_field(payload, "instagram_name"),
            twitter: str_field(payload, "twitter_name"),
            facebook: str_field(payload, "facebook_name"),
            albums: vec_of(payload, "albums", |v| Album::from_payload(v, ctx))?,
            tracks: vec_of(payload, "tracks", |v| Track::from_payload(v, ctx))?,
            user: one_of(payload, "user", |v| User::from_payload(v, ctx))?.map(Box::new),
            role: str_field(payload, "role"),
            stats: collapse_stats(Stats {
                followers: u64_field(payload, "followers_count"),
                iq: f64_field(payload, "iq"),
                ..Stats::default()
            }),
            id: require_id(payload, "/artists/", "Artist")?,
            domain,
            url,
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
            "id": 1,
            "name": "Drake",
            "slug": "drake",
            "image_url": "https://img.example/drake.jpg?s=1",
            "is_verified": true,
            "followers_count": 42,
            "iq": 1000,
        });
        let artist = Artist::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(artist.nickname.as_deref(), Some("Drake"));
        assert_eq!(artist.url.as_deref(), Some("https://genius.com/artists/drake"));
        assert_eq!(artist.verified, Some(true));
        let stats = artist.stats.unwrap();
        assert_eq!(stats.followers, Some(42));
        assert_eq!(stats.iq, Some(1000.0));
    }

    #[test]
    fn test_alternate_names_are_cleaned() {
        let payload = json!({
            "id": 2,
            "name": "Скриптонит (Skryptonite)",
            "alternate_names": ["Adil (prod)", ""],
        });
        let artist = Artist::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(artist.nickname.as_deref(), Some("Скриптонит"));
        assert_eq!(
            artist.alternative_nicknames,
            Some(vec!["Adil".to_string()])
        );
    }

    #[test]
    fn test_sparse_stats_collapse() {
        let payload = json!({"id": 3, "name": "X"});
        let artist = Artist::from_payload(&payload, &Context::detached()).unwrap();
        assert!(artist.stats.is_none());
    }
}
