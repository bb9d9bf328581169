//! Album entity.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::{Artist, CoverArt, PhotoFields, Stats, Track};
use crate::payload::{
    arr_field, collapse_stats, obj_field, one_of, require_id, resolve_text, str_field, u64_field,
};
use crate::text::{artists_to_str, clean_title};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_artist: Option<Box<Artist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(flatten)]
    pub photo: PhotoFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_date"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_state: Option<String>,
    /// Cover arts hold the album back-reference; the album side is cleared
    /// inside each of them, never here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_arts: Option<Vec<CoverArt>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Album {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let primary_artist =
            one_of(payload, "artist", |v| Artist::from_payload(v, ctx))?.map(Box::new);
        let artist = artists_to_str(
            primary_artist.as_ref().and_then(|a| a.nickname.as_deref()),
            &[],
        );

        let tracks = album_tracks(payload, ctx)?;

        let (artist_domain, album_domain) = str_field(payload, "url")
            .as_deref()
            .and_then(split_album_domains)
            .map(|(artist, album)| (Some(artist), Some(album)))
            .unwrap_or((None, None));
        let domain = match (&artist_domain, &album_domain) {
            (Some(artist), Some(album)) => Some(format!("{artist}/{album}")),
            _ => None,
        };
        let url = domain.as_ref().map(|d| format!("{WEB_BASE}albums/{d}"));

        let mut album = Self {
            title: clean_title(str_field(payload, "name").as_deref()),
            primary_artist,
            artist,
            photo: PhotoFields::from_payload(payload, "cover_art_url", "header_image_url"),
            description: str_field(payload, "description_preview")
                .or_else(|| resolve_text(obj_field(payload, "description"))),
            release_date: release_date_from_components(payload),
            tracks,
            lock_state: str_field(payload, "lock_state"),
            cover_arts: None,
            stats: None,
            id: require_id(payload, "/albums/", "Album")?,
            artist_domain,
            album_domain,
            domain,
            url,
            raw: payload.clone(),
            ctx: ctx.clone(),
        };

        // Each cover art embeds the album as built so far, cover-art list
        // still absent; only the album ever points down.
        if let Some(items) = arr_field(payload, "cover_arts") {
            let mut cover_arts = Vec::new();
            for item in items {
                cover_arts.push(CoverArt::with_album(item, Some(album.clone()), ctx)?);
            }
            album.cover_arts = (!cover_arts.is_empty()).then_some(cover_arts);
        }

        album.stats = collapse_stats(Stats {
            tracks: album.tracks.as_ref().map(|tracks| tracks.len() as u64),
            views: u64_field(payload, "song_pageviews"),
            pyongs: u64_field(payload, "pyongs_count"),
            comments: u64_field(payload, "comment_count"),
            cover_arts: album.cover_arts.as_ref().map(|arts| arts.len() as u64),
            ..Stats::default()
        });

        Ok(album)
    }
}

/// Album track listings arrive either as bare song payloads or wrapped as
/// `{"song": ..., "number": ...}`; the wrapper's number is folded into the
/// song before materializing.
fn album_tracks(payload: &Value, ctx: &Context) -> Result<Option<Vec<Track>>, MaterializeError> {
    let Some(items) = arr_field(payload, "tracks") else {
        return Ok(None);
    };

    let mut tracks = Vec::new();
    for item in items {
        let track = match obj_field(item, "song") {
            Some(song) => {
                let mut song = song.clone();
                if let Some(number) = item.get("number").filter(|n| n.is_number()) {
                    song["number"] = number.clone();
                }
                Track::from_payload(&song, ctx)?
            }
            None => Track::from_payload(item, ctx)?,
        };
        tracks.push(track);
    }

    Ok((!tracks.is_empty()).then_some(tracks))
}

fn release_date_from_components(payload: &Value) -> Option<NaiveDate> {
    let components = obj_field(payload, "release_date_components")?;
    let day = u64_field(components, "day")?;
    let month = u64_field(components, "month")?;
    let year = u64_field(components, "year")?;
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}

/// `https://genius.com/albums/<artist>/<album>` into its two domain parts.
fn split_album_domains(url: &str) -> Option<(String, String)> {
    let tail = url.split_once("/albums/")?.1;
    let (artist, album) = tail.split_once('/')?;
    if artist.is_empty() || album.is_empty() {
        return None;
    }
    Some((artist.to_string(), album.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn album_payload() -> Value {
        json!({
            "id": 55,
            "name": "Scorpion",
            "url": "https://genius.com/albums/Drake/Scorpion",
            "artist": {"id": 1, "name": "Drake", "slug": "drake"},
            "cover_art_url": "https://img.example/scorpion.jpg?w=300",
            "pyongs_count": 12,
            "cover_arts": [
                {"id": 900, "image_url": "https://img.example/front.jpg"},
                {"id": 901, "image_url": "https://img.example/back.jpg"},
            ],
        })
    }

    #[test]
    fn test_from_payload_core_fields() {
        let album = Album::from_payload(&album_payload(), &Context::detached()).unwrap();
        assert_eq!(album.title.as_deref(), Some("Scorpion"));
        assert_eq!(album.artist.as_deref(), Some("Drake"));
        assert_eq!(album.domain.as_deref(), Some("Drake/Scorpion"));
        assert_eq!(
            album.url.as_deref(),
            Some("https://genius.com/albums/Drake/Scorpion")
        );
    }

    #[test]
    fn test_cover_art_backref_is_pruned() {
        let album = Album::from_payload(&album_payload(), &Context::detached()).unwrap();
        let arts = album.cover_arts.as_ref().unwrap();
        assert_eq!(arts.len(), 2);
        for art in arts {
            let back = art.album.as_ref().unwrap();
            assert_eq!(back.id, album.id);
            assert!(back.cover_arts.is_none());
        }
        assert_eq!(album.stats.as_ref().unwrap().cover_arts, Some(2));
    }

    #[test]
    fn test_wrapped_track_listing() {
        let payload = json!({
            "id": 55,
            "url": "https://genius.com/albums/Drake/Scorpion",
            "tracks": [
                {"number": 2, "song": {"id": 7, "title": "Emotionless", "api_path": "/songs/7"}},
            ],
        });
        let album = Album::from_payload(&payload, &Context::detached()).unwrap();
        let tracks = album.tracks.as_ref().unwrap();
        assert_eq!(tracks[0].id, 7);
        assert_eq!(tracks[0].number, Some(2));
        assert_eq!(album.stats.as_ref().unwrap().tracks, Some(1));
    }
}
