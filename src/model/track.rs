//! Track entity.
//!
//! The widest payload in the API: credited artists in four roles, artwork
//! colors, release metadata, external platform ids, nested albums/genres/
//! translations, aggregate stats and the embedded lyrics metadata.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::{Album, Artist, Genre, Lyrics, PhotoFields, Role, Stats, TextColor, User};
use crate::payload::{
    arr_field, bool_field, collapse_stats, datetime_field, obj_field, one_of, require_id,
    str_field, u64_field, vec_of,
};
use crate::text::{artists_to_str, clean_title};

const YOUTUBE_WATCH_PREFIX: &str = "http://www.youtube.com/watch?v=";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_artist: Option<Box<Artist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_artists: Option<Vec<Artist>>,
    /// Joined display string: "A feat. B & C".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producers: Option<Vec<Artist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writers: Option<Vec<Artist>>,
    #[serde(flatten)]
    pub photo: PhotoFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<TextColor>,
    /// Only populated when day, month and year are all present.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_date"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_genre: Option<Box<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub transcribed_at: Option<NaiveDateTime>,
    /// YouTube video id, prefix stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_second: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_video: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundcloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_music: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vttp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Present only on hidden tracks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewable_by_roles: Option<Vec<Role>>,
    /// Position on the containing album.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_contributors: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_annotations_by: Option<Vec<User>>,
    /// Artists credited through custom performance roles, each carrying the
    /// role label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_roles: Option<Vec<Artist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hot: Option<bool>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "crate::serialize::lyrics_is_sparse")]
    pub lyrics: Option<Box<Lyrics>>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Track {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let primary_artist = one_of(payload, "primary_artist", |v| Artist::from_payload(v, ctx))?
            .map(Box::new);
        let featured_artists =
            vec_of(payload, "featured_artists", |v| Artist::from_payload(v, ctx))?;

        let featured_nicknames: Vec<&str> = featured_artists
            .iter()
            .flatten()
            .filter_map(|artist| artist.nickname.as_deref())
            .collect();
        let artist = artists_to_str(
            primary_artist.as_ref().and_then(|a| a.nickname.as_deref()),
            &featured_nicknames,
        );

        let albums = match vec_of(payload, "albums", |v| Album::from_payload(v, ctx))? {
            Some(albums) => Some(albums),
            None => one_of(payload, "album", |v| Album::from_payload(v, ctx))?.map(|a| vec![a]),
        };

        let timestamps = obj_field(payload, "client_timestamps");

        let hidden = bool_field(payload, "hidden");
        let viewable_by_roles = if hidden == Some(true) {
            arr_field(payload, "viewable_by_roles").map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(Role::from_tag)
                    .collect()
            })
        } else {
            None
        };

        let custom_roles = match arr_field(payload, "custom_performances") {
            Some(performances) => {
                let mut credited = Vec::new();
                for performance in performances {
                    let label = str_field(performance, "label");
                    for artist_payload in arr_field(performance, "artists").into_iter().flatten() {
                        let mut artist = Artist::from_payload(artist_payload, ctx)?;
                        artist.role = label.clone();
                        credited.push(artist);
                    }
                }
                (!credited.is_empty()).then_some(credited)
            }
            None => None,
        };

        let page_stats = obj_field(payload, "stats");
        let stats = collapse_stats(Stats {
            views: page_stats.and_then(|s| u64_field(s, "pageviews")),
            concurrents: page_stats.and_then(|s| u64_field(s, "concurrents")),
            contributors: page_stats.and_then(|s| u64_field(s, "contributors")),
            iq_earners: page_stats.and_then(|s| u64_field(s, "iq_earners")),
            transcribers: page_stats.and_then(|s| u64_field(s, "transcribers")),
            verified_annotations: page_stats.and_then(|s| u64_field(s, "verified_annotations")),
            accepted_annotations: page_stats.and_then(|s| u64_field(s, "accepted_annotations")),
            unreviewed_annotations: page_stats.and_then(|s| u64_field(s, "unreviewed_annotations")),
            annotations: u64_field(payload, "annotation_count"),
            pyongs: u64_field(payload, "pyongs_count"),
            comments: u64_field(payload, "comment_count"),
            ..Stats::default()
        });

        let id = require_id(payload, "/songs/", "Track")?;

        let artist_domain = primary_artist.as_ref().and_then(|a| a.domain.clone());
        let base_domain = str_field(payload, "path")
            .map(|path| {
                let domain = path.strip_prefix('/').unwrap_or(&path);
                domain.strip_suffix("-lyrics").unwrap_or(domain).to_string()
            })
            .or_else(|| {
                str_field(payload, "url").map(|url| {
                    let domain = url.replace(WEB_BASE, "");
                    domain
                        .strip_suffix("-lyrics")
                        .unwrap_or(&domain)
                        .to_string()
                })
            });
        let (track_domain, domain) = match (&artist_domain, base_domain) {
            (Some(artist_domain), Some(base)) => {
                let track_domain = base.replace(&format!("{artist_domain}-"), "");
                let domain = format!("{artist_domain}-{track_domain}");
                (Some(track_domain), Some(domain))
            }
            (None, Some(base)) => (None, Some(base)),
            (_, None) => (None, None),
        };
        let url = domain.as_ref().map(|d| format!("{WEB_BASE}{d}-lyrics"));

        let mut track = Self {
            title: clean_title(str_field(payload, "title").as_deref()),
            primary_artist,
            featured_artists,
            artist,
            producers: vec_of(payload, "producer_artists", |v| Artist::from_payload(v, ctx))?,
            writers: vec_of(payload, "writer_artists", |v| Artist::from_payload(v, ctx))?,
            photo: PhotoFields::from_payload(payload, "song_art_image_url", "header_image_url"),
            description: crate::payload::resolve_text(obj_field(payload, "description")),
            primary_color: str_field(payload, "song_art_primary_color"),
            second_color: str_field(payload, "song_art_secondary_color"),
            text_color: str_field(payload, "song_art_text_color")
                .map(|tag| TextColor::from_tag(&tag)),
            release_date: release_date_from_components(payload),
            primary_genre: one_of(payload, "primary_tag", |v| Genre::from_payload(v, ctx))?
                .map(Box::new),
            genres: vec_of(payload, "tags", |v| Genre::from_payload(v, ctx))?,
            albums,
            updated_at: datetime_field(payload, "updated_by_human_at")
                .or_else(|| timestamps.and_then(|t| datetime_field(t, "updated_by_human_at"))),
            transcribed_at: datetime_field(payload, "transcribedAt"),
            youtube: str_field(payload, "youtube_url")
                .map(|url| url.replace(YOUTUBE_WATCH_PREFIX, "")),
            start_second: u64_field(payload, "youtube_start"),
            featured_video: bool_field(payload, "featured_video"),
            soundcloud: str_field(payload, "soundcloud_url"),
            apple_music: str_field(payload, "apple_music_id"),
            spotify: str_field(payload, "spotify_uuid"),
            vttp_id: str_field(payload, "vttp_id"),
            released: bool_field(payload, "published"),
            recording_location: str_field(payload, "recording_location"),
            hidden,
            viewable_by_roles,
            number: u64_field(payload, "number"),
            translations: vec_of(payload, "translation_songs", |v| {
                Track::from_payload(v, ctx)
            })?,
            verified_contributors: vec_of(payload, "verified_contributors", |v| {
                User::from_payload(v, ctx)
            })?,
            verified_annotations_by: vec_of(payload, "verified_annotations_by", |v| {
                User::from_payload(v, ctx)
            })?,
            custom_roles,
            hot: page_stats.and_then(|s| bool_field(s, "hot")),
            stats,
            id,
            artist_domain,
            track_domain,
            domain,
            url,
            lyrics: None,
            raw: payload.clone(),
            ctx: ctx.clone(),
        };

        // The lyrics back-reference embeds the track as built so far, with
        // `lyrics` still absent; only the outer track ever points down.
        track.lyrics = Some(Box::new(Lyrics::embedded_in_track(payload, &track, ctx)?));

        Ok(track)
    }

    /// Overlay page-extracted lyric text onto the embedded lyrics metadata.
    pub(crate) fn attach_extracted(&mut self, extracted: crate::lyrics::ExtractedLyrics) {
        if let Some(lyrics) = self.lyrics.as_mut() {
            lyrics.merge_extracted(extracted);
        }
    }
}

/// Release date, only when all three components are present.
fn release_date_from_components(payload: &Value) -> Option<NaiveDate> {
    let components = obj_field(payload, "release_date_components")?;
    let day = u64_field(components, "day")?;
    let month = u64_field(components, "month")?;
    let year = u64_field(components, "year")?;
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_payload() -> Value {
        json!({
            "id": 100,
            "title": "Gods Plan",
            "path": "/drake-gods-plan-lyrics",
            "primary_artist": {
                "id": 1,
                "name": "Drake",
                "slug": "drake",
            },
            "featured_artists": [
                {"id": 2, "name": "Rihanna", "slug": "rihanna"},
            ],
            "song_art_image_url": "https://img.example/a.jpg?x=1",
            "song_art_text_color": "#fff",
            "release_date_components": {"day": 19, "month": 1, "year": 2018},
            "stats": {"pageviews": 1000, "hot": true},
            "pyongs_count": 3,
            "lyrics_state": "complete",
            "instrumental": false,
        })
    }

    #[test]
    fn test_from_payload_core_fields() {
        let track = Track::from_payload(&track_payload(), &Context::detached()).unwrap();
        assert_eq!(track.id, 100);
        assert_eq!(track.title.as_deref(), Some("Gods Plan"));
        assert_eq!(track.artist.as_deref(), Some("Drake feat. Rihanna"));
        assert_eq!(track.photo.photo.as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(track.text_color, Some(TextColor::White));
        assert_eq!(track.hot, Some(true));
        assert_eq!(
            track.release_date,
            NaiveDate::from_ymd_opt(2018, 1, 19)
        );
    }

    #[test]
    fn test_domain_and_url() {
        let track = Track::from_payload(&track_payload(), &Context::detached()).unwrap();
        assert_eq!(track.artist_domain.as_deref(), Some("drake"));
        assert_eq!(track.track_domain.as_deref(), Some("gods-plan"));
        assert_eq!(track.domain.as_deref(), Some("drake-gods-plan"));
        assert_eq!(
            track.url.as_deref(),
            Some("https://genius.com/drake-gods-plan-lyrics")
        );
    }

    #[test]
    fn test_stats_merge_page_and_top_level() {
        let track = Track::from_payload(&track_payload(), &Context::detached()).unwrap();
        let stats = track.stats.as_ref().unwrap();
        assert_eq!(stats.views, Some(1000));
        assert_eq!(stats.pyongs, Some(3));
    }

    #[test]
    fn test_partial_release_date_is_absent() {
        let mut payload = track_payload();
        payload["release_date_components"] = json!({"month": 1, "year": 2018});
        let track = Track::from_payload(&payload, &Context::detached()).unwrap();
        assert!(track.release_date.is_none());
    }

    #[test]
    fn test_lyrics_backref_does_not_loop() {
        let track = Track::from_payload(&track_payload(), &Context::detached()).unwrap();
        let embedded = track.lyrics.as_ref().unwrap();
        assert_eq!(embedded.state.as_deref(), Some("complete"));
        let back = embedded.track.as_ref().unwrap();
        assert_eq!(back.id, track.id);
        assert!(back.lyrics.is_none());
    }

    #[test]
    fn test_missing_id_and_api_path_fails() {
        let payload = json!({"title": "x"});
        assert!(Track::from_payload(&payload, &Context::detached()).is_err());
    }

    #[test]
    fn test_id_from_api_path() {
        let payload = json!({"api_path": "/songs/4242"});
        let track = Track::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(track.id, 4242);
    }

    #[test]
    fn test_serializes_without_recursion() {
        let track = Track::from_payload(&track_payload(), &Context::detached()).unwrap();
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["id"], 100);
        // The embedded lyrics' track must not carry lyrics again.
        if let Some(embedded) = value.get("lyrics") {
            assert!(embedded["track"].get("lyrics").is_none());
        }
    }
}
