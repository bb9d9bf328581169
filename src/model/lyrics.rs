//! Lyrics entity: text representations plus verification/ownership metadata.
//!
//! A lyrics value comes from two places that get merged: metadata embedded
//! in a track payload (`lyrics_*` keys) and text extracted from the lyric
//! page HTML. Either side may be missing. An instrumental track carries
//! only the `instrumental` flag, no text.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Value, json};

use crate::api::Context;
use crate::error::MaterializeError;
use crate::lyrics::ExtractedLyrics;
use crate::model::{Stats, Track, User};
use crate::payload::{
    bool_field, collapse_stats, datetime_field, obj_field, one_of, raw_field, str_field,
    u64_field, vec_of,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lyrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_v2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumental: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics_placeholder_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_instagram_reel_annotations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_complete_by: Option<Box<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_approved_by: Option<Box<User>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Box<User>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    /// Owning track; its own `lyrics` field is always cleared so the pair
    /// keeps a single direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Box<Track>>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Lyrics {
    /// Materialize a standalone lyrics payload.
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let verified_by = vec_of(payload, "verifiedBy", |v| User::from_payload(v, ctx))?;
        let pending_edits = u64_field(payload, "pendingEdits");

        let stats = collapse_stats(Stats {
            pending_edits,
            verified_by: verified_by.as_ref().map(|users| users.len() as u64),
            ..Stats::default()
        });

        let owner = match u64_field(payload, "ownerId") {
            Some(id) => Some(Box::new(User::from_payload(&json!({ "id": id }), ctx)?)),
            None => None,
        };

        Ok(Self {
            plain: str_field(payload, "plain"),
            html: str_field(payload, "html"),
            markdown: str_field(payload, "markdown"),
            markdown_v2: str_field(payload, "markdownV2"),
            instrumental: bool_field(payload, "instrumental"),
            state: str_field(payload, "state"),
            verified: bool_field(payload, "verified"),
            explicit: bool_field(payload, "explicit"),
            music: raw_field(payload, "music"),
            language: str_field(payload, "language"),
            lyrics_placeholder_reason: str_field(payload, "lyricsPlaceholderReason"),
            has_instagram_reel_annotations: bool_field(payload, "hasInstagramReelAnnotations"),
            verified_by,
            marked_complete_by: one_of(payload, "markedCompleteBy", |v| {
                User::from_payload(v, ctx)
            })?
            .map(Box::new),
            staff_approved_by: one_of(payload, "staffApprovedBy", |v| User::from_payload(v, ctx))?
                .map(Box::new),
            updated_at: datetime_field(payload, "updatedAt"),
            owner,
            stats,
            track: None,
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }

    /// Materialize the lyrics metadata embedded in a track payload.
    ///
    /// `track` is the track under construction, already complete except for
    /// its `lyrics` field; it is cloned into the back-reference here, so the
    /// clone can never loop back into another lyrics value.
    pub(crate) fn embedded_in_track(
        payload: &Value,
        track: &Track,
        ctx: &Context,
    ) -> Result<Self, MaterializeError> {
        let timestamps = obj_field(payload, "client_timestamps");

        let verified_by = vec_of(payload, "verified_lyrics_by", |v| User::from_payload(v, ctx))?;
        let pending_edits = u64_field(payload, "pending_lyrics_edits_count");

        let stats = collapse_stats(Stats {
            pending_edits,
            verified_by: verified_by.as_ref().map(|users| users.len() as u64),
            ..Stats::default()
        });

        let owner = match u64_field(payload, "lyrics_owner_id") {
            Some(id) => Some(Box::new(User::from_payload(&json!({ "id": id }), ctx)?)),
            None => None,
        };

        Ok(Self {
            plain: None,
            html: None,
            markdown: None,
            markdown_v2: None,
            instrumental: bool_field(payload, "instrumental"),
            state: str_field(payload, "lyrics_state"),
            verified: bool_field(payload, "lyrics_verified"),
            explicit: bool_field(payload, "explicit"),
            music: raw_field(payload, "music"),
            language: str_field(payload, "language"),
            lyrics_placeholder_reason: str_field(payload, "lyrics_placeholder_reason"),
            has_instagram_reel_annotations: bool_field(payload, "has_instagram_reel_annotations"),
            verified_by,
            marked_complete_by: one_of(payload, "lyrics_marked_complete_by", |v| {
                User::from_payload(v, ctx)
            })?
            .map(Box::new),
            staff_approved_by: one_of(payload, "lyrics_marked_staff_approved_by", |v| {
                User::from_payload(v, ctx)
            })?
            .map(Box::new),
            updated_at: datetime_field(payload, "lyrics_updated_at")
                .or_else(|| timestamps.and_then(|t| datetime_field(t, "lyrics_updated_at"))),
            owner,
            stats,
            track: Some(Box::new(track.clone())),
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }

    /// Build lyrics from page-extracted text, inheriting metadata from the
    /// given track's embedded lyrics. The track's own `lyrics` field is
    /// taken out before it becomes the back-reference.
    pub(crate) fn from_extracted(
        extracted: ExtractedLyrics,
        track: Option<Track>,
        ctx: &Context,
    ) -> Self {
        let mut track = track;
        let meta = track
            .as_mut()
            .and_then(|track| track.lyrics.take())
            .map(|boxed| *boxed);

        let verified_by = meta.as_ref().and_then(|m| m.verified_by.clone());
        let stats = collapse_stats(Stats {
            pending_edits: meta
                .as_ref()
                .and_then(|m| m.stats.as_ref())
                .and_then(|s| s.pending_edits),
            verified_by: verified_by.as_ref().map(|users| users.len() as u64),
            ..Stats::default()
        });

        Self {
            plain: extracted.plain,
            html: extracted.html,
            markdown: extracted.markdown,
            markdown_v2: extracted.markdown_v2,
            instrumental: Some(extracted.instrumental),
            state: meta.as_ref().and_then(|m| m.state.clone()),
            verified: meta.as_ref().and_then(|m| m.verified),
            explicit: meta.as_ref().and_then(|m| m.explicit),
            music: meta.as_ref().and_then(|m| m.music.clone()),
            language: meta.as_ref().and_then(|m| m.language.clone()),
            lyrics_placeholder_reason: meta
                .as_ref()
                .and_then(|m| m.lyrics_placeholder_reason.clone()),
            has_instagram_reel_annotations: meta
                .as_ref()
                .and_then(|m| m.has_instagram_reel_annotations),
            verified_by,
            marked_complete_by: meta.as_ref().and_then(|m| m.marked_complete_by.clone()),
            staff_approved_by: meta.as_ref().and_then(|m| m.staff_approved_by.clone()),
            updated_at: meta.as_ref().and_then(|m| m.updated_at),
            owner: meta.as_ref().and_then(|m| m.owner.clone()),
            stats,
            track: track.map(Box::new),
            raw: Value::Null,
            ctx: ctx.clone(),
        }
    }

    /// Overlay page-extracted text onto embedded metadata.
    pub(crate) fn merge_extracted(&mut self, extracted: ExtractedLyrics) {
        self.plain = extracted.plain;
        self.html = extracted.html;
        self.markdown = extracted.markdown;
        self.markdown_v2 = extracted.markdown_v2;
        self.instrumental = Some(extracted.instrumental);
    }

    /// Number of populated fields, used by the sparse-embed serialization
    /// rule.
    pub fn populated(&self) -> usize {
        [
            self.plain.is_some(),
            self.html.is_some(),
            self.markdown.is_some(),
            self.markdown_v2.is_some(),
            self.instrumental.is_some(),
            self.state.is_some(),
            self.verified.is_some(),
            self.explicit.is_some(),
            self.music.is_some(),
            self.language.is_some(),
            self.lyrics_placeholder_reason.is_some(),
            self.has_instagram_reel_annotations.is_some(),
            self.verified_by.is_some(),
            self.marked_complete_by.is_some(),
            self.staff_approved_by.is_some(),
            self.updated_at.is_some(),
            self.owner.is_some(),
            self.stats.is_some(),
            self.track.is_some(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_texts() {
        let payload = json!({
            "plain": "line one",
            "html": "line one",
            "instrumental": false,
            "state": "complete",
        });
        let lyrics = Lyrics::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("line one"));
        assert_eq!(lyrics.instrumental, Some(false));
        assert_eq!(lyrics.state.as_deref(), Some("complete"));
        assert!(lyrics.track.is_none());
    }

    #[test]
    fn test_owner_built_from_id() {
        let payload = json!({"ownerId": 12});
        let lyrics = Lyrics::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(lyrics.owner.unwrap().id, 12);
    }

    #[test]
    fn test_from_extracted_instrumental() {
        let extracted = ExtractedLyrics::instrumental();
        let lyrics = Lyrics::from_extracted(extracted, None, &Context::detached());
        assert_eq!(lyrics.instrumental, Some(true));
        assert!(lyrics.plain.is_none());
        assert!(lyrics.html.is_none());
    }

    #[test]
    fn test_populated_counts_track_backref() {
        let payload = json!({"plain": "a", "html": "a"});
        let lyrics = Lyrics::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(lyrics.populated(), 2);
    }
}
