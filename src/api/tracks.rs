//! Track endpoints: lookup, lyrics, annotations.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::lyrics::{ExtractOptions, ExtractedLyrics, extract};
use crate::materialize::{EntityKind, OneOrMany, materialize};
use crate::model::{Annotation, Lyrics, TextFormat, Track};

impl Genius {
    /// Look up a track by id. With `include_lyrics`, the lyric page is
    /// fetched concurrently and merged in after the track is built.
    pub async fn track(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
        include_lyrics: bool,
    ) -> Result<Option<Track>> {
        if !include_lyrics {
            return self.fetch_track(id, text_format).await;
        }

        let (track, extracted) = tokio::join!(
            self.fetch_track(id, text_format),
            self.fetch_extracted_lyrics_by_id(id, ExtractOptions::default()),
        );
        let mut track = track?;
        let extracted = extracted?;

        if let (Some(track), Some(extracted)) = (track.as_mut(), extracted) {
            track.attach_extracted(extracted);
        }

        Ok(track)
    }

    /// Lyrics for a track id, without a track back-reference.
    pub async fn lyrics(&self, track_id: u64, options: ExtractOptions) -> Result<Option<Lyrics>> {
        let extracted = self
            .fetch_extracted_lyrics_by_id(track_id, options)
            .await?;
        Ok(extracted.map(|extracted| Lyrics::from_extracted(extracted, None, &self.context())))
    }

    /// Lyrics for an already-materialized track; the result carries the
    /// track as its back-reference.
    pub async fn lyrics_for(&self, track: &Track, options: ExtractOptions) -> Result<Option<Lyrics>> {
        let url = match &track.url {
            Some(url) => format!("{url}?bagon=1"),
            None => format!("{}songs/{}", self.inner.web_base, track.id),
        };

        let Some(page) = self.fetch_lyrics_page(&url).await? else {
            return Ok(None);
        };

        Ok(extract(&page, options)
            .map(|extracted| Lyrics::from_extracted(extracted, Some(track.clone()), &self.context())))
    }

    /// Annotations attached to a track.
    pub async fn track_annotations(
        &self,
        track_id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Annotation>>> {
        let mut params = vec![("song_id", track_id.to_string())];
        if let Some(per_page) = per_page {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }
        if let Some(text_format) = text_format {
            params.push(("text_format", text_format.as_str().to_string()));
        }

        let Some(payload) = self.get_json("referents", &params).await? else {
            return Ok(None);
        };
        let Some(referents) = payload.get("referents") else {
            return Ok(None);
        };

        Ok(materialize(referents, EntityKind::Annotation, &self.context())?.into_typed())
    }

    async fn fetch_track(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
    ) -> Result<Option<Track>> {
        let mut params = Vec::new();
        if let Some(text_format) = text_format {
            params.push(("text_format", text_format.as_str().to_string()));
        }

        let Some(payload) = self.get_json(&format!("songs/{id}"), &params).await? else {
            return Ok(None);
        };
        let song = payload.get("song").unwrap_or(&Value::Null);

        Ok(materialize(song, EntityKind::Track, &self.context())?.into_single())
    }

    async fn fetch_extracted_lyrics_by_id(
        &self,
        id: u64,
        options: ExtractOptions,
    ) -> Result<Option<ExtractedLyrics>> {
        let url = format!("{}songs/{}", self.inner.web_base, id);
        let Some(page) = self.fetch_lyrics_page(&url).await? else {
            return Ok(None);
        };
        Ok(extract(&page, options))
    }
}

impl Track {
    /// Refetch this track through the client that produced it.
    pub async fn refetch(
        &self,
        text_format: Option<TextFormat>,
        include_lyrics: bool,
    ) -> Result<Option<Track>> {
        self.ctx
            .upgrade()?
            .track(self.id, text_format, include_lyrics)
            .await
    }

    /// Fetch this track's lyrics; the result carries a copy of the track
    /// as its back-reference.
    pub async fn fetch_lyrics(&self, options: ExtractOptions) -> Result<Option<Lyrics>> {
        self.ctx.upgrade()?.lyrics_for(self, options).await
    }

    /// Fetch annotations attached to this track.
    pub async fn fetch_annotations(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Annotation>>> {
        self.ctx
            .upgrade()?
            .track_annotations(self.id, per_page, page, text_format)
            .await
    }
}
