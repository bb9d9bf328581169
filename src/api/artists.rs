//! Artist endpoints.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::materialize::{EntityKind, OneOrMany, materialize};
use crate::model::{Album, Artist, Sort, TextFormat, Track};

impl Genius {
    /// Look up an artist by id, optionally pulling albums and tracks in
    /// concurrently; they are attached after the base entity is built.
    pub async fn artist(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
        include_albums: bool,
        include_tracks: bool,
        album_sort: Option<Sort>,
        track_sort: Option<Sort>,
    ) -> Result<Option<Artist>> {
        let (artist, albums, tracks) = tokio::join!(
            self.fetch_artist(id, text_format),
            async {
                if include_albums {
                    self.artist_albums(id, None, None, album_sort).await
                } else {
                    Ok(None)
                }
            },
            async {
                if include_tracks {
                    self.artist_tracks(id, None, None, track_sort).await
                } else {
                    Ok(None)
                }
            },
        );

        let mut artist = artist?;
        let albums = albums?;
        let tracks = tracks?;

        if let Some(artist) = artist.as_mut() {
            if let Some(albums) = albums {
                artist.albums = Some(albums.into_vec());
            }
            if let Some(tracks) = tracks {
                artist.tracks = Some(tracks.into_vec());
            }
        }

        Ok(artist)
    }

    /// Albums credited to an artist.
    pub async fn artist_albums(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Album>>> {
        let params = listing_params(per_page, page, sort);
        let Some(payload) = self
            .get_json(&format!("artists/{id}/albums"), &params)
            .await?
        else {
            return Ok(None);
        };
        let Some(albums) = payload.get("albums") else {
            return Ok(None);
        };

        Ok(materialize(albums, EntityKind::Album, &self.context())?.into_typed())
    }

    /// Tracks credited to an artist.
    pub async fn artist_tracks(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
        let params = listing_params(per_page, page, sort);
        let Some(payload) = self
            .get_json(&format!("artists/{id}/songs"), &params)
            .await?
        else {
            return Ok(None);
        };
        let Some(songs) = payload.get("songs") else {
            return Ok(None);
        };

        Ok(materialize(songs, EntityKind::Track, &self.context())?.into_typed())
    }

    async fn fetch_artist(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
    ) -> Result<Option<Artist>> {
        let mut params = Vec::new();
        if let Some(text_format) = text_format {
            params.push(("text_format", text_format.as_str().to_string()));
        }

        let Some(payload) = self.get_json(&format!("artists/{id}"), &params).await? else {
            return Ok(None);
        };
        let artist = payload.get("artist").unwrap_or(&Value::Null);

        Ok(materialize(artist, EntityKind::Artist, &self.context())?.into_single())
    }
}

fn listing_params(
    per_page: Option<u32>,
    page: Option<u32>,
    sort: Option<Sort>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(per_page) = per_page {
        params.push(("per_page", per_page.to_string()));
    }
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    if let Some(sort) = sort {
        params.push(("sort", sort.as_str().to_string()));
    }
    params
}

impl Artist {
    /// Refetch this artist through the client that produced it.
    pub async fn refetch(
        &self,
        text_format: Option<TextFormat>,
        include_albums: bool,
        include_tracks: bool,
    ) -> Result<Option<Artist>> {
        self.ctx
            .upgrade()?
            .artist(self.id, text_format, include_albums, include_tracks, None, None)
            .await
    }

    /// Fetch albums credited to this artist.
    pub async fn fetch_albums(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Album>>> {
        self.ctx
            .upgrade()?
            .artist_albums(self.id, per_page, page, sort)
            .await
    }

    /// Fetch tracks credited to this artist.
    pub async fn fetch_tracks(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
        self.ctx
            .upgrade()?
            .artist_tracks(self.id, per_page, page, sort)
            .await
    }
}
