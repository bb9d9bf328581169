//! Album endpoints.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::materialize::{Entity, EntityKind, Materialized, OneOrMany, materialize};
use crate::model::{Album, Sort, TextFormat, Track};
use crate::payload::is_absent;

impl Genius {
    /// Look up an album by id. With `include_tracks`, the track listing is
    /// fetched concurrently and attached after the album is built.
    pub async fn album(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
        include_tracks: bool,
    ) -> Result<Option<Album>> {
        if !include_tracks {
            return self.fetch_album(id, text_format).await;
        }

        let (album, tracks) = tokio::join!(
            self.fetch_album(id, text_format),
            self.album_tracks(id, None, None, None),
        );
        let mut album = album?;
        let tracks = tracks?;

        if let (Some(album), Some(tracks)) = (album.as_mut(), tracks) {
            album.tracks = Some(tracks.into_vec());
        }

        Ok(album)
    }

    /// Track listing of an album, in listing order.
    pub async fn album_tracks(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
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

        let Some(payload) = self
            .get_json(&format!("albums/{id}/tracks"), &params)
            .await?
        else {
            return Ok(None);
        };
        let Some(items) = payload.get("tracks").and_then(Value::as_array) else {
            return Ok(None);
        };

        // Listing entries wrap the song and carry its position separately;
        // fold the position in before materializing.
        let ctx = self.context();
        let mut entities: Vec<Entity> = Vec::new();
        for item in items {
            let song = match item.get("song").filter(|song| !is_absent(song)) {
                Some(song) => {
                    let mut song = song.clone();
                    if let Some(number) = item.get("number").filter(|n| n.is_number()) {
                        song["number"] = number.clone();
                    }
                    song
                }
                None => item.clone(),
            };

            if let Materialized::One(entity) = materialize(&song, EntityKind::Track, &ctx)? {
                entities.push(entity);
            }
        }

        Ok(Materialized::from_entities(entities).into_typed())
    }

    async fn fetch_album(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
    ) -> Result<Option<Album>> {
        let mut params = Vec::new();
        if let Some(text_format) = text_format {
            params.push(("text_format", text_format.as_str().to_string()));
        }

        let Some(payload) = self.get_json(&format!("albums/{id}"), &params).await? else {
            return Ok(None);
        };
        let album = payload.get("album").unwrap_or(&Value::Null);

        Ok(materialize(album, EntityKind::Album, &self.context())?.into_single())
    }
}

impl Album {
    /// Refetch this album through the client that produced it.
    pub async fn refetch(
        &self,
        text_format: Option<TextFormat>,
        include_tracks: bool,
    ) -> Result<Option<Album>> {
        self.ctx
            .upgrade()?
            .album(self.id, text_format, include_tracks)
            .await
    }

    /// Fetch this album's track listing.
    pub async fn fetch_tracks(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
        self.ctx
            .upgrade()?
            .album_tracks(self.id, per_page, page, sort)
            .await
    }
}
