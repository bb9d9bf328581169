//! Chart endpoints.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::materialize::{Entity, EntityKind, Materialized, OneOrMany, materialize};
use crate::model::Track;
use crate::payload::is_absent;

impl Genius {
    /// The current song chart. Chart entries carry their own type tag;
    /// anything that is not a song is skipped.
    pub async fn chart_tracks(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
    ) -> Result<Option<OneOrMany<Track>>> {
        let mut params = Vec::new();
        if let Some(per_page) = per_page {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }

        let Some(payload) = self.get_json("songs/chart", &params).await? else {
            return Ok(None);
        };
        let Some(items) = payload.get("chart_items").and_then(Value::as_array) else {
            return Ok(None);
        };

        let ctx = self.context();
        let mut entities: Vec<Entity> = Vec::new();
        for item in items {
            let kind = item
                .get("type")
                .and_then(Value::as_str)
                .map(EntityKind::from_contribution_tag)
                .unwrap_or(EntityKind::Unresolved);
            let Some(entry) = item.get("item").filter(|entry| !is_absent(entry)) else {
                continue;
            };
            if let Materialized::One(entity) = materialize(entry, kind, &ctx)? {
                entities.push(entity);
            }
        }

        Ok(Materialized::from_entities(entities).into_typed())
    }
}
