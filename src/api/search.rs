//! Search endpoints.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::materialize::{Entity, EntityKind, Materialized, OneOrMany, materialize};
use crate::model::{Sort, Track};
use crate::payload::is_absent;

impl Genius {
    /// Search tracks by free-text query.
    pub async fn search(
        &self,
        query: &str,
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

        let path = format!("search?q={}", urlencoding::encode(query));
        let Some(payload) = self.get_json(&path, &params).await? else {
            return Ok(None);
        };

        // Multi-section responses put hits under the first section.
        let section = payload
            .get("sections")
            .and_then(Value::as_array)
            .and_then(|sections| sections.first())
            .unwrap_or(&payload);
        let Some(hits) = section.get("hits").and_then(Value::as_array) else {
            return Ok(None);
        };

        let ctx = self.context();
        let mut entities: Vec<Entity> = Vec::new();
        for hit in hits {
            let Some(result) = hit.get("result").filter(|result| !is_absent(result)) else {
                continue;
            };
            if let Materialized::One(entity) = materialize(result, EntityKind::Track, &ctx)? {
                entities.push(entity);
            }
        }

        Ok(Materialized::from_entities(entities).into_typed())
    }
}
