//! User endpoints: profile and contribution listings.
//!
//! Contribution listings share one wire shape: a `contribution_groups`
//! list whose entries carry a discriminator tag and a one-element
//! `contributions` list. Groups with an unknown tag or an empty list are
//! skipped, never an error.

use serde_json::Value;
use tracing::debug;

use crate::api::{Context, Genius};
use crate::error::Result;
use crate::materialize::{Entity, EntityKind, Materialized, OneOrMany, materialize};
use crate::model::{Annotation, Comment, Pyong, Sort, TextFormat, Track, User};
use crate::payload::is_absent;

impl Genius {
    /// Look up a user by id.
    pub async fn user(&self, id: u64) -> Result<Option<User>> {
        let Some(payload) = self.get_json(&format!("users/{id}"), &[]).await? else {
            return Ok(None);
        };
        let user = payload.get("user").unwrap_or(&Value::Null);

        Ok(materialize(user, EntityKind::User, &self.context())?.into_single())
    }

    /// All of a user's contributions, mixed kinds, in activity order.
    pub async fn user_activities(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Entity>>> {
        let params = contribution_params(per_page, page, sort, text_format);
        let Some(payload) = self
            .get_json(&format!("users/{id}/contributions"), &params)
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |group| {
            group
                .get("contribution_type")
                .and_then(Value::as_str)
                .map(EntityKind::from_contribution_tag)
                .unwrap_or(EntityKind::Unresolved)
        })?;

        Ok(Materialized::from_entities(entities).into_typed())
    }

    /// A user's annotations.
    pub async fn user_annotations(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Annotation>>> {
        let params = contribution_params(per_page, page, sort, text_format);
        let Some(payload) = self
            .get_json(&format!("users/{id}/contributions/annotations"), &params)
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |_| EntityKind::Annotation)?;
        Ok(Materialized::from_entities(entities).into_typed())
    }

    /// Tracks a user transcribed.
    pub async fn user_transcriptions(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
        let params = contribution_params(per_page, page, sort, None);
        let Some(payload) = self
            .get_json(&format!("users/{id}/contributions/transcriptions"), &params)
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |_| EntityKind::Track)?;
        Ok(Materialized::from_entities(entities).into_typed())
    }

    /// A user's questions and answers, mixed.
    pub async fn user_questions_and_answers(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Entity>>> {
        let params = contribution_params(per_page, page, None, text_format);
        let Some(payload) = self
            .get_json(
                &format!("users/{id}/contributions/questions_and_answers"),
                &params,
            )
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |group| {
            if group.get("contribution_type").and_then(Value::as_str) == Some("question") {
                EntityKind::Question
            } else {
                EntityKind::Answer
            }
        })?;

        Ok(Materialized::from_entities(entities).into_typed())
    }

    /// A user's comments.
    pub async fn user_comments(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Comment>>> {
        let params = contribution_params(per_page, page, None, text_format);
        let Some(payload) = self
            .get_json(&format!("users/{id}/contributions/comments"), &params)
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |_| EntityKind::Comment)?;
        Ok(Materialized::from_entities(entities).into_typed())
    }

    /// A user's pyongs.
    pub async fn user_pyongs(
        &self,
        id: u64,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Pyong>>> {
        let params = contribution_params(per_page, page, None, text_format);
        let Some(payload) = self
            .get_json(&format!("users/{id}/contributions/pyongs"), &params)
            .await?
        else {
            return Ok(None);
        };

        let entities = contribution_entities(&payload, &self.context(), |_| EntityKind::Pyong)?;
        Ok(Materialized::from_entities(entities).into_typed())
    }
}

fn contribution_params(
    per_page: Option<u32>,
    page: Option<u32>,
    sort: Option<Sort>,
    text_format: Option<TextFormat>,
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
    if let Some(text_format) = text_format {
        params.push(("text_format", text_format.as_str().to_string()));
    }
    params
}

/// Materialize the first contribution of each group, resolving the kind per
/// group. Transcribed tracks get the group's activity date folded in.
fn contribution_entities(
    payload: &Value,
    ctx: &Context,
    kind_for: impl Fn(&Value) -> EntityKind,
) -> Result<Vec<Entity>> {
    let Some(groups) = payload.get("contribution_groups").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut entities = Vec::new();
    for group in groups {
        let Some(contribution) = group
            .get("contributions")
            .and_then(Value::as_array)
            .and_then(|contributions| contributions.first())
            .filter(|contribution| !is_absent(contribution))
        else {
            continue;
        };

        let kind = kind_for(group);
        if kind == EntityKind::Unresolved {
            debug!("skipping contribution group with unknown type");
            continue;
        }

        let contribution = if kind == EntityKind::Track {
            let mut contribution = contribution.clone();
            if let Some(date) = group.get("date").filter(|date| date.is_number()) {
                contribution["transcribedAt"] = date.clone();
            }
            contribution
        } else {
            contribution.clone()
        };

        if let Materialized::One(entity) = materialize(&contribution, kind, ctx)? {
            entities.push(entity);
        }
    }

    Ok(entities)
}

impl User {
    /// Refetch this user through the client that produced it.
    pub async fn refetch(&self) -> Result<Option<User>> {
        self.ctx.upgrade()?.user(self.id).await
    }

    /// Fetch this user's mixed contribution feed.
    pub async fn fetch_activities(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Entity>>> {
        self.ctx
            .upgrade()?
            .user_activities(self.id, per_page, page, sort, text_format)
            .await
    }

    /// Fetch this user's annotations.
    pub async fn fetch_annotations(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Annotation>>> {
        self.ctx
            .upgrade()?
            .user_annotations(self.id, per_page, page, sort, text_format)
            .await
    }

    /// Fetch tracks this user transcribed.
    pub async fn fetch_transcriptions(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        sort: Option<Sort>,
    ) -> Result<Option<OneOrMany<Track>>> {
        self.ctx
            .upgrade()?
            .user_transcriptions(self.id, per_page, page, sort)
            .await
    }

    /// Fetch this user's questions and answers, mixed.
    pub async fn fetch_questions_and_answers(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Entity>>> {
        self.ctx
            .upgrade()?
            .user_questions_and_answers(self.id, per_page, page, text_format)
            .await
    }

    /// Fetch this user's comments.
    pub async fn fetch_comments(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Comment>>> {
        self.ctx
            .upgrade()?
            .user_comments(self.id, per_page, page, text_format)
            .await
    }

    /// Fetch this user's pyongs.
    pub async fn fetch_pyongs(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
        text_format: Option<TextFormat>,
    ) -> Result<Option<OneOrMany<Pyong>>> {
        self.ctx
            .upgrade()?
            .user_pyongs(self.id, per_page, page, text_format)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contribution_entities_dispatch_and_skip() {
        let payload = json!({
            "contribution_groups": [
                {
                    "contribution_type": "pyong",
                    "contributions": [{"id": 1}],
                },
                {
                    "contribution_type": "poll",
                    "contributions": [{"id": 2}],
                },
                {
                    "contribution_type": "song",
                    "date": 86_400,
                    "contributions": [{"id": 3, "title": "T"}],
                },
                {
                    "contribution_type": "comment",
                    "contributions": [],
                },
            ],
        });

        let entities = contribution_entities(&payload, &Context::detached(), |group| {
            group
                .get("contribution_type")
                .and_then(Value::as_str)
                .map(EntityKind::from_contribution_tag)
                .unwrap_or(EntityKind::Unresolved)
        })
        .unwrap();

        assert_eq!(entities.len(), 2);
        assert!(matches!(entities[0], Entity::Pyong(_)));
        match &entities[1] {
            Entity::Track(track) => {
                assert!(track.transcribed_at.is_some());
            }
            other => panic!("expected a track, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_groups_yield_nothing() {
        let payload = json!({"contribution_groups": []});
        let entities =
            contribution_entities(&payload, &Context::detached(), |_| EntityKind::Comment).unwrap();
        assert!(entities.is_empty());
    }
}
