//! Annotation entity.
//!
//! Annotation payloads arrive in referent form: referent-level fields
//! (fragment, classification, id) sit on the outer object while the body
//! and community fields live in the first element of a nested
//! `annotations` list. Both shapes are accepted; a payload without the
//! nested list is its own body container.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Value, json};

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::{Comment, Stats, Track, User};
use crate::payload::{
    arr_field, bool_field, collapse_stats, datetime_field, i64_field, obj_field, one_of,
    raw_field, require_id, resolve_text, str_field, u64_field,
};
use crate::text::clean;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// The lyric fragment this annotation is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub being_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_preview: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<Box<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_comment: Option<Box<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_comment: Option<Box<Comment>>,
    /// Authors with their attribution share folded in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<Vec<User>>,
    /// The annotated track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Box<Track>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    pub url: String,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Annotation {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let nested = arr_field(payload, "annotations")
            .and_then(|list| list.first())
            .unwrap_or(payload);
        let referent = obj_field(payload, "referent");

        let fragment = str_field(payload, "fragment")
            .or_else(|| referent.and_then(|r| str_field(r, "fragment")));

        let authors = authors_with_impact(nested, payload, ctx)?;

        let verified_by = match arr_field(nested, "verified_annotator_ids") {
            Some(ids) => {
                let users = ids
                    .iter()
                    .filter_map(Value::as_u64)
                    .map(|id| User::from_payload(&json!({ "id": id }), ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                (!users.is_empty()).then_some(users)
            }
            None => None,
        };

        let stats = collapse_stats(Stats {
            votes: i64_field(nested, "votes_total"),
            pending_edits: u64_field(nested, "proposed_edit_count"),
            comments: u64_field(nested, "comment_count"),
            pyongs: u64_field(nested, "pyongs_count"),
            verified_by: verified_by.as_ref().map(|users| users.len() as u64),
            ..Stats::default()
        });

        let id = require_id(payload, "/referents/", "Annotation")?;

        Ok(Self {
            lyrics: clean(fragment.as_deref()),
            text: resolve_text(obj_field(nested, "body")),
            state: str_field(payload, "classification"),
            created_at: datetime_field(payload, "create"),
            description: bool_field(payload, "is_description"),
            image: bool_field(payload, "is_image"),
            being_created: bool_field(payload, "being_created"),
            community: bool_field(nested, "community"),
            deleted: bool_field(nested, "deleted"),
            verified: bool_field(nested, "verified"),
            has_voters: bool_field(nested, "has_voters"),
            source: raw_field(nested, "source"),
            custom_preview: raw_field(nested, "custom_preview"),
            accepted_by: one_of(nested, "accepted_by", |v| User::from_payload(v, ctx))?
                .map(Box::new),
            rejection_comment: one_of(nested, "rejection_comment", |v| {
                Comment::from_payload(v, ctx)
            })?
            .map(Box::new),
            top_comment: one_of(nested, "top_comment", |v| Comment::from_payload(v, ctx))?
                .map(Box::new),
            authors,
            verified_by,
            track: one_of(payload, "annotatable", |v| Track::from_payload(v, ctx))?.map(Box::new),
            stats,
            id,
            url: format!("{WEB_BASE}{id}"),
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}

/// Authors arrive as `{"user": ..., "attribution": share}` wrappers; the
/// share is folded into the materialized user. A payload without the list
/// may still carry a single `author`.
fn authors_with_impact(
    nested: &Value,
    payload: &Value,
    ctx: &Context,
) -> Result<Option<Vec<User>>, MaterializeError> {
    if let Some(wrappers) = arr_field(nested, "authors") {
        let mut authors = Vec::new();
        for wrapper in wrappers {
            let Some(user_payload) = obj_field(wrapper, "user") else {
                continue;
            };
            let mut user = User::from_payload(user_payload, ctx)?;
            user.annotation_impact = crate::payload::f64_field(wrapper, "attribution");
            authors.push(user);
        }
        return Ok((!authors.is_empty()).then_some(authors));
    }

    Ok(one_of(payload, "author", |v| User::from_payload(v, ctx))?.map(|author| vec![author]))
}
