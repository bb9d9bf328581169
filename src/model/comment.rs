//! Comment entity.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::materialize::{Subject, SubjectKind};
use crate::model::{Stats, User};
use crate::payload::{
    bool_field, collapse_stats, datetime_field, i64_field, one_of, raw_field, require_id,
    resolve_text, str_field,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub deleted_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_author: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,
    /// Which kind of entity the comment is attached to.
    #[serde(rename = "commentableType", skip_serializing_if = "Option::is_none")]
    pub subject_kind: Option<SubjectKind>,
    /// The commented entity itself.
    #[serde(rename = "commentable", skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    pub url: String,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Comment {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let subject_kind =
            str_field(payload, "commentable_type").and_then(|tag| SubjectKind::from_tag(&tag));
        let subject = match subject_kind {
            Some(kind) => Subject::materialize(kind, payload.get("commentable"), ctx)?,
            None => None,
        };

        let id = require_id(payload, "/comments/", "Comment")?;

        Ok(Self {
            text: resolve_text(payload.get("body")),
            state: str_field(payload, "state"),
            disposition: str_field(payload, "disposition"),
            created_at: datetime_field(payload, "created_at"),
            deleted_at: datetime_field(payload, "deleted_at"),
            has_voters: bool_field(payload, "has_voters"),
            anonymous_author: raw_field(payload, "anonymous_author"),
            author: one_of(payload, "author", |v| User::from_payload(v, ctx))?.map(Box::new),
            subject_kind,
            subject,
            stats: collapse_stats(Stats {
                votes: i64_field(payload, "votes_total"),
                ..Stats::default()
            }),
            id,
            url: format!("{WEB_BASE}comments/{id}"),
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}
