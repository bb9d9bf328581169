//! Question entity.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::error::MaterializeError;
use crate::materialize::{Subject, SubjectKind};
use crate::model::{Answer, Stats, User};
use crate::payload::{
    bool_field, collapse_stats, datetime_field, i64_field, one_of, raw_field, require_id,
    str_field, u64_field,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question bodies are plain strings, unlike every other contribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_order: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_question: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,
    #[serde(rename = "questionableType", skip_serializing_if = "Option::is_none")]
    pub subject_kind: Option<SubjectKind>,
    #[serde(rename = "questionable", skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Box<Answer>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Question {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let subject_kind =
            str_field(payload, "questionable_type").and_then(|tag| SubjectKind::from_tag(&tag));
        let subject = match subject_kind {
            Some(kind) => Subject::materialize(kind, payload.get("questionable"), ctx)?,
            None => None,
        };

        Ok(Self {
            text: str_field(payload, "body"),
            created_at: datetime_field(payload, "created_at"),
            state: str_field(payload, "state"),
            pin_order: u64_field(payload, "pin_order"),
            has_voters: bool_field(payload, "has_voters"),
            default_key: str_field(payload, "default_key"),
            default_question: raw_field(payload, "default_question"),
            author: one_of(payload, "author", |v| User::from_payload(v, ctx))?.map(Box::new),
            subject_kind,
            subject,
            answer: one_of(payload, "answer", |v| Answer::from_payload(v, ctx))?.map(Box::new),
            stats: collapse_stats(Stats {
                votes: i64_field(payload, "votes_total"),
                contributors: u64_field(payload, "contributors_count"),
                ..Stats::default()
            }),
            id: require_id(payload, "/questions/", "Question")?,
            url: str_field(payload, "url"),
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload() {
        let payload = json!({
            "id": 80,
            "body": "What is this song about?",
            "state": "answered",
            "questionable_type": "song",
            "questionable": {"id": 100, "api_path": "/songs/100"},
            "answer": {"id": 81, "body": {"plain": "Fame."}},
            "votes_total": 2,
            "contributors_count": 3,
        });
        let question = Question::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(question.text.as_deref(), Some("What is this song about?"));
        assert_eq!(question.subject_kind, Some(SubjectKind::Track));
        assert_eq!(question.answer.as_ref().unwrap().text.as_deref(), Some("Fame."));
        let stats = question.stats.as_ref().unwrap();
        assert_eq!(stats.votes, Some(2));
        assert_eq!(stats.contributors, Some(3));
    }
}
