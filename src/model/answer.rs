//! Answer entity.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::error::MaterializeError;
use crate::model::{Question, Stats, User};
use crate::payload::{
    arr_field, bool_field, collapse_stats, datetime_field, f64_field, i64_field, obj_field,
    one_of, require_id, resolve_text, str_field,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_for_edit: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voters: Option<bool>,
    /// Authors with their attribution share folded in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Box<Question>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Answer {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let authors = authors_with_impact(payload, ctx)?;

        Ok(Self {
            text: resolve_text(payload.get("body")),
            text_for_edit: str_field(payload, "body_for_edit"),
            created_at: datetime_field(payload, "created_at"),
            state: str_field(payload, "editorial_state"),
            source: str_field(payload, "answer_source"),
            has_voters: bool_field(payload, "has_voters"),
            authors,
            question: one_of(payload, "question", |v| Question::from_payload(v, ctx))?
                .map(Box::new),
            stats: collapse_stats(Stats {
                votes: i64_field(payload, "votes_total"),
                ..Stats::default()
            }),
            id: require_id(payload, "/answers/", "Answer")?,
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}

fn authors_with_impact(
    payload: &Value,
    ctx: &Context,
) -> Result<Option<Vec<User>>, MaterializeError> {
    if let Some(wrappers) = arr_field(payload, "authors") {
        let mut authors = Vec::new();
        for wrapper in wrappers {
            let Some(user_payload) = obj_field(wrapper, "user") else {
                continue;
            };
            let mut user = User::from_payload(user_payload, ctx)?;
            user.answer_impact = f64_field(wrapper, "attribution");
            authors.push(user);
        }
        return Ok((!authors.is_empty()).then_some(authors));
    }

    Ok(one_of(payload, "author", |v| User::from_payload(v, ctx))?.map(|author| vec![author]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload() {
        let payload = json!({
            "id": 81,
            "body": {"html": "<p>Fame.</p>"},
            "editorial_state": "approved",
            "answer_source": "community",
            "votes_total": -1,
            "authors": [
                {"user": {"id": 4, "name": "sage"}, "attribution": 1.0},
            ],
        });
        let answer = Answer::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(answer.text.as_deref(), Some("<p>Fame.</p>"));
        assert_eq!(answer.state.as_deref(), Some("approved"));
        assert_eq!(answer.stats.as_ref().unwrap().votes, Some(-1));
        assert_eq!(answer.authors.as_ref().unwrap()[0].answer_impact, Some(1.0));
    }
}
