//! Pyong entity: a user's reaction/share, optionally with a note.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::error::MaterializeError;
use crate::materialize::{Subject, SubjectKind};
use crate::model::User;
use crate::payload::{datetime_field, one_of, require_id, resolve_text, str_field};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pyong {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::serialize::opt_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    #[serde(rename = "pyongableType", skip_serializing_if = "Option::is_none")]
    pub subject_kind: Option<SubjectKind>,
    #[serde(rename = "pyongable", skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub id: u64,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Pyong {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let subject_kind =
            str_field(payload, "pyongable_type").and_then(|tag| SubjectKind::from_tag(&tag));
        let subject = match subject_kind {
            Some(kind) => Subject::materialize(kind, payload.get("pyongable"), ctx)?,
            None => None,
        };

        Ok(Self {
            text: resolve_text(payload.get("note")),
            created_at: datetime_field(payload, "created_at"),
            user: one_of(payload, "user", |v| User::from_payload(v, ctx))?.map(Box::new),
            subject_kind,
            subject,
            id: require_id(payload, "/pyongs/", "Pyong")?,
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
            "id": 60,
            "note": {"plain": "this one"},
            "created_at": 1_400_000_000,
            "pyongable_type": "song",
            "pyongable": {"id": 100, "api_path": "/songs/100"},
            "user": {"id": 5, "name": "fan"},
        });
        let pyong = Pyong::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(pyong.text.as_deref(), Some("this one"));
        assert_eq!(pyong.subject_kind, Some(SubjectKind::Track));
        assert!(matches!(pyong.subject, Some(Subject::Track(_))));
    }
}
