//! Genre tags attached to tracks.

use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::error::MaterializeError;
use crate::payload::{bool_field, require_id, str_field};
use crate::text::clean_title;

const TAGS_URL_PREFIX: &str = "https://genius.com/tags/";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl Genre {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let url = str_field(payload, "url");
        let domain = url
            .as_deref()
            .map(|url| url.replace(TAGS_URL_PREFIX, ""))
            .filter(|domain| !domain.is_empty());

        Ok(Self {
            title: clean_title(str_field(payload, "name").as_deref()),
            primary: bool_field(payload, "primary"),
            id: require_id(payload, "/tags/", "Genre")?,
            domain,
            url,
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
            "id": 9,
            "name": "Rap",
            "primary": true,
            "url": "https://genius.com/tags/rap",
        });
        let genre = Genre::from_payload(&payload, &Context::detached()).unwrap();
        assert_eq!(genre.title.as_deref(), Some("Rap"));
        assert_eq!(genre.domain.as_deref(), Some("rap"));
        assert_eq!(genre.primary, Some(true));
        assert_eq!(genre.id, 9);
    }

    #[test]
    fn test_missing_id_fails() {
        let payload = json!({"name": "Rap"});
        assert!(Genre::from_payload(&payload, &Context::detached()).is_err());
    }
}
