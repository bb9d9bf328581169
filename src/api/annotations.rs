//! Annotation endpoints.

use serde_json::Value;

use crate::api::Genius;
use crate::error::Result;
use crate::materialize::{EntityKind, materialize};
use crate::model::{Annotation, TextFormat};

impl Genius {
    /// Look up a single annotation by id.
    pub async fn annotation(
        &self,
        id: u64,
        text_format: Option<TextFormat>,
    ) -> Result<Option<Annotation>> {
        let mut params = Vec::new();
        if let Some(text_format) = text_format {
            params.push(("text_format", text_format.as_str().to_string()));
        }

        let Some(payload) = self
            .get_json(&format!("annotations/{id}"), &params)
            .await?
        else {
            return Ok(None);
        };
        let annotation = payload.get("annotation").unwrap_or(&Value::Null);

        Ok(materialize(annotation, EntityKind::Annotation, &self.context())?.into_single())
    }
}

impl Annotation {
    /// Refetch this annotation through the client that produced it.
    pub async fn refetch(&self, text_format: Option<TextFormat>) -> Result<Option<Annotation>> {
        self.ctx.upgrade()?.annotation(self.id, text_format).await
    }
}
