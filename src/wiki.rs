use crate::parsing;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Editorial blurb attached to artists, albums, tracks and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wiki {
    /// Publication date as reported by the API, e.g. `"08 Jun 2023, 14:00"`.
    pub published: Option<String>,
    /// Short summary, may contain HTML markup.
    pub summary: String,
    /// Full text, may contain HTML markup.
    pub content: String,
}

impl Wiki {
    pub(crate) fn from_json(data: &Value) -> Result<Self> {
        Ok(Self {
            published: parsing::optional_str(data, "published"),
            summary: parsing::required_str(data, "summary")?,
            content: parsing::required_str(data, "content")?,
        })
    }
}
