use crate::http::HttpClient;
use crate::{LastFmError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Size class of an API image, as reported in the `size` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Mega,
    /// The API omitted the size or used a value this client does not know.
    Unspecified,
}

impl ImageSize {
    pub(crate) fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("small") => Self::Small,
            Some("medium") => Self::Medium,
            Some("large") => Self::Large,
            Some("extralarge") => Self::ExtraLarge,
            Some("mega") => Self::Mega,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extralarge",
            Self::Mega => "mega",
            Self::Unspecified => "unspecified",
        }
    }
}

/// One entry of an object's image list.
#[derive(Debug, Clone)]
pub struct Image {
    http: Arc<HttpClient>,
    /// Image URL; frequently empty, the API ships placeholder entries.
    pub url: String,
    pub size: ImageSize,
}

impl Image {
    pub(crate) fn from_json(data: &Value, http: Arc<HttpClient>) -> Self {
        Self {
            http,
            url: data
                .get("#text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            size: ImageSize::from_api(data.get("size").and_then(Value::as_str)),
        }
    }

    /// Download the image bytes.
    pub async fn read(&self) -> Result<Vec<u8>> {
        if self.url.is_empty() {
            return Err(LastFmError::InvalidArgument(
                "image has no URL".to_string(),
            ));
        }
        self.http.read(&self.url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http() -> Arc<HttpClient> {
        Arc::new(HttpClient::new(
            "test-key",
            Box::new(http_client::native::NativeClient::new()),
        ))
    }

    #[test]
    fn parses_url_and_size() {
        let image = Image::from_json(
            &json!({ "#text": "https://img.example/x.png", "size": "extralarge" }),
            http(),
        );
        assert_eq!(image.url, "https://img.example/x.png");
        assert_eq!(image.size, ImageSize::ExtraLarge);
    }

    #[test]
    fn unknown_sizes_are_unspecified() {
        let image = Image::from_json(&json!({ "#text": "", "size": "gigantic" }), http());
        assert_eq!(image.size, ImageSize::Unspecified);
    }

    #[tokio::test]
    async fn reading_a_placeholder_image_fails() {
        let image = Image::from_json(&json!({ "#text": "" }), http());
        assert!(matches!(
            image.read().await,
            Err(LastFmError::InvalidArgument(_))
        ));
    }
}
