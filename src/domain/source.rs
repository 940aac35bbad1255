use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{Result, TributaryError};

/// HTTP cache validators remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// On-disk shape of a source document. Fields this crate does not know about
/// are carried through untouched when the document is rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub url: String,
    #[serde(flatten)]
    pub validators: Validators,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A configured feed endpoint. The real URL only exists base64-encoded so
/// nothing published downstream carries it in the clear.
#[derive(Debug, Clone)]
pub struct Source {
    pub id: String,
    pub document: SourceDocument,
}

impl Source {
    pub fn new(id: impl Into<String>, feed_url: &str) -> Self {
        Self {
            id: id.into(),
            document: SourceDocument {
                url: Self::encode_url(feed_url),
                validators: Validators::default(),
                extra: serde_json::Map::new(),
            },
        }
    }

    pub fn encode_url(feed_url: &str) -> String {
        STANDARD.encode(feed_url.as_bytes())
    }

    /// Decode and validate the feed URL.
    pub fn feed_url(&self) -> Result<String> {
        let encoded = self.document.url.trim();
        let bytes = STANDARD
            .decode(encoded)
            .or_else(|_| STANDARD_NO_PAD.decode(encoded))?;
        let raw = String::from_utf8(bytes).map_err(|e| TributaryError::InvalidSource {
            id: self.id.clone(),
            reason: format!("feed URL is not UTF-8: {}", e),
        })?;
        let url = Url::parse(raw.trim())?;
        Ok(url.to_string())
    }

    pub fn validators(&self) -> &Validators {
        &self.document.validators
    }

    pub fn set_validators(&mut self, validators: Validators) {
        self.document.validators = validators;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_roundtrips_through_encoding() {
        let source = Source::new("abc", "https://example.com/feed.xml");
        assert_ne!(source.document.url, "https://example.com/feed.xml");
        assert_eq!(source.feed_url().unwrap(), "https://example.com/feed.xml");
    }

    #[test]
    fn test_unpadded_url_is_accepted() {
        let mut source = Source::new("abc", "");
        source.document.url = STANDARD_NO_PAD.encode("https://example.com/a");
        assert_eq!(source.feed_url().unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_garbage_url_is_rejected() {
        let mut source = Source::new("abc", "");
        source.document.url = "%%%not-base64%%%".into();
        assert!(source.feed_url().is_err());

        source.document.url = STANDARD.encode("not a url");
        assert!(matches!(
            source.feed_url(),
            Err(TributaryError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_document_preserves_unknown_fields() {
        let json = r#"{"url":"aHR0cHM6Ly9leGFtcGxlLmNvbS8=","etag":"\"v1\"","title":"kept"}"#;
        let doc: SourceDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.validators.etag.as_deref(), Some("\"v1\""));
        assert_eq!(doc.validators.last_modified, None);

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["title"], "kept");
        assert_eq!(out["etag"], "\"v1\"");
        assert!(out.get("lastModified").is_none());
    }
}
