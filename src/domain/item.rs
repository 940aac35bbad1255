use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the item digest.
pub const ITEM_KEY_LEN: usize = 12;

/// Opaque content address of an item, derived from its guid or link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Generate a deterministic key from an item identifier
    pub fn generate(identifier: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identifier.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(ITEM_KEY_LEN);
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate body fields of a feed entry, most complete first.
#[derive(Debug, Clone, Default)]
pub struct BodyFields {
    pub encoded: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl BodyFields {
    /// The first candidate that carries non-blank text.
    pub fn first_present(&self) -> Option<&str> {
        [
            &self.encoded,
            &self.content,
            &self.summary,
            &self.description,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|text| !text.trim().is_empty())
    }
}

/// A feed entry as it came out of the parser.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub body: BodyFields,
}

impl RawItem {
    /// Stable identifier: guid when the feed published one, else the link.
    pub fn identifier(&self) -> Option<&str> {
        fn non_blank(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        non_blank(&self.guid).or_else(|| non_blank(&self.link))
    }

    pub fn key(&self) -> Option<ItemKey> {
        self.identifier().map(ItemKey::generate)
    }
}

/// The persisted item document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedItem {
    pub guid: String,
    pub link: String,
    /// Re-rendered as RFC 2822 from the parsed date, not the feed's own text.
    /// Empty when the feed had no date feed-rs could parse.
    pub pub_date: String,
    pub timestamp: i64,
    pub description: String,
    pub title: String,
    pub source: String,
    pub category: String,
}

impl ProcessedItem {
    /// Publish date as RFC 2822 text plus epoch millis. Without a usable date
    /// the text is empty and the timestamp falls back to `now`.
    pub fn dates(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> (String, i64) {
        match published_at {
            Some(dt) => (dt.to_rfc2822(), dt.timestamp_millis()),
            None => (String::new(), now.timestamp_millis()),
        }
    }
}
