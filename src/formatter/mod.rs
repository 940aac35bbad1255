pub mod sanitize;
pub mod title;

use chrono::{DateTime, Utc};

pub use sanitize::Sanitizer;
pub use title::TitleFormatter;

use crate::domain::{ItemKey, ProcessedItem, RawItem};

/// Turns raw feed entries into publishable item documents.
#[derive(Debug, Clone, Default)]
pub struct ItemFormatter {
    pub sanitizer: Sanitizer,
    pub titles: TitleFormatter,
}

impl ItemFormatter {
    pub fn new(sanitizer: Sanitizer, titles: TitleFormatter) -> Self {
        Self { sanitizer, titles }
    }

    /// Returns `None` for entries with neither guid nor link.
    pub fn process(
        &self,
        raw: &RawItem,
        source_id: &str,
        now: DateTime<Utc>,
    ) -> Option<(ItemKey, ProcessedItem)> {
        let key = raw.key()?;
        let (pub_date, timestamp) = ProcessedItem::dates(raw.published_at, now);

        let item = ProcessedItem {
            guid: raw.guid.clone().unwrap_or_default(),
            link: raw.link.clone().unwrap_or_default(),
            pub_date,
            timestamp,
            description: self.sanitizer.sanitize(raw.body.first_present()),
            title: self.titles.format(raw.title.as_deref(), raw.link.as_deref()),
            source: source_id.to_string(),
            category: String::new(),
        };

        Some((key, item))
    }
}
