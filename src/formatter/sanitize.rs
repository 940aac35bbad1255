use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use crate::config::SanitizeConfig;

/// Strips item bodies down to an allow-listed set of tags and attributes.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    allow: SanitizeConfig,
}

impl Sanitizer {
    pub fn new(allow: SanitizeConfig) -> Self {
        Self { allow }
    }

    fn builder(&self) -> Builder<'_> {
        // script and style are always removed together with their content
        let tags: HashSet<&str> = self
            .allow
            .tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !matches!(*tag, "script" | "style"))
            .collect();

        let tag_attributes: HashMap<&str, HashSet<&str>> = self
            .allow
            .tag_attributes
            .iter()
            .filter(|(tag, _)| tags.contains(tag.as_str()))
            .map(|(tag, attrs)| {
                (
                    tag.as_str(),
                    attrs.iter().map(String::as_str).collect::<HashSet<_>>(),
                )
            })
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(tags)
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            // `rel` is an allowed anchor attribute, so ammonia must not manage it
            .link_rel(None)
            .strip_comments(true);
        builder
    }

    /// Clean an optional HTML fragment. No input yields an empty string.
    pub fn sanitize(&self, html: Option<&str>) -> String {
        match html {
            Some(html) if !html.is_empty() => self.builder().clean(html).to_string(),
            _ => String::new(),
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(SanitizeConfig::default())
    }
}
