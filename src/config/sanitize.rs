use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Allow-list applied to item bodies. Anything not named here is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    pub tags: Vec<String>,
    /// Attributes kept per tag; tags missing here keep no attributes
    pub tag_attributes: BTreeMap<String, Vec<String>>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        let tags = [
            "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "li", "strong", "em", "a", "br", "div",
            "img", "span",
        ];

        let tag_attributes = [
            ("a", &["href", "rel", "target"][..]),
            ("img", &["loading", "src", "alt", "title"][..]),
            ("span", &["class", "style"][..]),
        ]
        .into_iter()
        .map(|(tag, attrs)| {
            (
                tag.to_string(),
                attrs.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect();

        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tag_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list() {
        let config = SanitizeConfig::default();
        assert_eq!(config.tags.len(), 16);
        assert!(config.tags.iter().any(|t| t == "img"));
        assert!(!config.tags.iter().any(|t| t == "script"));
        assert_eq!(config.tag_attributes["a"], vec!["href", "rel", "target"]);
        assert!(!config.tag_attributes.contains_key("div"));
    }
}
