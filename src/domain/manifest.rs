use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::ItemKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Original identifier (guid or link)
    #[serde(rename = "g")]
    pub identifier: String,
    #[serde(rename = "h")]
    pub key: ItemKey,
}

/// Ordered index of the items in the latest payload of one source.
///
/// A manifest is rebuilt from scratch on every modified fetch and replaces
/// the previous one wholesale; it never accumulates history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn builder() -> ManifestBuilder {
        ManifestBuilder::default()
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Accumulates entries in feed order, dropping repeated keys.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    entries: Vec<ManifestEntry>,
    seen: HashSet<ItemKey>,
}

impl ManifestBuilder {
    /// Returns false when the key was already recorded in this payload.
    pub fn push(&mut self, identifier: &str, key: ItemKey) -> bool {
        if !self.seen.insert(key.clone()) {
            return false;
        }
        self.entries.push(ManifestEntry {
            identifier: identifier.to_string(),
            key,
        });
        true
    }

    pub fn build(self) -> Manifest {
        Manifest {
            entries: self.entries,
        }
    }
}
