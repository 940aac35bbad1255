pub mod filesystem;
pub mod object;
pub mod sources;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{ItemKey, Manifest, ProcessedItem};

pub use filesystem::FsSink;
pub use object::ObjectSink;
pub use sources::SourceRegistry;

/// Relative key of an item document: `items/<sourceId>/<itemHash>.json`
pub fn item_path(source_id: &str, key: &ItemKey) -> String {
    format!("items/{}/{}.json", source_id, key)
}

/// Relative key of a manifest document: `feeds/<sourceId>.json`
pub fn manifest_path(source_id: &str) -> String {
    format!("feeds/{}.json", source_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document did not exist and was written
    Created,
    /// A document already existed under this key and was left alone
    Skipped,
}

/// Result of persisting one cycle's items and manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub manifest_written: bool,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.manifest_written
    }

    fn record_item(&mut self, source_id: &str, key: &ItemKey, result: Result<WriteOutcome>) {
        match result {
            Ok(WriteOutcome::Created) => self.created += 1,
            Ok(WriteOutcome::Skipped) => {
                tracing::debug!(source = source_id, key = %key, "Item already published");
                self.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(source = source_id, key = %key, "Failed to write item: {}", e);
                self.failed += 1;
            }
        }
    }

    fn record_manifest(&mut self, source_id: &str, result: Result<()>) {
        match result {
            Ok(()) => self.manifest_written = true,
            Err(e) => tracing::warn!(source = source_id, "Failed to write manifest: {}", e),
        }
    }
}

/// Durable target for published documents.
///
/// Item documents are create-only: once a key exists its content is never
/// replaced. Manifests are always overwritten.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write_item(
        &self,
        source_id: &str,
        key: &ItemKey,
        item: &ProcessedItem,
    ) -> Result<WriteOutcome>;

    async fn write_manifest(&self, source_id: &str, manifest: &Manifest) -> Result<()>;

    /// Persist every item, then the manifest, one write at a time. A failed
    /// write is recorded and the remaining writes still run.
    async fn persist(
        &self,
        source_id: &str,
        items: &[(ItemKey, ProcessedItem)],
        manifest: &Manifest,
    ) -> PersistReport {
        let mut report = PersistReport::default();

        for (key, item) in items {
            let result = self.write_item(source_id, key, item).await;
            report.record_item(source_id, key, result);
        }

        let result = self.write_manifest(source_id, manifest).await;
        report.record_manifest(source_id, result);

        report
    }
}
