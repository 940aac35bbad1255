use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{ItemKey, Manifest, ProcessedItem};
use crate::store::{item_path, manifest_path, Sink, WriteOutcome};

/// Writes documents into a local directory tree. Writes are synchronous and
/// run strictly in sequence.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for FsSink {
    async fn write_item(
        &self,
        source_id: &str,
        key: &ItemKey,
        item: &ProcessedItem,
    ) -> Result<WriteOutcome> {
        let json = serde_json::to_vec(item)?;
        let path = self.root.join(item_path(source_id, key));
        Self::ensure_parent(&path)?;

        // create_new makes the existence check and the create one operation
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::Skipped),
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(&json) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        Ok(WriteOutcome::Created)
    }

    async fn write_manifest(&self, source_id: &str, manifest: &Manifest) -> Result<()> {
        let path = self.root.join(manifest_path(source_id));
        Self::ensure_parent(&path)?;

        let json = manifest.to_json()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
