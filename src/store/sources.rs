use std::fs;
use std::path::{Path, PathBuf};

use crate::app::{Result, TributaryError};
use crate::domain::{ItemKey, Source, SourceDocument};

/// Directory of `<sourceId>.json` documents, read once per run and rewritten
/// in place when a source's validators change.
pub struct SourceRegistry {
    dir: PathBuf,
}

impl SourceRegistry {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Every readable source, sorted by id. Malformed documents are logged and
    /// skipped.
    pub fn load_all(&self) -> Result<Vec<Source>> {
        let mut sources = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.get(id) {
                Ok(source) => sources.push(source),
                Err(e) => tracing::warn!(source = id, "Skipping unreadable source: {}", e),
            }
        }

        sources.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sources)
    }

    pub fn get(&self, id: &str) -> Result<Source> {
        let path = self.path_for(id);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TributaryError::SourceNotFound(id.to_string()),
            _ => TributaryError::Io(e),
        })?;
        let document: SourceDocument =
            serde_json::from_str(&content).map_err(|e| TributaryError::InvalidSource {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Source {
            id: id.to_string(),
            document,
        })
    }

    pub fn save(&self, source: &Source) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&source.document)?;
        fs::write(self.path_for(&source.id), json)?;
        Ok(())
    }

    /// Default id for a new source: the short digest of its URL.
    pub fn id_for_url(feed_url: &str) -> String {
        ItemKey::generate(feed_url).to_string()
    }

    /// Register a new source. Returns `None` when the id is already taken,
    /// leaving the existing document untouched.
    pub fn add(&self, feed_url: &str, id: Option<&str>) -> Result<Option<Source>> {
        url::Url::parse(feed_url)?;

        let id = match id {
            Some(id) => Self::validate_id(id)?.to_string(),
            None => Self::id_for_url(feed_url),
        };

        if self.path_for(&id).exists() {
            return Ok(None);
        }

        let source = Source::new(id, feed_url);
        self.save(&source)?;
        Ok(Some(source))
    }

    fn validate_id(id: &str) -> Result<&str> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(id)
        } else {
            Err(TributaryError::InvalidSource {
                id: id.to_string(),
                reason: "ids may only contain ASCII letters, digits, '-' and '_'".into(),
            })
        }
    }
}
