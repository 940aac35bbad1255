//! Configuration management for Tributary.
//!
//! Configuration is read from `~/.config/tributary/config.toml` unless a path
//! is given on the command line. If the default file doesn't exist, one with
//! comments is created. Every section falls back to defaults field by field.

pub mod sanitize;

pub use sanitize::SanitizeConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub store: StoreConfig,
    pub format: FormatConfig,
    pub sanitize: SanitizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory holding one `<sourceId>.json` document per feed
    pub dir: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("sources"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: concat!("tributary/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Filesystem,
    ObjectStorage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Output root for the filesystem backend
    pub root: PathBuf,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services; empty means AWS
    pub endpoint: String,
    /// Cache directive attached to uploaded objects
    pub cache_control: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Filesystem,
            root: PathBuf::from("public"),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: String::new(),
            cache_control: "max-age=3600".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Literal separators a title is split on. The first entry is the UTF-8
    /// em dash; the second is the same bytes read as Windows-1252.
    pub title_delimiters: Vec<String>,
    /// Heading text used when an entry has no title
    pub untitled: String,
    /// Anchor target used when an entry has no link
    pub missing_link: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            title_delimiters: vec![" \u{2014} ".to_string(), " \u{e2}\u{20ac}\u{201d} ".to_string()],
            untitled: "Untitled".to_string(),
            missing_link: "#".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from the default path.
    ///
    /// An explicit path must exist. The default path is created with a
    /// commented template on first use.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the default config file path: `~/.config/tributary/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tributary").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Tributary Configuration
#
# Relative paths are resolved against the working directory.

[sources]
# One <sourceId>.json document per feed:
#   { "url": "<base64 feed URL>", "etag": "...", "lastModified": "..." }
dir = "sources"

[fetch]
# Single request timeout in seconds; there are no retries
timeout_secs = 15
user_agent = "tributary/0.1.0"

[store]
# "filesystem" or "object-storage"
backend = "filesystem"

# Filesystem output root (items/<sourceId>/<hash>.json, feeds/<sourceId>.json)
root = "public"

# Object storage. Credentials are read from AWS_ACCESS_KEY_ID and
# AWS_SECRET_ACCESS_KEY (and optionally AWS_SESSION_TOKEN).
bucket = ""
region = "us-east-1"
endpoint = ""
cache_control = "max-age=3600"

[format]
# Titles are split on any of these literal separators. The second entry is
# the em dash as it appears after a UTF-8 -> Windows-1252 mix-up.
title_delimiters = [" — ", " â€” "]
untitled = "Untitled"
missing_link = "#"

[sanitize]
tags = ["h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "li", "strong", "em", "a", "br", "div", "img", "span"]

[sanitize.tag_attributes]
a = ["href", "rel", "target"]
img = ["loading", "src", "alt", "title"]
span = ["class", "style"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config = Config::parse(&content).expect("Default config should be valid TOML");

        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.store.backend, Backend::Filesystem);
        assert_eq!(config.store.cache_control, "max-age=3600");
        assert_eq!(config.format.title_delimiters, FormatConfig::default().title_delimiters);
        assert_eq!(config.sanitize, SanitizeConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[store]
backend = "object-storage"
bucket = "my-bucket"
"##;
        let config = Config::parse(content).expect("Partial config should work");

        assert_eq!(config.store.backend, Backend::ObjectStorage);
        assert_eq!(config.store.bucket, "my-bucket");
        // Defaults
        assert_eq!(config.store.region, "us-east-1");
        assert_eq!(config.sources.dir, PathBuf::from("sources"));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").expect("Empty config should work");
        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.format.untitled, "Untitled");
        assert_eq!(config.format.missing_link, "#");
    }

    #[test]
    fn test_default_delimiters_cover_both_encodings() {
        let delimiters = FormatConfig::default().title_delimiters;
        assert_eq!(delimiters[0].as_bytes(), b" \xE2\x80\x94 ");
        assert_eq!(delimiters[1], " â€” ");
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[store\nbackend = 1").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
