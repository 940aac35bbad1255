pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Backend, Config};

#[derive(Parser)]
#[command(name = "tributary")]
#[command(about = "Publish sanitized RSS/Atom items as content-addressed JSON", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the source documents
    #[arg(long, global = true)]
    pub sources: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every source once and publish new items
    Sync {
        /// Storage backend to publish to
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Output root for the filesystem backend
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bucket for the object-storage backend
        #[arg(long)]
        bucket: Option<String>,
    },
    /// Register a new source
    Add {
        /// URL of the feed
        url: String,

        /// Source id (default: short hash of the URL)
        #[arg(long)]
        id: Option<String>,
    },
    /// List configured sources
    List,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref dir) = self.sources {
            config.sources.dir = dir.clone();
        }

        if let Commands::Sync {
            backend,
            output,
            bucket,
        } = &self.command
        {
            if let Some(backend) = backend {
                config.store.backend = *backend;
            }
            if let Some(output) = output {
                config.store.root = output.clone();
            }
            if let Some(bucket) = bucket {
                config.store.bucket = bucket.clone();
            }
        }
    }
}
