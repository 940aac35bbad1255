//! # Tributary
//!
//! Polls a set of RSS/Atom feeds, sanitizes their entries and publishes
//! content-addressed JSON documents to a local directory or an object-storage
//! bucket without revealing which feed an item came from.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Formatter → Manifest → Sink → SourceRegistry
//! ```
//!
//! - [`fetcher`]: HTTP client with ETag/Last-Modified conditional requests
//! - [`normalizer`]: Converts RSS/Atom feeds into raw entries
//! - [`formatter`]: Body sanitization and title rendering
//! - [`store`]: Source documents and the publishing backends
//! - [`pipeline`]: The per-source sync cycle
//!
//! ## Quick Start
//!
//! ```bash
//! # Register a feed (the URL is stored base64-encoded)
//! tributary add https://blog.rust-lang.org/feed.xml --id rust-blog
//!
//! # Publish to ./public
//! tributary sync --output public
//!
//! # Publish to a bucket
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//!     tributary sync --backend object-storage --bucket my-bucket
//! ```
//!
//! ## Output layout
//!
//! - `items/<sourceId>/<itemHash>.json`: one document per item, written once
//! - `feeds/<sourceId>.json`: `[{"g": identifier, "h": itemHash}, ...]`,
//!   replaced on every modified fetch

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// source registry, fetcher, normalizer, formatter and sink.
pub mod app;

/// Command-line interface using clap.
///
/// - `sync` - Fetch every source once and publish new items
/// - `add <url>` - Register a new source
/// - `list` - List sources with their decoded URLs
pub mod cli;

/// TOML configuration with per-field defaults.
pub mod config;

/// Core domain models.
///
/// - [`Source`](domain::Source): configured feed with cache validators
/// - [`RawItem`](domain::RawItem): parsed feed entry
/// - [`ProcessedItem`](domain::ProcessedItem): published item document
/// - [`ItemKey`](domain::ItemKey): 12-hex-char SHA256 item address
/// - [`Manifest`](domain::Manifest): ordered item index of one source
pub mod domain;

/// HTTP fetching with conditional request support.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Allow-list HTML sanitizer and title formatter.
pub mod formatter;

/// Feed parsing.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0 into
/// [`RawItem`](domain::RawItem)s.
pub mod normalizer;

/// Per-source sync cycle and the sequential run over all sources.
pub mod pipeline;

/// Persistence.
///
/// - [`SourceRegistry`](store::SourceRegistry): source documents on disk
/// - [`Sink`](store::Sink): trait for publishing backends
/// - [`FsSink`](store::FsSink): local directory tree
/// - [`ObjectSink`](store::ObjectSink): object-storage bucket
pub mod store;
