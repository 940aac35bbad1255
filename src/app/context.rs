use std::sync::Arc;

use crate::app::error::Result;
use crate::config::{Backend, Config, StoreConfig};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::formatter::{ItemFormatter, Sanitizer, TitleFormatter};
use crate::normalizer::Normalizer;
use crate::store::{FsSink, ObjectSink, Sink, SourceRegistry};

pub struct AppContext {
    pub config: Config,
    pub registry: SourceRegistry,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub formatter: ItemFormatter,
    pub sink: Arc<dyn Sink>,
}

impl AppContext {
    /// Wire up the production components. Fails before any source is touched
    /// when the selected backend cannot be built (e.g. missing credentials).
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetch)?);
        let sink = Self::build_sink(&config.store)?;
        Ok(Self::with_parts(config, fetcher, sink))
    }

    /// Context with caller-supplied fetcher and sink.
    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        let registry = SourceRegistry::new(&config.sources.dir);
        let formatter = ItemFormatter::new(
            Sanitizer::new(config.sanitize.clone()),
            TitleFormatter::new(&config.format),
        );

        Self {
            config,
            registry,
            fetcher,
            normalizer: Normalizer::new(),
            formatter,
            sink,
        }
    }

    fn build_sink(store: &StoreConfig) -> Result<Arc<dyn Sink>> {
        let sink: Arc<dyn Sink> = match store.backend {
            Backend::Filesystem => Arc::new(FsSink::new(&store.root)),
            Backend::ObjectStorage => Arc::new(ObjectSink::from_config(store)?),
        };
        Ok(sink)
    }
}
