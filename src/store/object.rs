use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use crate::app::{Result, TributaryError};
use crate::config::StoreConfig;
use crate::domain::{ItemKey, Manifest, ProcessedItem};
use crate::store::{item_path, manifest_path, PersistReport, Sink, WriteOutcome};

/// Environment variables that must be set for the object-storage backend.
pub const REQUIRED_CREDENTIALS: [&str; 2] = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"];

/// Publishes documents to an object-storage bucket. Within one cycle every
/// write is dispatched at once and the cycle waits for all of them.
pub struct ObjectSink {
    store: Arc<dyn ObjectStore>,
    cache_control: String,
}

impl ObjectSink {
    pub fn new(store: Arc<dyn ObjectStore>, cache_control: impl Into<String>) -> Self {
        Self {
            store,
            cache_control: cache_control.into(),
        }
    }

    /// Build an S3 client from config plus credentials in the environment.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_CREDENTIALS
            .iter()
            .copied()
            .filter(|name| std::env::var(name).map(|v| v.is_empty()).unwrap_or(true))
            .collect();
        if !missing.is_empty() {
            return Err(TributaryError::MissingCredentials(missing.join(", ")));
        }

        if config.bucket.is_empty() {
            return Err(TributaryError::Config(
                "store.bucket is required for the object-storage backend".into(),
            ));
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);
        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
        }

        Ok(Self::new(Arc::new(builder.build()?), &config.cache_control))
    }

    fn put_options(&self) -> PutOptions {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::CacheControl, self.cache_control.clone().into());
        attributes.insert(Attribute::ContentType, "application/json".into());
        PutOptions {
            attributes,
            ..Default::default()
        }
    }

    async fn exists(&self, path: &ObjectPath) -> Result<bool> {
        match self.store.head(path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_json(&self, path: &ObjectPath, body: Vec<u8>) -> Result<()> {
        self.store
            .put_opts(path, PutPayload::from(body), self.put_options())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Sink for ObjectSink {
    async fn write_item(
        &self,
        source_id: &str,
        key: &ItemKey,
        item: &ProcessedItem,
    ) -> Result<WriteOutcome> {
        let path = ObjectPath::from(item_path(source_id, key));
        if self.exists(&path).await? {
            return Ok(WriteOutcome::Skipped);
        }

        self.put_json(&path, serde_json::to_vec(item)?).await?;
        Ok(WriteOutcome::Created)
    }

    async fn write_manifest(&self, source_id: &str, manifest: &Manifest) -> Result<()> {
        let path = ObjectPath::from(manifest_path(source_id));
        self.put_json(&path, manifest.to_json()?).await
    }

    async fn persist(
        &self,
        source_id: &str,
        items: &[(ItemKey, ProcessedItem)],
        manifest: &Manifest,
    ) -> PersistReport {
        let item_writes = join_all(
            items
                .iter()
                .map(|(key, item)| async move { (key, self.write_item(source_id, key, item).await) }),
        );
        let manifest_write = self.write_manifest(source_id, manifest);

        let (item_results, manifest_result) = futures::join!(item_writes, manifest_write);

        let mut report = PersistReport::default();
        for (key, result) in item_results {
            report.record_item(source_id, key, result);
        }
        report.record_manifest(source_id, manifest_result);
        report
    }
}
