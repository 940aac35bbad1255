//! One synchronization cycle per source, run sequentially over all sources.
//!
//! ```text
//! Fetcher → Normalizer → ItemFormatter → Manifest → Sink → SourceRegistry
//! ```
//!
//! A cycle never returns an error: fetch, parse and write failures are logged
//! and folded into [`CycleOutcome`], so one broken source cannot stop the run.

use chrono::Utc;

use crate::app::{AppContext, Result};
use crate::domain::{Manifest, Source};
use crate::fetcher::FetchResult;
use crate::store::PersistReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Server answered 304
    Unchanged,
    /// New payload processed and persisted
    Updated(CycleReport),
    /// Fetch or parse failed; nothing was written
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Items listed in the new manifest
    pub items: usize,
    /// Entries dropped for lacking both guid and link
    pub unidentified: usize,
    /// Entries dropped because an earlier entry had the same key
    pub duplicates: usize,
    pub persist: PersistReport,
    /// Whether the new cache validators were stored
    pub validators_saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub items_created: usize,
    pub items_skipped: usize,
    pub write_failures: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Unchanged => self.unchanged += 1,
            CycleOutcome::Failed(_) => self.failed += 1,
            CycleOutcome::Updated(report) => {
                self.updated += 1;
                self.items_created += report.persist.created;
                self.items_skipped += report.persist.skipped;
                self.write_failures += report.persist.failed;
                if !report.persist.manifest_written {
                    self.write_failures += 1;
                }
            }
        }
    }
}

/// Run one cycle for `source`. On a fully persisted modified payload the
/// source's validators are replaced and saved; otherwise they stay as they
/// were so the next run repeats the same conditional request.
pub async fn sync_source(ctx: &AppContext, source: &mut Source) -> CycleOutcome {
    let url = match source.feed_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(source = %source.id, "Invalid feed URL: {}", e);
            return CycleOutcome::Failed(e.to_string());
        }
    };

    let (body, validators) = match ctx.fetcher.fetch(&url, source.validators()).await {
        FetchResult::NotModified => {
            tracing::debug!(source = %source.id, "Feed not modified");
            return CycleOutcome::Unchanged;
        }
        FetchResult::Failed(reason) => {
            tracing::warn!(source = %source.id, "Fetch failed: {}", reason);
            return CycleOutcome::Failed(reason);
        }
        FetchResult::Modified { body, validators } => (body, validators),
    };

    let raw_items = match ctx.normalizer.normalize(&body) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(source = %source.id, "Skipping source: {}", e);
            return CycleOutcome::Failed(e.to_string());
        }
    };

    let now = Utc::now();
    let mut report = CycleReport::default();
    let mut manifest = Manifest::builder();
    let mut items = Vec::with_capacity(raw_items.len());

    for raw in &raw_items {
        let (Some(identifier), Some((key, item))) =
            (raw.identifier(), ctx.formatter.process(raw, &source.id, now))
        else {
            tracing::warn!(source = %source.id, "Entry has neither guid nor link, skipping");
            report.unidentified += 1;
            continue;
        };

        if manifest.push(identifier, key.clone()) {
            items.push((key, item));
        } else {
            report.duplicates += 1;
        }
    }

    let manifest = manifest.build();
    report.items = manifest.len();
    report.persist = ctx.sink.persist(&source.id, &items, &manifest).await;

    if report.persist.is_complete() {
        let mut updated = source.clone();
        updated.set_validators(validators);
        match ctx.registry.save(&updated) {
            Ok(()) => {
                *source = updated;
                report.validators_saved = true;
            }
            Err(e) => tracing::warn!(source = %source.id, "Failed to save validators: {}", e),
        }
    } else {
        tracing::warn!(
            source = %source.id,
            "Incomplete write, keeping previous validators so the next run refetches"
        );
    }

    tracing::info!(
        source = %source.id,
        items = report.items,
        created = report.persist.created,
        skipped = report.persist.skipped,
        failed = report.persist.failed,
        "Source updated"
    );

    CycleOutcome::Updated(report)
}

/// Process every configured source once, one at a time.
pub async fn run(ctx: &AppContext) -> Result<RunSummary> {
    let sources = ctx.registry.load_all()?;
    let mut summary = RunSummary::default();

    if sources.is_empty() {
        tracing::info!(dir = %ctx.registry.dir().display(), "No sources configured");
        return Ok(summary);
    }

    let start = Utc::now();

    for mut source in sources {
        let outcome = sync_source(ctx, &mut source).await;
        summary.record(&outcome);
    }

    let elapsed = Utc::now().signed_duration_since(start);
    tracing::info!(
        updated = summary.updated,
        unchanged = summary.unchanged,
        failed = summary.failed,
        created = summary.items_created,
        write_failures = summary.write_failures,
        "Sync complete ({:.1}s)",
        elapsed.num_milliseconds() as f64 / 1000.0
    );

    Ok(summary)
}
