use crate::app::{AppContext, Result};
use crate::pipeline::{self, RunSummary};
use crate::store::SourceRegistry;

pub async fn sync(ctx: &AppContext) -> Result<RunSummary> {
    let summary = pipeline::run(ctx).await?;

    println!(
        "Sync complete: {} updated, {} unchanged, {} failed, {} new items",
        summary.updated, summary.unchanged, summary.failed, summary.items_created
    );
    if summary.write_failures > 0 {
        eprintln!("  {} writes failed, see log", summary.write_failures);
    }

    Ok(summary)
}

pub fn add_source(registry: &SourceRegistry, url: &str, id: Option<&str>) -> Result<()> {
    match registry.add(url, id)? {
        Some(source) => println!("Added source: {}", source.id),
        None => println!(
            "Source already exists: {}",
            id.map(String::from)
                .unwrap_or_else(|| SourceRegistry::id_for_url(url))
        ),
    }
    Ok(())
}

pub fn list_sources(registry: &SourceRegistry) -> Result<()> {
    let sources = registry.load_all()?;

    if sources.is_empty() {
        println!("No sources");
        return Ok(());
    }

    for source in sources {
        let url = source
            .feed_url()
            .unwrap_or_else(|e| format!("<invalid: {}>", e));
        let validators = source.validators();
        println!("{}\n  {}", source.id, url);
        if let Some(ref etag) = validators.etag {
            println!("  etag: {}", etag);
        }
        if let Some(ref last_modified) = validators.last_modified {
            println!("  last-modified: {}", last_modified);
        }
    }

    Ok(())
}
