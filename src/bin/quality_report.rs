//! Seed the textile sample, register the sample recycler quality, and
//! print the judged recycler listing as JSON.
//!
//! ```text
//! RUST_LOG=debug cargo run --bin quality_report
//! ```

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cf_poc::api;
use cf_poc::fixtures::{sample_operations, textile_sample};
use cf_poc::RecyclerRegistry;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sample = textile_sample()?;
    info!(
        attributes = sample.store.attributes_count(sample.material),
        "loaded textile sample"
    );

    let mut registry = RecyclerRegistry::new();
    let recycler = registry.add_recycler("Recycler 1")?;
    registry.add_quality(recycler, sample.material, "Quality Best", 1, sample_operations())?;

    let listing = api::list_recyclers(&sample.catalog, &sample.store, &registry)?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
