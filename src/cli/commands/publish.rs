//! CLI command implementation for `solfactory publish`

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, print_resolve_report, status};
use crate::config::FactoryConfig;
use crate::core::publish::publish;
use crate::core::resolver::ManifestResolver;
use crate::infra::download::HttpFetcher;

/// Execute the publish command
pub async fn execute(config: &FactoryConfig) -> Result<()> {
    let manifest = super::load_manifest(config)?;
    let distribution = config.distribution_dir();
    let resolver = ManifestResolver::new(HttpFetcher::new());

    let spinner = create_spinner(&format!("Publishing to {}...", distribution.display()));
    let result = publish(&resolver, &manifest, &distribution).await;
    spinner.finish_and_clear();

    let report = result
        .with_context(|| format!("Failed to publish to {}", distribution.display()))?;

    println!(
        "{} Published {} entries to {}",
        status::SUCCESS,
        report.entries.len(),
        distribution.display()
    );
    print_resolve_report(&report);

    Ok(())
}
