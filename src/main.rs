// Entrypoint for the vault uploader.
// - Loads `.env`, initialises logging and reads the run configuration.
// - Authenticates once; without a token nothing is uploaded.
// - Walks the vault and always prints the summary, even when the run aborts.

use anyhow::Context;
use indicatif::MultiProgress;
use log::info;
use vault_sync::api::ApiClient;
use vault_sync::config::{credentials_from_env, SyncConfig};
use vault_sync::report::RunReport;
use vault_sync::ui;
use vault_sync::walker::TreeWalker;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let progress = ui::init_logging(MultiProgress::new())?;

    let config = SyncConfig::from_env();
    config.validate()?;

    let credentials = match credentials_from_env() {
        Some(credentials) => credentials,
        None => ui::prompt_credentials()?,
    };

    let mut api = ApiClient::new(&config.api_base_url)?;
    api.login(&credentials)
        .with_context(|| format!("Authentication against {} failed", api.base_url()))?;
    info!("Authenticated against {}", api.base_url());

    println!("=== Vault upload started ===");
    println!("Source: {}", config.root_path.display());

    let report = RunReport::with_progress(ui::progress_spinner(&progress));
    let mut walker = TreeWalker::new(&api, &config, report);
    let outcome = walker.run();
    walker.into_report().print_summary();

    outcome.context("Upload aborted")?;
    Ok(())
}
