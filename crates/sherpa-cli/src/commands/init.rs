use anyhow::{Context, Result};
use colored::Colorize;

use sherpa_core::config::AppConfig;
use sherpa_infrastructure::{ConfigStorage, SherpaPaths};

/// Creates secret.json (mode 600) and config.toml if they don't exist yet.
///
/// An existing config.toml is never read or rewritten, so a broken one can be
/// fixed by hand after `init` has created the secret template.
pub fn run(paths: &SherpaPaths) -> Result<()> {
    let secret_path = paths
        .ensure_secret_file()
        .context("Failed to create secret.json")?;
    println!("{} {}", "secret.json:".bright_black(), secret_path.display());

    let storage = ConfigStorage::new(paths)?;
    if storage.path().exists() {
        tracing::info!("[Init] Keeping existing {}", storage.path().display());
        println!(
            "{} {} (kept)",
            "config.toml:".bright_black(),
            storage.path().display()
        );
    } else {
        storage.save(&AppConfig::default())?;
        tracing::info!("[Init] Wrote {}", storage.path().display());
        println!("{} {}", "config.toml:".bright_black(), storage.path().display());
    }

    println!(
        "{}",
        "Fill in the Gemini API key and Supabase credentials, or set GEMINI_API_KEY, SUPABASE_URL and SUPABASE_ANON_KEY.".yellow()
    );
    Ok(())
}
