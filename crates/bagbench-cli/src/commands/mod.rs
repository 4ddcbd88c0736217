pub mod list;
pub mod run;
pub mod show_config;

use anyhow::{Context, Result};
use bagbench::SuiteConfig;
use std::path::Path;

/// Load the suite file, or the built-in suite rooted at the current directory
pub fn load_suite(config: Option<&Path>) -> Result<SuiteConfig> {
    match config {
        Some(path) => SuiteConfig::from_path(path)
            .with_context(|| format!("Failed to load suite {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Ok(SuiteConfig::default_in(&cwd)?)
        }
    }
}
