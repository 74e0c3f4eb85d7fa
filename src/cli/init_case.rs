use anyhow::{Context, Result};
use std::path::PathBuf;

use fmuio::case::CaseDocument;
use fmuio::config::{evaluate, read_config_file, ConfigValidity};

/// Initialize case metadata for a case root
pub fn run(
    casepath: PathBuf,
    config: PathBuf,
    name: Option<String>,
    user: Option<String>,
) -> Result<()> {
    if !casepath.is_dir() {
        anyhow::bail!("The case root does not exist: {}", casepath.display());
    }

    let value = read_config_file(&config)
        .with_context(|| format!("Failed to read {}", config.display()))?;
    let config = match evaluate(&value) {
        ConfigValidity::Valid(config) => *config,
        ConfigValidity::Invalid { problems } => {
            anyhow::bail!(
                "The global configuration is not valid: {}",
                problems.join("; ")
            );
        }
    };

    let name = name.unwrap_or_else(|| {
        casepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "case".to_string())
    });
    let user = user
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string());

    let path = CaseDocument::initialize(&casepath, &config, &name, &user, None)?;
    println!("Case metadata: {}", path.display());

    Ok(())
}
