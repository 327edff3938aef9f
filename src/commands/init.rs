use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the bvr home directory, its `output` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `bvr_home` - The directory that will be the root of the data directory, e.g. `$HOME/bvr`
/// - `bvr_account` - The company's BVR postal account, e.g. `01-145-6`
/// - `locale` - The locale of the month names printed on slips, e.g. `fr_CH`
///
/// # Errors
/// - Returns an error if any file operations fail or if the account or locale are invalid.
pub async fn init(bvr_home: &Path, bvr_account: &str, locale: &str) -> Result<Out<()>> {
    let config = Config::create(bvr_home, bvr_account, locale)
        .await
        .context("Unable to create the bvr home directory and config")?;
    Ok(format!(
        "Successfully created the bvr directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("bvr");
        let out = init(&home, "01-145-6", "en_US").await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        assert!(Config::load(&home).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_bad_locale() {
        let dir = TempDir::new().unwrap();
        assert!(init(dir.path(), "01-145-6", "klingon").await.is_err());
    }
}
