use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use fl_core::config::SyncConfig;
use fl_core::ports::ConfigPort;

/// TOML-backed sync configuration store.
///
/// A missing file yields the defaults; a partial file is filled up with
/// defaults by the config model itself.
pub struct FileConfigRepository {
    path: PathBuf,
}

impl FileConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.dir() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create config dir failed: {}", dir.display()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigPort for FileConfigRepository {
    async fn load(&self) -> Result<SyncConfig> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("parse config failed: {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SyncConfig::default()),
            Err(err) => Err(err).with_context(|| {
                format!("read config failed: {}", self.path.display())
            }),
        }
    }

    async fn save(&self, config: &SyncConfig) -> Result<()> {
        self.ensure_parent_dir().await?;
        let text = toml::to_string_pretty(config).context("serialize config failed")?;
        fs::write(&self.path, text)
            .await
            .with_context(|| format!("write config failed: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileConfigRepository::new(dir.path().join("sync.toml"));

        let config = repo.load().await.expect("load");
        assert_eq!(config, SyncConfig::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileConfigRepository::new(dir.path().join("nested").join("sync.toml"));

        let mut config = SyncConfig::default();
        config.endpoint_url = "https://api.example/uploads".to_string();
        config.max_attempts = 3;

        repo.save(&config).await.expect("save");
        let loaded = repo.load().await.expect("load");
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sync.toml");
        tokio::fs::write(&path, "probe_interval_secs = \"soon\"")
            .await
            .expect("write");

        let repo = FileConfigRepository::new(path);
        assert!(repo.load().await.is_err());
    }
}
