use async_trait::async_trait;

use crate::config::SyncConfig;

#[async_trait]
pub trait ConfigPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<SyncConfig>;
    async fn save(&self, config: &SyncConfig) -> anyhow::Result<()>;
}
