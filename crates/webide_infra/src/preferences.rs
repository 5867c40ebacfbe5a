use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::Mutex;
use webide_app::PreferenceRepository;

/// Flags persisted as a JSON object of booleans
pub struct JsonPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    async fn read(&self) -> anyhow::Result<BTreeMap<String, bool>> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => serde_json::from_slice(&content)
                .with_context(|| format!("Invalid preferences file {}", self.path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error).with_context(|| {
                format!("Failed to read preferences from {}", self.path.display())
            }),
        }
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for JsonPreferenceStore {
    async fn get_flag(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.read().await?.get(key).copied().unwrap_or(false))
    }

    async fn set_flag(&self, key: &str, value: bool) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut flags = self.read().await?;
        flags.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&flags)?)
            .await
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}
