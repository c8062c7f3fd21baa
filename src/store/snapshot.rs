use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use crate::store::telemetry_store::{Tables, TelemetryStore};

impl TelemetryStore {
    /// Load a store from a JSON snapshot; a missing file yields an empty store.
    pub async fn load_snapshot(path: &Path) -> Result<Self> {
        match fs::read(path).await {
            Ok(bytes) => {
                let tables: Tables = serde_json::from_slice(&bytes)
                    .with_context(|| format!("invalid store snapshot '{}'", path.display()))?;
                info!(
                    path = %path.display(),
                    devices = tables.devices.len(),
                    locations = tables.realtime_locations.len(),
                    "store snapshot loaded"
                );
                Ok(Self::from_tables(tables))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no store snapshot, starting empty");
                Ok(Self::new())
            }
            Err(err) => Err(err).with_context(|| format!("reading '{}'", path.display())),
        }
    }

    /// Write the whole store as JSON: temp file, 0600, rename.
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        let bytes = {
            let tables = self.inner.read().await;
            serde_json::to_vec(&*tables)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}
