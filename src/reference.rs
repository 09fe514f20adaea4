use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::client::{Client, Endpoint, ReqwestTransport, Transport};

pub const DEFAULT_LANGUAGE: &str = "en_US";
pub const DEFAULT_CACHE_DIR: &str = "data/raw";

/// Static champion data of one patch, served by Data Dragon.
///
/// Nothing here is fatal: failures are logged and reported as `None`.
pub struct ReferenceFetcher<T = ReqwestTransport> {
    client: Client<T>,
    patch_version: String,
    language: String,
    cache_dir: PathBuf,
}

impl<T: Transport> ReferenceFetcher<T> {
    pub fn new(
        client: Client<T>,
        patch_version: &str,
        language: &str,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            patch_version: patch_version.to_string(),
            language: language.to_string(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(format!("champions_{}.json", self.patch_version))
    }

    /// Fetches `champion.json`, caches the full response and returns its `data` object.
    pub async fn fetch_champion_data(&self) -> Option<Value> {
        let endpoint = Endpoint::new(format!(
            "/cdn/{}/data/{}/champion.json",
            self.patch_version, self.language
        ));
        let mut response: Value = match self.client.get(&endpoint).await {
            Ok(response) => response,
            Err(err) => {
                log::error!(
                    "Error fetching champion data for {}: {}",
                    self.patch_version,
                    err
                );
                return None;
            }
        };

        if let Err(err) = write_cache(&self.cache_path(), &response) {
            log::warn!("failed to cache champion data: {}", err);
        }

        match response.get_mut("data").map(Value::take) {
            Some(data) => Some(data),
            None => {
                log::error!("champion data for {} has no data field", self.patch_version);
                None
            }
        }
    }

    /// Full detail record (spells included) of a single champion.
    pub async fn champion_details(&self, champion_id: &str) -> Option<Value> {
        let endpoint = Endpoint::new(format!(
            "/cdn/{}/data/{}/champion/{}.json",
            self.patch_version, self.language, champion_id
        ));
        let mut response: Value = match self.client.get(&endpoint).await {
            Ok(response) => response,
            Err(err) => {
                log::error!("Error fetching details for {}: {}", champion_id, err);
                return None;
            }
        };
        let details = response
            .get_mut("data")
            .and_then(|data| data.get_mut(champion_id))
            .map(Value::take);
        if details.is_none() {
            log::error!("no details for {} in response", champion_id);
        }
        details
    }
}

fn write_cache(path: &Path, response: &Value) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(response)?;
    std::fs::write(path, content)?;
    Ok(())
}
