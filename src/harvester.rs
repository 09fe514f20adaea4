use serde::Serialize;
use thiserror::Error;

use crate::{
    client::{Client, Endpoint, RequestError, ReqwestTransport, Transport},
    store::{MatchRecord, MatchStore, PersistOutcome, StoreError},
};

/// Queue id of ranked solo/duo games.
pub const RANKED_SOLO_QUEUE: u32 = 420;

pub const DEFAULT_MATCH_COUNT: u32 = 100;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Failed to fetch from match API: {0}")]
    Request(#[from] RequestError),
    #[error("Failed to store match: {0}")]
    Store(#[from] StoreError),
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub listed: usize,
    pub persisted: usize,
    pub skipped: usize,
}

pub struct Harvester<'c, T = ReqwestTransport> {
    client: &'c Client<T>,
    store: MatchStore,
}

impl<'c, T: Transport> Harvester<'c, T> {
    pub fn new(client: &'c Client<T>, store: MatchStore) -> Self {
        Self { client, store }
    }

    /// Ranked solo match ids of `puuid`, in the order the service returns them.
    pub async fn list_match_ids(
        &self,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<String>, RequestError> {
        let endpoint = Endpoint::new(format!("/lol/match/v5/matches/by-puuid/{}/ids", puuid))
            .param("queue", RANKED_SOLO_QUEUE)
            .param("count", count);
        self.client.get(&endpoint).await
    }

    pub async fn fetch_match(&self, match_id: &str) -> Result<MatchRecord, RequestError> {
        let endpoint = Endpoint::new(format!("/lol/match/v5/matches/{}", match_id));
        self.client.get(&endpoint).await
    }

    pub fn persist_if_matching_patch(
        &self,
        record: &MatchRecord,
        patch_prefix: &str,
    ) -> Result<PersistOutcome, StoreError> {
        self.store.persist_if_matching_patch(record, patch_prefix)
    }

    /// One pass over the recent ranked matches of `puuid`.
    ///
    /// Matches are fetched one at a time and the first failure ends the pass;
    /// records already written stay on disk.
    pub async fn harvest(
        &self,
        puuid: &str,
        patch_prefix: &str,
        count: u32,
    ) -> Result<HarvestSummary, HarvestError> {
        let ids = self.list_match_ids(puuid, count).await?;
        let mut summary = HarvestSummary {
            listed: ids.len(),
            ..Default::default()
        };
        log::info!("harvesting {} matches for patch {}", ids.len(), patch_prefix);

        for id in &ids {
            let record = self.fetch_match(id).await?;
            match self.persist_if_matching_patch(&record, patch_prefix)? {
                PersistOutcome::Persisted(path) => {
                    log::debug!("{} saved to {}", id, path.display());
                    summary.persisted += 1;
                }
                PersistOutcome::Skipped => {
                    log::debug!(
                        "{} skipped, game version {}",
                        id,
                        record.game_version().unwrap_or("?")
                    );
                    summary.skipped += 1;
                }
            }
        }

        log::info!(
            "harvest done: {} persisted, {} skipped",
            summary.persisted,
            summary.skipped
        );
        Ok(summary)
    }
}
