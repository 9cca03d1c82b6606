use crate::adapters::memory::StoreState;
use crate::core::{EntryId, LedgerStore, NewEntry, Player, RoundNumber, ScoreEntry};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Ledger persisted as a single JSON document.
///
/// Each mutation is applied to a copy of the state, written to a temporary
/// file and renamed over the original. The cached state is only replaced
/// once the rename succeeds.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let data = fs::read(&path)?;
            serde_json::from_slice(&data)?
        } else {
            StoreState::default()
        };
        tracing::debug!(path = %path.display(), "opened ledger file");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        f(&*self.state.lock().await)
    }

    async fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(out)
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(state)?;
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    async fn create_player(&self, name: &str) -> Result<Player> {
        self.mutate(|s| Ok(s.create_player(name))).await
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.read(StoreState::players).await)
    }

    async fn delete_all_players(&self) -> Result<()> {
        self.mutate(|s| {
            s.clear_players();
            Ok(())
        })
        .await
    }

    async fn next_round_number(&self) -> Result<RoundNumber> {
        Ok(self.read(StoreState::next_round_number).await)
    }

    async fn write_round_entries(
        &self,
        round: RoundNumber,
        entries: Vec<NewEntry>,
    ) -> Result<Vec<ScoreEntry>> {
        self.mutate(|s| s.insert_round(round, entries)).await
    }

    async fn read_round_entries(&self, round: RoundNumber) -> Result<Vec<ScoreEntry>> {
        Ok(self.read(|s| s.round_entries(round)).await)
    }

    async fn read_entry(&self, id: EntryId) -> Result<ScoreEntry> {
        self.read(|s| s.entry(id)).await
    }

    async fn write_round(&self, entries: &[ScoreEntry]) -> Result<()> {
        self.mutate(|s| s.replace_entries(entries)).await
    }

    async fn list_entries(&self) -> Result<Vec<ScoreEntry>> {
        Ok(self.read(StoreState::entries).await)
    }

    async fn delete_all_rounds(&self) -> Result<()> {
        self.mutate(|s| {
            s.clear_rounds();
            Ok(())
        })
        .await
    }

    async fn reset_all(&self) -> Result<()> {
        self.mutate(|s| {
            s.clear_rounds();
            s.clear_players();
            Ok(())
        })
        .await
    }
}
