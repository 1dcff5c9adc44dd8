use crate::core_network::error::FtpError;
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};
use tokio::time::timeout;

/// Per-path reader/writer locks shared by every session.
///
/// Downloads hold a shared lock and uploads an exclusive one, so an upload
/// never truncates a file another session is still sending. Waiting for a
/// lock is bounded; a file that stays busy is reported as `FileBusy`.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(
        &self,
        path: &Path,
        wait: Duration,
    ) -> Result<OwnedRwLockReadGuard<()>, FtpError> {
        let lock = self.entry(path).await;
        timeout(wait, lock.read_owned())
            .await
            .map_err(|_| busy(path, wait))
    }

    pub async fn write(
        &self,
        path: &Path,
        wait: Duration,
    ) -> Result<OwnedRwLockWriteGuard<()>, FtpError> {
        let lock = self.entry(path).await;
        timeout(wait, lock.write_owned())
            .await
            .map_err(|_| busy(path, wait))
    }

    async fn entry(&self, path: &Path) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;
        // Entries only referenced by the table are no longer held by anyone.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

fn busy(path: &Path, wait: Duration) -> FtpError {
    warn!("Gave up waiting {:?} for a lock on {:?}", wait, path);
    FtpError::FileBusy(path.display().to_string(), wait)
}
