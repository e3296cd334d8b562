use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::StoreError;

/// One logical record collection backed by a single JSON file.
///
/// All writers of a collection go through [`Collection::update`], which holds
/// the collection mutex across both the in-memory mutation and the durable
/// write. Check-and-set logic placed inside the closure is therefore atomic
/// with respect to every other writer of the same collection.
pub struct Collection<T> {
    path: PathBuf,
    data: Mutex<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send,
{
    /// Loads the collection from disk, seeding an empty file when none
    /// exists yet (matching the data-dir bootstrap of the original layout).
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = T::default();
                persist(&path, &empty).await?;
                empty
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Snapshot of the current state.
    pub async fn read(&self) -> T {
        self.data.lock().await.clone()
    }

    /// Atomic read-modify-write. The mutation is durable before this returns
    /// Ok; on a failed write the in-memory state is rolled back so a caller
    /// never observes a mutation that was not persisted.
    pub async fn update<R>(&self, mutate: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        let mut guard = self.data.lock().await;
        let snapshot = guard.clone();
        let out = mutate(&mut guard);

        if let Err(err) = persist(&self.path, &*guard).await {
            *guard = snapshot;
            return Err(err);
        }

        Ok(out)
    }
}

/// Write-to-temp-then-rename so a crash mid-write never truncates the
/// collection file.
async fn persist<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(StoreError::Encode)?;
    let tmp = path.with_extension("json.tmp");

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}
