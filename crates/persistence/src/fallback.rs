//! Durable local fallback store.
//!
//! Plays the role browser localStorage plays for the web client: a namespaced
//! key-value store of serialized entity snapshots, used whenever the remote
//! store is unreachable or was never provisioned. One JSON file per record,
//! named `fb__{namespace}__{key}.json` under a configured directory; the
//! `fb__` prefix keeps scans from ever conflating fallback records with
//! anything else living in that directory.
//!
//! Contract: last-write-wins, no expiry, no transactions, single writer
//! assumed. A record that fails to parse is logged and skipped during reads;
//! a write failure is terminal for that operation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

const FILE_PREFIX: &str = "fb";
const FILE_EXT: &str = "json";

/// Error type for fallback store operations.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Failed to open fallback directory {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write fallback record {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize fallback record {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to remove fallback record {key}: {source}")]
    Remove {
        key: String,
        source: std::io::Error,
    },
}

/// Envelope stored with every snapshot so reads can filter by owner without
/// knowing the entity shape.
#[derive(Debug, Serialize, Deserialize)]
struct FallbackRecord<T> {
    owner_id: Uuid,
    saved_at: DateTime<Utc>,
    entity: T,
}

/// File-backed key-value store, keyed by namespace plus business key.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    root: PathBuf,
}

impl FallbackStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, FallbackError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| FallbackError::Open {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Persists a snapshot under `namespace` + `key`, replacing any previous
    /// record for the same key (last-write-wins).
    pub fn put<T: Serialize>(
        &self,
        namespace: &str,
        key: &str,
        owner_id: Uuid,
        entity: &T,
    ) -> Result<(), FallbackError> {
        let record = FallbackRecord {
            owner_id,
            saved_at: Utc::now(),
            entity,
        };
        let json = serde_json::to_vec_pretty(&record).map_err(|source| {
            FallbackError::Serialize {
                key: key.to_string(),
                source,
            }
        })?;

        fs::write(self.file_path(namespace, key), json).map_err(|source| FallbackError::Write {
            key: key.to_string(),
            source,
        })?;

        metrics::counter!("fallback_records_written_total").increment(1);
        Ok(())
    }

    /// Reads one record by key, regardless of owner. Parse failures are
    /// treated as absence (and logged), matching the tolerant-scan contract.
    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        let path = self.file_path(namespace, key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice::<FallbackRecord<T>>(&bytes) {
            Ok(record) => Some(record.entity),
            Err(e) => {
                warn!(key = %key, error = %e, "Skipping unparseable fallback record");
                None
            }
        }
    }

    /// Linear scan of all records in `namespace` belonging to `owner_id`.
    /// Entries that fail to parse are logged and skipped, never aborting the
    /// scan. A missing directory yields an empty set.
    pub fn get_all<T: DeserializeOwned>(&self, namespace: &str, owner_id: Uuid) -> Vec<T> {
        let prefix = format!("{}__{}__", FILE_PREFIX, namespace);

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "Fallback directory unreadable");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) {
                continue;
            }

            let bytes = match fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping unreadable fallback record");
                    continue;
                }
            };

            match serde_json::from_slice::<FallbackRecord<T>>(&bytes) {
                Ok(record) if record.owner_id == owner_id => results.push(record.entity),
                Ok(_) => {}
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping unparseable fallback record");
                }
            }
        }
        results
    }

    /// Removes the record for `namespace` + `key`. Removing an absent record
    /// is not an error.
    pub fn remove(&self, namespace: &str, key: &str) -> Result<(), FallbackError> {
        match fs::remove_file(self.file_path(namespace, key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FallbackError::Remove {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// True when a record exists for `namespace` + `key`.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.file_path(namespace, key).exists()
    }

    fn file_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(format!(
            "{}__{}__{}.{}",
            FILE_PREFIX,
            sanitize(namespace),
            sanitize(key),
            FILE_EXT
        ))
    }
}

/// Restricts file-name components to a safe alphabet. Keys are slugs or
/// uuids already; anything else is replaced, not rejected.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
