//! The reconciliation layer.
//!
//! Provides a uniform read/write interface over the remote store and the
//! local fallback store, masking connectivity failures from the presentation
//! layer. Policy, stated precisely:
//!
//! 1. Never block indefinitely on the remote store: every remote call races
//!    a fixed timeout. The loser of the race is dropped, not cancelled; the
//!    operations are idempotent reads or idempotent-enough upserts.
//! 2. On a read, prefer remote data when both sources hold the same key, and
//!    never silently drop a local-only entry.
//! 3. Deduplicate strictly by the business key (the slug for invitations),
//!    never by internal id: a locally saved record carries a different
//!    internal id than its eventual remote counterpart.
//! 4. "Never provisioned" (missing endpoint or missing relation) is a
//!    distinct condition from "unreachable": the former surfaces a
//!    persistent setup prompt, the latter a dismissible advisory.
//!
//! Storage errors never cross this boundary as raw exceptions: callers get
//! outcome values carrying degraded/local-only flags and a human-readable
//! advisory. The two exceptions are authorization failures (blocking, never
//! recovered locally) and fallback write failures (terminal for that
//! operation).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{CustomTemplate, Invitation};

use crate::cache::DraftCache;
use crate::error::RemoteError;
use crate::fallback::{FallbackError, FallbackStore};
use crate::metrics::record_degraded_operation;

/// Default bounded wait for any single remote call.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;

/// An entity the reconciliation layer knows how to store in both sources.
pub trait Reconciled: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Fallback-store namespace; also names the draft kind cleared on a
    /// successful remote save.
    const KIND: &'static str;

    /// The unique business key used for merging, never the internal id.
    fn business_key(&self) -> String;

    fn owner_id(&self) -> Uuid;
}

impl Reconciled for Invitation {
    const KIND: &'static str = "invitation";

    fn business_key(&self) -> String {
        self.slug.clone()
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Reconciled for CustomTemplate {
    const KIND: &'static str = "template";

    // Templates have no slug; their id is client-assigned and preserved by
    // the remote upsert, so it serves as the business key.
    fn business_key(&self) -> String {
        self.id.to_string()
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Remote-store operations the reconciler needs for a reconciled collection.
#[async_trait]
pub trait RemoteCollection<T: Reconciled>: Send + Sync {
    /// Owner-scoped query of the full collection.
    async fn fetch_owned(&self, owner_id: Uuid) -> Result<Vec<T>, RemoteError>;

    /// Insert-or-update by business key. Re-applying the same entity must
    /// yield one logical record, not two.
    async fn upsert(&self, entity: &T) -> Result<T, RemoteError>;
}

/// Remote-only status transitions (admin records). No fallback is defined
/// for these; errors propagate to the caller unmodified.
#[async_trait]
pub trait RemoteStatus<S: Send + 'static>: Send + Sync {
    type Record: Send;

    async fn apply_status(
        &self,
        id: Uuid,
        status: S,
        actor_id: Uuid,
    ) -> Result<Self::Record, RemoteError>;
}

/// Non-blocking degradation notice attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum Advisory {
    /// Dismissible: the remote store errored or timed out and will be
    /// retried on the next operation.
    Transient(String),
    /// Persistent setup prompt: the remote store was never provisioned.
    NotProvisioned(String),
}

impl Advisory {
    fn from_remote_error(err: &RemoteError) -> Self {
        match err {
            RemoteError::NotProvisioned(_) => Advisory::NotProvisioned(err.to_string()),
            _ => Advisory::Transient(err.to_string()),
        }
    }

    fn unconfigured() -> Self {
        Advisory::NotProvisioned(
            RemoteError::NotProvisioned("no remote store endpoint configured".to_string())
                .to_string(),
        )
    }

    pub fn message(&self) -> &str {
        match self {
            Advisory::Transient(msg) | Advisory::NotProvisioned(msg) => msg,
        }
    }

    /// Persistent advisories stay until the backend is provisioned;
    /// transient ones are dismissible.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Advisory::NotProvisioned(_))
    }
}

/// Result of a reconciled read.
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    pub entities: Vec<T>,
    /// True when the remote store did not answer and only local data is
    /// being served.
    pub degraded: bool,
    pub advisory: Option<Advisory>,
}

/// Result of a reconciled write.
#[derive(Debug, Clone)]
pub struct SaveOutcome<T> {
    pub entity: T,
    /// True when the record is durable only in the local fallback store.
    pub local_only: bool,
    pub advisory: Option<Advisory>,
}

/// Errors the reconciliation layer cannot mask.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Authorization failure from the remote store. Blocking; local
    /// fallback would hide a row-level policy violation.
    #[error(transparent)]
    Denied(RemoteError),

    /// The local fallback store itself failed; there is nothing further to
    /// fall back to.
    #[error(transparent)]
    Fallback(#[from] FallbackError),
}

/// The reconciliation layer. Cheap to clone through the shared handles.
#[derive(Clone)]
pub struct Reconciler {
    fallback: FallbackStore,
    drafts: Arc<DraftCache>,
    remote_timeout: Duration,
}

impl Reconciler {
    pub fn new(fallback: FallbackStore, drafts: Arc<DraftCache>, remote_timeout: Duration) -> Self {
        Self {
            fallback,
            drafts,
            remote_timeout,
        }
    }

    pub fn fallback(&self) -> &FallbackStore {
        &self.fallback
    }

    /// Loads the owner's collection. The remote query races the bounded
    /// wait; the local fallback set is read synchronously either way. The
    /// merged result prefers remote entries on key collision and keeps
    /// local-only entries. A remote failure degrades, it never fails the
    /// read; the one exception is an authorization failure.
    ///
    /// Retrying after a degraded load is this same operation called again;
    /// there is no separate retry path.
    pub async fn load_collection<T, R>(
        &self,
        remote: Option<&R>,
        owner_id: Uuid,
    ) -> Result<LoadOutcome<T>, ReconcileError>
    where
        T: Reconciled,
        R: RemoteCollection<T> + ?Sized,
    {
        let local: Vec<T> = self.fallback.get_all(T::KIND, owner_id);

        let Some(remote) = remote else {
            record_degraded_operation("load");
            return Ok(LoadOutcome {
                entities: local,
                degraded: true,
                advisory: Some(Advisory::unconfigured()),
            });
        };

        match timeout(self.remote_timeout, remote.fetch_owned(owner_id)).await {
            Ok(Ok(remote_rows)) => Ok(LoadOutcome {
                entities: merge_by_key(remote_rows, local),
                degraded: false,
                advisory: None,
            }),
            Ok(Err(err @ RemoteError::Denied(_))) => Err(ReconcileError::Denied(err)),
            Ok(Err(err)) => {
                warn!(kind = T::KIND, owner_id = %owner_id, error = %err, "Remote load failed, serving local fallback");
                record_degraded_operation("load");
                Ok(LoadOutcome {
                    entities: local,
                    degraded: true,
                    advisory: Some(Advisory::from_remote_error(&err)),
                })
            }
            Err(_elapsed) => {
                let err = RemoteError::Timeout {
                    timeout_secs: self.remote_timeout.as_secs(),
                };
                warn!(kind = T::KIND, owner_id = %owner_id, "Remote load timed out, serving local fallback");
                record_degraded_operation("load");
                Ok(LoadOutcome {
                    entities: local,
                    degraded: true,
                    advisory: Some(Advisory::from_remote_error(&err)),
                })
            }
        }
    }

    /// Saves an entity, remote first. On remote success the stale fallback
    /// copy under the same business key is removed before this call
    /// resolves, so a subsequent load never observes both copies, and the
    /// owner's draft of this kind is cleared. On any recoverable remote
    /// failure the entity is persisted to the fallback store instead and the
    /// outcome carries `local_only`.
    pub async fn save_entity<T, R>(
        &self,
        remote: Option<&R>,
        entity: &T,
    ) -> Result<SaveOutcome<T>, ReconcileError>
    where
        T: Reconciled,
        R: RemoteCollection<T> + ?Sized,
    {
        let key = entity.business_key();

        let remote_result = match remote {
            Some(remote) => match timeout(self.remote_timeout, remote.upsert(entity)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(RemoteError::Timeout {
                    timeout_secs: self.remote_timeout.as_secs(),
                }),
            },
            None => Err(RemoteError::NotProvisioned(
                "no remote store endpoint configured".to_string(),
            )),
        };

        match remote_result {
            Ok(saved) => {
                // Drop the stale local copy before resolving; a failure here
                // is only logged, the record is already remotely durable and
                // the remote-wins merge masks the duplicate until the next
                // successful save.
                if let Err(e) = self.fallback.remove(T::KIND, &key) {
                    warn!(kind = T::KIND, key = %key, error = %e, "Failed to remove stale fallback copy");
                }
                self.drafts.delete(entity.owner_id(), T::KIND);
                Ok(SaveOutcome {
                    entity: saved,
                    local_only: false,
                    advisory: None,
                })
            }
            Err(err @ RemoteError::Denied(_)) => Err(ReconcileError::Denied(err)),
            Err(err) => {
                warn!(kind = T::KIND, key = %key, error = %err, "Remote save failed, persisting to local fallback");
                self.fallback.put(T::KIND, &key, entity.owner_id(), entity)?;
                record_degraded_operation("save");
                info!(kind = T::KIND, key = %key, "Entity saved to local fallback store");
                Ok(SaveOutcome {
                    entity: entity.clone(),
                    local_only: true,
                    advisory: Some(Advisory::from_remote_error(&err)),
                })
            }
        }
    }

    /// Applies a status transition on the remote store, recording the acting
    /// identity. Remote-only: no fallback is defined, and remote errors
    /// propagate to the caller unmodified (the bounded wait still applies).
    pub async fn update_status<S, R>(
        &self,
        remote: Option<&R>,
        id: Uuid,
        status: S,
        actor_id: Uuid,
    ) -> Result<R::Record, RemoteError>
    where
        S: Send + 'static,
        R: RemoteStatus<S> + ?Sized,
    {
        let Some(remote) = remote else {
            return Err(RemoteError::NotProvisioned(
                "no remote store endpoint configured".to_string(),
            ));
        };

        match timeout(self.remote_timeout, remote.apply_status(id, status, actor_id)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(RemoteError::Timeout {
                timeout_secs: self.remote_timeout.as_secs(),
            }),
        }
    }
}

/// Remote wins on key collision; local fills gaps. Order: remote entries
/// first (as returned), then surviving local entries.
fn merge_by_key<T: Reconciled>(remote: Vec<T>, local: Vec<T>) -> Vec<T> {
    let remote_keys: HashSet<String> = remote.iter().map(|e| e.business_key()).collect();
    let mut merged = remote;
    merged.extend(
        local
            .into_iter()
            .filter(|e| !remote_keys.contains(&e.business_key())),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use domain::models::invitation::{invitation_url, CreateInvitationRequest};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// How the fake remote store behaves for the next calls.
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Behavior {
        Healthy,
        Unreachable,
        MissingRelation,
        Denied,
        Hanging,
    }

    /// In-memory stand-in for the remote invitations collection. Upserts by
    /// slug and assigns its own internal ids, like the real store.
    struct MockRemote {
        rows: Mutex<Vec<Invitation>>,
        behavior: Mutex<Behavior>,
    }

    impl MockRemote {
        fn new(behavior: Behavior) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                behavior: Mutex::new(behavior),
            }
        }

        fn set_behavior(&self, behavior: Behavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        fn behavior(&self) -> Behavior {
            *self.behavior.lock().unwrap()
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn seed(&self, invitation: Invitation) {
            self.rows.lock().unwrap().push(invitation);
        }

        async fn gate(&self) -> Result<(), RemoteError> {
            match self.behavior() {
                Behavior::Healthy => Ok(()),
                Behavior::Unreachable => {
                    Err(RemoteError::Unavailable("connection refused".to_string()))
                }
                Behavior::MissingRelation => Err(RemoteError::NotProvisioned(
                    "relation missing: invitations".to_string(),
                )),
                Behavior::Denied => {
                    Err(RemoteError::Denied("row-level policy violation".to_string()))
                }
                Behavior::Hanging => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("hanging remote must lose the race");
                }
            }
        }
    }

    #[async_trait]
    impl RemoteCollection<Invitation> for MockRemote {
        async fn fetch_owned(&self, owner_id: Uuid) -> Result<Vec<Invitation>, RemoteError> {
            self.gate().await?;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn upsert(&self, entity: &Invitation) -> Result<Invitation, RemoteError> {
            self.gate().await?;
            let mut rows = self.rows.lock().unwrap();
            if let Some(existing) = rows.iter_mut().find(|r| r.slug == entity.slug) {
                let remote_id = existing.id;
                *existing = entity.clone();
                existing.id = remote_id;
                Ok(existing.clone())
            } else {
                let mut stored = entity.clone();
                stored.id = Uuid::new_v4();
                rows.push(stored.clone());
                Ok(stored)
            }
        }
    }

    fn invitation(owner_id: Uuid, slug: &str, venue: &str) -> Invitation {
        Invitation::from_request(
            owner_id,
            slug.to_string(),
            CreateInvitationRequest {
                bride_name: "Asal".to_string(),
                groom_name: "Jahon".to_string(),
                event_date: Utc::now() + ChronoDuration::days(60),
                venue_name: Some(venue.to_string()),
                venue_address: None,
                message: None,
                template_id: None,
                slug: None,
                settings: None,
            },
        )
    }

    fn reconciler(dir: &TempDir) -> Reconciler {
        Reconciler::new(
            FallbackStore::open(dir.path()).unwrap(),
            Arc::new(DraftCache::new()),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_remote_save_removes_stale_local_copy() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Unreachable);
        let owner = Uuid::new_v4();
        let entity = invitation(owner, "asal-jahon", "old venue");

        // First save lands locally
        let outcome = rec.save_entity(Some(&remote), &entity).await.unwrap();
        assert!(outcome.local_only);
        assert!(rec.fallback().contains("invitation", "asal-jahon"));

        // Remote recovers; saving again promotes the record and drops the
        // stale local copy before the call resolves
        remote.set_behavior(Behavior::Healthy);
        let outcome = rec.save_entity(Some(&remote), &entity).await.unwrap();
        assert!(!outcome.local_only);
        assert!(!rec.fallback().contains("invitation", "asal-jahon"));

        // A subsequent load sees exactly one copy
        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        assert!(!loaded.degraded);
        assert_eq!(loaded.entities.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_url_and_slug_stable() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Unreachable);
        let owner = Uuid::new_v4();
        let entity = invitation(owner, "asal-jahon", "Navruz");

        let outcome = rec.save_entity(Some(&remote), &entity).await.unwrap();
        assert!(outcome.local_only);

        // URL derivation depends only on the slug, so the local-only record
        // yields the same shareable URL the remote path would have
        assert_eq!(
            invitation_url("https://taklifnoma.uz", &outcome.entity.slug),
            "https://taklifnoma.uz/i/asal-jahon"
        );

        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        assert!(loaded.degraded);
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entities[0].slug, "asal-jahon");
    }

    #[tokio::test]
    async fn test_merge_prefers_remote_on_key_collision() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Healthy);
        let owner = Uuid::new_v4();

        remote.seed(invitation(owner, "asal-jahon", "remote venue"));
        rec.fallback()
            .put(
                "invitation",
                "asal-jahon",
                owner,
                &invitation(owner, "asal-jahon", "stale local venue"),
            )
            .unwrap();

        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(
            loaded.entities[0].venue_name.as_deref(),
            Some("remote venue")
        );
    }

    #[tokio::test]
    async fn test_merge_keeps_local_only_entries() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Healthy);
        let owner = Uuid::new_v4();

        remote.seed(invitation(owner, "asal-jahon", "remote venue"));
        rec.fallback()
            .put(
                "invitation",
                "nigora-botir",
                owner,
                &invitation(owner, "nigora-botir", "local venue"),
            )
            .unwrap();

        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        assert!(!loaded.degraded);

        let slugs: Vec<&str> = loaded.entities.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["asal-jahon", "nigora-botir"]);
    }

    #[tokio::test]
    async fn test_load_returns_within_timeout_bound() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Hanging);
        let owner = Uuid::new_v4();

        rec.fallback()
            .put(
                "invitation",
                "asal-jahon",
                owner,
                &invitation(owner, "asal-jahon", "Navruz"),
            )
            .unwrap();

        let start = std::time::Instant::now();
        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        // 100ms bound, generous margin for a loaded test machine
        assert!(start.elapsed() < Duration::from_secs(2));

        assert!(loaded.degraded);
        assert_eq!(loaded.entities.len(), 1);
        match loaded.advisory {
            Some(Advisory::Transient(ref msg)) => assert!(msg.contains("did not respond")),
            other => panic!("Expected transient timeout advisory, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_is_idempotent_by_slug() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Healthy);
        let owner = Uuid::new_v4();

        let entity = invitation(owner, "asal-jahon", "Navruz");
        rec.save_entity(Some(&remote), &entity).await.unwrap();
        rec.save_entity(Some(&remote), &entity).await.unwrap();

        assert_eq!(remote.row_count(), 1);
    }

    #[tokio::test]
    async fn test_degraded_scenario_local_only_owner() {
        // Owner "u1" has one locally stored invitation and the remote store
        // is unreachable: the load returns that one entry, degraded.
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Unreachable);
        let u1 = Uuid::new_v4();

        rec.fallback()
            .put(
                "invitation",
                "asal-jahon",
                u1,
                &invitation(u1, "asal-jahon", "Navruz"),
            )
            .unwrap();

        let loaded: LoadOutcome<Invitation> = rec.load_collection(Some(&remote), u1).await.unwrap();
        assert!(loaded.degraded);
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entities[0].slug, "asal-jahon");
        assert!(matches!(loaded.advisory, Some(Advisory::Transient(_))));
    }

    #[tokio::test]
    async fn test_missing_relation_surfaces_persistent_advisory() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::MissingRelation);
        let owner = Uuid::new_v4();

        let loaded: LoadOutcome<Invitation> =
            rec.load_collection(Some(&remote), owner).await.unwrap();
        assert!(loaded.degraded);
        let advisory = loaded.advisory.expect("advisory expected");
        assert!(advisory.is_persistent());
    }

    #[tokio::test]
    async fn test_unconfigured_remote_is_not_provisioned() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let owner = Uuid::new_v4();

        let loaded: LoadOutcome<Invitation> = rec
            .load_collection(None::<&MockRemote>, owner)
            .await
            .unwrap();
        assert!(loaded.degraded);
        assert!(loaded.advisory.unwrap().is_persistent());

        let outcome = rec
            .save_entity(None::<&MockRemote>, &invitation(owner, "asal-jahon", "Navruz"))
            .await
            .unwrap();
        assert!(outcome.local_only);
        assert!(outcome.advisory.unwrap().is_persistent());
    }

    #[tokio::test]
    async fn test_denied_save_is_blocking_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);
        let remote = MockRemote::new(Behavior::Denied);
        let owner = Uuid::new_v4();

        let result = rec
            .save_entity(Some(&remote), &invitation(owner, "asal-jahon", "Navruz"))
            .await;
        assert!(matches!(result, Err(ReconcileError::Denied(_))));
        assert!(!rec.fallback().contains("invitation", "asal-jahon"));
    }

    #[tokio::test]
    async fn test_successful_save_clears_draft() {
        let dir = TempDir::new().unwrap();
        let drafts = Arc::new(DraftCache::new());
        let rec = Reconciler::new(
            FallbackStore::open(dir.path()).unwrap(),
            drafts.clone(),
            Duration::from_millis(100),
        );
        let remote = MockRemote::new(Behavior::Healthy);
        let owner = Uuid::new_v4();

        drafts.set(owner, "invitation", &serde_json::json!({"wip": true}));
        rec.save_entity(Some(&remote), &invitation(owner, "asal-jahon", "Navruz"))
            .await
            .unwrap();
        assert!(drafts.get::<serde_json::Value>(owner, "invitation").is_none());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let dir = TempDir::new().unwrap();
        let drafts = Arc::new(DraftCache::new());
        let rec = Reconciler::new(
            FallbackStore::open(dir.path()).unwrap(),
            drafts.clone(),
            Duration::from_millis(100),
        );
        let remote = MockRemote::new(Behavior::Unreachable);
        let owner = Uuid::new_v4();

        drafts.set(owner, "invitation", &serde_json::json!({"wip": true}));
        rec.save_entity(Some(&remote), &invitation(owner, "asal-jahon", "Navruz"))
            .await
            .unwrap();
        assert!(drafts.get::<serde_json::Value>(owner, "invitation").is_some());
    }

    #[tokio::test]
    async fn test_update_status_requires_remote() {
        struct NoopStatus;

        #[async_trait]
        impl RemoteStatus<&'static str> for NoopStatus {
            type Record = ();

            async fn apply_status(
                &self,
                _id: Uuid,
                _status: &'static str,
                _actor_id: Uuid,
            ) -> Result<(), RemoteError> {
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let rec = reconciler(&dir);

        let err = rec
            .update_status(None::<&NoopStatus>, Uuid::new_v4(), "contacted", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_not_provisioned());

        rec.update_status(Some(&NoopStatus), Uuid::new_v4(), "contacted", Uuid::new_v4())
            .await
            .unwrap();
    }
}
