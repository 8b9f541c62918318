//! Ephemeral draft cache.
//!
//! Holds resumable in-progress state (an unfinished template configuration,
//! an unsaved builder form) keyed by user and kind. Lives for the process
//! lifetime only and is explicitly cleared when the corresponding entity is
//! saved to the remote store. Deliberately separate from the durable
//! fallback store: drafts are not fallback records and must never appear in
//! a reconciliation merge.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// In-memory draft storage. `get`/`set`/`delete`, no TTL.
#[derive(Debug, Default)]
pub struct DraftCache {
    entries: DashMap<String, serde_json::Value>,
}

impl DraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a draft for `user_id` + `kind`, replacing any previous one.
    /// Values that fail to serialize are dropped silently; drafts are best
    /// effort by contract.
    pub fn set<T: Serialize>(&self, user_id: Uuid, kind: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.entries.insert(Self::key(user_id, kind), json);
        }
    }

    pub fn get<T: DeserializeOwned>(&self, user_id: Uuid, kind: &str) -> Option<T> {
        self.entries
            .get(&Self::key(user_id, kind))
            .and_then(|entry| serde_json::from_value(entry.value().clone()).ok())
    }

    pub fn delete(&self, user_id: Uuid, kind: &str) {
        self.entries.remove(&Self::key(user_id, kind));
    }

    fn key(user_id: Uuid, kind: &str) -> String {
        format!("{}:{}", user_id, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let cache = DraftCache::new();
        let user = Uuid::new_v4();

        cache.set(user, "template", &serde_json::json!({"name": "draft"}));
        let draft: serde_json::Value = cache.get(user, "template").unwrap();
        assert_eq!(draft["name"], "draft");

        cache.delete(user, "template");
        assert!(cache.get::<serde_json::Value>(user, "template").is_none());
    }

    #[test]
    fn test_keys_are_scoped_per_user_and_kind() {
        let cache = DraftCache::new();
        let asal = Uuid::new_v4();
        let nigora = Uuid::new_v4();

        cache.set(asal, "template", &1u32);
        cache.set(asal, "invitation", &2u32);
        cache.set(nigora, "template", &3u32);

        assert_eq!(cache.get::<u32>(asal, "template"), Some(1));
        assert_eq!(cache.get::<u32>(asal, "invitation"), Some(2));
        assert_eq!(cache.get::<u32>(nigora, "template"), Some(3));
    }

    #[test]
    fn test_set_replaces() {
        let cache = DraftCache::new();
        let user = Uuid::new_v4();

        cache.set(user, "template", &"first");
        cache.set(user, "template", &"second");
        assert_eq!(cache.get::<String>(user, "template").as_deref(), Some("second"));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let cache = DraftCache::new();
        cache.delete(Uuid::new_v4(), "template");
    }
}
