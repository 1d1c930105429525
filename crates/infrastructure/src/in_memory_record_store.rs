use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use trellis_application::DataAccessPort;
use trellis_core::{AppResult, UserIdentity};

/// In-memory record store with per-owner scoping.
///
/// A record carrying an `owner` field is visible only to that user;
/// records without one are shared. Superusers see everything. Field-level
/// policy is not applied here; the engine overlays it on whatever this
/// store returns.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Vec<Map<String, Value>>>>,
}

impl InMemoryRecordStore {
    /// Creates an empty record store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a record under a model key.
    pub async fn insert(&self, model_key: &str, record: Map<String, Value>) {
        self.records
            .write()
            .await
            .entry(model_key.to_owned())
            .or_default()
            .push(record);
    }

    fn visible_to(record: &Map<String, Value>, user: &UserIdentity) -> bool {
        if user.is_superuser() {
            return true;
        }

        match record.get("owner").and_then(Value::as_str) {
            Some(owner) => owner == user.id().to_string(),
            None => true,
        }
    }
}

#[async_trait]
impl DataAccessPort for InMemoryRecordStore {
    async fn query_for_user(
        &self,
        user: &UserIdentity,
        model_key: &str,
    ) -> AppResult<Vec<Map<String, Value>>> {
        let records = self.records.read().await;
        let visible: Vec<Map<String, Value>> = records
            .get(model_key)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|record| Self::visible_to(record, user))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            user_id = %user.id(),
            model = model_key,
            count = visible.len(),
            "record query"
        );

        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;
    use trellis_application::DataAccessPort;
    use trellis_core::UserIdentity;
    use uuid::Uuid;

    use super::InMemoryRecordStore;

    fn record(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn plain_user() -> UserIdentity {
        UserIdentity::new(Uuid::new_v4(), false, BTreeSet::new(), None)
    }

    #[tokio::test]
    async fn owned_records_are_scoped_to_their_owner() {
        let store = InMemoryRecordStore::new();
        let owner = plain_user();
        let stranger = plain_user();

        store
            .insert(
                "post",
                record(json!({"id": "1", "owner": owner.id().to_string(), "title": "Mine"})),
            )
            .await;
        store
            .insert("post", record(json!({"id": "2", "title": "Shared"})))
            .await;

        let owned = store.query_for_user(&owner, "post").await;
        assert_eq!(owned.map(|records| records.len()).ok(), Some(2));

        let visible = store.query_for_user(&stranger, "post").await;
        let visible = visible.unwrap_or_default();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].get("id"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn superuser_sees_owned_records() {
        let store = InMemoryRecordStore::new();
        let owner = plain_user();

        store
            .insert(
                "post",
                record(json!({"id": "1", "owner": owner.id().to_string()})),
            )
            .await;

        let visible = store
            .query_for_user(&UserIdentity::superuser(Uuid::new_v4()), "post")
            .await;
        assert_eq!(visible.map(|records| records.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn find_for_user_respects_scoping() {
        let store = InMemoryRecordStore::new();
        let owner = plain_user();
        let stranger = plain_user();

        store
            .insert(
                "post",
                record(json!({"id": "1", "owner": owner.id().to_string()})),
            )
            .await;

        let found = store.find_for_user(&owner, "post", "1").await;
        assert!(found.is_ok_and(|found| found.is_some()));

        let hidden = store.find_for_user(&stranger, "post", "1").await;
        assert!(hidden.is_ok_and(|hidden| hidden.is_none()));
    }

    #[tokio::test]
    async fn unknown_model_yields_no_records() {
        let store = InMemoryRecordStore::new();
        let listed = store.query_for_user(&plain_user(), "ghost").await;
        assert_eq!(listed.map(|records| records.len()).ok(), Some(0));
    }
}
