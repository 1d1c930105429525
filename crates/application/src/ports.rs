use async_trait::async_trait;
use serde_json::{Map, Value};
use trellis_core::{AppResult, UserIdentity};
use trellis_domain::CrudOperation;

/// Port for the data layer's native per-model permission flag.
///
/// This is the first of the three OR-combined authorization layers; the
/// other two (group visibility and profile CRUD) are evaluated from the
/// configuration snapshot without leaving the process.
#[async_trait]
pub trait NativePermissionPort: Send + Sync {
    /// Returns whether the data layer grants the user the native permission
    /// for the operation on the model.
    async fn has_permission(
        &self,
        user: &UserIdentity,
        model_key: &str,
        operation: CrudOperation,
    ) -> AppResult<bool>;
}

/// Port supplying the raw records a user may query for a model.
///
/// Implementations own whatever scoping applies (ownership, tenancy); the
/// engine only overlays field-level policy on what comes back.
#[async_trait]
pub trait DataAccessPort: Send + Sync {
    /// Returns the records visible to the user for the model.
    async fn query_for_user(
        &self,
        user: &UserIdentity,
        model_key: &str,
    ) -> AppResult<Vec<Map<String, Value>>>;

    /// Finds one record by id within the user's queryable set.
    async fn find_for_user(
        &self,
        user: &UserIdentity,
        model_key: &str,
        record_id: &str,
    ) -> AppResult<Option<Map<String, Value>>> {
        let records = self.query_for_user(user, model_key).await?;
        Ok(records.into_iter().find(|record| {
            record
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| id == record_id)
        }))
    }
}
