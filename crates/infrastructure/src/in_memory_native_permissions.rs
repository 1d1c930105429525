use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use trellis_application::NativePermissionPort;
use trellis_core::{AppResult, UserIdentity};
use trellis_domain::CrudOperation;
use uuid::Uuid;

/// In-memory native permission store.
///
/// Grants are keyed per user, model and operation, mirroring the shape a
/// database-backed permission table would expose.
#[derive(Debug, Default)]
pub struct InMemoryNativePermissions {
    grants: RwLock<HashSet<(Uuid, String, CrudOperation)>>,
}

impl InMemoryNativePermissions {
    /// Creates an empty permission store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashSet::new()),
        }
    }

    /// Grants one operation on one model to a user.
    pub async fn grant(&self, user_id: Uuid, model_key: &str, operation: CrudOperation) {
        self.grants
            .write()
            .await
            .insert((user_id, model_key.to_owned(), operation));
    }

    /// Revokes a previously granted permission; revoking an absent grant is
    /// a no-op.
    pub async fn revoke(&self, user_id: Uuid, model_key: &str, operation: CrudOperation) {
        self.grants
            .write()
            .await
            .remove(&(user_id, model_key.to_owned(), operation));
    }
}

#[async_trait]
impl NativePermissionPort for InMemoryNativePermissions {
    async fn has_permission(
        &self,
        user: &UserIdentity,
        model_key: &str,
        operation: CrudOperation,
    ) -> AppResult<bool> {
        let granted = self
            .grants
            .read()
            .await
            .contains(&(user.id(), model_key.to_owned(), operation));

        tracing::debug!(
            user_id = %user.id(),
            model = model_key,
            operation = operation.as_str(),
            granted,
            "native permission lookup"
        );

        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use trellis_application::NativePermissionPort;
    use trellis_core::UserIdentity;
    use trellis_domain::CrudOperation;
    use uuid::Uuid;

    use super::InMemoryNativePermissions;

    fn plain_user() -> UserIdentity {
        UserIdentity::new(Uuid::new_v4(), false, std::collections::BTreeSet::new(), None)
    }

    #[tokio::test]
    async fn grant_and_check() {
        let store = InMemoryNativePermissions::new();
        let user = plain_user();

        store.grant(user.id(), "post", CrudOperation::Read).await;

        let granted = store.has_permission(&user, "post", CrudOperation::Read).await;
        assert_eq!(granted.ok(), Some(true));

        let other_operation = store
            .has_permission(&user, "post", CrudOperation::Delete)
            .await;
        assert_eq!(other_operation.ok(), Some(false));

        let other_model = store
            .has_permission(&user, "account", CrudOperation::Read)
            .await;
        assert_eq!(other_model.ok(), Some(false));
    }

    #[tokio::test]
    async fn grants_do_not_leak_across_users() {
        let store = InMemoryNativePermissions::new();
        let granted_user = plain_user();
        let other_user = plain_user();

        store
            .grant(granted_user.id(), "post", CrudOperation::Edit)
            .await;

        let result = store
            .has_permission(&other_user, "post", CrudOperation::Edit)
            .await;
        assert_eq!(result.ok(), Some(false));
    }

    #[tokio::test]
    async fn revoke_removes_grant() {
        let store = InMemoryNativePermissions::new();
        let user = plain_user();

        store.grant(user.id(), "post", CrudOperation::Read).await;
        store.revoke(user.id(), "post", CrudOperation::Read).await;

        let result = store.has_permission(&user, "post", CrudOperation::Read).await;
        assert_eq!(result.ok(), Some(false));
    }
}
