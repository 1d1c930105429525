use std::sync::Arc;

use trellis_core::{AppResult, UserIdentity};
use trellis_domain::{CrudOperation, MetadataConfig};

use crate::NativePermissionPort;

/// Model-level authorization service combining three independent layers.
///
/// Access is granted when the native per-model flag, any group, or the
/// assigned profile grants it. Denial is always a plain `false`, never an
/// error, so callers can decide whether to surface it as "forbidden" or
/// "not found".
#[derive(Clone)]
pub struct PermissionAuthority {
    native_permissions: Arc<dyn NativePermissionPort>,
}

impl PermissionAuthority {
    /// Creates an authority backed by a native permission port.
    #[must_use]
    pub fn new(native_permissions: Arc<dyn NativePermissionPort>) -> Self {
        Self { native_permissions }
    }

    /// Authorizes one operation on one model for the user.
    ///
    /// Superusers short-circuit before the port is consulted, so the data
    /// layer is never queried on their behalf.
    pub async fn authorize(
        &self,
        user: &UserIdentity,
        model_key: &str,
        operation: CrudOperation,
        config: &MetadataConfig,
    ) -> AppResult<bool> {
        if user.is_superuser() {
            return Ok(true);
        }

        let native_granted = self
            .native_permissions
            .has_permission(user, model_key, operation)
            .await?;

        Ok(authorize_with_native(
            user,
            model_key,
            operation,
            native_granted,
            config,
        ))
    }
}

/// Pure OR-combination of the three layers given a resolved native flag.
#[must_use]
pub fn authorize_with_native(
    user: &UserIdentity,
    model_key: &str,
    operation: CrudOperation,
    native_granted: bool,
    config: &MetadataConfig,
) -> bool {
    if user.is_superuser() {
        return true;
    }

    native_granted
        || group_grants(user, model_key, config)
        || profile_grants(user, model_key, operation, config)
}

/// Returns whether any of the user's groups makes the model's app and tab
/// visible.
///
/// A model that cannot be located in the app/tab graph fails closed.
#[must_use]
pub fn group_grants(user: &UserIdentity, model_key: &str, config: &MetadataConfig) -> bool {
    let Some(groups) = config.groups() else {
        return false;
    };

    if user.groups().is_empty() {
        return false;
    }

    let Some((app_key, tab_key)) = find_app_and_tab_for_model(config, model_key) else {
        return false;
    };

    user.groups().iter().any(|group_name| {
        groups.get(group_name).is_some_and(|group| {
            let app_visible = group
                .app_visibilities()
                .get(app_key)
                .is_some_and(|visibility| visibility.visible());
            let tab_visible = group
                .tab_visibilities()
                .get(tab_key)
                .is_some_and(|visibility| visibility.is_visible());
            app_visible && tab_visible
        })
    })
}

/// Returns whether the user's profile grants the operation on the model.
///
/// Requires a profile to be assigned, configured, and to list the model in
/// its `model_permissions`; every missing link denies.
#[must_use]
pub fn profile_grants(
    user: &UserIdentity,
    model_key: &str,
    operation: CrudOperation,
    config: &MetadataConfig,
) -> bool {
    if config.profiles().is_none() {
        return false;
    }

    let Some(profile_name) = user.profile_name() else {
        return false;
    };

    let Some(profile) = config.profile(profile_name) else {
        return false;
    };

    profile
        .model_permissions()
        .get(model_key)
        .is_some_and(|permissions| permissions.allows(operation))
}

/// Locates the `(app, tab)` pair containing a model.
///
/// The key may name a custom tab or a model listed inside an app's tab
/// array; both resolve through the same lookup because tab and model keys
/// share one namespace.
fn find_app_and_tab_for_model<'a>(
    config: &'a MetadataConfig,
    model_key: &str,
) -> Option<(&'a str, &'a str)> {
    if !config.tabs().contains_key(model_key) && !config.models().contains_key(model_key) {
        return None;
    }

    config.apps().iter().find_map(|(app_key, app)| {
        app.tabs()
            .iter()
            .find(|tab| tab.as_str() == model_key)
            .map(|tab| (app_key.as_str(), tab.as_str()))
    })
}
