use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User information supplied by the authentication layer for one request.
///
/// The engine never stores identities; every resolver call receives one by
/// reference together with the configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    id: Uuid,
    is_superuser: bool,
    groups: BTreeSet<String>,
    profile_name: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(
        id: Uuid,
        is_superuser: bool,
        groups: BTreeSet<String>,
        profile_name: Option<String>,
    ) -> Self {
        Self {
            id,
            is_superuser,
            groups,
            profile_name,
        }
    }

    /// Creates a superuser identity with no group or profile assignments.
    #[must_use]
    pub fn superuser(id: Uuid) -> Self {
        Self::new(id, true, BTreeSet::new(), None)
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns whether the user bypasses every authorization layer.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Returns the user's group names.
    #[must_use]
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Returns the assigned profile name, if any.
    #[must_use]
    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use uuid::Uuid;

    use super::UserIdentity;

    #[test]
    fn superuser_constructor_sets_flag() {
        let user = UserIdentity::superuser(Uuid::new_v4());
        assert!(user.is_superuser());
        assert!(user.groups().is_empty());
        assert!(user.profile_name().is_none());
    }

    #[test]
    fn groups_are_exposed_as_a_set() {
        let groups = BTreeSet::from(["cms".to_owned(), "sales".to_owned()]);
        let user = UserIdentity::new(Uuid::new_v4(), false, groups, Some("editor".to_owned()));
        assert!(user.groups().contains("cms"));
        assert_eq!(user.profile_name(), Some("editor"));
    }
}
