use std::collections::BTreeMap;

use trellis_core::UserIdentity;
use trellis_domain::{FieldRule, MetadataConfig};

/// Combined read/edit decision for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecision {
    readable: bool,
    editable: bool,
}

impl FieldDecision {
    /// Returns whether the field may be read.
    #[must_use]
    pub fn readable(&self) -> bool {
        self.readable
    }

    /// Returns whether the field may be edited.
    #[must_use]
    pub fn editable(&self) -> bool {
        self.editable
    }
}

/// Field-level permission state resolved for one (user, model) pair.
///
/// Three facts come out of the profile configuration:
/// - the explicit rules declared under the `"model."` prefix,
/// - whether the profile declares *any* field permissions at all, which
///   flips it into whitelist mode for every model it governs,
/// - whether `view_all_fields` grants implicit read access to unlisted
///   fields. That flag is read-only power and never grants edit access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessResolution {
    field_rules: BTreeMap<String, FieldRule>,
    has_whitelist: bool,
    view_all_fields: bool,
}

impl FieldAccessResolution {
    /// Resolves the field permission state for a user and model.
    ///
    /// Superusers, configurations without a `PROFILES` section, users
    /// without a profile and unknown profiles all resolve to the
    /// unrestricted state.
    #[must_use]
    pub fn resolve(config: &MetadataConfig, user: &UserIdentity, model_key: &str) -> Self {
        if user.is_superuser() {
            return Self::unrestricted();
        }

        if config.profiles().is_none() {
            return Self::unrestricted();
        }

        let Some(profile_name) = user.profile_name() else {
            return Self::unrestricted();
        };

        let Some(profile) = config.profile(profile_name) else {
            return Self::unrestricted();
        };

        let view_all_fields = profile
            .model_permissions()
            .get(model_key)
            .map(|perms| perms.view_all_fields())
            .unwrap_or(false);

        if profile.field_permissions().is_empty() {
            return Self {
                field_rules: BTreeMap::new(),
                has_whitelist: false,
                view_all_fields,
            };
        }

        // Any field_permissions entry at all switches the profile into
        // whitelist mode, even when none of the entries target this model.
        let prefix = format!("{model_key}.");
        let field_rules = profile
            .field_permissions()
            .iter()
            .filter_map(|(key, rule)| {
                key.strip_prefix(prefix.as_str())
                    .map(|field_name| (field_name.to_owned(), *rule))
            })
            .collect();

        Self {
            field_rules,
            has_whitelist: true,
            view_all_fields,
        }
    }

    fn unrestricted() -> Self {
        Self {
            field_rules: BTreeMap::new(),
            has_whitelist: false,
            view_all_fields: false,
        }
    }

    /// Returns the explicit rules declared for this model.
    #[must_use]
    pub fn field_rules(&self) -> &BTreeMap<String, FieldRule> {
        &self.field_rules
    }

    /// Returns whether the profile is in whitelist mode.
    #[must_use]
    pub fn has_whitelist(&self) -> bool {
        self.has_whitelist
    }

    /// Returns whether unlisted fields are implicitly readable.
    #[must_use]
    pub fn view_all_fields(&self) -> bool {
        self.view_all_fields
    }

    /// Returns whether the user may read the field.
    ///
    /// Precedence: explicit rule, then `view_all_fields`, then the closed
    /// whitelist world, then the unrestricted default.
    #[must_use]
    pub fn is_readable(&self, field_name: &str) -> bool {
        if let Some(rule) = self.field_rules.get(field_name) {
            return rule.readable();
        }

        if self.view_all_fields {
            return true;
        }

        if self.has_whitelist {
            return false;
        }

        true
    }

    /// Returns whether the user may edit the field.
    ///
    /// `view_all_fields` never grants edit access: a profile that relies on
    /// it sees unlisted fields read-only. Only an explicit rule can make a
    /// field editable once the profile restricts fields in any way.
    #[must_use]
    pub fn is_editable(&self, field_name: &str) -> bool {
        if let Some(rule) = self.field_rules.get(field_name) {
            return rule.editable();
        }

        if self.has_whitelist || self.view_all_fields {
            return false;
        }

        true
    }

    /// Returns the combined decision for one field.
    #[must_use]
    pub fn decision(&self, field_name: &str) -> FieldDecision {
        FieldDecision {
            readable: self.is_readable(field_name),
            editable: self.is_editable(field_name),
        }
    }
}
