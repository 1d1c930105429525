use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_core::{AppError, AppResult, NonEmptyString};

/// Navigation entry for one top-level app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    label: NonEmptyString,
    icon: NonEmptyString,
    tabs: Vec<String>,
}

impl AppEntry {
    /// Creates a validated app entry.
    pub fn new(
        label: impl Into<String>,
        icon: impl Into<String>,
        tabs: Vec<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            label: NonEmptyString::new(label)?,
            icon: NonEmptyString::new(icon)?,
            tabs,
        })
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> &NonEmptyString {
        &self.icon
    }

    /// Returns the ordered tab keys declared for this app.
    #[must_use]
    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    /// Returns a copy of this entry with the tab list replaced.
    ///
    /// Filtering always builds a fresh entry so callers never alias the
    /// configuration they started from.
    #[must_use]
    pub fn with_tabs(&self, tabs: Vec<String>) -> Self {
        Self {
            label: self.label.clone(),
            icon: self.icon.clone(),
            tabs,
        }
    }
}

/// Display metadata for one data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    label: NonEmptyString,
    plural_label: NonEmptyString,
    icon: NonEmptyString,
}

impl ModelEntry {
    /// Creates a validated model entry.
    pub fn new(
        label: impl Into<String>,
        plural_label: impl Into<String>,
        icon: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            label: NonEmptyString::new(label)?,
            plural_label: NonEmptyString::new(plural_label)?,
            icon: NonEmptyString::new(icon)?,
        })
    }

    /// Returns the singular display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the plural display label.
    #[must_use]
    pub fn plural_label(&self) -> &NonEmptyString {
        &self.plural_label
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> &NonEmptyString {
        &self.icon
    }
}

/// Display metadata for one custom navigation tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    label: NonEmptyString,
    url_name: NonEmptyString,
    icon: NonEmptyString,
}

impl TabEntry {
    /// Creates a validated tab entry.
    pub fn new(
        label: impl Into<String>,
        url_name: impl Into<String>,
        icon: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            label: NonEmptyString::new(label)?,
            url_name: NonEmptyString::new(url_name)?,
            icon: NonEmptyString::new(icon)?,
        })
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the route name the tab links to.
    #[must_use]
    pub fn url_name(&self) -> &NonEmptyString {
        &self.url_name
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> &NonEmptyString {
        &self.icon
    }
}

/// Visibility flag for one app inside a group or profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVisibility {
    #[serde(default)]
    visible: bool,
}

impl AppVisibility {
    /// Creates an app visibility flag.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    /// Returns whether the app is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }
}

/// Visibility state for one tab inside a group or profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabVisibilityState {
    /// Tab is shown.
    Visible,
    /// Tab is hidden. Absence of an entry means the same thing.
    #[default]
    Hidden,
}

/// Visibility entry for one tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabVisibility {
    #[serde(default)]
    visibility: TabVisibilityState,
}

impl TabVisibility {
    /// Creates a visible tab entry.
    #[must_use]
    pub fn visible() -> Self {
        Self {
            visibility: TabVisibilityState::Visible,
        }
    }

    /// Creates a hidden tab entry.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visibility: TabVisibilityState::Hidden,
        }
    }

    /// Returns whether the tab is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == TabVisibilityState::Visible
    }
}

/// Group-scoped app and tab visibility map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default)]
    app_visibilities: BTreeMap<String, AppVisibility>,
    #[serde(default)]
    tab_visibilities: BTreeMap<String, TabVisibility>,
}

impl GroupConfig {
    /// Creates a group configuration from explicit visibility maps.
    #[must_use]
    pub fn new(
        app_visibilities: BTreeMap<String, AppVisibility>,
        tab_visibilities: BTreeMap<String, TabVisibility>,
    ) -> Self {
        Self {
            app_visibilities,
            tab_visibilities,
        }
    }

    /// Returns the per-app visibility entries.
    #[must_use]
    pub fn app_visibilities(&self) -> &BTreeMap<String, AppVisibility> {
        &self.app_visibilities
    }

    /// Returns the per-tab visibility entries.
    #[must_use]
    pub fn tab_visibilities(&self) -> &BTreeMap<String, TabVisibility> {
        &self.tab_visibilities
    }
}

/// CRUD and read-all flags for one model within a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPermissions {
    #[serde(default)]
    allow_create: bool,
    #[serde(default)]
    allow_read: bool,
    #[serde(default)]
    allow_edit: bool,
    #[serde(default)]
    allow_delete: bool,
    #[serde(default)]
    view_all_fields: bool,
}

impl ModelPermissions {
    /// Creates a model permission entry.
    #[must_use]
    pub fn new(
        allow_create: bool,
        allow_read: bool,
        allow_edit: bool,
        allow_delete: bool,
        view_all_fields: bool,
    ) -> Self {
        Self {
            allow_create,
            allow_read,
            allow_edit,
            allow_delete,
            view_all_fields,
        }
    }

    /// Returns whether the profile allows the given operation on this model.
    #[must_use]
    pub fn allows(&self, operation: crate::CrudOperation) -> bool {
        match operation {
            crate::CrudOperation::Create => self.allow_create,
            crate::CrudOperation::Read => self.allow_read,
            crate::CrudOperation::Edit => self.allow_edit,
            crate::CrudOperation::Delete => self.allow_delete,
        }
    }

    /// Returns whether unlisted fields are implicitly readable.
    ///
    /// This flag is read-only power: it never grants edit access.
    #[must_use]
    pub fn view_all_fields(&self) -> bool {
        self.view_all_fields
    }
}

fn default_true() -> bool {
    true
}

/// Explicit read/edit rule for one `"model.field"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(default = "default_true")]
    readable: bool,
    #[serde(default = "default_true")]
    editable: bool,
}

impl FieldRule {
    /// Creates an explicit field rule.
    #[must_use]
    pub fn new(readable: bool, editable: bool) -> Self {
        Self { readable, editable }
    }

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

impl Default for FieldRule {
    fn default() -> Self {
        Self {
            readable: true,
            editable: true,
        }
    }
}

/// Profile-scoped visibility, CRUD and field-level configuration.
///
/// The visibility maps are `Option` on purpose: a profile that declares
/// neither map leaves navigation untouched, which is different from a profile
/// declaring empty maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_visibilities: Option<BTreeMap<String, AppVisibility>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tab_visibilities: Option<BTreeMap<String, TabVisibility>>,
    #[serde(default)]
    model_permissions: BTreeMap<String, ModelPermissions>,
    #[serde(default)]
    field_permissions: BTreeMap<String, FieldRule>,
}

impl ProfileConfig {
    /// Creates a profile configuration.
    #[must_use]
    pub fn new(
        app_visibilities: Option<BTreeMap<String, AppVisibility>>,
        tab_visibilities: Option<BTreeMap<String, TabVisibility>>,
        model_permissions: BTreeMap<String, ModelPermissions>,
        field_permissions: BTreeMap<String, FieldRule>,
    ) -> Self {
        Self {
            app_visibilities,
            tab_visibilities,
            model_permissions,
            field_permissions,
        }
    }

    /// Returns the per-app visibility entries, when declared.
    #[must_use]
    pub fn app_visibilities(&self) -> Option<&BTreeMap<String, AppVisibility>> {
        self.app_visibilities.as_ref()
    }

    /// Returns the per-tab visibility entries, when declared.
    #[must_use]
    pub fn tab_visibilities(&self) -> Option<&BTreeMap<String, TabVisibility>> {
        self.tab_visibilities.as_ref()
    }

    /// Returns the per-model CRUD permission entries.
    #[must_use]
    pub fn model_permissions(&self) -> &BTreeMap<String, ModelPermissions> {
        &self.model_permissions
    }

    /// Returns the `"model.field"`-keyed explicit field rules.
    #[must_use]
    pub fn field_permissions(&self) -> &BTreeMap<String, FieldRule> {
        &self.field_permissions
    }

    /// Returns whether the profile declares any navigation visibility at all.
    #[must_use]
    pub fn has_visibility_config(&self) -> bool {
        self.app_visibilities.is_some() || self.tab_visibilities.is_some()
    }
}

/// Immutable authorization and navigation configuration snapshot.
///
/// Loaded once at process start and shared read-only afterwards; every
/// filtering operation returns a structural copy. `GROUPS` and `PROFILES`
/// stay `Option` because an absent section is a defined fallback state that
/// differs from an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(rename = "APPS", default)]
    apps: BTreeMap<String, AppEntry>,
    #[serde(rename = "MODELS", default)]
    models: BTreeMap<String, ModelEntry>,
    #[serde(rename = "TABS", default)]
    tabs: BTreeMap<String, TabEntry>,
    #[serde(rename = "GROUPS", default, skip_serializing_if = "Option::is_none")]
    groups: Option<BTreeMap<String, GroupConfig>>,
    #[serde(rename = "PROFILES", default, skip_serializing_if = "Option::is_none")]
    profiles: Option<BTreeMap<String, ProfileConfig>>,
}

impl MetadataConfig {
    /// Creates a validated configuration snapshot.
    pub fn new(
        apps: BTreeMap<String, AppEntry>,
        models: BTreeMap<String, ModelEntry>,
        tabs: BTreeMap<String, TabEntry>,
        groups: Option<BTreeMap<String, GroupConfig>>,
        profiles: Option<BTreeMap<String, ProfileConfig>>,
    ) -> AppResult<Self> {
        let config = Self {
            apps,
            models,
            tabs,
            groups,
            profiles,
        };
        config.validate()?;
        Ok(config)
    }

    /// Deserializes and validates a configuration snapshot from JSON.
    pub fn from_value(value: Value) -> AppResult<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|error| AppError::Validation(format!("malformed configuration: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        for (app_key, app) in &self.apps {
            for tab_key in app.tabs() {
                if !self.tabs.contains_key(tab_key) && !self.models.contains_key(tab_key) {
                    return Err(AppError::Validation(format!(
                        "app '{app_key}' references tab '{tab_key}' that exists in neither TABS nor MODELS"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the app entries.
    #[must_use]
    pub fn apps(&self) -> &BTreeMap<String, AppEntry> {
        &self.apps
    }

    /// Returns the model entries.
    #[must_use]
    pub fn models(&self) -> &BTreeMap<String, ModelEntry> {
        &self.models
    }

    /// Returns the custom tab entries.
    #[must_use]
    pub fn tabs(&self) -> &BTreeMap<String, TabEntry> {
        &self.tabs
    }

    /// Returns the group section, when the configuration declares one.
    #[must_use]
    pub fn groups(&self) -> Option<&BTreeMap<String, GroupConfig>> {
        self.groups.as_ref()
    }

    /// Returns the profile section, when the configuration declares one.
    #[must_use]
    pub fn profiles(&self) -> Option<&BTreeMap<String, ProfileConfig>> {
        self.profiles.as_ref()
    }

    /// Looks up one profile by name.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.as_ref().and_then(|profiles| profiles.get(name))
    }

    /// Returns a copy of this configuration with only the app map replaced.
    ///
    /// Every section is structurally copied; the result shares nothing
    /// mutable with `self`, so concurrent callers filtering the same
    /// snapshot never observe each other's results.
    #[must_use]
    pub fn with_apps(&self, apps: BTreeMap<String, AppEntry>) -> Self {
        Self {
            apps,
            models: self.models.clone(),
            tabs: self.tabs.clone(),
            groups: self.groups.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FieldRule, MetadataConfig, ModelPermissions};
    use crate::CrudOperation;

    fn sample_value() -> serde_json::Value {
        json!({
            "APPS": {
                "cms": {"label": "CMS", "icon": "FileText", "tabs": ["post", "asset"]}
            },
            "MODELS": {
                "post": {"label": "Post", "plural_label": "Posts", "icon": "FileText"},
                "asset": {"label": "Asset", "plural_label": "Assets", "icon": "FolderOpen"}
            },
            "TABS": {
                "tools": {"label": "Tools", "url_name": "tools", "icon": "Wrench"}
            },
            "GROUPS": {
                "cms": {
                    "app_visibilities": {"cms": {"visible": true}},
                    "tab_visibilities": {"post": {"visibility": "visible"}}
                }
            }
        })
    }

    #[test]
    fn parses_wire_shape() {
        let config = MetadataConfig::from_value(sample_value());
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.apps().len(), 1);
        assert!(config.groups().is_some());
        assert!(config.profiles().is_none());
    }

    #[test]
    fn rejects_app_referencing_unknown_tab() {
        let value = json!({
            "APPS": {"cms": {"label": "CMS", "icon": "FileText", "tabs": ["missing"]}},
            "MODELS": {},
            "TABS": {}
        });
        let config = MetadataConfig::from_value(value);
        assert!(config.is_err());
    }

    #[test]
    fn rejects_structurally_malformed_document() {
        let value = json!({"APPS": {"cms": {"label": "CMS", "icon": "FileText", "tabs": "post"}}});
        let config = MetadataConfig::from_value(value);
        assert!(config.is_err());
    }

    #[test]
    fn with_apps_does_not_touch_source() {
        let config =
            MetadataConfig::from_value(sample_value()).unwrap_or_else(|_| unreachable!());
        let before = config.clone();
        let _filtered = config.with_apps(std::collections::BTreeMap::new());
        assert_eq!(config, before);
    }

    #[test]
    fn field_rule_defaults_to_fully_open() {
        let rule: FieldRule =
            serde_json::from_value(json!({})).unwrap_or_else(|_| unreachable!());
        assert!(rule.readable());
        assert!(rule.editable());
    }

    #[test]
    fn model_permissions_map_to_operations() {
        let perms = ModelPermissions::new(false, true, false, false, false);
        assert!(perms.allows(CrudOperation::Read));
        assert!(!perms.allows(CrudOperation::Create));
        assert!(!perms.allows(CrudOperation::Edit));
        assert!(!perms.allows(CrudOperation::Delete));
    }

    #[test]
    fn unspecified_model_permission_flags_default_to_false() {
        let perms: ModelPermissions =
            serde_json::from_value(json!({"allow_read": true})).unwrap_or_else(|_| unreachable!());
        assert!(perms.allows(CrudOperation::Read));
        assert!(!perms.allows(CrudOperation::Delete));
        assert!(!perms.view_all_fields());
    }
}
