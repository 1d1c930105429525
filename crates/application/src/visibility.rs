use std::collections::{BTreeMap, BTreeSet};

use trellis_core::UserIdentity;
use trellis_domain::{AppEntry, MetadataConfig};

/// Filters the app map to what the user's groups make visible.
///
/// Visibility is the union across every group the user belongs to. An app
/// survives only when it is visible itself and keeps at least one visible
/// tab; an app with zero surviving tabs is indistinguishable from an
/// invisible one and is dropped.
///
/// Absence of the `GROUPS` section means the group layer is switched off and
/// the configuration passes through untouched. A present `GROUPS` section
/// combined with a groupless user yields an empty app map instead.
#[must_use]
pub fn filter_by_groups(config: &MetadataConfig, user: &UserIdentity) -> MetadataConfig {
    let Some(groups) = config.groups() else {
        return config.clone();
    };

    if user.is_superuser() {
        return config.clone();
    }

    if user.groups().is_empty() {
        return config.with_apps(BTreeMap::new());
    }

    let mut visible_apps: BTreeSet<&str> = BTreeSet::new();
    let mut visible_tabs: BTreeSet<&str> = BTreeSet::new();

    for group_name in user.groups() {
        let Some(group) = groups.get(group_name) else {
            continue;
        };

        for (app_key, visibility) in group.app_visibilities() {
            if visibility.visible() {
                visible_apps.insert(app_key.as_str());
            }
        }

        for (tab_key, visibility) in group.tab_visibilities() {
            if visibility.is_visible() {
                visible_tabs.insert(tab_key.as_str());
            }
        }
    }

    filter_apps_by_visibility(config, &visible_apps, &visible_tabs)
}

/// Filters the app map to what the user's profile makes visible.
///
/// Same algorithm as [`filter_by_groups`] sourced from a single profile, but
/// with the opposite default: whenever no usable profile configuration
/// exists (no `PROFILES` section, no assigned profile, unknown profile, or a
/// profile without visibility maps) the configuration passes through
/// untouched. The group layer denies by default in the matching situation;
/// this asymmetry is deliberate and mirrors the behavior the configuration
/// format was born with, so it must not be unified.
#[must_use]
pub fn filter_by_profile(config: &MetadataConfig, user: &UserIdentity) -> MetadataConfig {
    if config.profiles().is_none() {
        return config.clone();
    }

    if user.is_superuser() {
        return config.clone();
    }

    let Some(profile_name) = user.profile_name() else {
        return config.clone();
    };

    let Some(profile) = config.profile(profile_name) else {
        return config.clone();
    };

    if !profile.has_visibility_config() {
        return config.clone();
    }

    let mut visible_apps: BTreeSet<&str> = BTreeSet::new();
    let mut visible_tabs: BTreeSet<&str> = BTreeSet::new();

    if let Some(app_visibilities) = profile.app_visibilities() {
        for (app_key, visibility) in app_visibilities {
            if visibility.visible() {
                visible_apps.insert(app_key.as_str());
            }
        }
    }

    if let Some(tab_visibilities) = profile.tab_visibilities() {
        for (tab_key, visibility) in tab_visibilities {
            if visibility.is_visible() {
                visible_tabs.insert(tab_key.as_str());
            }
        }
    }

    filter_apps_by_visibility(config, &visible_apps, &visible_tabs)
}

/// Merges two visibility-filtered views with OR semantics.
///
/// An app or tab visible through either the group layer or the profile layer
/// is kept. The result is rebuilt from `original`, so the final tab lists
/// never exceed what the original declared and neither input is consulted
/// for entry contents.
#[must_use]
pub fn merge_filtered(
    group_filtered: &MetadataConfig,
    profile_filtered: &MetadataConfig,
    original: &MetadataConfig,
) -> MetadataConfig {
    let mut visible_apps: BTreeSet<&str> = BTreeSet::new();
    let mut visible_tabs: BTreeSet<&str> = BTreeSet::new();

    for filtered in [group_filtered, profile_filtered] {
        for (app_key, app) in filtered.apps() {
            visible_apps.insert(app_key.as_str());
            for tab in app.tabs() {
                visible_tabs.insert(tab.as_str());
            }
        }
    }

    filter_apps_by_visibility(original, &visible_apps, &visible_tabs)
}

/// Rebuilds the app map keeping only visible apps with visible tabs.
fn filter_apps_by_visibility(
    config: &MetadataConfig,
    visible_apps: &BTreeSet<&str>,
    visible_tabs: &BTreeSet<&str>,
) -> MetadataConfig {
    let mut filtered_apps: BTreeMap<String, AppEntry> = BTreeMap::new();

    for (app_key, app) in config.apps() {
        if !visible_apps.contains(app_key.as_str()) {
            continue;
        }

        let filtered_tabs: Vec<String> = app
            .tabs()
            .iter()
            .filter(|tab| visible_tabs.contains(tab.as_str()))
            .cloned()
            .collect();

        if filtered_tabs.is_empty() {
            continue;
        }

        filtered_apps.insert(app_key.clone(), app.with_tabs(filtered_tabs));
    }

    config.with_apps(filtered_apps)
}
