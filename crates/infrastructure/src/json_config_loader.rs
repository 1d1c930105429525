use std::path::Path;

use trellis_core::{AppError, AppResult};
use trellis_domain::MetadataConfig;

/// Loads and validates a configuration snapshot from a JSON file.
///
/// Intended for process start: any problem with the file is returned as a
/// validation error and should abort startup rather than fall back to an
/// empty configuration, because an empty `GROUPS` or `PROFILES` section has
/// defined semantics of its own.
pub fn load_config_file(path: &Path) -> AppResult<MetadataConfig> {
    let raw = std::fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!(
            "cannot read configuration file '{}': {error}",
            path.display()
        ))
    })?;

    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|error| {
        AppError::Validation(format!(
            "configuration file '{}' is not valid JSON: {error}",
            path.display()
        ))
    })?;

    let config = MetadataConfig::from_value(value)?;
    tracing::info!(
        path = %path.display(),
        apps = config.apps().len(),
        models = config.models().len(),
        has_groups = config.groups().is_some(),
        has_profiles = config.profiles().is_some(),
        "loaded metadata configuration"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::load_config_file;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("trellis-config-{}.json", uuid::Uuid::new_v4()));
        let mut file =
            std::fs::File::create(&path).unwrap_or_else(|_| unreachable!());
        file.write_all(contents.as_bytes())
            .unwrap_or_else(|_| unreachable!());
        path
    }

    #[test]
    fn loads_valid_configuration() {
        let path = write_temp(
            r#"{
                "APPS": {"cms": {"label": "CMS", "icon": "FileText", "tabs": ["post"]}},
                "MODELS": {"post": {"label": "Post", "plural_label": "Posts", "icon": "FileText"}},
                "TABS": {}
            }"#,
        );

        let config = load_config_file(&path);
        let _cleanup = std::fs::remove_file(&path);
        assert!(config.is_ok_and(|config| config.apps().len() == 1));
    }

    #[test]
    fn rejects_missing_file() {
        let path = std::path::PathBuf::from("/nonexistent/trellis.json");
        assert!(load_config_file(&path).is_err());
    }

    #[test]
    fn rejects_invalid_json() {
        let path = write_temp("{not json");
        let config = load_config_file(&path);
        let _cleanup = std::fs::remove_file(&path);
        assert!(config.is_err());
    }

    #[test]
    fn rejects_semantically_invalid_configuration() {
        let path = write_temp(
            r#"{
                "APPS": {"cms": {"label": "CMS", "icon": "FileText", "tabs": ["ghost"]}},
                "MODELS": {},
                "TABS": {}
            }"#,
        );

        let config = load_config_file(&path);
        let _cleanup = std::fs::remove_file(&path);
        assert!(config.is_err());
    }
}
