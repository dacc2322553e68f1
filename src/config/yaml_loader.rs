//! YAML configuration file reading.
//!
//! The file is a mapping from clone URL to an options mapping (or null).
//! Entries are returned in file order; interpretation of each entry is left
//! to [`PlanBuilder`](super::plan::PlanBuilder).
use serde_yaml::Value;
use std::path::Path;

use crate::error::ConfigError;

/// One top-level entry of the config file, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// The mapping key; a usable entry has a string clone URL here.
    pub key: Value,
    /// The options value: usually a mapping, `Null` for all defaults.
    pub options: Value,
}

impl RawEntry {
    /// The clone URL, if the key is a string.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.key.as_str()
    }
}

/// Read and parse the config file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or its
/// top level is not a mapping.
pub fn load_entries(path: &Path) -> Result<Vec<RawEntry>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_entries(&content, path)
}

/// Parse config file contents; `path` is only used in error messages.
///
/// # Errors
///
/// Returns an error if `content` is not valid YAML or its top level is not a
/// mapping. An empty document yields no entries.
pub fn parse_entries(content: &str, path: &Path) -> Result<Vec<RawEntry>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(map) => Ok(map
            .into_iter()
            .map(|(key, options)| RawEntry { key, options })
            .collect()),
        _ => Err(ConfigError::NotAMapping {
            path: path.display().to_string(),
        }),
    }
}

/// Render a YAML value for warnings and error messages.
///
/// Scalars print bare; sequences and mappings print as compact JSON.
#[must_use]
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}")),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<RawEntry>, ConfigError> {
        parse_entries(content, Path::new("clone-repos.yaml"))
    }

    #[test]
    fn entries_keep_file_order() {
        let entries = parse(
            "https://github.com/b/zeta:\nhttps://github.com/a/alpha:\n  pip: install\nhttps://github.com/c/mid:\n",
        )
        .unwrap();
        let urls: Vec<&str> = entries.iter().filter_map(RawEntry::url).collect();
        assert_eq!(
            urls,
            [
                "https://github.com/b/zeta",
                "https://github.com/a/alpha",
                "https://github.com/c/mid"
            ]
        );
        assert!(entries[0].options.is_null());
        assert!(entries[1].options.is_mapping());
    }

    #[test]
    fn empty_document_has_no_entries() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn top_level_list_is_rejected() {
        let err = parse("- https://github.com/a/b\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let err = parse("key: [unclosed\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn non_string_key_has_no_url() {
        let entries = parse("42:\n  pip: install\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].url().is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entries(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn describe_scalars_and_collections() {
        assert_eq!(describe_value(&Value::Null), "null");
        assert_eq!(describe_value(&Value::from("git pull")), "git pull");
        assert_eq!(describe_value(&Value::from(3)), "3");
        let seq: Value = serde_yaml::from_str("[git pull, 3]").unwrap();
        assert_eq!(describe_value(&seq), r#"["git pull",3]"#);
    }
}
