use crate::core::candidates::CandidateList;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_label() -> String {
    "Search".to_string()
}

fn default_placeholder() -> String {
    "Type to search...".to_string()
}

fn default_max_visible() -> usize {
    8
}

/// On-disk description of an autocomplete prompt.
///
/// `candidates` is kept as a raw value so a malformed list degrades to an
/// empty one instead of failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteConfig {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    #[serde(default)]
    candidates: serde_yaml::Value,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            placeholder: default_placeholder(),
            max_visible: default_max_visible(),
            candidates: serde_yaml::Value::Null,
        }
    }
}

impl AutocompleteConfig {
    /// Loads `.json` files with `serde_json`, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(raw).map_err(|err| err.to_string())
    }

    pub fn from_json_str(raw: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|err| err.to_string())?;
        let candidates = value
            .get("candidates")
            .map(CandidateList::from_json_value)
            .unwrap_or_default();

        let mut config: Self = serde_json::from_value(value).map_err(|err| err.to_string())?;
        config.candidates = serde_yaml::Value::Sequence(
            candidates
                .iter()
                .map(|item| serde_yaml::Value::String(item.clone()))
                .collect(),
        );
        Ok(config)
    }

    pub fn candidates(&self) -> CandidateList {
        CandidateList::from_yaml_value(&self.candidates)
    }

    pub fn with_candidates(mut self, candidates: &CandidateList) -> Self {
        self.candidates = serde_yaml::Value::Sequence(
            candidates
                .iter()
                .map(|item| serde_yaml::Value::String(item.clone()))
                .collect(),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::AutocompleteConfig;
    use crate::core::candidates::CandidateList;

    #[test]
    fn yaml_config_with_defaults() {
        let config = AutocompleteConfig::from_yaml_str("candidates:\n  - Canada\n  - Cuba\n")
            .expect("config");
        assert_eq!(config.label, "Search");
        assert_eq!(config.placeholder, "Type to search...");
        assert_eq!(config.max_visible, 8);
        assert_eq!(config.candidates().len(), 2);
    }

    #[test]
    fn malformed_candidates_degrade_to_empty() {
        let config = AutocompleteConfig::from_yaml_str("label: Country\ncandidates: nope\n")
            .expect("config");
        assert_eq!(config.label, "Country");
        assert!(config.candidates().is_empty());

        let config = AutocompleteConfig::from_yaml_str("candidates:\n  - Canada\n  - { a: 1 }\n")
            .expect("config");
        assert!(config.candidates().is_empty());

        let config = AutocompleteConfig::from_yaml_str("label: Country\n").expect("config");
        assert!(config.candidates().is_empty());
    }

    #[test]
    fn json_config_is_supported() {
        let config = AutocompleteConfig::from_json_str(
            r#"{"label": "Item", "max_visible": 3, "candidates": ["Item 1", "Item 2", "Item 3"]}"#,
        )
        .expect("config");
        assert_eq!(config.label, "Item");
        assert_eq!(config.max_visible, 3);
        assert_eq!(config.candidates()[2], "Item 3");

        let config = AutocompleteConfig::from_json_str(r#"{"candidates": [1, 2]}"#).expect("config");
        assert!(config.candidates().is_empty());
    }

    #[test]
    fn invalid_syntax_is_reported() {
        assert!(AutocompleteConfig::from_yaml_str("label: [unclosed").is_err());
        assert!(AutocompleteConfig::from_json_str("{").is_err());
    }

    #[test]
    fn explicit_candidates_replace_configured_ones() {
        let config = AutocompleteConfig::default()
            .with_candidates(&CandidateList::from(&["Peru"][..]));
        assert_eq!(&config.candidates()[..], &["Peru".to_string()]);
    }
}
