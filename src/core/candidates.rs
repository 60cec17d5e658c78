use crate::core::matcher;
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

/// Immutable, cheaply cloneable list of suggestion candidates.
///
/// Clones share the same backing storage; nothing can mutate it after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    items: Arc<[String]>,
}

impl CandidateList {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Accepts only a sequence of strings. Anything else, including a
    /// sequence with a single non-string entry, becomes an empty list.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let serde_json::Value::Array(entries) = value else {
            warn!(kind = json_kind(value), "candidate source is not a list; using none");
            return Self::empty();
        };

        let mut items = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let Some(text) = entry.as_str() else {
                warn!(index = idx, "candidate entry is not a string; using none");
                return Self::empty();
            };
            items.push(text.to_string());
        }
        Self::new(items)
    }

    /// Same acceptance rules as [`CandidateList::from_json_value`].
    pub fn from_yaml_value(value: &serde_yaml::Value) -> Self {
        let serde_yaml::Value::Sequence(entries) = value else {
            if !value.is_null() {
                warn!("candidate source is not a list; using none");
            }
            return Self::empty();
        };

        let mut items = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let Some(text) = entry.as_str() else {
                warn!(index = idx, "candidate entry is not a string; using none");
                return Self::empty();
            };
            items.push(text.to_string());
        }
        Self::new(items)
    }

    pub fn filter(&self, query: &str) -> Vec<String> {
        matcher::filter(&self.items, query)
    }
}

impl Deref for CandidateList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl From<Vec<String>> for CandidateList {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<&[&str]> for CandidateList {
    fn from(items: &[&str]) -> Self {
        Self::new(items.iter().map(|item| item.to_string()).collect())
    }
}

impl FromIterator<String> for CandidateList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::CandidateList;
    use serde_json::json;

    #[test]
    fn json_string_array_is_accepted() {
        let list = CandidateList::from_json_value(&json!(["Canada", "Cuba"]));
        assert_eq!(&list[..], &["Canada".to_string(), "Cuba".to_string()]);
    }

    #[test]
    fn malformed_json_sources_become_empty() {
        assert!(CandidateList::from_json_value(&json!(null)).is_empty());
        assert!(CandidateList::from_json_value(&json!("Canada")).is_empty());
        assert!(CandidateList::from_json_value(&json!({"a": 1})).is_empty());
        assert!(CandidateList::from_json_value(&json!(["Canada", 3])).is_empty());
    }

    #[test]
    fn yaml_sources_follow_the_same_rules() {
        let ok: serde_yaml::Value = serde_yaml::from_str("- Canada\n- Cuba\n").expect("yaml");
        assert_eq!(CandidateList::from_yaml_value(&ok).len(), 2);

        let mapping: serde_yaml::Value = serde_yaml::from_str("a: b\n").expect("yaml");
        assert!(CandidateList::from_yaml_value(&mapping).is_empty());

        let mixed: serde_yaml::Value = serde_yaml::from_str("- Canada\n- [1, 2]\n").expect("yaml");
        assert!(CandidateList::from_yaml_value(&mixed).is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let list = CandidateList::from(&["Item 1", "Item 2"][..]);
        let copy = list.clone();
        assert_eq!(list.as_ptr(), copy.as_ptr());
        assert_eq!(copy.filter("2"), vec!["Item 2".to_string()]);
    }
}
