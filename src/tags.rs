//! Tags are stored as a single text column holding a JSON array. Clients may
//! send them either as a real array or as a string, which is read as JSON
//! first and as a comma-separated list otherwise.

use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    pub fn normalize(self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => tags,
            TagsInput::Text(text) => {
                parse_json_array(&text).unwrap_or_else(|| split_commas(&text))
            }
        }
    }
}

/// Returns `None` unless `text` is a JSON array. Non-string elements are kept
/// as their JSON text.
fn parse_json_array(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

pub fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn encode(tags: &[String]) -> String {
    Value::from(tags.to_vec()).to_string()
}

/// Best-effort read of the stored column; rows written by older clients may
/// hold a bare comma-joined list instead of JSON.
pub fn decode(stored: Option<&str>) -> Vec<String> {
    match stored {
        None | Some("") => vec![],
        Some(text) => {
            parse_json_array(text).unwrap_or_else(|| split_commas(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_is_used_directly() {
        let input: TagsInput =
            serde_json::from_str(r#"["a", " b "]"#).expect("tags");
        assert_eq!(input.normalize(), strings(&["a", " b "]));
    }

    #[test]
    fn test_comma_string() {
        let input: TagsInput = serde_json::from_str(r#""a, b ,c""#).expect("tags");
        assert_eq!(input, TagsInput::Text("a, b ,c".into()));
        assert_eq!(input.normalize(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_json_array_inside_string() {
        let input = TagsInput::Text(r#"["x","y", 3]"#.into());
        assert_eq!(input.normalize(), strings(&["x", "y", "3"]));
    }

    #[test]
    fn test_json_scalar_inside_string_falls_back_to_commas() {
        assert_eq!(TagsInput::Text("42".into()).normalize(), strings(&["42"]));
        assert_eq!(
            TagsInput::Text(r#""quoted""#.into()).normalize(),
            strings(&[r#""quoted""#])
        );
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        assert_eq!(split_commas(" , a,, ,b ,"), strings(&["a", "b"]));
        assert!(split_commas("").is_empty());
    }

    #[test]
    fn test_decode() {
        assert!(decode(None).is_empty());
        assert!(decode(Some("")).is_empty());
        assert!(decode(Some("[]")).is_empty());
        assert_eq!(decode(Some(r#"["a","b"]"#)), strings(&["a", "b"]));
        assert_eq!(decode(Some("work, home")), strings(&["work", "home"]));
        let tags = strings(&["with, comma", "quote\""]);
        assert_eq!(decode(Some(&encode(&tags))), tags);
    }
}
