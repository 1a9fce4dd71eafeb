//! Raise flat index-suffixed keys into nested sub-records.
//!
//! Source exports flatten repeating sub-records into suffixed columns.
//! Raising reverses that encoding:
//!
//! ```text
//! Flat record                        Raised record
//! ┌───────────────────────────┐      ┌──────────────────────────────┐
//! │ modifier_1_name:  "a"     │      │ modifier: {                  │
//! │ modifier_1_price: 1.0     │  →   │   "1": { name: "a",          │
//! │ modifier_2_name:  "b"     │      │          price: 1.0 },       │
//! │ sku: "X-9"                │      │   "2": { name: "b" } }       │
//! └───────────────────────────┘      │ sku: "X-9"                   │
//!                                    └──────────────────────────────┘
//! ```
//!
//! Keys that do not match the grouping pattern pass through at the top
//! level. [`collapse_group`] then turns a group's index map into a plain
//! ordered list.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{TransformError, TransformResult};

/// A raised group: index string to ordered field map.
pub type GroupMap = IndexMap<String, IndexMap<String, Value>>;

/// One entry of a raised record: a passed-through value or a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    /// A key that matched no grouping pattern, copied verbatim.
    Scalar(Value),
    /// A sub-record group assembled from matching keys.
    Group(GroupMap),
}

/// A raised record: top-level key to scalar or group, in first-encounter
/// key order.
pub type RaisedRecord = IndexMap<String, Nested>;

/// A compiled grouping pattern.
///
/// The pattern must capture exactly three groups: group name, group
/// index, field name. Anything else is rejected at construction.
#[derive(Debug, Clone)]
pub struct GroupPattern {
    regex: Regex,
}

impl GroupPattern {
    /// Compile and validate a grouping pattern.
    pub fn new(pattern: &str) -> TransformResult<Self> {
        let regex = Regex::new(pattern)?;
        let found = regex.captures_len() - 1;
        if found != 3 {
            return Err(TransformError::PatternArity { found });
        }
        Ok(Self { regex })
    }

    /// Split a key into (group, index, field), if it matches.
    fn split<'k>(&self, key: &'k str) -> Option<(&'k str, &'k str, &'k str)> {
        let caps = self.regex.captures(key)?;
        match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(group), Some(index), Some(field)) => {
                Some((group.as_str(), index.as_str(), field.as_str()))
            }
            _ => None,
        }
    }
}

/// Raise a flat record's matching keys into groups, keeping group names
/// as captured.
pub fn raise_keys(record: &Map<String, Value>, pattern: &GroupPattern) -> TransformResult<RaisedRecord> {
    raise_keys_with(record, pattern, |group| group.to_string())
}

/// Raise a flat record's matching keys into groups, remapping group
/// names through `remap`.
///
/// Keys for the same group and index merge into one field map regardless
/// of where they sit in the record; the group takes the top-level
/// position of its first matching key. A plain key sharing a name with a
/// (remapped) group is rejected: the two write paths would target the
/// same slot, and silently letting one win hides a broken rule set.
pub fn raise_keys_with(
    record: &Map<String, Value>,
    pattern: &GroupPattern,
    remap: impl Fn(&str) -> String,
) -> TransformResult<RaisedRecord> {
    let mut raised: RaisedRecord = IndexMap::new();

    for (key, value) in record {
        match pattern.split(key) {
            Some((group, index, field)) => {
                let group = remap(group);
                trace!(%key, %group, %index, %field, "raised key");

                let slot = raised
                    .entry(group.clone())
                    .or_insert_with(|| Nested::Group(GroupMap::new()));
                match slot {
                    Nested::Group(map) => {
                        map.entry(index.to_string())
                            .or_insert_with(IndexMap::new)
                            .insert(field.to_string(), value.clone());
                    }
                    Nested::Scalar(_) => {
                        return Err(TransformError::GroupCollision { key: group });
                    }
                }
            }
            None => {
                trace!(%key, "key not raised, passing through");
                if matches!(raised.get(key.as_str()), Some(Nested::Group(_))) {
                    return Err(TransformError::GroupCollision { key: key.clone() });
                }
                raised.insert(key.clone(), Nested::Scalar(value.clone()));
            }
        }
    }

    Ok(raised)
}

/// Collapse a group's index map into an ordered list of field maps.
///
/// Indices sort as strings, not numbers: `"10"` comes before `"2"`. This
/// mirrors the upstream export tooling and is kept as documented
/// behavior; exports are not expected to carry more than nine entries
/// per group.
pub fn collapse_group(group: &GroupMap) -> Vec<Map<String, Value>> {
    let mut indices: Vec<&String> = group.keys().collect();
    indices.sort();

    indices
        .into_iter()
        .map(|index| {
            group[index]
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn pattern() -> GroupPattern {
        GroupPattern::new(r"^(modifier)_([0-9]+)_([a-zA-Z_]+)$").unwrap()
    }

    #[test]
    fn test_raise_basic() {
        let input = record(&[
            ("modifier_1_name", json!("a")),
            ("modifier_1_price", json!(1.0)),
            ("modifier_2_name", json!("b")),
            ("sku", json!("X-9")),
        ]);

        let raised = raise_keys(&input, &pattern()).unwrap();

        let Some(Nested::Group(group)) = raised.get("modifier") else {
            panic!("expected a modifier group");
        };
        assert_eq!(group["1"]["name"], json!("a"));
        assert_eq!(group["1"]["price"], json!(1.0));
        assert_eq!(group["2"]["name"], json!("b"));
        assert_eq!(raised.get("sku"), Some(&Nested::Scalar(json!("X-9"))));
    }

    #[test]
    fn test_remap_group_name() {
        let input = record(&[("modifier_1_name", json!("a"))]);
        let raised = raise_keys_with(&input, &pattern(), |g| format!("{g}s")).unwrap();

        assert!(raised.contains_key("modifiers"));
        assert!(!raised.contains_key("modifier"));
    }

    #[test]
    fn test_plain_keys_keep_relative_order() {
        let input = record(&[
            ("first", json!(1)),
            ("modifier_1_name", json!("a")),
            ("second", json!(2)),
            ("modifier_2_name", json!("b")),
            ("third", json!(3)),
        ]);

        let raised = raise_keys(&input, &pattern()).unwrap();
        let keys: Vec<&String> = raised.keys().collect();
        // The group sits at its first occurrence.
        assert_eq!(keys, vec!["first", "modifier", "second", "third"]);
    }

    #[test]
    fn test_same_index_merges_regardless_of_input_order() {
        let input = record(&[
            ("modifier_2_price", json!(2.0)),
            ("modifier_1_name", json!("a")),
            ("modifier_2_name", json!("b")),
        ]);

        let raised = raise_keys(&input, &pattern()).unwrap();
        let Some(Nested::Group(group)) = raised.get("modifier") else {
            panic!("expected a modifier group");
        };
        assert_eq!(group["2"]["price"], json!(2.0));
        assert_eq!(group["2"]["name"], json!("b"));
    }

    #[test]
    fn test_collapse_sorts_lexically() {
        let input = record(&[
            ("modifier_2_name", json!("two")),
            ("modifier_10_name", json!("ten")),
        ]);

        let raised = raise_keys(&input, &pattern()).unwrap();
        let Some(Nested::Group(group)) = raised.get("modifier") else {
            panic!("expected a modifier group");
        };

        // String ordering puts "10" before "2".
        let entries = collapse_group(group);
        assert_eq!(entries[0]["name"], json!("ten"));
        assert_eq!(entries[1]["name"], json!("two"));
    }

    #[test]
    fn test_raise_then_collapse_round_trips_order() {
        let input = record(&[
            ("modifier_1_name", json!("a")),
            ("modifier_2_name", json!("b")),
            ("modifier_3_name", json!("c")),
        ]);

        let raised = raise_keys(&input, &pattern()).unwrap();
        let Some(Nested::Group(group)) = raised.get("modifier") else {
            panic!("expected a modifier group");
        };

        let entries = collapse_group(group);
        let names: Vec<&Value> = entries.iter().map(|e| &e["name"]).collect();
        assert_eq!(names, vec![&json!("a"), &json!("b"), &json!("c")]);
    }

    #[test]
    fn test_plain_key_collides_with_group() {
        // Group raised first, plain key arrives later.
        let input = record(&[
            ("modifier_1_name", json!("a")),
            ("modifier", json!("oops")),
        ]);
        let result = raise_keys(&input, &pattern());
        assert!(matches!(
            result,
            Err(TransformError::GroupCollision { .. })
        ));

        // Plain key first, group write arrives later.
        let input = record(&[
            ("modifier", json!("oops")),
            ("modifier_1_name", json!("a")),
        ]);
        let result = raise_keys(&input, &pattern());
        assert!(matches!(
            result,
            Err(TransformError::GroupCollision { .. })
        ));
    }

    #[test]
    fn test_pattern_arity_enforced() {
        let result = GroupPattern::new(r"^(modifier)_([0-9]+)$");
        assert!(matches!(
            result,
            Err(TransformError::PatternArity { found: 2 })
        ));
    }

    #[test]
    fn test_no_matches_is_all_scalars() {
        let input = record(&[("a", json!(1)), ("b", json!(2))]);
        let raised = raise_keys(&input, &pattern()).unwrap();
        assert!(raised
            .values()
            .all(|nested| matches!(nested, Nested::Scalar(_))));
    }
}
