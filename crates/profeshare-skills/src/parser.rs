//! Skills parser: coerces any stored skills shape into a flat list.
//!
//! Text values go through a fallback chain:
//!
//! ```text
//! "[\"Python\",\"Linux\"]"          direct JSON      -> ["Python", "Linux"]
//! "\"[\\\"Python\\\"]\""              unwrap + unescape -> ["Python"]
//! "Python"                          not JSON          -> ["Python"]
//! ```
//!
//! Nothing in here returns an error. Bad input produces fewer skills, not a
//! failure.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{RawSkillsValue, SkillName};

/// Normalize a raw skills field into an ordered list of unique skill names.
///
/// Entries that are not strings, or are blank after trimming, are dropped.
/// Exact duplicates keep their first position.
pub fn parse(raw: &RawSkillsValue) -> Vec<SkillName> {
    let mut out = Collector::default();

    match raw {
        RawSkillsValue::Absent => {}
        RawSkillsValue::Sequence(items) => out.extend_values(items),
        RawSkillsValue::Mapping(map) => out.extend_mapping(map),
        RawSkillsValue::Text(text) => parse_text(text, &mut out),
    }

    debug!(kind = raw.kind(), count = out.names.len(), "parsed skills");
    out.names
}

fn parse_text(text: &str, out: &mut Collector) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }

    // 1. Direct JSON.
    let direct_scalar = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => return out.extend_values(&items),
        Ok(Value::Object(map)) => return out.extend_mapping(&map),
        Ok(Value::Null) => return,
        Ok(Value::String(inner)) => Some(inner),
        Ok(_) => None,
        Err(err) => {
            debug!(%err, "skills text is not plain JSON, retrying unescaped");
            None
        }
    };

    // 2. Peel one layer of quoting and escaping, then retry.
    let cleaned = unescape_quotes(strip_outer_quotes(trimmed));
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) => return out.extend_values(&items),
        Ok(Value::Object(map)) => return out.extend_mapping(&map),
        Ok(Value::String(inner)) if !inner.trim().is_empty() => return out.push(&inner),
        _ => {}
    }

    // 3. A JSON string whose content is not itself JSON.
    if let Some(inner) = direct_scalar {
        return out.push(&inner);
    }

    // 4. Literal skill name.
    debug!("skills text treated as a single literal skill");
    out.push(trimmed);
}

/// Drop one matching pair of surrounding double quotes, if present.
fn strip_outer_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn unescape_quotes(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// Order-preserving, duplicate-free accumulator of skill names.
#[derive(Default)]
struct Collector {
    names: Vec<SkillName>,
    seen: HashSet<String>,
}

impl Collector {
    fn push(&mut self, raw: &str) {
        let Some(name) = SkillName::new(raw) else {
            return;
        };
        if self.seen.insert(name.as_str().to_owned()) {
            self.names.push(name);
        }
    }

    fn extend_values(&mut self, items: &[Value]) {
        for item in items {
            if let Value::String(s) = item {
                self.push(s);
            }
        }
    }

    /// Flatten one level: list values contribute their entries, string
    /// values contribute themselves, anything else is skipped.
    fn extend_mapping(&mut self, map: &Map<String, Value>) {
        for value in map.values() {
            match value {
                Value::Array(items) => self.extend_values(items),
                Value::String(s) => self.push(s),
                _ => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(raw: RawSkillsValue) -> Vec<String> {
        parse(&raw).into_iter().map(SkillName::into_string).collect()
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        assert!(names(RawSkillsValue::Absent).is_empty());
        assert!(names(RawSkillsValue::from(Value::Null)).is_empty());
        assert!(names(RawSkillsValue::from("")).is_empty());
        assert!(names(RawSkillsValue::Sequence(vec![])).is_empty());
        assert!(names(RawSkillsValue::from("   ")).is_empty());
    }

    #[test]
    fn sequence_drops_blank_and_non_string_entries() {
        let raw = RawSkillsValue::from(json!(["Python", null, "Linux", "", 7, "  ", {"x": 1}]));
        assert_eq!(names(raw), vec!["Python", "Linux"]);
    }

    #[test]
    fn sequence_entries_are_trimmed() {
        let raw: RawSkillsValue = [" Rust ", "Go\n"].into_iter().collect();
        assert_eq!(names(raw), vec!["Rust", "Go"]);
    }

    #[test]
    fn json_array_string() {
        let raw = RawSkillsValue::from(r#"["Python","Linux","Networking"]"#);
        assert_eq!(names(raw), vec!["Python", "Linux", "Networking"]);
    }

    #[test]
    fn double_encoded_string() {
        let raw = RawSkillsValue::from(r#""[\"Python\",\"Linux\"]""#);
        assert_eq!(names(raw), vec!["Python", "Linux"]);
    }

    #[test]
    fn escaped_without_outer_quotes() {
        let raw = RawSkillsValue::from(r#"[\"Wireshark\",\"Nmap\"]"#);
        assert_eq!(names(raw), vec!["Wireshark", "Nmap"]);
    }

    #[test]
    fn bare_text_is_one_skill() {
        assert_eq!(names(RawSkillsValue::from("Python")), vec!["Python"]);
        assert_eq!(
            names(RawSkillsValue::from("  Penetration Testing  ")),
            vec!["Penetration Testing"]
        );
    }

    #[test]
    fn quoted_scalar_is_unwrapped() {
        assert_eq!(names(RawSkillsValue::from(r#""Docker""#)), vec!["Docker"]);
        assert!(names(RawSkillsValue::from(r#""""#)).is_empty());
    }

    #[test]
    fn json_null_text_is_empty() {
        assert!(names(RawSkillsValue::from("null")).is_empty());
    }

    #[test]
    fn numeric_text_falls_back_to_literal() {
        assert_eq!(names(RawSkillsValue::from("42")), vec!["42"]);
    }

    #[test]
    fn malformed_json_falls_back_to_literal() {
        assert_eq!(
            names(RawSkillsValue::from(r#"["Python", "Linux""#)),
            vec![r#"["Python", "Linux""#]
        );
    }

    #[test]
    fn mapping_flattens_in_key_order() {
        let raw = RawSkillsValue::from(json!({"languages": ["Python"], "tools": ["Git"]}));
        assert_eq!(names(raw), vec!["Python", "Git"]);
    }

    #[test]
    fn mapping_keeps_string_values_and_skips_others() {
        let raw = RawSkillsValue::from(json!({
            "tools": ["Git", "", null],
            "favourite": "Rust",
            "count": 3,
            "nested": [["deep"]]
        }));
        assert_eq!(names(raw), vec!["Git", "Rust"]);
    }

    #[test]
    fn json_object_text_is_flattened() {
        let raw = RawSkillsValue::from(r#"{"security": ["Nmap"], "os": ["Linux"]}"#);
        assert_eq!(names(raw), vec!["Nmap", "Linux"]);
    }

    #[test]
    fn exact_duplicates_keep_first_position() {
        let raw = RawSkillsValue::from(json!(["Linux", "Python", "Linux", " Python", "linux"]));
        assert_eq!(names(raw), vec!["Linux", "Python", "linux"]);
    }

    #[test]
    fn strip_outer_quotes_needs_both_ends() {
        assert_eq!(strip_outer_quotes(r#""abc""#), "abc");
        assert_eq!(strip_outer_quotes(r#""abc"#), r#""abc"#);
        assert_eq!(strip_outer_quotes(r#"""#), r#"""#);
    }
}
