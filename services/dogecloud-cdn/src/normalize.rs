// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Turn the free-form `urls` input into a clean list.
//!
//! Two layouts are accepted:
//!
//! ```text
//! ["https://a.com/x", "/y"]
//! ```
//!
//! or any mix of lines, comma separated values and markdown bullets:
//!
//! ```text
//! /a, /b
//! - "/c"
//! `/d`
//! ```

use std::collections::HashSet;

use log::debug;
use serde_json::{Number, Value};

/// Normalize raw `urls` input into a deduplicated list in first-seen order.
///
/// Empty or whitespace-only input yields an empty list. A value that looks
/// like a JSON array but fails to parse is read line by line instead.
pub fn normalize_urls(raw: &str) -> Vec<String> {
    let s = raw.trim();
    if s.is_empty() {
        return Vec::new();
    }

    let tokens = match parse_json_array(s) {
        Some(tokens) => tokens,
        None => split_lines(s),
    };

    let mut seen = HashSet::new();
    tokens
        .iter()
        .map(|t| clean_token(t))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

/// Returns `None` if `s` is not a JSON array.
fn parse_json_array(s: &str) -> Option<Vec<String>> {
    if !(s.starts_with('[') && s.ends_with(']')) {
        return None;
    }

    match serde_json::from_str::<Vec<Value>>(s) {
        Ok(values) => Some(values.iter().map(value_to_string).collect()),
        Err(err) => {
            debug!("urls input is not a valid json array, reading it line by line: {err}");
            None
        }
    }
}

/// Render an array item the way a JavaScript `String(x)` does.
fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Null | Value::Bool(_) => v.to_string(),
    }
}

/// Integral floats print without a fraction, `1e3` is `1000`.
fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn split_lines(s: &str) -> Vec<String> {
    s.split('\n')
        .filter(|line| !line.is_empty())
        .flat_map(|line| {
            let line = line.trim();
            if line.contains(',') && !line.starts_with('-') {
                line.split(',').map(str::to_string).collect::<Vec<_>>()
            } else {
                vec![line.to_string()]
            }
        })
        .collect()
}

/// Strip a leading bullet and one layer of each quoting style.
fn clean_token(t: &str) -> &str {
    let mut t = t.trim();
    if t.starts_with('-') {
        t = t.trim_start_matches('-').trim_start();
    }
    for quote in ['`', '"', '\''] {
        t = t.strip_prefix(quote).unwrap_or(t);
        t = t.strip_suffix(quote).unwrap_or(t);
    }
    t.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\n\n\t\n"; "blank lines")]
    #[test_case("[]"; "empty array")]
    #[test_case("- \n ``\n\"\""; "only decorations")]
    fn test_normalize_empty(input: &str) {
        assert!(normalize_urls(input).is_empty());
    }

    #[test]
    fn test_normalize_mixed_lines() {
        assert_eq!(
            normalize_urls("a, b\n- \"c\"\n`d`\n"),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_normalize_json_array_dedup() {
        assert_eq!(normalize_urls(r#"["x", "x", "y"]"#), vec!["x", "y"]);
    }

    #[test]
    fn test_normalize_json_array_cleans_items() {
        assert_eq!(
            normalize_urls(r#"[" - /a ", "`/b`", "'/c'", "", "/a"]"#),
            vec!["/a", "/b", "/c"]
        );
    }

    #[test]
    fn test_normalize_json_array_coerces_values() {
        assert_eq!(
            normalize_urls(r#"["/a", 1, true, null]"#),
            vec!["/a", "1", "true", "null"]
        );
    }

    #[test_case(r#"[["/a", "/b"]]"#, "/a,/b"; "nested array joins")]
    #[test_case(r#"[["/a", null, ["/b"]]]"#, "/a,,/b"; "nested null is empty")]
    #[test_case("[1e3]", "1000"; "integral float")]
    #[test_case("[1.5]", "1.5"; "fraction")]
    #[test_case("[-7]", "-7"; "negative integer")]
    #[test_case(r#"[{"url": "/a"}]"#, "[object Object]"; "object")]
    #[test_case("[false]", "false"; "bool")]
    fn test_normalize_json_value_to_string(input: &str, expected: &str) {
        assert_eq!(normalize_urls(input), vec![expected]);
    }

    #[test]
    fn test_normalize_malformed_array_falls_back() {
        // Starts with `[` and ends with `]` but is not json.
        assert_eq!(normalize_urls("[/a, /b]"), vec!["[/a", "/b]"]);
    }

    #[test]
    fn test_normalize_bullet_keeps_commas() {
        assert_eq!(
            normalize_urls("- https://a.com/x,y\n-- /b"),
            vec!["https://a.com/x,y", "/b"]
        );
    }

    #[test]
    fn test_normalize_windows_line_endings() {
        assert_eq!(
            normalize_urls("https://a.com/1\r\nhttps://a.com/2\r\n"),
            vec!["https://a.com/1", "https://a.com/2"]
        );
    }

    #[test]
    fn test_normalize_preserves_first_seen_order() {
        assert_eq!(
            normalize_urls("/c\n/a\n/c,/b\n/a"),
            vec!["/c", "/a", "/b"]
        );
    }
}
