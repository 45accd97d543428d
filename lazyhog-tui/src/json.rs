//! Line layout of JSON payloads with per-container folding.
//!
//! Containers are addressed by path: `$` for the root, `$.key` for object
//! members, `$.key[0]` for array elements. A folded container collapses to
//! one placeholder line: `{a, b, c}` for objects, `[N items]` for arrays.

use serde_json::Value;
use std::collections::HashMap;

const INDENT: &str = "  ";

/// Lexical class of a rendered fragment. Only affects styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Key,
    String,
    Number,
    Bool,
    Null,
    Punct,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSpan {
    pub text: String,
    pub class: TokenClass,
}

impl JsonSpan {
    fn new(text: impl Into<String>, class: TokenClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// One display line. `path` is set on lines that open a container, which
/// are the lines a fold toggle can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLine {
    pub depth: usize,
    pub spans: Vec<JsonSpan>,
    pub path: Option<String>,
    pub folded: bool,
}

impl JsonLine {
    /// Plain text including indentation.
    pub fn text(&self) -> String {
        let mut text = INDENT.repeat(self.depth);
        for span in &self.spans {
            text.push_str(&span.text);
        }
        text
    }
}

/// Fold preferences for the current payload.
///
/// `all_folded` is the default for every container; `overrides` holds
/// per-path exceptions. Folding everything stashes the overrides so that
/// unfolding restores exactly the previous layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldState {
    all_folded: bool,
    overrides: HashMap<String, bool>,
    stash: HashMap<String, bool>,
}

impl FoldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_folded(&self) -> bool {
        self.all_folded
    }

    pub fn is_folded(&self, path: &str) -> bool {
        self.overrides.get(path).copied().unwrap_or(self.all_folded)
    }

    pub fn toggle(&mut self, path: &str) {
        let folded = self.is_folded(path);
        self.overrides.insert(path.to_string(), !folded);
    }

    pub fn toggle_all(&mut self) {
        if self.all_folded {
            self.all_folded = false;
            self.overrides = std::mem::take(&mut self.stash);
        } else {
            self.all_folded = true;
            self.stash = std::mem::take(&mut self.overrides);
        }
    }

    /// Forget per-path choices; the fold-all preference survives.
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
        self.stash.clear();
    }
}

/// Lay out `value` as indented lines honoring `folds`.
pub fn layout(value: &Value, folds: &FoldState) -> Vec<JsonLine> {
    let mut lines = Vec::new();
    emit(value, None, "$".to_string(), 0, false, folds, &mut lines);
    lines
}

/// Placeholder text shown for a folded container.
pub fn placeholder(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("{{{}}}", keys.join(", "))
        }
        Value::Array(items) if items.len() == 1 => "[1 item]".to_string(),
        Value::Array(items) => format!("[{} items]", items.len()),
        other => other.to_string(),
    }
}

fn emit(
    value: &Value,
    key: Option<&str>,
    path: String,
    depth: usize,
    comma: bool,
    folds: &FoldState,
    out: &mut Vec<JsonLine>,
) {
    let mut spans = Vec::new();
    if let Some(key) = key {
        spans.push(JsonSpan::new(quoted(key), TokenClass::Key));
        spans.push(JsonSpan::new(": ", TokenClass::Punct));
    }

    let is_container = match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    };

    if !is_container {
        spans.push(scalar(value));
        push_comma(&mut spans, comma);
        out.push(JsonLine {
            depth,
            spans,
            path: None,
            folded: false,
        });
        return;
    }

    if folds.is_folded(&path) {
        spans.push(JsonSpan::new(placeholder(value), TokenClass::Placeholder));
        push_comma(&mut spans, comma);
        out.push(JsonLine {
            depth,
            spans,
            path: Some(path),
            folded: true,
        });
        return;
    }

    let (open, close) = match value {
        Value::Array(_) => ("[", "]"),
        _ => ("{", "}"),
    };
    spans.push(JsonSpan::new(open, TokenClass::Punct));
    out.push(JsonLine {
        depth,
        spans,
        path: Some(path.clone()),
        folded: false,
    });

    match value {
        Value::Object(map) => {
            let last = map.len().saturating_sub(1);
            for (index, (child_key, child)) in map.iter().enumerate() {
                let child_path = format!("{path}.{child_key}");
                emit(
                    child,
                    Some(child_key),
                    child_path,
                    depth + 1,
                    index < last,
                    folds,
                    out,
                );
            }
        }
        Value::Array(items) => {
            let last = items.len().saturating_sub(1);
            for (index, child) in items.iter().enumerate() {
                let child_path = format!("{path}[{index}]");
                emit(child, None, child_path, depth + 1, index < last, folds, out);
            }
        }
        _ => {}
    }

    let mut closing = vec![JsonSpan::new(close, TokenClass::Punct)];
    push_comma(&mut closing, comma);
    out.push(JsonLine {
        depth,
        spans: closing,
        path: None,
        folded: false,
    });
}

fn scalar(value: &Value) -> JsonSpan {
    match value {
        Value::String(s) => JsonSpan::new(quoted(s), TokenClass::String),
        Value::Number(n) => JsonSpan::new(n.to_string(), TokenClass::Number),
        Value::Bool(b) => JsonSpan::new(b.to_string(), TokenClass::Bool),
        Value::Null => JsonSpan::new("null", TokenClass::Null),
        Value::Object(_) => JsonSpan::new("{}", TokenClass::Punct),
        Value::Array(_) => JsonSpan::new("[]", TokenClass::Punct),
    }
}

fn push_comma(spans: &mut Vec<JsonSpan>, comma: bool) {
    if comma {
        spans.push(JsonSpan::new(",", TokenClass::Punct));
    }
}

fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(lines: &[JsonLine]) -> Vec<String> {
        lines.iter().map(JsonLine::text).collect()
    }

    #[test]
    fn test_layout_matches_pretty_print() {
        let value = json!({"event": "click", "props": {"x": 1, "tags": ["a", "b"]}, "ok": true});
        let lines = layout(&value, &FoldState::new());
        let pretty = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(texts(&lines).join("\n"), pretty);
    }

    #[test]
    fn test_fold_all_collapses_root_to_key_list() {
        let value = json!({"a": 1, "b": "two", "c": {"d": null}});
        let mut folds = FoldState::new();
        folds.toggle_all();
        let lines = layout(&value, &folds);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "{a, b, c}");
        assert!(lines[0].folded);
        assert_eq!(lines[0].spans[0].class, TokenClass::Placeholder);
    }

    #[test]
    fn test_fold_all_round_trip_restores_layout() {
        let value = json!({"a": {"b": [1, 2, 3]}, "c": [{"d": 1}]});
        let mut folds = FoldState::new();
        folds.toggle("$.a.b");
        let before = layout(&value, &folds);

        folds.toggle_all();
        assert_ne!(layout(&value, &folds), before);
        folds.toggle_all();
        assert_eq!(layout(&value, &folds), before);
    }

    #[test]
    fn test_toggle_single_array() {
        let value = json!({"n": 1, "tags": ["a", "b", "c"]});
        let mut folds = FoldState::new();
        folds.toggle("$.tags");
        let lines = texts(&layout(&value, &folds));
        assert_eq!(lines, vec!["{", "  \"n\": 1,", "  \"tags\": [3 items]", "}"]);
    }

    #[test]
    fn test_unfold_child_under_fold_all() {
        let value = json!({"a": {"x": 1}, "b": 2});
        let mut folds = FoldState::new();
        folds.toggle_all();
        folds.toggle("$");
        let lines = texts(&layout(&value, &folds));
        assert_eq!(lines, vec!["{", "  \"a\": {x},", "  \"b\": 2", "}"]);
    }

    #[test]
    fn test_empty_containers_are_leaves() {
        let value = json!({"a": {}, "b": []});
        let lines = layout(&value, &FoldState::new());
        assert_eq!(texts(&lines), vec!["{", "  \"a\": {},", "  \"b\": []", "}"]);
        assert!(lines[1].path.is_none());
    }

    #[test]
    fn test_container_lines_carry_paths() {
        let value = json!({"list": [{"k": 1}]});
        let lines = layout(&value, &FoldState::new());
        let paths: Vec<_> = lines.iter().filter_map(|l| l.path.clone()).collect();
        assert_eq!(paths, vec!["$", "$.list", "$.list[0]"]);
    }

    #[test]
    fn test_scalar_classes() {
        let value = json!(["s", 1.5, false, null]);
        let lines = layout(&value, &FoldState::new());
        let classes: Vec<_> = lines[1..5].iter().map(|l| l.spans[0].class).collect();
        assert_eq!(
            classes,
            vec![
                TokenClass::String,
                TokenClass::Number,
                TokenClass::Bool,
                TokenClass::Null
            ]
        );
    }

    #[test]
    fn test_placeholder_singular_item() {
        assert_eq!(placeholder(&json!([1])), "[1 item]");
        assert_eq!(placeholder(&json!([])), "[0 items]");
    }

    #[test]
    fn test_clear_overrides_keeps_fold_all() {
        let mut folds = FoldState::new();
        folds.toggle_all();
        folds.toggle("$");
        folds.clear_overrides();
        assert!(folds.all_folded());
        assert!(folds.is_folded("$"));
    }
}
