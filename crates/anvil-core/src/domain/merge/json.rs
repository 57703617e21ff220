//! Structured-data merger.
//!
//! Objects are merged recursively; any other collision is won by the
//! incoming side, arrays included. TypeScript project files get two extra
//! rules so that addons can extend them without clobbering each other:
//! `compilerOptions.paths` entries are unioned per alias, and top-level
//! `references` are unioned by their `path`.

use serde_json::{Map, Value};

/// File names that get the TypeScript project rules and accept JSONC.
pub const TS_PROJECT_FILES: &[&str] = &[
    "tsconfig.json",
    "tsconfig.app.json",
    "tsconfig.node.json",
    "jsconfig.json",
];

/// Merge `incoming` into `existing`. Errors carry a human-readable reason.
pub fn merge(file_name: &str, existing: &str, incoming: &str) -> Result<String, String> {
    let ts_project = TS_PROJECT_FILES.contains(&file_name);

    let mut target = parse(existing, ts_project)
        .map_err(|e| format!("existing content is not valid JSON: {e}"))?;
    let source = parse(incoming, ts_project)
        .map_err(|e| format!("addon content is not valid JSON: {e}"))?;

    let paths = ts_project
        .then(|| union_paths(&target, &source))
        .flatten();
    let references = ts_project
        .then(|| union_references(&target, &source))
        .flatten();

    deep_merge(&mut target, source);

    let options = target
        .get_mut("compilerOptions")
        .and_then(Value::as_object_mut);
    if let (Some(paths), Some(options)) = (paths, options) {
        options.insert("paths".to_string(), paths);
    }
    if let (Some(references), Some(root)) = (references, target.as_object_mut()) {
        root.insert("references".to_string(), references);
    }

    let mut out = serde_json::to_string_pretty(&target).map_err(|e| e.to_string())?;
    out.push('\n');
    Ok(out)
}

/// Recursive merge; `source` wins every non-object collision.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

fn parse(text: &str, jsonc: bool) -> serde_json::Result<Value> {
    if jsonc {
        serde_json::from_str(&strip_jsonc(text))
    } else {
        serde_json::from_str(text)
    }
}

fn paths_of(value: &Value) -> Option<&Map<String, Value>> {
    value.get("compilerOptions")?.get("paths")?.as_object()
}

/// Union of both `compilerOptions.paths` maps, or `None` if either side has none.
fn union_paths(target: &Value, source: &Value) -> Option<Value> {
    let (ours, theirs) = (paths_of(target)?, paths_of(source)?);
    let mut merged = ours.clone();

    for (alias, incoming) in theirs {
        match (merged.get_mut(alias), incoming) {
            (Some(Value::Array(existing)), Value::Array(incoming)) => {
                for entry in incoming {
                    if !existing.contains(entry) {
                        existing.push(entry.clone());
                    }
                }
            }
            _ => {
                merged.insert(alias.clone(), incoming.clone());
            }
        }
    }
    Some(Value::Object(merged))
}

/// Union of both top-level `references` arrays keyed on `path`.
fn union_references(target: &Value, source: &Value) -> Option<Value> {
    let ours = target.get("references")?.as_array()?;
    let theirs = source.get("references")?.as_array()?;
    let key = |v: &Value| v.get("path").cloned().unwrap_or_else(|| v.clone());

    let mut merged = ours.clone();
    for entry in theirs {
        let k = key(entry);
        if !merged.iter().any(|e| key(e) == k) {
            merged.push(entry.clone());
        }
    }
    Some(Value::Array(merged))
}

/// Drop `//` and `/* */` comments and trailing commas, leaving strings intact.
pub(crate) fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push(c);
                while let Some(s) = chars.next() {
                    out.push(s);
                    match s {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                out.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for s in chars.by_ref() {
                    if s == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for s in chars.by_ref() {
                    if prev == '*' && s == '/' {
                        break;
                    }
                    prev = s;
                }
            }
            ',' => {
                // a comma is trailing when only whitespace or comments precede the closer
                let rest: String = chars.clone().collect();
                let next = strip_leading_trivia(&rest);
                if !matches!(next.chars().next(), Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_leading_trivia(mut s: &str) -> &str {
    loop {
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("//") {
            s = rest.find('\n').map_or("", |i| &rest[i..]);
        } else if let Some(rest) = s.strip_prefix("/*") {
            s = rest.find("*/").map_or("", |i| &rest[i + 2..]);
        } else {
            return s;
        }
    }
}
