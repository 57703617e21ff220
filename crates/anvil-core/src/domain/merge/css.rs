//! Stylesheet merger.
//!
//! The stylesheet is split into top-level nodes by a small scanner that
//! understands strings, comments, parentheses and brace nesting. Nothing
//! below the top level is interpreted. The scanner never fails: an unclosed
//! block or comment simply runs to the end of the input.
//!
//! `@import` statements and `@plugin` rules (statement or block form) are
//! hoisted and deduplicated by their normalised target; every other node is
//! kept verbatim, destination nodes first.

use std::collections::HashSet;

/// One top-level piece of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CssNode<'a> {
    text: &'a str,
    kind: NodeKind<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind<'a> {
    Comment,
    /// `@name params;` or `@name params { ... }`
    AtRule { name: &'a str, params: &'a str },
    /// Qualified rule, or anything the scanner could not classify.
    Other,
}

impl<'a> CssNode<'a> {
    fn hoisted(&self) -> Option<(Hoisted, String)> {
        match self.kind {
            NodeKind::AtRule { name, params } => {
                let group = match name {
                    "import" => Hoisted::Import,
                    "plugin" => Hoisted::Plugin,
                    _ => return None,
                };
                // `@import ... { }` is not a real import; `@plugin "x" { ... }`
                // carries plugin options and is keyed on the params before `{`
                if group == Hoisted::Import && self.text.trim_end().ends_with('}') {
                    return None;
                }
                Some((group, normalise_target(params)))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hoisted {
    Import,
    Plugin,
}

/// Merge an incoming stylesheet into an existing one.
pub fn merge(existing: &str, incoming: &str) -> String {
    let existing_nodes = split_top_level(existing);
    let incoming_nodes = split_top_level(incoming);

    let mut imports: Vec<&str> = Vec::new();
    let mut plugins: Vec<&str> = Vec::new();
    let mut body: Vec<&str> = Vec::new();
    let mut import_set: HashSet<String> = HashSet::new();
    let mut plugin_set: HashSet<String> = HashSet::new();

    for node in &existing_nodes {
        match node.hoisted() {
            Some((Hoisted::Import, target)) => {
                import_set.insert(target);
                imports.push(node.text);
            }
            Some((Hoisted::Plugin, target)) => {
                plugin_set.insert(target);
                plugins.push(node.text);
            }
            None => body.push(node.text),
        }
    }

    for node in &incoming_nodes {
        match node.hoisted() {
            Some((Hoisted::Import, target)) => {
                if import_set.insert(target) {
                    imports.push(node.text);
                }
            }
            Some((Hoisted::Plugin, target)) => {
                if plugin_set.insert(target) {
                    plugins.push(node.text);
                }
            }
            None => body.push(node.text),
        }
    }

    let groups = [imports.join("\n"), plugins.join("\n"), body.join("\n\n")];
    let mut out = groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Remove quotes and whitespace, then unwrap a surrounding `url(...)`.
///
/// `"tailwindcss"`, `'tailwindcss'` and `url(tailwindcss)` all normalise to
/// `tailwindcss`.
pub(crate) fn normalise_target(params: &str) -> String {
    let cleaned: String = params
        .chars()
        .filter(|c| !matches!(c, '\'' | '"') && !c.is_whitespace())
        .collect();
    match cleaned
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => inner.to_string(),
        None => cleaned,
    }
}

/// Split a stylesheet into top-level nodes, in source order.
pub(crate) fn split_top_level(input: &str) -> Vec<CssNode<'_>> {
    let bytes = input.as_bytes();
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        if input[i..].starts_with("/*") {
            i = skip_comment(input, i);
            nodes.push(CssNode {
                text: &input[start..i],
                kind: NodeKind::Comment,
            });
            continue;
        }

        i = scan_node(input, i);
        let text = input[start..i].trim_end();
        if !text.is_empty() {
            nodes.push(classify(text));
        }
    }

    nodes
}

/// Index just past the comment starting at `start`, or the end of input.
fn skip_comment(input: &str, start: usize) -> usize {
    match input[start + 2..].find("*/") {
        Some(offset) => start + 2 + offset + 2,
        None => input.len(),
    }
}

/// Index just past the quoted string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the node starting at `start`: after the `;` of a
/// statement or the `}` closing a block at nesting depth zero.
fn scan_node(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut braces = 0usize;
    let mut parens = 0usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(input, i);
                continue;
            }
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' => braces += 1,
            b'}' => {
                braces = braces.saturating_sub(1);
                if braces == 0 {
                    return i + 1;
                }
            }
            b';' if braces == 0 && parens == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn classify(text: &str) -> CssNode<'_> {
    let Some(rest) = text.strip_prefix('@') else {
        return CssNode {
            text,
            kind: NodeKind::Other,
        };
    };

    let name_len = rest
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | ';' | '{' | '"' | '\''))
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    let tail = &rest[name_len..];
    let params_end = tail.find(['{', ';']).unwrap_or(tail.len());

    CssNode {
        text,
        kind: NodeKind::AtRule {
            name,
            params: tail[..params_end].trim(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        split_top_level(input).into_iter().map(|n| n.text).collect()
    }

    #[test]
    fn splits_statements_blocks_and_comments() {
        let css = "@import \"a.css\";\n/* note */\nbody { color: red; }\n@media (x) { a { b: c } }";
        assert_eq!(
            texts(css),
            [
                "@import \"a.css\";",
                "/* note */",
                "body { color: red; }",
                "@media (x) { a { b: c } }",
            ]
        );
    }

    #[test]
    fn braces_inside_strings_and_comments_are_ignored() {
        let css = ".a::after { content: \"}\"; } /* { */ .b { x: y }";
        assert_eq!(
            texts(css),
            [".a::after { content: \"}\"; }", "/* { */", ".b { x: y }"]
        );
    }

    #[test]
    fn semicolons_inside_url_do_not_split() {
        let css = "@import url(data:text/css;base64,AAAA);\n.a{}";
        assert_eq!(texts(css), ["@import url(data:text/css;base64,AAAA);", ".a{}"]);
    }

    #[test]
    fn unclosed_block_runs_to_end() {
        let css = ".a { color: red;\n.b { x: y }";
        assert_eq!(texts(css), [".a { color: red;\n.b { x: y }"]);
        assert_eq!(texts("/* open"), ["/* open"]);
    }

    #[test]
    fn normalises_import_targets() {
        assert_eq!(normalise_target("\"tailwindcss\""), "tailwindcss");
        assert_eq!(normalise_target("'tailwindcss'"), "tailwindcss");
        assert_eq!(normalise_target("url( 'tailwindcss' )"), "tailwindcss");
        assert_eq!(normalise_target("url(a.css) screen"), "url(a.css)screen");
    }

    #[test]
    fn imports_are_hoisted_once_in_order() {
        let existing = "@import \"a.css\";\nbody { margin: 0; }\n";
        let incoming = "@import 'a.css';\n@import url(b.css);\n.btn { color: blue; }\n";

        let merged = merge(existing, incoming);

        assert_eq!(merged.matches("a.css").count(), 1);
        assert_eq!(merged.matches("b.css").count(), 1);
        let a = merged.find("a.css").unwrap();
        let b = merged.find("b.css").unwrap();
        let body = merged.find("body").unwrap();
        let btn = merged.find(".btn").unwrap();
        assert!(a < b && b < body && body < btn);
    }

    #[test]
    fn plugins_follow_imports() {
        let existing = "@import \"tailwindcss\";\n";
        let incoming = "@plugin \"daisyui\";\n@import \"tailwindcss\";\n";

        let merged = merge(existing, incoming);
        assert_eq!(merged, "@import \"tailwindcss\";\n\n@plugin \"daisyui\";\n");
    }

    #[test]
    fn import_and_plugin_sets_are_idempotent() {
        let base = "@import \"tailwindcss\";\n@plugin \"daisyui\";\n:root { --x: 1; }\n";
        let addon = "@import 'tailwindcss';\n@plugin 'daisyui';\n";

        let once = merge(base, addon);
        let twice = merge(&once, addon);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("@import").count(), 1);
        assert_eq!(twice.matches("@plugin").count(), 1);
    }

    #[test]
    fn block_plugins_are_hoisted_and_deduplicated() {
        let base = "@import \"tailwindcss\";\n.a { x: 1 }\n";
        let addon = "@plugin \"daisyui\" {\n  themes: light --default;\n}\n";

        let once = merge(base, addon);
        assert_eq!(
            once,
            "@import \"tailwindcss\";\n\n@plugin \"daisyui\" {\n  themes: light --default;\n}\n\n.a { x: 1 }\n"
        );

        let twice = merge(&once, addon);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("@plugin").count(), 1);
    }

    #[test]
    fn block_plugin_precedes_body_rules() {
        let merged = merge(".a { x: 1 }", ".b { y: 2 }\n@plugin \"daisyui\" { themes: light; }");
        assert_eq!(
            merged,
            "@plugin \"daisyui\" { themes: light; }\n\n.a { x: 1 }\n\n.b { y: 2 }\n"
        );
    }

    #[test]
    fn statement_plugin_matches_block_plugin() {
        let merged = merge("@plugin \"daisyui\";\n", "@plugin 'daisyui' { themes: dark; }\n");
        assert_eq!(merged.matches("@plugin").count(), 1);
    }

    #[test]
    fn block_import_stays_in_body() {
        let merged = merge(".a{}", "@import \"x.css\" { }");
        assert_eq!(merged, ".a{}\n\n@import \"x.css\" { }\n");
    }

    #[test]
    fn body_keeps_destination_then_incoming() {
        let merged = merge(".a { x: 1 }", ".b { y: 2 }\n.c { z: 3 }");
        assert_eq!(merged, ".a { x: 1 }\n\n.b { y: 2 }\n\n.c { z: 3 }\n");
    }
}
