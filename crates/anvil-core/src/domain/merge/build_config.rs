//! Vite config merger.
//!
//! Reconstructive: imports, the first `plugins: [...]` list and the first
//! `alias: {...}` object are pulled out of both files, unioned textually,
//! and re-emitted as a fresh `defineConfig` call. Any other option in either
//! file is dropped. List bodies are found by bracket matching and split on
//! commas at nesting depth zero, so `react({ babel: {} })` stays one entry;
//! template literals and regex literals containing brackets are not
//! understood.

use std::sync::LazyLock;

use regex::Regex;

static IMPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^import[\s\S]+?from\s+['"][^'"]+['"];?"#).expect("IMPORTS must compile")
});

static PLUGINS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"plugins:\s*\[").expect("PLUGINS must compile"));

static ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"alias:\s*\{").expect("ALIAS must compile"));

/// Extracted sections of one config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigSections<'a> {
    pub imports: Vec<&'a str>,
    pub plugins: Vec<&'a str>,
    pub aliases: Vec<&'a str>,
}

impl<'a> ConfigSections<'a> {
    pub(crate) fn extract(content: &'a str) -> Self {
        Self {
            imports: IMPORTS.find_iter(content).map(|m| m.as_str()).collect(),
            plugins: list_entries(&PLUGINS, content),
            aliases: list_entries(&ALIAS, content),
        }
    }

    fn absorb(&mut self, other: ConfigSections<'a>) {
        union_into(&mut self.imports, other.imports);
        union_into(&mut self.plugins, other.plugins);
        union_into(&mut self.aliases, other.aliases);
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if !self.imports.is_empty() {
            out.push_str(&self.imports.join("\n"));
            out.push_str("\n\n");
        }
        out.push_str("export default defineConfig({\n");
        out.push_str(&format!("  plugins: [{}],\n", self.plugins.join(", ")));
        out.push_str("  resolve: {\n");
        out.push_str("    alias: {\n");
        out.push_str(&format!("      {}\n", self.aliases.join(",\n      ")));
        out.push_str("    }\n");
        out.push_str("  }\n");
        out.push_str("})\n");
        out
    }
}

/// Entries of the first list or object whose opening is matched by `opener`.
fn list_entries<'a>(opener: &Regex, content: &'a str) -> Vec<&'a str> {
    let Some(open) = opener.find(content) else {
        return Vec::new();
    };
    let body = &content[open.end()..];
    let body = &body[..closing_index(body)];
    split_top_level(body)
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Byte index of the bracket closing an already-opened list, or the end.
fn closing_index(body: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    body.len()
}

/// Split on commas outside brackets and strings.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn union_into<'a>(target: &mut Vec<&'a str>, incoming: Vec<&'a str>) {
    for entry in incoming {
        if !target.contains(&entry) {
            target.push(entry);
        }
    }
}

/// Merge two Vite config files.
pub fn merge(existing: &str, incoming: &str) -> String {
    let mut sections = ConfigSections::extract(existing);
    sections.absorb(ConfigSections::extract(incoming));
    sections.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'
import path from "path";

// https://vite.dev/config/
export default defineConfig({
  plugins: [react()],
  resolve: {
    alias: {
      "@": path.resolve(__dirname, "./src"),
    },
  },
})
"#;

    const TAILWIND: &str = r#"import { defineConfig } from 'vite'
import tailwindcss from '@tailwindcss/vite'

export default defineConfig({
  plugins: [react(), tailwindcss()],
})
"#;

    #[test]
    fn extracts_sections() {
        let sections = ConfigSections::extract(BASE);
        assert_eq!(sections.imports.len(), 3);
        assert_eq!(sections.plugins, ["react()"]);
        assert_eq!(sections.aliases, [r#""@": path.resolve(__dirname, "./src")"#]);
    }

    #[test]
    fn unions_imports_and_plugins() {
        let merged = merge(BASE, TAILWIND);

        assert_eq!(merged.matches("import { defineConfig } from 'vite'").count(), 1);
        assert!(merged.contains("import tailwindcss from '@tailwindcss/vite'"));
        assert!(merged.contains("  plugins: [react(), tailwindcss()],\n"));
        assert!(merged.contains(r#"      "@": path.resolve(__dirname, "./src")"#));
    }

    #[test]
    fn alias_entries_are_unioned() {
        let incoming = "export default defineConfig({\n  resolve: { alias: { \"@ui\": \"/src/ui\", \"@\": path.resolve(__dirname, \"./src\") } },\n})";
        let merged = merge(BASE, incoming);

        let alias_block = merged.split("alias: {").nth(1).unwrap();
        assert_eq!(alias_block.matches("\"@\":").count(), 1);
        assert!(alias_block.contains("\"@ui\": \"/src/ui\""));
    }

    #[test]
    fn nested_plugin_options_stay_whole() {
        let sections =
            ConfigSections::extract("plugins: [react({ babel: { plugins: [a, b] } }), svgr()]");
        assert_eq!(
            sections.plugins,
            ["react({ babel: { plugins: [a, b] } })", "svgr()"]
        );
    }

    #[test]
    fn emits_fixed_shape() {
        let merged = merge("", "");
        assert_eq!(
            merged,
            "export default defineConfig({\n  plugins: [],\n  resolve: {\n    alias: {\n      \n    }\n  }\n})\n"
        );
    }
}
