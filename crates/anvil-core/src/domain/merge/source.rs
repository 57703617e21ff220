//! Line-based source merger for JavaScript and TypeScript files.
//!
//! Single-line import statements are hoisted and deduplicated verbatim;
//! everything else is concatenated, destination first. Duplicate
//! declarations across the two bodies are not reconciled.

use std::sync::LazyLock;

use regex::Regex;

/// `import x from 'y'` in all its single-line forms, or a bare `import 'y'`.
static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s.+\sfrom\s.+;?$|^import\s*['"][^'"]+['"];?$"#)
        .expect("IMPORT_LINE must compile")
});

pub(crate) fn is_import_line(line: &str) -> bool {
    IMPORT_LINE.is_match(line.trim())
}

fn split(code: &str) -> (Vec<&str>, String) {
    let mut imports = Vec::new();
    let mut body = Vec::new();
    for line in code.split('\n') {
        if is_import_line(line) {
            imports.push(line);
        } else {
            body.push(line);
        }
    }
    (imports, body.join("\n"))
}

/// Merge `incoming` source into `existing`.
pub fn merge(existing: &str, incoming: &str) -> String {
    let (existing_imports, existing_body) = split(existing);
    let (incoming_imports, incoming_body) = split(incoming);

    let mut lines: Vec<&str> = existing_imports;
    for import in incoming_imports {
        if !lines.contains(&import) {
            lines.push(import);
        }
    }

    lines.push("");
    lines.push(existing_body.trim());
    lines.push("");
    lines.push(incoming_body.trim());
    lines.join("\n")
}
