//! Placeholder substitution applied to staged files before promotion.

use std::collections::BTreeMap;

use chrono::Datelike;

/// Context for `{{VARIABLE}}` substitution.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "My Awesome App" | Selection |
/// | `PROJECT_NAME_SNAKE` | "my_awesome_app" | Computed |
/// | `PROJECT_NAME_KEBAB` | "my-awesome-app" | Computed |
/// | `PROJECT_NAME_PASCAL` | "MyAwesomeApp" | Computed |
/// | `YEAR` | "2026" | Local clock |
///
/// Addon parameters are layered on top with [`RenderContext::with_variable`]
/// and may shadow the built-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    project_name: String,
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Create a context with the built-in variables derived from `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut vars = BTreeMap::new();

        vars.insert("PROJECT_NAME".to_string(), name.clone());
        vars.insert("PROJECT_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("PROJECT_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("PROJECT_NAME_PASCAL".to_string(), to_pascal_case(&name));
        vars.insert(
            "YEAR".to_string(),
            chrono::Local::now().year().to_string(),
        );

        Self {
            project_name: name,
            variables: vars,
        }
    }

    /// Add a variable, consuming self and returning the extended context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add every pair from `vars`.
    pub fn with_variables<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (k, v) in vars {
            self.variables.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Whether `text` contains anything this context would substitute.
    pub fn has_placeholders(&self, text: &str) -> bool {
        text.contains("{{")
            && self
                .variables
                .keys()
                .any(|key| text.contains(&placeholder(key)))
    }

    /// Replace every known `{{VARIABLE}}`.
    ///
    /// Unknown placeholders are left as literal text.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            result = result.replace(&placeholder(key), value);
        }
        result
    }
}

fn placeholder(key: &str) -> String {
    format!("{{{{{key}}}}}")
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, camelCase transitions and acronym boundaries.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // myApp
            let camel = c.is_lowercase() && next.is_uppercase();
            // HTTPServer
            let acronym = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);
            if camel || acronym {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_variables() {
        let ctx = RenderContext::new("my awesome project");

        assert_eq!(ctx.get("PROJECT_NAME"), Some("my awesome project"));
        assert_eq!(ctx.get("PROJECT_NAME_SNAKE"), Some("my_awesome_project"));
        assert_eq!(ctx.get("PROJECT_NAME_KEBAB"), Some("my-awesome-project"));
        assert_eq!(ctx.get("PROJECT_NAME_PASCAL"), Some("MyAwesomeProject"));
        assert!(ctx.get("YEAR").is_some_and(|y| y.len() == 4));
    }

    #[test]
    fn case_splitting() {
        assert_eq!(to_kebab_case("myApp"), "my-app");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_pascal_case("next-with-ts"), "NextWithTs");
    }

    #[test]
    fn renders_known_and_keeps_unknown() {
        let ctx = RenderContext::new("shop")
            .with_variable("DATABASE_PROVIDER", "postgresql")
            .with_variable("YEAR", "2030");

        let rendered = ctx.render(
            "provider: \"{{DATABASE_PROVIDER}}\" // {{PROJECT_NAME}} {{YEAR}} {{UNKNOWN}}",
        );
        assert_eq!(rendered, "provider: \"postgresql\" // shop 2030 {{UNKNOWN}}");
    }

    #[test]
    fn detects_placeholders() {
        let ctx = RenderContext::new("shop");
        assert!(ctx.has_placeholders("name = {{PROJECT_NAME_KEBAB}}"));
        assert!(!ctx.has_placeholders("const x = { y: {} }"));
        assert!(!ctx.has_placeholders("{{NOT_A_VARIABLE}}"));
    }
}
