//! HCL literal formatting.
//!
//! Small helpers turning YAML values and node names into HCL syntax:
//! quoted strings, literals, identifiers and heredocs.

use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

static INVALID_IDENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("Invalid identifier regex"));

/// Escape HCL template sequences, which are interpolated inside both quoted
/// strings and heredocs.
fn escape_template(text: &str) -> String {
    text.replace("${", "$${").replace("%{", "%%{")
}

/// Escape text for use between the double quotes of an HCL string
pub fn escape_string(text: &str) -> String {
    // JSON string escaping is a subset of what HCL accepts
    let json = serde_json::Value::from(text).to_string();
    escape_template(&json[1..json.len() - 1])
}

/// Quote a string as an HCL string literal
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

/// Format a YAML value as an HCL expression; null has no representation
pub fn literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(quote(s)),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().filter_map(literal).collect();
            Some(format!("[{}]", items.join(", ")))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .filter_map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => quote(s),
                        other => quote(&literal(other)?),
                    };
                    Some(format!("{} = {}", key, literal(value)?))
                })
                .collect();
            Some(format!("{{ {} }}", entries.join(", ")))
        }
        Value::Tagged(tagged) => literal(&tagged.value),
    }
}

/// Turn a display name into a valid HCL identifier.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`, and names that do not
/// start with a letter or underscore get an `_` prefix.
pub fn identifier(name: &str) -> String {
    let ident = INVALID_IDENT_CHARS.replace_all(name, "_").into_owned();
    match ident.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => ident,
        _ => format!("_{}", ident),
    }
}

/// Wrap already-indented text in an indented heredoc.
///
/// `closing_indent` is the indentation of the closing marker. The marker is
/// chosen so that no line of the body can terminate the heredoc early.
pub fn heredoc(body: &str, closing_indent: usize) -> String {
    let mut marker = String::from("EOT");
    while body.lines().any(|line| line.trim() == marker) {
        marker.push('_');
    }
    format!(
        "<<-{marker}\n{}\n{}{marker}",
        escape_template(body),
        " ".repeat(closing_indent),
        marker = marker
    )
}
