//! Extracts a JSON value from a free-text model reply.
//!
//! Strategies are tried in order and the first one that applies decides the
//! outcome:
//!
//! 1. a fenced code block tagged `json` (any case). A fenced block that fails
//!    to parse is reported as-is; later strategies are not consulted.
//! 2. a bracket-matched array or object at the start of the trimmed text.
//! 3. the whole trimmed text.
//!
//! Malformed input is an expected outcome and comes back as a [`ParseError`],
//! never a panic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```json\b[ \t]*\r?\n?(.*?)```")
        .expect("FENCED_JSON is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("JSON syntax error in code block: {0}")]
    CodeBlockSyntax(String),

    #[error("JSON syntax error: {0}")]
    StructureSyntax(String),

    #[error("No JSON code block or valid JSON structure found in response")]
    NoStructure,
}

/// Parses the first JSON array or object found in `text`.
pub fn parse_json_response(text: &str) -> Result<Value, ParseError> {
    let trimmed = text.trim();

    if let Some(captures) = FENCED_JSON.captures(trimmed) {
        let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default().trim();
        log::debug!("Found fenced json block ({} chars)", inner.len());
        return serde_json::from_str(inner)
            .map_err(|e| ParseError::CodeBlockSyntax(e.to_string()));
    }

    let (open, close) = match trimmed.chars().next() {
        Some('[') => ('[', ']'),
        Some('{') => ('{', '}'),
        _ => return parse_whole_text(trimmed),
    };

    match balanced_span(trimmed, open, close) {
        Some(span) => {
            serde_json::from_str(span).map_err(|e| ParseError::StructureSyntax(e.to_string()))
        }
        // Unbalanced: let the whole-text parse report where it broke.
        None => serde_json::from_str::<Value>(trimmed)
            .map_err(|e| ParseError::StructureSyntax(e.to_string())),
    }
}

fn parse_whole_text(trimmed: &str) -> Result<Value, ParseError> {
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) if value.is_array() || value.is_object() => Ok(value),
        _ => Err(ParseError::NoStructure),
    }
}

/// Returns the prefix of `text` up to the bracket closing its first character.
/// Brackets inside string literals are ignored.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
