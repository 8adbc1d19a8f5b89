//! Tolerant extraction of a JSON object from free-form agent text.
//!
//! Strategies run in a fixed order and the first one that yields an object
//! wins. Each strategy is usable on its own so it can be tested against its
//! own malformed fixtures.

use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// A parsed JSON object.
pub type JsonObject = Map<String, Value>;

/// One way of digging a JSON object out of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ParseStrategy {
    /// The whole trimmed text is an object.
    Exact,
    /// The text sits inside a ``` fence.
    FenceStripped,
    /// The first brace-balanced `{...}` substring.
    BalancedObject,
    /// Line-by-line brace counting with trailing-comma repair.
    LineSalvage,
}

impl ParseStrategy {
    /// Runs this strategy alone.
    pub fn apply(self, text: &str) -> Option<JsonObject> {
        match self {
            ParseStrategy::Exact => parse_exact(text),
            ParseStrategy::FenceStripped => {
                strip_code_fence(text).and_then(|inner| parse_exact(&inner))
            }
            ParseStrategy::BalancedObject => first_balanced_object(text).and_then(parse_exact),
            ParseStrategy::LineSalvage => salvage_lines(text),
        }
    }
}

/// Runs every strategy in order and returns the first object found.
#[instrument(skip(text), fields(length = text.len()))]
pub fn parse_response(text: &str) -> Option<JsonObject> {
    if text.trim().is_empty() {
        debug!("Empty response");
        return None;
    }
    ParseStrategy::iter().find_map(|strategy| {
        let parsed = strategy.apply(text);
        if parsed.is_some() {
            debug!(%strategy, "Parsed agent response");
        }
        parsed
    })
}

fn parse_exact(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Drops the opening fence line and any other fence lines.
fn strip_code_fence(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return None;
    }
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < 2 {
        return None;
    }
    let body: Vec<&str> = lines[1..]
        .iter()
        .copied()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();
    Some(body.join("\n").trim().to_string())
}

/// Finds the first `{` and the brace that closes it, ignoring braces in strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collects lines from the first one holding `{` until braces balance, then repairs commas.
fn salvage_lines(text: &str) -> Option<JsonObject> {
    let mut collected: Vec<&str> = Vec::new();
    let mut balance = 0i64;

    for line in text.lines() {
        if collected.is_empty() {
            if !line.contains('{') {
                continue;
            }
            // Anything before the first brace on the opening line is prose.
            let from_brace = &line[line.find('{')?..];
            collected.push(from_brace);
            balance = brace_delta(from_brace);
        } else {
            collected.push(line);
            balance += brace_delta(line);
        }
        if balance <= 0 {
            break;
        }
    }

    if collected.is_empty() || balance > 0 {
        return None;
    }

    let joined = collected.join("\n");
    let candidate = joined.trim_end().trim_end_matches(',');
    let candidate = match candidate.rfind('}') {
        Some(end) => &candidate[..=end],
        None => return None,
    };
    parse_exact(&remove_trailing_commas(candidate))
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Removes commas that directly precede `}` or `]`, outside strings.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}
