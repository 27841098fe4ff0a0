//! Failure classification for the strict engine.
//!
//! Rules match on the engine's error wording, so they break when an engine
//! rewords its messages. Keep every needle here.
//!
//! Liquid errors echo the offending source line, so bare words from the
//! template (`asset`, `offset`) must never decide a category on their own.

use crate::engine::CURRENT_URL_TOKEN;
use crate::types::FailureCategory;

enum Matcher {
    /// Every needle is in the message, case-insensitive.
    All(&'static [&'static str]),
    /// Liquid's `requested=<tag>` context line names exactly this tag.
    RequestedTag(&'static str),
    /// Liquid parse error located in a `{{ }}`/`{% %}` whose filter has an argument but no `:`.
    FilterArgWithoutColon,
}

struct Rule {
    category: FailureCategory,
    /// Any one matcher is enough.
    matchers: &'static [Matcher],
}

const RULES: &[Rule] = &[
    Rule { category: FailureCategory::CurrentUrlReference, matchers: &[Matcher::All(&[CURRENT_URL_TOKEN])] },
    Rule {
        category: FailureCategory::UnsupportedElifTag,
        matchers: &[Matcher::RequestedTag("elif"), Matcher::All(&["tag \"elif\" not found"])],
    },
    Rule {
        category: FailureCategory::UnsupportedSetTag,
        matchers: &[Matcher::RequestedTag("set"), Matcher::All(&["tag \"set\" not found"])],
    },
    Rule {
        category: FailureCategory::FilterSyntaxError,
        matchers: &[Matcher::All(&["after filter name"]), Matcher::FilterArgWithoutColon],
    },
];

/// First matching rule wins.
pub fn classify_failure(message: &str) -> FailureCategory {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matchers.iter().any(|m| m.matches(message, &lower)))
        .map(|rule| rule.category)
        .unwrap_or(FailureCategory::Other)
}

impl Matcher {
    fn matches(&self, message: &str, lower: &str) -> bool {
        match self {
            Matcher::All(needles) => needles.iter().all(|n| lower.contains(&n.to_lowercase())),
            Matcher::RequestedTag(tag) => requested_tag(message).is_some_and(|t| t == *tag),
            Matcher::FilterArgWithoutColon => lower.contains("expected") && filter_error_at_location(message),
        }
    }
}

/// Value of a `requested...=<tag>` context line.
fn requested_tag(message: &str) -> Option<&str> {
    message.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        key.trim().starts_with("requested").then(|| value.trim())
    })
}

/// Reads `--> line:col` and the echoed `line | source` from a pest-style error.
fn error_location(message: &str) -> Option<(String, usize)> {
    let (line_no, col) = message.lines().find_map(|l| {
        let (_, pos) = l.split_once("-->")?;
        let (line, col) = pos.trim().split_once(':')?;
        Some((line.trim().parse::<usize>().ok()?, col.trim().parse::<usize>().ok()?))
    })?;
    let prefix = format!("{line_no} |");
    let source = message.lines().find_map(|l| {
        let rest = l.trim_start().strip_prefix(&prefix)?;
        Some(rest.strip_prefix(' ').unwrap_or(rest).to_string())
    })?;
    Some((source, col))
}

fn filter_error_at_location(message: &str) -> bool {
    let Some((text, col)) = error_location(message) else { return false };
    let byte_at = |n: usize| text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len());
    let at = byte_at(col.saturating_sub(1));
    // window reaches past the caret so a caret on `{{` still finds it
    let window = &text[..byte_at(col + 1)];
    let open = match (window.rfind("{{"), window.rfind("{%")) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return false,
    };
    let body_start = open + 2;
    let close = ["}}", "%}"]
        .iter()
        .filter_map(|d| text[body_start..].find(d))
        .min()
        .map_or(text.len(), |i| body_start + i);
    if at > close {
        return false;
    }
    split_unquoted(&text[body_start..close], '|').iter().skip(1).any(|seg| filter_missing_colon(seg))
}

/// `date "%Y"` -> true, `date: "%Y"` / `upcase` -> false.
fn filter_missing_colon(segment: &str) -> bool {
    let seg = segment.trim();
    let name_len = seg.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(seg.len());
    if name_len == 0 {
        return false;
    }
    let rest = seg[name_len..].trim_start();
    !rest.is_empty() && !rest.starts_with(':')
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, _) if c == sep => {
                out.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}
