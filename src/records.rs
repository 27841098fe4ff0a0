use crate::types::*;
use tracing::warn;

/// How the wrapping characters of the details column are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Drop the first and last character whatever they are (export compatibility).
    #[default]
    Blind,
    /// Only strip a real `"` pair; anything else is reported and left alone.
    Checked,
}

/// Splits a line on commas followed by an even number of `"` up to end of line.
/// Only correct for balanced quoting.
pub fn split_fields(line: &str) -> Vec<&str> {
    let total = line.matches('"').count();
    let mut seen = 0;
    let mut start = 0;
    let mut out = Vec::new();
    for (i, c) in line.char_indices() {
        match c {
            '"' => seen += 1,
            ',' if (total - seen) % 2 == 0 => {
                out.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&line[start..]);
    out
}

fn strip_wrapping(s: &str, mode: StripMode) -> Result<&str, String> {
    if s.chars().count() <= 1 {
        return Ok(s);
    }
    match mode {
        StripMode::Blind => {
            let mut chars = s.chars();
            chars.next();
            chars.next_back();
            Ok(chars.as_str())
        }
        StripMode::Checked if s.starts_with('"') && s.ends_with('"') => Ok(&s[1..s.len() - 1]),
        StripMode::Checked => Err(format!(
            "details is not wrapped in a quote pair (starts with {:?}, ends with {:?})",
            s.chars().next().unwrap_or_default(),
            s.chars().last().unwrap_or_default(),
        )),
    }
}

/// Unescapes doubled quotes, trims, strips the wrapping pair and parses JSON.
/// Never fails: unparseable input comes back as `Details::Raw`, unescaped and
/// trimmed but not stripped, with diagnostics.
pub fn unwrap_details(raw: &str, mode: StripMode) -> (Details, Vec<String>) {
    let mut notes = Vec::new();
    let unescaped = raw.replace("\"\"", "\"");
    let trimmed = unescaped.trim();
    let body = match strip_wrapping(trimmed, mode) {
        Ok(body) => body,
        Err(msg) => { notes.push(msg); trimmed }
    };
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(v) => (Details::Parsed(v), notes),
        Err(e) => {
            notes.push(format!("details is not valid JSON: {e}"));
            (Details::Raw(trimmed.to_string()), notes)
        }
    }
}

/// Parses the whole export. The first line is the header row; blank lines are skipped.
pub fn parse_records(text: &str, layout: Layout, mode: StripMode) -> ParsedRecords {
    let mut lines = text.split('\n');
    let headers: Vec<String> = match lines.next() {
        Some(h) if !h.trim().is_empty() => h.split(',').map(|s| s.trim().to_string()).collect(),
        _ => return ParsedRecords::default(),
    };
    let n = layout.scalar_fields();

    let mut out = ParsedRecords { headers, ..Default::default() };
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let parts = split_fields(line);

        let fields = (0..n)
            .map(|i| {
                let key = out.headers.get(i).cloned().unwrap_or_else(|| format!("column_{}", i + 1));
                let value = parts.get(i).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string);
                (key, value)
            })
            .collect();

        let raw = match layout {
            Layout::FOUR => parts.get(n..).map(|rest| rest.join(",")).unwrap_or_default(),
            _ => parts.get(n).map(|s| s.to_string()).unwrap_or_default(),
        };
        let (details, notes) = unwrap_details(&raw, mode);
        for message in notes {
            warn!(line = line_no, %message, "details diagnostic");
            out.diagnostics.push(ParseDiagnostic { line: line_no, message });
        }
        out.records.push(Record { fields, details, line: line_no });
    }
    out
}
