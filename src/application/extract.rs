use crate::application::prompt::ERROR_MARKER;
use crate::domain::model::{ExtractedQuery, Extraction};

const OPERATION_KEYWORDS: &[&str] = &["query", "mutation", "subscription"];

/// Locate the single query block in a sanitized model reply.
///
/// An `ERROR:` line is a refusal. Otherwise the first fenced code block (if
/// any) is searched, the query starts at the first bare `{` or operation
/// keyword, and ends at the brace that brings the depth back to zero.
/// Everything after that brace is ignored.
pub fn extract(cleaned: &str) -> Extraction {
    let trimmed = cleaned.trim();
    if let Some(rest) = trimmed.strip_prefix(ERROR_MARKER) {
        let reason = rest.lines().next().unwrap_or("").trim();
        return Extraction::Refusal(reason.to_string());
    }

    let working = fenced_block(trimmed).unwrap_or(trimmed);

    let Some((start, open)) = find_start(working) else {
        return Extraction::NotFound;
    };
    let Some(end) = find_matching_brace(working, open) else {
        return Extraction::NotFound;
    };

    let query = working[start..=end].trim();
    Extraction::Query(ExtractedQuery {
        query: query.to_string(),
    })
}

/// Inner content of the first ``` fenced block, without its language tag.
///
/// A word glued to the fence is a language tag unless it is an operation
/// keyword. An unterminated fence runs to the end of the text.
fn fenced_block(text: &str) -> Option<&str> {
    let fence = text.find("```")?;
    let after = &text[fence + 3..];
    let tag_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    let body = if OPERATION_KEYWORDS.contains(&&after[..tag_len]) {
        after
    } else {
        &after[tag_len..]
    };
    match body.find("```") {
        Some(close) => Some(&body[..close]),
        None => Some(body),
    }
}

/// Byte offsets of the query start and of its opening brace.
fn find_start(text: &str) -> Option<(usize, usize)> {
    let bare = text.find('{');
    let keyword = find_keyword_start(text);

    match (keyword, bare) {
        (Some((kw_start, kw_open)), Some(brace)) if kw_start < brace => Some((kw_start, kw_open)),
        (Some(kw), None) => Some(kw),
        (_, Some(brace)) => Some((brace, brace)),
        (None, None) => None,
    }
}

// Earliest `keyword [Name] {` at a word boundary.
fn find_keyword_start(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, usize)> = None;

    for keyword in OPERATION_KEYWORDS {
        let mut from = 0;
        while let Some(rel) = text[from..].find(keyword) {
            let start = from + rel;
            from = start + keyword.len();

            let boundary_before = start == 0 || !is_name_byte(bytes[start - 1]);
            let boundary_after = from >= bytes.len() || !is_name_byte(bytes[from]);
            if !boundary_before || !boundary_after {
                continue;
            }
            if let Some(open) = brace_after_header(text, from) {
                if best.map_or(true, |(b, _)| start < b) {
                    best = Some((start, open));
                }
                break;
            }
        }
    }
    best
}

// After a keyword: optional whitespace, optional name, optional whitespace, `{`.
fn brace_after_header(text: &str, mut idx: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    if idx < bytes.len() && (bytes[idx] == b'_' || bytes[idx].is_ascii_alphabetic()) {
        while idx < bytes.len() && is_name_byte(bytes[idx]) {
            idx += 1;
        }
        while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
            idx += 1;
        }
    }
    (idx < bytes.len() && bytes[idx] == b'{').then_some(idx)
}

fn is_name_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Offset of the `}` that closes the brace at `open`, counting depth.
///
/// Braces inside string literals do not count.
fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape = false;

    for (idx, ch) in text[open..].char_indices() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}
