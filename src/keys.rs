//! Canonicalization of pasted private-key text.

pub(crate) const PEM_LINE_WIDTH: usize = 64;

const BEGIN_MARKER: &str = "-----BEGIN";
const END_MARKER: &str = "-----END";
const MARKER_DASHES: &str = "-----";

/// Turns whatever the user pasted into standard multi-line PEM framing.
///
/// Handles JSON-escaped newlines, CRLF line endings, surrounding quotes and
/// keys that arrived as one physical line. Never fails; text that does not
/// look like a key is passed through with the same cleanup applied.
pub(crate) fn normalize_private_key(raw: &str) -> String {
    let mut clean = raw.trim().to_string();

    clean = clean.replace("\\r\\n", "\n").replace("\\n", "\n");
    while clean.contains("\r\n") {
        clean = clean.replace("\r\n", "\n");
    }
    clean = strip_surrounding_quotes(&clean).to_string();

    if clean.contains(BEGIN_MARKER) && clean.contains(END_MARKER) && !clean.contains('\n') {
        if let Some(rewrapped) = rewrap_single_line(&clean) {
            clean = rewrapped;
        }
    }

    if !clean.is_empty() && !clean.ends_with('\n') {
        clean.push('\n');
    }
    clean
}

/// Cheap syntactic check; real parsing happens in libssh2 at connect time.
pub(crate) fn looks_like_private_key(normalized: &str) -> bool {
    normalized.contains("BEGIN") && normalized.contains("PRIVATE KEY")
}

fn strip_surrounding_quotes(value: &str) -> &str {
    let mut current = value.trim();
    loop {
        let next = current.trim_matches('"').trim();
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn rewrap_single_line(clean: &str) -> Option<String> {
    let begin = clean.find(BEGIN_MARKER)?;
    let end = clean.find(END_MARKER)?;
    if end <= begin {
        return None;
    }
    let after_begin = begin + BEGIN_MARKER.len();
    let close = clean[after_begin..].find(MARKER_DASHES)?;
    let header_end = after_begin + close + MARKER_DASHES.len();
    if header_end > end {
        return None;
    }

    let header = &clean[begin..header_end];
    let footer = &clean[end..];
    let body: Vec<char> = clean[header_end..end]
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect();
    let wrapped: Vec<String> = body
        .chunks(PEM_LINE_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect();

    Some(format!("{header}\n{}\n{footer}", wrapped.join("\n")))
}
