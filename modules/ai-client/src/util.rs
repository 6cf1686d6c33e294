const FENCE: &str = "```";

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Pull the JSON payload out of a model response.
///
/// Uses the first fenced block that is unlabeled or labeled `json` (any case),
/// wherever it sits in the text. The first closing fence ends the block; an
/// unterminated fence runs to the end of the text. Blocks with any other label
/// are skipped. Without a usable fence the whole text is the payload. The
/// result is trimmed.
pub fn extract_json_payload(text: &str) -> &str {
    extract_fenced(text, false)
}

/// Like [`extract_json_payload`], but the block runs to the last closing fence.
/// Recovers payloads whose string values themselves contain a fence.
pub fn extract_json_payload_to_last_fence(text: &str) -> &str {
    extract_fenced(text, true)
}

fn extract_fenced(text: &str, to_last_fence: bool) -> &str {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(FENCE) {
        let after_open = search_from + offset + FENCE.len();
        let rest = &text[after_open..];
        let label_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let label = &rest[..label_len];
        let body_start = after_open + label_len;

        if label.is_empty() || label.eq_ignore_ascii_case("json") {
            let body = &text[body_start..];
            let close = if to_last_fence {
                body.rfind(FENCE)
            } else {
                body.find(FENCE)
            };
            let body = match close {
                Some(close) => &body[..close],
                None => body,
            };
            return body.trim();
        }

        match text[body_start..].find(FENCE) {
            Some(close) => search_from = body_start + close + FENCE.len(),
            None => break,
        }
    }

    text.trim()
}
