const MAX_PREVIEW_CHARS: usize = 100;

/// Shortens free-form text (transcripts, completions) for log lines and
/// redacts anything that looks like a credential. Truncation counts
/// characters, not bytes, so Cyrillic text never splits mid-codepoint.
pub fn text_preview(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let char_count = trimmed.chars().count();
    let shortened = if char_count > MAX_PREVIEW_CHARS {
        let visible: String = trimmed.chars().take(MAX_PREVIEW_CHARS).collect();
        format!("{}... ({} chars total)", visible, char_count)
    } else {
        trimmed.to_string()
    };

    redact_credentials(&shortened)
}

fn redact_credentials(text: &str) -> String {
    let markers = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("password=", "password=[REDACTED]"),
        ("secret=", "secret=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (marker, replacement) in markers {
        if let Some(idx) = result.find(marker) {
            let value_start = idx + marker.len();
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..idx], replacement, &result[end..]);
        }
    }

    result
}
