//! Log sanitization helpers.
//!
//! Nicknames and activity names come straight from user input and may carry
//! newlines or control characters; escape them so every log record stays on
//! one line.

/// Escape a user-supplied string for single-line logging. Control characters
/// become visible escapes and anything past `LOG_PREVIEW_CHARS` is truncated
/// with an ellipsis.
pub fn escape_log(s: &str) -> String {
    const LOG_PREVIEW_CHARS: usize = 120;
    let mut out = String::with_capacity(s.len().min(LOG_PREVIEW_CHARS) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= LOG_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
