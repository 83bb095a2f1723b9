//! Helpers that keep multi-line game narrative on a single log line.

use std::fmt::Write;

/// Character cap used for narrative and command previews.
pub const LOG_PREVIEW: usize = 300;

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///
/// Other control characters become `\xNN`. Only the first `max_chars`
/// characters of the input are kept; an ellipsis marks the cut.
pub fn single_line(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Joins narrative lines and flattens the result.
pub fn join_lines(lines: &[String]) -> String {
    single_line(&lines.join("\n"), LOG_PREVIEW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_room_description() {
        let s = "Sacred Grove\nA peaceful grove.\tExits: north";
        assert_eq!(single_line(s, LOG_PREVIEW), "Sacred Grove\\nA peaceful grove.\\tExits: north");
    }

    #[test]
    fn escapes_other_control_chars() {
        assert_eq!(single_line("a\u{7}b\\c", LOG_PREVIEW), "a\\x07b\\\\c");
    }

    #[test]
    fn truncates_long_text() {
        let long = "x".repeat(400);
        let out = single_line(&long, LOG_PREVIEW);
        assert_eq!(out.chars().count(), 301);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn cap_counts_input_chars_not_escapes() {
        assert_eq!(single_line("north\nsouth", 6), "north\\n…");
        assert_eq!(single_line("look", 4), "look");
    }

    #[test]
    fn joins_round_lines() {
        let lines = vec!["You deal 8 damage to Goblin!".to_string(), "Goblin's HP: 0".to_string()];
        assert_eq!(join_lines(&lines), "You deal 8 damage to Goblin!\\nGoblin's HP: 0");
    }
}
