use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const UNKNOWN: &str = "Unknown";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

/// Whole numbers print without a fraction ("16"), others with one digit.
pub fn format_gb(gb: f64) -> String {
    if gb.fract() == 0.0 {
        format!("{gb:.0}")
    } else {
        format!("{gb:.1}")
    }
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Greedy word wrap to `max_width` display columns. Words wider than a
/// line are broken at the column limit.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= max_width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > max_width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("abcdefghij", 5), "abcd\u{2026}");
    }

    #[test]
    fn gigabytes_format_compactly() {
        assert_eq!(format_gb(16.0), "16");
        assert_eq!(format_gb(15.54), "15.5");
        assert_eq!(bytes_to_gb(8 * 1024 * 1024 * 1024), 8.0);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("User Agent: WezTerm/20240203 (xterm-256color; truecolor)", 20),
            vec![
                "User Agent:",
                "WezTerm/20240203",
                "(xterm-256color;",
                "truecolor)"
            ]
        );
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    proptest! {
        #[test]
        fn wrapped_lines_fit_and_keep_every_word(
            words in proptest::collection::vec("[a-zA-Z0-9/().;:-]{1,30}", 1..20),
            width in 8usize..60,
        ) {
            let text = words.join(" ");
            let lines = wrap_text(&text, width);
            prop_assert!(lines.iter().all(|l| l.width() <= width));
            let rejoined: String = lines.concat();
            let original: String = words.concat();
            prop_assert_eq!(rejoined.replace(' ', ""), original);
        }
    }
}
