//! Quoted literal, bracket and line comment readers
//!
//! Each reader takes the text starting at the opening delimiter and returns
//! how many bytes belong to the construct. Unterminated constructs run to
//! the end of the input.

/// Matching close for bracket openers
pub fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Length of a `'...'` or `"..."` literal. A doubled quote inside the
/// literal is an escaped quote, not the terminator.
pub fn quoted_len(input: &str) -> usize {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q)) => q,
        None => return 0,
    };

    while let Some((i, c)) = chars.next() {
        if c != quote {
            continue;
        }
        if input[i + c.len_utf8()..].starts_with(quote) {
            chars.next();
            continue;
        }
        return i + c.len_utf8();
    }
    input.len()
}

/// Length of a bracketed span up to the first matching closer. Nested
/// brackets are not tracked.
pub fn bracketed_len(input: &str) -> usize {
    let close = match input.chars().next().and_then(closing_bracket) {
        Some(close) => close,
        None => return 0,
    };
    input[1..]
        .find(close)
        .map_or(input.len(), |i| 1 + i + close.len_utf8())
}

/// Length of a `--` comment, excluding the line terminator
pub fn line_comment_len(input: &str, newline: &str) -> usize {
    input.find(newline).unwrap_or(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubled_quotes_stay_inside() {
        assert_eq!(quoted_len("'' from dual"), 2);
        assert_eq!(quoted_len("'''a''' from dual"), 7);
        assert_eq!(quoted_len("'''''' x"), 6);
        assert_eq!(quoted_len("'it''s' y"), 7);
        assert_eq!(quoted_len(r#""a""b" c"#), 6);
    }

    #[test]
    fn other_quote_kind_is_plain_content() {
        assert_eq!(quoted_len(r#"'"' x"#), 3);
        assert_eq!(quoted_len(r#""'x'" y"#), 5);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(quoted_len("'abc"), 4);
        assert_eq!(quoted_len("'abc''"), 6);
    }

    #[test]
    fn multibyte_content() {
        assert_eq!(quoted_len("'日本' x"), "'日本'".len());
    }

    #[test]
    fn brackets_stop_at_first_closer() {
        assert_eq!(bracketed_len("(0, 1, 2) from"), 9);
        assert_eq!(bracketed_len("((1), 2)"), 4);
        assert_eq!(bracketed_len("[1, 2"), 5);
        assert_eq!(bracketed_len("{k}"), 3);
        assert_eq!(bracketed_len("x"), 0);
    }

    #[test]
    fn line_comment_stops_before_newline() {
        assert_eq!(line_comment_len("-- note\nselect", "\n"), 7);
        assert_eq!(line_comment_len("-- note\r\nselect", "\r\n"), 7);
        assert_eq!(line_comment_len("--tail", "\n"), 6);
    }
}
