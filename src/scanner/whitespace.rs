//! Blank-line normalization
//!
//! The scanner tracks how much horizontal whitespace has been emitted since
//! the last newline (`None` once anything else appears on the line). When an
//! `if`/`for` directive sits alone on its line, the line break after it is
//! absorbed and the indentation before it is trimmed, so a removed block
//! leaves no blank line behind.

use crate::directive::END;

pub fn is_horizontal(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Update the leading-whitespace count after `piece` has been emitted
pub fn advance_leading(leading: Option<usize>, piece: &str, newline: &str) -> Option<usize> {
    if piece.is_empty() {
        return leading;
    }
    match piece.rfind(newline) {
        Some(i) => {
            let tail = &piece[i + newline.len()..];
            tail.chars().all(is_horizontal).then_some(tail.len())
        }
        None => leading
            .filter(|_| piece.chars().all(is_horizontal))
            .map(|n| n + piece.len()),
    }
}

/// Drop spaces and tabs from the end of `out`
pub fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches(is_horizontal).len();
    out.truncate(len);
}

/// Bytes to skip when nothing but whitespace follows a directive up to the
/// next line break (the break included). `None` if the line has content or
/// there is no further line.
pub fn skip_directive_line(rest: &str, newline: &str) -> Option<usize> {
    let end = rest.find(newline)?;
    rest[..end]
        .chars()
        .all(is_horizontal)
        .then_some(end + newline.len())
}

/// Finish a body region whose scan stopped at `rest`.
///
/// If `/*end*/` is alone on its line, the indentation emitted before it is
/// removed from `text` and the rest of that line is consumed. Returns the
/// bytes of `rest` that belong to the region.
pub fn close_region(text: &mut String, rest: &str, newline: &str) -> usize {
    // never closed
    if rest.is_empty() {
        return 0;
    }

    let last_line = text.rfind(newline).map_or(0, |i| i + newline.len());
    let first_line = rest.find(newline).map_or(rest, |i| &rest[..i]);
    let alone = text[last_line..].chars().all(is_horizontal)
        && first_line.trim_end_matches(is_horizontal) == END;

    if alone {
        text.truncate(last_line);
        (first_line.len() + newline.len()).min(rest.len())
    } else {
        END.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_counts_accumulate_on_blank_lines() {
        assert_eq!(advance_leading(Some(0), "  ", "\n"), Some(2));
        assert_eq!(advance_leading(Some(2), "\t", "\n"), Some(3));
        assert_eq!(advance_leading(Some(2), "x", "\n"), None);
        assert_eq!(advance_leading(None, "  ", "\n"), None);
        assert_eq!(advance_leading(None, "", "\n"), None);
    }

    #[test]
    fn newline_resets_leading_count() {
        assert_eq!(advance_leading(None, "select\n  ", "\n"), Some(2));
        assert_eq!(advance_leading(None, "a\nb", "\n"), None);
        assert_eq!(advance_leading(None, "a\r\n\t", "\r\n"), Some(1));
    }

    #[test]
    fn trailing_indentation_is_trimmed() {
        let mut out = "select\n  1\n  \t".to_string();
        trim_trailing_spaces(&mut out);
        assert_eq!(out, "select\n  1\n");
    }

    #[test]
    fn directive_line_is_absorbed_only_when_blank() {
        assert_eq!(skip_directive_line("  \n0", "\n"), Some(3));
        assert_eq!(skip_directive_line("\r\n0", "\r\n"), Some(2));
        assert_eq!(skip_directive_line(", 2/*end*/\n", "\n"), None);
        assert_eq!(skip_directive_line("   ", "\n"), None);
    }

    #[test]
    fn end_alone_on_line_takes_its_line() {
        let mut text = "0\n  ".to_string();
        let consumed = close_region(&mut text, "/*end*/  \nfrom a", "\n");
        assert_eq!(text, "0\n");
        assert_eq!(consumed, "/*end*/  \n".len());
    }

    #[test]
    fn end_after_content_takes_only_itself() {
        let mut text = ", 2".to_string();
        assert_eq!(close_region(&mut text, "/*end*/\n", "\n"), END.len());
        assert_eq!(text, ", 2");

        let mut text = "\n0\n".to_string();
        assert_eq!(close_region(&mut text, "/*end*/ from a", "\n"), END.len());
        assert_eq!(text, "\n0\n");
    }

    #[test]
    fn end_at_end_of_input_is_clamped() {
        let mut text = "x\n".to_string();
        assert_eq!(close_region(&mut text, "/*end*/", "\n"), END.len());
        assert_eq!(text, "x\n");
    }

    #[test]
    fn unterminated_region_consumes_nothing() {
        let mut text = "--0/*end*/ from a".to_string();
        assert_eq!(close_region(&mut text, "", "\n"), 0);
        assert_eq!(text, "--0/*end*/ from a");
    }
}
