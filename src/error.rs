//! Error types for twsql

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for twsql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments or configuration
    Validation,
    /// A block comment that cannot be classified (unterminated `/*`)
    Parse,
    /// A directive expression failed to evaluate
    Execution,
    /// Reading a template from disk failed
    Io,
}

/// Main error type for twsql
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("{message}")]
    #[diagnostic(code(twsql::validation_error))]
    Validation { message: String },

    #[error("{message}")]
    #[diagnostic(code(twsql::parse_error))]
    Parse {
        message: String,
        #[label("here")]
        span: Option<(usize, usize)>,
    },

    #[error("name '{name}' is not defined in \"{expression}\"")]
    #[diagnostic(code(twsql::undefined_name))]
    UndefinedName { name: String, expression: String },

    #[error("condition result is not a boolean: \"{expression}\"")]
    #[diagnostic(code(twsql::non_boolean_condition))]
    NonBooleanCondition { expression: String },

    #[error("{message} in \"{expression}\"")]
    #[diagnostic(code(twsql::evaluation_error))]
    Evaluation { message: String, expression: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(twsql::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::UndefinedName { .. }
            | Error::NonBooleanCondition { .. }
            | Error::Evaluation { .. } => ErrorKind::Execution,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}

/// Calculate line and column number from byte offset
pub fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in input.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Get the line content at a given line number (1-indexed)
pub fn get_line_content(input: &str, line_num: usize) -> Option<&str> {
    input.lines().nth(line_num.saturating_sub(1))
}

/// Format a parse error with context
pub fn format_parse_error(input: &str, offset: usize, message: &str) -> String {
    let (line, col) = offset_to_line_col(input, offset);
    let line_content = get_line_content(input, line).unwrap_or("");

    let pointer = " ".repeat(col.saturating_sub(1)) + "^";

    format!(
        "Parse error at line {}, column {}:\n  |\n{:>3} | {}\n  | {}\n  = {}",
        line, col, line, line_content, pointer, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        assert_eq!(offset_to_line_col("select\n  /*", 9), (2, 3));
        assert_eq!(offset_to_line_col("abc", 0), (1, 1));
    }

    #[test]
    fn parse_error_excerpt_points_at_column() {
        let rendered = format_parse_error("select 1\nfrom /* x", 14, "unterminated");
        assert!(rendered.contains("line 2, column 6"));
        assert!(rendered.contains("from /* x"));
        assert!(rendered.ends_with("= unterminated"));
    }

    #[test]
    fn kinds_group_execution_errors() {
        let err = Error::NonBooleanCondition {
            expression: "a + 1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
    }
}
