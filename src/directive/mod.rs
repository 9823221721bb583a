//! Block comment classification
//!
//! A `/* ... */` span is one of five directive kinds. Patterns are tried in
//! a fixed order and the first (shortest) match wins:
//!
//! | Form | Kind |
//! |---|---|
//! | `/*:name*/` | [`DirectiveKind::ParamBind`] |
//! | `/*$name*/` | [`DirectiveKind::DirectLiteral`] |
//! | `/*%if <expr>*/` | [`DirectiveKind::If`] |
//! | `/*%for <vars> in <expr>*/` | [`DirectiveKind::For`] |
//! | anything else up to the first `*/` | [`DirectiveKind::Generic`] |

pub mod bind;
pub mod block;

use regex::Regex;
use std::sync::LazyLock;

static PARAM_BIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\*:[a-zA-Z0-9_]*\*/").unwrap());

static DIRECT_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\*\$[a-zA-Z0-9_]*\*/").unwrap());

static IF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/\*%if .+?\*/").unwrap());

static FOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\*%for .+? in .+?\*/").unwrap());

/// `(?s)`: a generic comment may span lines
static GENERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^/\*.*?\*/").unwrap());

/// Closes the body of an `if` or `for`
pub const END: &str = "/*end*/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    ParamBind,
    DirectLiteral,
    If,
    For,
    Generic,
}

/// A classified block comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub kind: DirectiveKind,
    /// The whole comment, delimiters included
    pub text: &'a str,
}

impl<'a> Directive<'a> {
    /// Text between the kind marker and the closing `*/`: the parameter
    /// name, the `if` condition or the `for` header
    pub fn argument(&self) -> &'a str {
        let skip = match self.kind {
            DirectiveKind::ParamBind | DirectiveKind::DirectLiteral => "/*:".len(),
            DirectiveKind::If => "/*%if ".len(),
            DirectiveKind::For => "/*%for ".len(),
            DirectiveKind::Generic => "/*".len(),
        };
        &self.text[skip..self.text.len() - "*/".len()]
    }
}

/// Classify the comment at the start of `input`, which must begin with
/// `/*`. `None` means the comment is never closed.
pub fn classify(input: &str) -> Option<Directive<'_>> {
    let patterns: [(&Regex, DirectiveKind); 5] = [
        (&*PARAM_BIND_RE, DirectiveKind::ParamBind),
        (&*DIRECT_LITERAL_RE, DirectiveKind::DirectLiteral),
        (&*IF_RE, DirectiveKind::If),
        (&*FOR_RE, DirectiveKind::For),
        (&*GENERIC_RE, DirectiveKind::Generic),
    ];

    patterns.iter().find_map(|(re, kind)| {
        re.find(input).map(|m| Directive {
            kind: *kind,
            text: m.as_str(),
        })
    })
}
