//! Template scanner
//!
//! [`Scanner::scan`] walks the template left to right and copies plain text
//! through verbatim. At quotes, brackets and comment markers it hands off to
//! the literal readers or the directive evaluators, which may re-enter
//! `scan` for an `if`/`for` body (stopping at `/*end*/`) or for the dummy
//! literal after a bind directive (stopping at the first simple-value
//! terminator).
//!
//! All positions are absolute byte offsets into the template, so errors
//! raised at any depth point at the right place.

pub mod literal;
pub mod whitespace;

use crate::directive::{self, DirectiveKind, END};
use crate::error::{Error, Result};
use crate::options::{Options, ParamStyle};
use crate::scope::{Scope, TempAllocator};
use crate::value::Params;
use std::borrow::Cow;

/// Characters that end the dummy literal after a bind directive
const SIMPLE_VALUE_END: &[char] = &[
    '!', '#', '$', '%', '&', ')', '-', '=', '^', '~', '|', '@', '`', ';', '+', ':', '*', ']', '}',
    ',', '/', '<', '>', '?', ' ', '\t', '\n', '\r',
];

/// Settings shared by every nested scan of one call
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub delete_comment: bool,
    pub newline: String,
    pub param_style: ParamStyle,
}

impl From<&Options> for ParseContext {
    fn from(options: &Options) -> Self {
        Self {
            delete_comment: options.delete_comment,
            newline: options.newline.clone(),
            param_style: options.param_style,
        }
    }
}

/// Where a scan region ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// End of input
    Never,
    /// Before `/*end*/`
    End,
    /// Before any [`SIMPLE_VALUE_END`] character
    SimpleValue,
}

impl Stop {
    pub fn matches(self, rest: &str) -> bool {
        match self {
            Stop::Never => false,
            Stop::End => rest.starts_with(END),
            Stop::SimpleValue => rest.starts_with(SIMPLE_VALUE_END),
        }
    }
}

/// Whether directives are evaluated or only sized.
///
/// Measuring walks exactly the same text as rendering but never evaluates
/// an expression and never binds a parameter. It sizes false branches,
/// `for` bodies and dummy literals.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'m> {
    Render(&'m Scope<'m>),
    Measure,
}

/// Per-region scan state
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub stop: Stop,
    /// Directly after a bind directive: brackets are read as one span
    pub after_param: bool,
    /// Horizontal whitespace emitted since the last newline, `None` once the
    /// line has content
    pub leading: Option<usize>,
}

impl Frame {
    pub fn top() -> Self {
        Self {
            stop: Stop::Never,
            after_param: false,
            leading: Some(0),
        }
    }
}

/// Output of one region
#[derive(Debug)]
pub struct Scanned {
    pub text: String,
    /// Bytes of template covered, not including the stop token
    pub consumed: usize,
}

/// Replacement for one special construct
#[derive(Debug)]
pub struct Expansion<'a> {
    pub text: Cow<'a, str>,
    pub consumed: usize,
    /// Trim indentation already emitted on the current line
    pub trim_before: bool,
}

impl<'a> Expansion<'a> {
    pub fn borrowed(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            consumed: text.len(),
            trim_before: false,
        }
    }

    /// Consume `consumed` bytes and emit nothing
    pub fn dropped(consumed: usize) -> Self {
        Self {
            text: Cow::Borrowed(""),
            consumed,
            trim_before: false,
        }
    }
}

/// One template expansion
pub struct Scanner<'a> {
    pub(crate) source: &'a str,
    pub(crate) ctx: ParseContext,
    pub(crate) temps: TempAllocator,
    /// Temp bindings referenced by rendered bind directives
    pub(crate) bound: Params,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, options: &Options) -> Self {
        Self {
            source,
            ctx: ParseContext::from(options),
            temps: TempAllocator::new(options.temp_names.clone()),
            bound: Params::new(),
        }
    }

    /// Render the whole template against `base`
    pub fn render(mut self, base: &Params) -> Result<(String, Params)> {
        let scope = Scope::root(base);
        let scanned = self.scan(0, Mode::Render(&scope), Frame::top())?;

        let mut params = base.clone();
        params.extend(self.bound);
        Ok((scanned.text, params))
    }

    /// Walk the whole template without evaluating anything
    pub fn measure(mut self) -> Result<()> {
        self.scan(0, Mode::Measure, Frame::top()).map(|_| ())
    }

    pub(crate) fn scan(&mut self, start: usize, mode: Mode<'_>, frame: Frame) -> Result<Scanned> {
        let source = self.source;
        let mut out = String::new();
        let mut leading = frame.leading;
        let mut pos = start;

        while pos < source.len() && !frame.stop.matches(&source[pos..]) {
            let rest = &source[pos..];
            let offset = next_special(rest, frame.stop);
            let expansion = if offset > 0 {
                Expansion::borrowed(&rest[..offset])
            } else {
                self.dispatch(pos, mode, frame.after_param, leading)?
            };

            if expansion.trim_before {
                whitespace::trim_trailing_spaces(&mut out);
                leading = Some(0);
            }
            leading = whitespace::advance_leading(leading, &expansion.text, &self.ctx.newline);
            out.push_str(&expansion.text);
            pos += expansion.consumed;
        }

        Ok(Scanned {
            text: out,
            consumed: pos - start,
        })
    }

    fn dispatch(
        &mut self,
        pos: usize,
        mode: Mode<'_>,
        after_param: bool,
        leading: Option<usize>,
    ) -> Result<Expansion<'a>> {
        let source = self.source;
        let rest = &source[pos..];

        if rest.starts_with("/*") {
            return self.block_comment(pos, mode, leading);
        }
        if rest.starts_with("--") {
            let len = literal::line_comment_len(rest, &self.ctx.newline);
            return Ok(if self.ctx.delete_comment {
                Expansion::dropped(len)
            } else {
                Expansion::borrowed(&rest[..len])
            });
        }

        let len = match rest.chars().next() {
            Some('\'' | '"') => literal::quoted_len(rest),
            Some(c) if after_param && literal::closing_bracket(c).is_some() => {
                literal::bracketed_len(rest)
            }
            Some(c) => c.len_utf8(),
            None => 0,
        };
        Ok(Expansion::borrowed(&rest[..len]))
    }

    fn block_comment(
        &mut self,
        pos: usize,
        mode: Mode<'_>,
        leading: Option<usize>,
    ) -> Result<Expansion<'a>> {
        let source = self.source;
        let directive = directive::classify(&source[pos..]).ok_or_else(|| Error::Parse {
            message: "unterminated block comment".to_string(),
            span: Some((pos, source.len() - pos)),
        })?;

        match directive.kind {
            DirectiveKind::ParamBind => self.param_bind(pos, directive, mode),
            DirectiveKind::DirectLiteral => self.direct_literal(pos, directive, mode),
            DirectiveKind::If => self.if_block(pos, directive, mode, leading),
            DirectiveKind::For => self.for_block(pos, directive, mode, leading),
            DirectiveKind::Generic if self.ctx.delete_comment => {
                Ok(Expansion::dropped(directive.text.len()))
            }
            DirectiveKind::Generic => Ok(Expansion::borrowed(directive.text)),
        }
    }
}

/// Offset of the nearest construct that needs more than a verbatim copy
fn next_special(rest: &str, stop: Stop) -> usize {
    rest.char_indices()
        .find(|&(i, c)| {
            let here = &rest[i..];
            matches!(c, '\'' | '"' | '(' | '[' | '{')
                || here.starts_with("--")
                || here.starts_with("/*")
                || stop.matches(here)
        })
        .map_or(rest.len(), |(i, _)| i)
}
