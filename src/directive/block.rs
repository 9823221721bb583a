//! `/*%if*/` and `/*%for*/` evaluation
//!
//! Both directives own a body region running to the matching `/*end*/`.
//! Nested directives inside the body are handled by the recursive scan, so
//! the first `/*end*/` the body scan stops at is always its own.

use super::Directive;
use crate::error::Result;
use crate::expr::{Condition, Iteration};
use crate::scanner::{whitespace, Expansion, Frame, Mode, Scanner, Stop};
use crate::scope::TempAllocator;
use std::borrow::Cow;
use tracing::trace;

/// A scanned `if`/`for` body
#[derive(Debug)]
pub(crate) struct Region {
    pub text: String,
    /// Bytes from the end of the opening directive through `/*end*/`
    pub consumed: usize,
    /// The opening directive sat alone on its line
    pub trim_before: bool,
}

impl<'a> Scanner<'a> {
    /// Scan the body that starts right after an opening directive
    pub(crate) fn body_region(
        &mut self,
        start: usize,
        mode: Mode<'_>,
        leading: Option<usize>,
    ) -> Result<Region> {
        let source = self.source;
        let newline = self.ctx.newline.clone();

        let skip = leading.and(whitespace::skip_directive_line(&source[start..], &newline));
        let frame = Frame {
            stop: Stop::End,
            after_param: false,
            leading: skip.map(|_| 0),
        };
        let skip_len = skip.unwrap_or(0);

        let mut scanned = self.scan(start + skip_len, mode, frame)?;
        let after = start + skip_len + scanned.consumed;
        let closing = whitespace::close_region(&mut scanned.text, &source[after..], &newline);

        Ok(Region {
            text: scanned.text,
            consumed: skip_len + scanned.consumed + closing,
            trim_before: skip.is_some(),
        })
    }

    pub(crate) fn if_block(
        &mut self,
        pos: usize,
        directive: Directive<'a>,
        mode: Mode<'_>,
        leading: Option<usize>,
    ) -> Result<Expansion<'a>> {
        let condition = Condition::parse(directive.argument())?;
        let body_start = pos + directive.text.len();

        let keep = match mode {
            Mode::Render(scope) => condition.evaluate(scope)?,
            Mode::Measure => true,
        };
        trace!(condition = condition.source(), keep, "if directive");

        let region = if keep {
            self.body_region(body_start, mode, leading)?
        } else {
            self.body_region(body_start, Mode::Measure, leading)?
        };

        Ok(Expansion {
            text: if keep {
                Cow::Owned(region.text)
            } else {
                Cow::Borrowed("")
            },
            consumed: directive.text.len() + region.consumed,
            trim_before: region.trim_before,
        })
    }

    pub(crate) fn for_block(
        &mut self,
        pos: usize,
        directive: Directive<'a>,
        mode: Mode<'_>,
        leading: Option<usize>,
    ) -> Result<Expansion<'a>> {
        let iteration = Iteration::parse(directive.argument())?;
        let body_start = pos + directive.text.len();

        // The body span does not depend on how many times it is rendered
        let measured = self.body_region(body_start, Mode::Measure, leading)?;

        let mut text = String::new();
        if let Mode::Render(scope) = mode {
            let items = iteration.items(scope)?;
            let prefix = self.temps.next_prefix(scope.base());
            trace!(
                header = iteration.source(),
                prefix = %prefix,
                iterations = items.len(),
                "for directive"
            );

            for (i, item) in items.into_iter().enumerate() {
                let frame =
                    TempAllocator::bind(&prefix, i, iteration.targets(), item, iteration.source())?;
                let child = scope.child(frame);
                let region = self.body_region(body_start, Mode::Render(&child), leading)?;
                text.push_str(&region.text);
            }
        }

        Ok(Expansion {
            text: Cow::Owned(text),
            consumed: directive.text.len() + measured.consumed,
            trim_before: measured.trim_before,
        })
    }
}
