//! `/*:name*/` and `/*$name*/` evaluation

use super::Directive;
use crate::error::{Error, Result};
use crate::scanner::{Expansion, Frame, Mode, Scanner, Stop};
use crate::scope::Resolved;
use std::borrow::Cow;
use tracing::{trace, warn};

impl<'a> Scanner<'a> {
    /// Length of the dummy literal that follows a bind directive ending at
    /// `start`
    fn dummy_len(&mut self, start: usize) -> Result<usize> {
        let frame = Frame {
            stop: Stop::SimpleValue,
            after_param: true,
            leading: None,
        };
        Ok(self.scan(start, Mode::Measure, frame)?.consumed)
    }

    pub(crate) fn param_bind(
        &mut self,
        pos: usize,
        directive: Directive<'a>,
        mode: Mode<'_>,
    ) -> Result<Expansion<'a>> {
        let name = directive.argument();
        let dummy = self.dummy_len(pos + directive.text.len())?;
        let style = self.ctx.param_style;

        let placeholder = match mode {
            Mode::Measure => style.placeholder(name),
            Mode::Render(scope) => match scope.resolve(name) {
                Some(Resolved::Temp(binding)) => {
                    trace!(name, bound = %binding.generated_name, "bind temp parameter");
                    self.bound
                        .insert(binding.generated_name.clone(), binding.value.clone());
                    style.placeholder(&binding.generated_name)
                }
                Some(Resolved::Base(_)) => {
                    trace!(name, "bind parameter");
                    style.placeholder(name)
                }
                None => {
                    warn!(name, offset = pos, "bind directive names an undefined parameter");
                    style.placeholder(name)
                }
            },
        };

        Ok(Expansion {
            text: Cow::Owned(placeholder),
            consumed: directive.text.len() + dummy,
            trim_before: false,
        })
    }

    pub(crate) fn direct_literal(
        &mut self,
        pos: usize,
        directive: Directive<'a>,
        mode: Mode<'_>,
    ) -> Result<Expansion<'a>> {
        let name = directive.argument();
        let dummy = self.dummy_len(pos + directive.text.len())?;
        let consumed = directive.text.len() + dummy;

        let scope = match mode {
            Mode::Measure => return Ok(Expansion::dropped(consumed)),
            Mode::Render(scope) => scope,
        };
        let value = scope.resolve(name).ok_or_else(|| Error::UndefinedName {
            name: name.to_string(),
            expression: directive.text.to_string(),
        })?;
        trace!(name, "embed literal");

        Ok(Expansion {
            text: Cow::Owned(value.value().to_string()),
            consumed,
            trim_before: false,
        })
    }
}
