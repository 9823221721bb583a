//! Per-call configuration
//!
//! Every setting that shapes a scan lives here and is threaded through the
//! scanner explicitly. Nothing is process-wide.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Output format for bound parameter placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `:name`
    #[default]
    Named,
    /// `%(name)s`
    Pyformat,
}

impl ParamStyle {
    pub fn placeholder(&self, name: &str) -> String {
        match self {
            ParamStyle::Named => format!(":{}", name),
            ParamStyle::Pyformat => format!("%({})s", name),
        }
    }
}

impl fmt::Display for ParamStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamStyle::Named => write!(f, "named"),
            ParamStyle::Pyformat => write!(f, "pyformat"),
        }
    }
}

impl FromStr for ParamStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "named" => Ok(ParamStyle::Named),
            "pyformat" => Ok(ParamStyle::Pyformat),
            _ => Err(Error::validation(format!(
                "unsupported param style '{}', expected named or pyformat",
                s
            ))),
        }
    }
}

/// How `for` directives name their per-iteration temp parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TempNames {
    /// `tmp_<uuid>` per invocation
    #[default]
    Random,
    /// `<stem>0`, `<stem>1`, ... in evaluation order
    Sequential(String),
}

/// Options recognised by [`crate::parse_template`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Strip generic `/* */` and `--` comments from the output
    pub delete_comment: bool,
    /// Line terminator recognised inside the template
    pub newline: String,
    pub param_style: ParamStyle,
    pub temp_names: TempNames,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delete_comment: true,
            newline: "\n".to_string(),
            param_style: ParamStyle::Named,
            temp_names: TempNames::Random,
        }
    }
}

impl Options {
    pub fn keep_comments(mut self) -> Self {
        self.delete_comment = false;
        self
    }

    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    pub fn with_temp_names(mut self, temp_names: TempNames) -> Self {
        self.temp_names = temp_names;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.newline.is_empty() {
            return Err(Error::validation("newline must not be empty"));
        }
        if let TempNames::Sequential(stem) = &self.temp_names {
            let valid = stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(Error::validation(format!(
                    "temp name stem '{}' may only contain letters, digits and '_'",
                    stem
                )));
            }
        }
        Ok(())
    }
}
