//! Directive expressions
//!
//! `if` conditions and `for` sources are written in a small, closed
//! expression language: literals, names, comparisons, membership,
//! arithmetic, `and`/`or`/`not`, subscripts and a handful of built-in
//! calls. Expressions are parsed into an [`ast::Expr`] and evaluated
//! against a [`Bindings`] view; nothing outside the scope is reachable.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

use crate::error::{Error, Result};
use crate::scope::Bindings;
use crate::value::Value;
use std::fmt;

pub use ast::{Expr, ForHeader};
pub use eval::EvalError;

/// Malformed expression text
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

fn syntax_error(err: SyntaxError, source: &str) -> Error {
    Error::Evaluation {
        message: err.to_string(),
        expression: source.to_string(),
    }
}

fn eval_error(err: EvalError, source: &str) -> Error {
    match err {
        EvalError::UndefinedName(name) => Error::UndefinedName {
            name,
            expression: source.to_string(),
        },
        other => Error::Evaluation {
            message: other.to_string(),
            expression: source.to_string(),
        },
    }
}

/// A parsed `if` condition
#[derive(Debug, Clone)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    pub fn parse(source: &str) -> Result<Self> {
        let expr = parser::parse_expression(source).map_err(|e| syntax_error(e, source))?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Bool results are used as-is; names, subscripts and literals are
    /// tested by truthiness; anything else is rejected.
    pub fn evaluate(&self, bindings: &dyn Bindings) -> Result<bool> {
        let value = eval::evaluate(&self.expr, bindings).map_err(|e| eval_error(e, &self.source))?;
        match value {
            Value::Bool(b) => Ok(b),
            other if self.expr.is_truth_tested() => Ok(other.is_truthy()),
            _ => Err(Error::NonBooleanCondition {
                expression: self.source.clone(),
            }),
        }
    }
}

/// A parsed `for` header
#[derive(Debug, Clone)]
pub struct Iteration {
    source: String,
    header: ForHeader,
}

impl Iteration {
    pub fn parse(source: &str) -> Result<Self> {
        let header = parser::parse_for_header(source).map_err(|e| syntax_error(e, source))?;
        Ok(Self {
            source: source.to_string(),
            header,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn targets(&self) -> &[String] {
        &self.header.targets
    }

    /// Evaluate the source expression into its ordered elements
    pub fn items(&self, bindings: &dyn Bindings) -> Result<Vec<Value>> {
        let value =
            eval::evaluate(&self.header.iterable, bindings).map_err(|e| eval_error(e, &self.source))?;
        eval::iterate(value).map_err(|e| eval_error(e, &self.source))
    }
}
