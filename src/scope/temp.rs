//! Temp parameter allocation for `for` directives
//!
//! Each `for` invocation draws one prefix; the binding for variable `v` in
//! iteration `i` is named `<prefix>_<i>_<v>`. Prefixes never repeat within
//! a call and never start a base parameter name followed by `_`, so bound
//! names cannot collide with each other or with caller parameters.

use super::TempBinding;
use crate::error::{Error, Result};
use crate::options::TempNames;
use crate::value::{Params, Value};
use uuid::Uuid;

#[derive(Debug)]
pub struct TempAllocator {
    names: TempNames,
    next: usize,
}

impl TempAllocator {
    pub fn new(names: TempNames) -> Self {
        Self { names, next: 0 }
    }

    /// Fresh prefix for one `for` invocation
    pub fn next_prefix(&mut self, base: &Params) -> String {
        loop {
            let prefix = match &self.names {
                TempNames::Random => format!("tmp_{}", Uuid::new_v4().simple()),
                TempNames::Sequential(stem) => {
                    let prefix = format!("{}{}", stem, self.next);
                    self.next += 1;
                    prefix
                }
            };
            let marker = format!("{}_", prefix);
            if !base.keys().any(|k| k.starts_with(&marker)) {
                return prefix;
            }
        }
    }

    /// Bind `targets` to one iteration `item`, unpacking when there are
    /// several targets
    pub fn bind(
        prefix: &str,
        iteration: usize,
        targets: &[String],
        item: Value,
        expression: &str,
    ) -> Result<Vec<TempBinding>> {
        let values = match (targets.len(), item) {
            (1, item) => vec![item],
            (n, Value::List(items)) if items.len() == n => items,
            (n, other) => {
                let found = match &other {
                    Value::List(items) => format!("{} values", items.len()),
                    v => format!("a {}", v.type_name()),
                };
                return Err(Error::Evaluation {
                    message: format!("cannot unpack {} into {} loop variables", found, n),
                    expression: expression.to_string(),
                });
            }
        };

        Ok(targets
            .iter()
            .zip(values)
            .map(|(name, value)| TempBinding {
                source_name: name.clone(),
                generated_name: format!("{}_{}_{}", prefix, iteration, name),
                value,
            })
            .collect())
    }
}
