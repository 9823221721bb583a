//! Layered name resolution
//!
//! A [`Scope`] is the caller's parameters with one frame of temp bindings
//! per enclosing `for`. Frames borrow their parent, so a scope is a
//! read-only view that lives exactly as long as the body scan using it.

pub mod temp;

use crate::value::{Params, Value};

pub use temp::TempAllocator;

/// A loop variable bound for one iteration
#[derive(Debug, Clone, PartialEq)]
pub struct TempBinding {
    /// Loop variable name as written in the template
    pub source_name: String,
    /// Collision-free name used for the bound placeholder
    pub generated_name: String,
    pub value: Value,
}

/// What a directive name resolved to
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'s> {
    Temp(&'s TempBinding),
    Base(&'s Value),
}

impl<'s> Resolved<'s> {
    pub fn value(&self) -> &'s Value {
        match self {
            Resolved::Temp(binding) => &binding.value,
            Resolved::Base(value) => value,
        }
    }
}

/// Read access to named values, as needed by the expression evaluator
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl Bindings for Params {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

#[derive(Debug)]
pub struct Scope<'s> {
    base: &'s Params,
    parent: Option<&'s Scope<'s>>,
    frame: Vec<TempBinding>,
}

impl<'s> Scope<'s> {
    pub fn root(base: &'s Params) -> Self {
        Self {
            base,
            parent: None,
            frame: Vec::new(),
        }
    }

    /// A scope where `frame` shadows everything visible from `self`
    pub fn child(&'s self, frame: Vec<TempBinding>) -> Scope<'s> {
        Scope {
            base: self.base,
            parent: Some(self),
            frame,
        }
    }

    pub fn base(&self) -> &'s Params {
        self.base
    }

    /// Innermost binding for `name`
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(binding) = scope.frame.iter().find(|b| b.source_name == name) {
                return Some(Resolved::Temp(binding));
            }
            current = scope.parent;
        }
        self.base.get(name).map(Resolved::Base)
    }
}

impl Bindings for Scope<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.resolve(name).map(|r| r.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(source: &str, generated: &str, value: i64) -> TempBinding {
        TempBinding {
            source_name: source.to_string(),
            generated_name: generated.to_string(),
            value: Value::Int(value),
        }
    }

    #[test]
    fn inner_frames_shadow_outer_and_base() {
        let mut base = Params::new();
        base.insert("a".to_string(), Value::from("base"));
        base.insert("b".to_string(), Value::from("base-b"));

        let root = Scope::root(&base);
        let outer = root.child(vec![binding("a", "t0_0_a", 1)]);
        let inner = outer.child(vec![binding("a", "t1_0_a", 2)]);

        match inner.resolve("a") {
            Some(Resolved::Temp(b)) => assert_eq!(b.generated_name, "t1_0_a"),
            other => panic!("expected temp binding, got {:?}", other),
        }
        assert_eq!(outer.lookup("a"), Some(&Value::Int(1)));
        assert_eq!(inner.lookup("b"), Some(&Value::from("base-b")));
        assert!(inner.resolve("missing").is_none());
    }
}
