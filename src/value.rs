//! Parameter values
//!
//! Templates are filled from a name → [`Value`] mapping. Values are dynamic
//! because the same map feeds bound placeholders, direct literals, `if`
//! conditions and `for` sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name → value mapping handed in by the caller and returned enriched
pub type Params = BTreeMap<String, Value>;

/// A dynamically typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Truth value used by conditions and `and`/`or`/`not`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Render as a SQL literal: strings quoted with doubled quotes
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s.replace('\'', "''")),
            other => other.to_string(),
        }
    }
}

/// Direct-literal rendering. Strings come out raw so `/*$table*/` can
/// splice identifiers; nested strings are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(true) => write!(f, "TRUE"),
            Value::Bool(false) => write!(f, "FALSE"),
            Value::Int(i) => write!(f, "{}", i),
            // whole floats keep their `.0`
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(Value::to_sql_literal).collect();
                write!(f, "({})", rendered.join(", "))
            }
            Value::Map(map) => {
                let rendered: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("'{}': {}", k.replace('\'', "''"), v.to_sql_literal()))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_containers_are_falsy() {
        assert!(!Value::List(vec![]).is_truthy());
        assert!(!Value::Map(BTreeMap::new()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::from("A").is_truthy());
    }

    #[test]
    fn lists_render_as_sql_tuples() {
        assert_eq!(Value::from(vec![7, 8, 9]).to_string(), "(7, 8, 9)");
        assert_eq!(Value::from(vec!["a", "it's"]).to_string(), "('a', 'it''s')");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::from("TABNAME").to_string(), "TABNAME");
    }

    #[test]
    fn whole_floats_keep_their_decimal_point() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(-3.0).to_string(), "-3.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::from(vec![1.0, 0.25]).to_string(), "(1.0, 0.25)");
        assert_eq!(Value::Int(2).to_string(), "2");
    }

    #[test]
    fn json_maps_onto_values() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
        let mut expected = BTreeMap::new();
        expected.insert(
            "a".to_string(),
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Null,
                Value::Bool(true),
            ]),
        );
        assert_eq!(value, Value::Map(expected));
    }
}
