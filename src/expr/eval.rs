//! Expression evaluation

use super::ast::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::scope::Bindings;
use crate::value::Value;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("name '{0}' is not defined")]
    UndefinedName(String),
    #[error("{0}")]
    Type(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("key '{0}' not found")]
    MissingKey(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}

type EvalResult = Result<Value, EvalError>;

fn type_error(message: String) -> EvalError {
    EvalError::Type(message)
}

pub fn evaluate(expr: &Expr, bindings: &dyn Bindings) -> EvalResult {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => bindings
            .lookup(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedName(name.clone())),
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, bindings))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, bindings)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                UnaryOp::Neg => match value {
                    Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(EvalError::Overflow),
                    Value::Float(f) => Ok(Value::Float(-f)),
                    other => Err(type_error(format!("cannot negate {}", other.type_name()))),
                },
            }
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, bindings)?;
            let right = evaluate(right, bindings)?;
            arithmetic(*op, left, right)
        }
        Expr::Compare { first, rest } => {
            let mut left = evaluate(first, bindings)?;
            for (op, operand) in rest {
                let right = evaluate(operand, bindings)?;
                if !compare(*op, &left, &right)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::And(left, right) => {
            if !evaluate(left, bindings)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(evaluate(right, bindings)?.is_truthy()))
        }
        Expr::Or(left, right) => {
            if evaluate(left, bindings)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(evaluate(right, bindings)?.is_truthy()))
        }
        Expr::Subscript { target, index } => {
            let target = evaluate(target, bindings)?;
            let index = evaluate(index, bindings)?;
            subscript(target, index)
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            call(function, args)
        }
        Expr::Method {
            receiver,
            method,
            args,
        } => {
            let receiver = evaluate(receiver, bindings)?;
            if !args.is_empty() {
                return Err(type_error(format!("{}() takes no arguments", method)));
            }
            call_method(receiver, method)
        }
    }
}

/// Elements produced by iterating `value`
pub fn iterate(value: Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) => Ok(items),
        Value::Map(map) => Ok(map.into_keys().map(Value::Str).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        other => Err(type_error(format!("{} is not iterable", other.type_name()))),
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    match (op, &left, &right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{}{}", a, b))),
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            return Ok(Value::List(items));
        }
        _ => {}
    }

    if let (Value::Int(a), Value::Int(b)) = (&left, &right) {
        let (a, b) = (*a, *b);
        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return Ok(Value::Float(a as f64 / b as f64));
            }
            BinaryOp::FloorDiv => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                a.checked_div_euclid(b).map(|q| {
                    // div_euclid rounds up when the divisor is negative
                    if b < 0 && a.rem_euclid(b) != 0 {
                        q - 1
                    } else {
                        q
                    }
                })
            }
            BinaryOp::Mod => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                // result takes the sign of the divisor
                a.checked_rem(b).map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
            }
        };
        return result.map(Value::Int).ok_or(EvalError::Overflow);
    }

    let (a, b) = match (as_float(&left), as_float(&right)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(type_error(format!(
                "unsupported operand types for {:?}: {} and {}",
                op,
                left.type_name(),
                right.type_name()
            )))
        }
    };
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
            return Err(EvalError::DivisionByZero)
        }
        BinaryOp::Div => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Mod => a - b * (a / b).floor(),
    };
    Ok(Value::Float(result))
}

fn equals(left: &Value, right: &Value) -> bool {
    match (as_float(left), as_float(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn order(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match (as_float(left), as_float(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    ordering.ok_or_else(|| {
        type_error(format!(
            "cannot order {} and {}",
            left.type_name(),
            right.type_name()
        ))
    })
}

fn contains(container: &Value, item: &Value) -> Result<bool, EvalError> {
    match container {
        Value::List(items) => Ok(items.iter().any(|x| equals(x, item))),
        Value::Map(map) => match item {
            Value::Str(key) => Ok(map.contains_key(key)),
            _ => Ok(false),
        },
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(type_error(format!(
                "'in <str>' requires a str operand, not {}",
                other.type_name()
            ))),
        },
        other => Err(type_error(format!(
            "argument of type {} is not a container",
            other.type_name()
        ))),
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    Ok(match op {
        CompareOp::Eq => equals(left, right),
        CompareOp::NotEq => !equals(left, right),
        CompareOp::Lt => order(left, right)? == Ordering::Less,
        CompareOp::LtEq => order(left, right)? != Ordering::Greater,
        CompareOp::Gt => order(left, right)? == Ordering::Greater,
        CompareOp::GtEq => order(left, right)? != Ordering::Less,
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
        CompareOp::Is => left == right,
        CompareOp::IsNot => left != right,
    })
}

fn subscript(target: Value, index: Value) -> EvalResult {
    match (target, index) {
        (Value::List(items), Value::Int(i)) => {
            let len = items.len();
            let pos = if i < 0 { i + len as i64 } else { i };
            usize::try_from(pos)
                .ok()
                .and_then(|p| items.into_iter().nth(p))
                .ok_or(EvalError::IndexOutOfRange { index: i, len })
        }
        (Value::Map(mut map), Value::Str(key)) => {
            map.remove(&key).ok_or(EvalError::MissingKey(key))
        }
        (target, index) => Err(type_error(format!(
            "{} cannot be indexed by {}",
            target.type_name(),
            index.type_name()
        ))),
    }
}

fn expect_int(value: &Value, function: &str) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(type_error(format!(
            "{}() expects int arguments, not {}",
            function,
            other.type_name()
        ))),
    }
}

fn call(function: &str, args: Vec<Value>) -> EvalResult {
    match function {
        "len" => match args.as_slice() {
            [Value::List(items)] => Ok(Value::Int(items.len() as i64)),
            [Value::Map(map)] => Ok(Value::Int(map.len() as i64)),
            [Value::Str(s)] => Ok(Value::Int(s.chars().count() as i64)),
            [other] => Err(type_error(format!("{} has no len()", other.type_name()))),
            _ => Err(type_error("len() takes exactly one argument".to_string())),
        },
        "range" => {
            let bounds = args
                .iter()
                .map(|a| expect_int(a, "range"))
                .collect::<Result<Vec<_>, _>>()?;
            let (start, stop, step) = match bounds.as_slice() {
                [stop] => (0, *stop, 1),
                [start, stop] => (*start, *stop, 1),
                [start, stop, step] => (*start, *stop, *step),
                _ => return Err(type_error("range() takes 1 to 3 arguments".to_string())),
            };
            if step == 0 {
                return Err(type_error("range() step must not be zero".to_string()));
            }
            let mut items = Vec::new();
            let mut current = start;
            while (step > 0 && current < stop) || (step < 0 && current > stop) {
                items.push(Value::Int(current));
                current = match current.checked_add(step) {
                    Some(next) => next,
                    None => break,
                };
            }
            Ok(Value::List(items))
        }
        "enumerate" => match <[Value; 1]>::try_from(args) {
            Ok([source]) => {
                let items = iterate(source)?;
                Ok(Value::List(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| Value::List(vec![Value::Int(i as i64), item]))
                        .collect(),
                ))
            }
            Err(_) => Err(type_error("enumerate() takes exactly one argument".to_string())),
        },
        "zip" => {
            let columns = args
                .into_iter()
                .map(iterate)
                .collect::<Result<Vec<_>, _>>()?;
            let len = columns.iter().map(Vec::len).min().unwrap_or(0);
            Ok(Value::List(
                (0..len)
                    .map(|row| Value::List(columns.iter().map(|c| c[row].clone()).collect()))
                    .collect(),
            ))
        }
        other => Err(EvalError::UnknownFunction(other.to_string())),
    }
}

fn call_method(receiver: Value, method: &str) -> EvalResult {
    match (receiver, method) {
        (Value::Map(map), "items") => Ok(Value::List(
            map.into_iter()
                .map(|(k, v)| Value::List(vec![Value::Str(k), v]))
                .collect(),
        )),
        (Value::Map(map), "keys") => Ok(Value::List(map.into_keys().map(Value::Str).collect())),
        (Value::Map(map), "values") => Ok(Value::List(map.into_values().collect())),
        (receiver, method) => Err(type_error(format!(
            "{} has no method {}()",
            receiver.type_name(),
            method
        ))),
    }
}
