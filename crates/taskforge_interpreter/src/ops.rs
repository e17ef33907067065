//! Arithmetic and comparison helpers.
//!
//! These operate on evaluated values and report failures as bare
//! [`InterpretationErrorKind`]s; the interpreter attaches the node location.

#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use taskforge_foundation::{InterpretationErrorKind, LtMap, LtSet, LtVec, Type, Value};
use taskforge_language::{BinaryOp, UnaryOp};

type OpResult = Result<Value, InterpretationErrorKind>;

fn mismatch(expected: &str, actual: &Value) -> InterpretationErrorKind {
    InterpretationErrorKind::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.kind_name(),
    }
}

fn overflow(op: BinaryOp) -> InterpretationErrorKind {
    InterpretationErrorKind::IntegerOverflow(op.symbol().to_string())
}

/// Applies a non-short-circuiting binary operator.
///
/// `and` and `or` are evaluated lazily by the interpreter and never reach here.
pub(crate) fn binary(op: BinaryOp, a: &Value, b: &Value) -> OpResult {
    match op {
        BinaryOp::Add => add_values(a, b),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => arithmetic(op, a, b),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(a, b))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(a, b))),
        BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
            let ordering = compare_values(a, b)?;
            Ok(Value::Bool(match op {
                BinaryOp::Less => ordering == Ordering::Less,
                BinaryOp::LessEq => ordering != Ordering::Greater,
                BinaryOp::Greater => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or => match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(if op == BinaryOp::And {
                *x && *y
            } else {
                *x || *y
            })),
            (Value::Bool(_), other) | (other, _) => Err(mismatch("bool", other)),
        },
    }
}

/// Adds two numbers or concatenates two strings.
fn add_values(a: &Value, b: &Value) -> OpResult {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Ok(Value::from(format!("{x}{y}"))),
        _ => arithmetic(BinaryOp::Add, a, b),
    }
}

fn arithmetic(op: BinaryOp, a: &Value, b: &Value) -> OpResult {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_arithmetic(op, *x, *y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (Some(x), Some(y)) = (a.as_number(), b.as_number()) else {
                return Err(mismatch("number", a));
            };
            float_arithmetic(op, x, y)
        }
        (Value::Int(_) | Value::Float(_), other) | (other, _) => Err(mismatch("number", other)),
    }
}

fn int_arithmetic(op: BinaryOp, x: i64, y: i64) -> OpResult {
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div | BinaryOp::Rem if y == 0 => {
            return Err(InterpretationErrorKind::DivisionByZero);
        }
        BinaryOp::Div => x.checked_div(y),
        BinaryOp::Rem => x.checked_rem(y),
        _ => {
            return Err(InterpretationErrorKind::TypeMismatch {
                expected: "arithmetic operator".to_string(),
                actual: op.symbol().to_string(),
            });
        }
    };
    result.map(Value::Int).ok_or_else(|| overflow(op))
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> OpResult {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div | BinaryOp::Rem if y == 0.0 => {
            return Err(InterpretationErrorKind::DivisionByZero);
        }
        BinaryOp::Div => x / y,
        BinaryOp::Rem => x % y,
        _ => {
            return Err(InterpretationErrorKind::TypeMismatch {
                expected: "arithmetic operator".to_string(),
                actual: op.symbol().to_string(),
            });
        }
    };
    Ok(Value::Float(result))
}

/// Equality with `int` and `float` comparing by numeric value.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            a.as_number() == b.as_number()
        }
        _ => a == b,
    }
}

/// Orders two numbers or two strings.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Result<Ordering, InterpretationErrorKind> {
    a.partial_cmp(b).ok_or_else(|| InterpretationErrorKind::TypeMismatch {
        expected: format!("a value comparable with {}", a.kind_name()),
        actual: b.kind_name(),
    })
}

/// Applies a unary operator.
pub(crate) fn unary(op: UnaryOp, value: &Value) -> OpResult {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Not, other) => Err(mismatch("bool", other)),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| InterpretationErrorKind::IntegerOverflow("-".to_string())),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Neg, other) => Err(mismatch("number", other)),
    }
}

/// Converts a value to its declared type, descending into collections.
pub(crate) fn coerce(value: Value, ty: &Type) -> Value {
    match (value, ty) {
        (Value::List(items), Type::List(element)) if needs_coercion(element) => Value::List(
            items
                .iter()
                .map(|v| coerce(v.clone(), element))
                .collect::<LtVec<_>>(),
        ),
        (Value::Set(items), Type::Set(element)) if needs_coercion(element) => Value::Set(
            items
                .iter()
                .map(|v| coerce(v.clone(), element))
                .collect::<LtSet<_>>(),
        ),
        (Value::Map(entries), Type::Map(key, val)) if needs_coercion(key) || needs_coercion(val) => {
            Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (coerce(k.clone(), key), coerce(v.clone(), val)))
                    .collect::<LtMap<_, _>>(),
            )
        }
        (value, ty) => value.coerce_to(ty),
    }
}

fn needs_coercion(ty: &Type) -> bool {
    match ty {
        Type::Float => true,
        Type::List(t) | Type::Set(t) => needs_coercion(t),
        Type::Map(k, v) => needs_coercion(k) || needs_coercion(v),
        _ => false,
    }
}

/// Returns true if a runtime value can be stored where `ty` is declared.
///
/// Collections are checked element by element, since values returned by
/// `any`-typed natives carry no static element type.
pub(crate) fn fits(value: &Value, ty: &Type) -> bool {
    match (value, ty) {
        (_, Type::Any) => true,
        (Value::List(items), Type::List(element)) => items.iter().all(|v| fits(v, element)),
        (Value::Set(items), Type::Set(element)) => items.iter().all(|v| fits(v, element)),
        (Value::Map(entries), Type::Map(key, val)) => entries
            .iter()
            .all(|(k, v)| fits(k, key) && fits(v, val)),
        (value, ty) => ty.accepts(&value.value_type()),
    }
}
