//! Native functions for the DSL.
//!
//! Every function takes a [`NativeContext`] and its evaluated arguments. The
//! interpreter has already checked the argument count, so a missing argument
//! only shows up as a type mismatch against `none`.

use taskforge_foundation::{
    InterpretationErrorKind, LtVec, Object, Result, Type, TypeRegistrationError, Value,
};
use taskforge_language::{Environment, NativeContext, NativeFunction};
use tracing::{debug, info};

use crate::bindings::ENTITY_HOST;

type NativeResult = std::result::Result<Value, InterpretationErrorKind>;

/// Largest list `range` will build.
pub const MAX_RANGE: i64 = 1_000_000;

fn mismatch(expected: &str, actual: Option<&Value>) -> InterpretationErrorKind {
    InterpretationErrorKind::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.map_or_else(|| "none".to_string(), Value::kind_name),
    }
}

fn count(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

// =============================================================================
// Output
// =============================================================================

/// Output: print
///
/// Strings print without quotes; everything else prints in literal form.
pub(crate) fn native_print(context: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    info!(target: "taskforge::print", "{line}");
    context.output.push(line);
    Ok(Value::None)
}

/// Output: str
pub(crate) fn native_str(_: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    Ok(Value::from(args.first().map_or_else(String::new, ToString::to_string)))
}

// =============================================================================
// Collections
// =============================================================================

/// Collection: len
pub(crate) fn native_len(_: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    match args.first() {
        Some(Value::List(v)) => Ok(count(v.len())),
        Some(Value::Set(s)) => Ok(count(s.len())),
        Some(Value::Map(m)) => Ok(count(m.len())),
        Some(Value::String(s)) => Ok(count(s.chars().count())),
        other => Err(mismatch("collection or string", other)),
    }
}

/// Collection: push
pub(crate) fn native_push(_: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    match (args.first(), args.get(1)) {
        (Some(Value::List(v)), Some(item)) => Ok(Value::List(v.push_back(item.clone()))),
        (Some(Value::Set(s)), Some(item)) => Ok(Value::Set(s.insert(item.clone()))),
        (other, _) => Err(mismatch("list or set", other)),
    }
}

/// Collection: get
pub(crate) fn native_get(_: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    match (args.first(), args.get(1)) {
        (Some(Value::List(v)), Some(Value::Int(index))) => usize::try_from(*index)
            .ok()
            .and_then(|i| v.get(i))
            .cloned()
            .ok_or(InterpretationErrorKind::IndexOutOfBounds {
                index: *index,
                length: v.len(),
            }),
        (Some(Value::Map(m)), Some(key)) => Ok(m.get(key).cloned().unwrap_or(Value::None)),
        (Some(Value::List(_)), other) => Err(mismatch("int", other)),
        (other, _) => Err(mismatch("list or map", other)),
    }
}

/// Collection: range
pub(crate) fn native_range(_: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    match args.first() {
        Some(Value::Int(n)) if *n > MAX_RANGE => Err(InterpretationErrorKind::Native {
            function: "range".to_string(),
            message: format!("{n} exceeds the limit of {MAX_RANGE}"),
        }),
        Some(Value::Int(n)) => Ok(Value::List((0..*n).map(Value::Int).collect::<LtVec<_>>())),
        other => Err(mismatch("int", other)),
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Entity: instantiate
///
/// Creates an entity carrying a copy of each prototype component as host
/// state, reachable through the component extension properties.
pub(crate) fn native_instantiate(context: &mut NativeContext<'_>, args: &[Value]) -> NativeResult {
    let Some(prototype) = args.first().and_then(Value::as_prototype) else {
        return Err(mismatch("entity_type", args.first()));
    };
    let Some(entity_type) = context.registry.lookup_origin(ENTITY_HOST) else {
        return Err(InterpretationErrorKind::Native {
            function: "instantiate".to_string(),
            message: "no entity class is registered".to_string(),
        });
    };
    let mut entity = Object::new(entity_type.aref.clone());
    entity.set("name", Value::from(&*prototype.name));
    for component in &prototype.components {
        entity.set_host(component.ty.name.clone(), Value::Object(component.clone()));
    }
    debug!(
        prototype = %prototype.name,
        components = prototype.components.len(),
        "instantiated entity"
    );
    Ok(Value::Object(entity))
}

/// Binds the native functions in the global scope.
///
/// # Errors
///
/// Returns a duplicate definition error if a name is taken, or a registration
/// error if the entity class has not been registered first.
pub fn register_natives(env: &mut Environment) -> Result<()> {
    let entity = env
        .registry()
        .lookup_origin(ENTITY_HOST)
        .map(taskforge_types::AggregateType::ty)
        .ok_or_else(|| TypeRegistrationError::UnknownType(ENTITY_HOST.to_string()))?;

    let natives = [
        NativeFunction::new("print", vec![Type::Any], Type::None, native_print),
        NativeFunction::new("str", vec![Type::Any], Type::String, native_str),
        NativeFunction::new("len", vec![Type::Any], Type::Int, native_len),
        NativeFunction::new("push", vec![Type::Any, Type::Any], Type::Any, native_push),
        NativeFunction::new("get", vec![Type::Any, Type::Any], Type::Any, native_get),
        NativeFunction::new("range", vec![Type::Int], Type::list(Type::Int), native_range),
        NativeFunction::new("instantiate", vec![Type::Prototype], entity, native_instantiate),
    ];
    for native in natives {
        env.register_native(native)?;
    }
    Ok(())
}
