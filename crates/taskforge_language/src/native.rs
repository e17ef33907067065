//! Host functions callable from DSL code.

use std::fmt;

use taskforge_foundation::{FunctionType, InterpretationErrorKind, Type, Value};
use taskforge_types::TypeRegistry;

/// What a native function can reach while it runs.
pub struct NativeContext<'a> {
    /// The registry, for constructing aggregate values.
    pub registry: &'a TypeRegistry,
    /// Collected `print` output.
    pub output: &'a mut Vec<String>,
}

/// Native function body. Failures carry no location; the interpreter attaches
/// the call site.
pub type NativeFn =
    fn(&mut NativeContext<'_>, &[Value]) -> Result<Value, InterpretationErrorKind>;

/// Native function callable from the DSL.
#[derive(Clone)]
pub struct NativeFunction {
    /// Function name as seen by DSL code.
    pub name: &'static str,
    /// Declared parameter types. `Type::Any` accepts every argument.
    pub parameters: Vec<Type>,
    /// Declared return type.
    pub return_type: Type,
    /// Function pointer.
    pub func: NativeFn,
}

impl NativeFunction {
    /// Creates a native function description.
    #[must_use]
    pub fn new(name: &'static str, parameters: Vec<Type>, return_type: Type, func: NativeFn) -> Self {
        Self {
            name,
            parameters,
            return_type,
            func,
        }
    }

    /// The signature seen by the analyzer.
    #[must_use]
    pub fn function_type(&self) -> FunctionType {
        FunctionType {
            parameters: self.parameters.clone(),
            return_type: self.return_type.clone(),
        }
    }

    /// Calls the function.
    ///
    /// # Errors
    /// Returns the function's failure.
    pub fn call(
        &self,
        context: &mut NativeContext<'_>,
        args: &[Value],
    ) -> Result<Value, InterpretationErrorKind> {
        (self.func)(context, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}
