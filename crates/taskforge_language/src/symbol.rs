//! Symbols bound in scopes.

use std::fmt;
use std::sync::Arc;

use taskforge_foundation::{FunctionType, SourceLocation, Type};

use crate::ast::Node;
use crate::native::NativeFunction;

/// A name binding.
#[derive(Clone, Debug)]
pub enum Symbol {
    /// A variable, parameter or top-level value definition.
    Variable(VariableSymbol),
    /// A type name.
    Type(Type),
    /// A callable.
    Function(Arc<FunctionSymbol>),
}

impl Symbol {
    /// Describes the symbol's category for diagnostics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Type(_) => "type",
            Self::Function(_) => "function",
        }
    }
}

/// A variable binding.
#[derive(Clone, Debug)]
pub struct VariableSymbol {
    /// Bound name.
    pub name: Arc<str>,
    /// Static type.
    pub ty: Type,
    /// Declaration site.
    pub location: SourceLocation,
    /// Whether assignment may rebind it. Top-level definitions are immutable.
    pub mutable: bool,
}

/// Where a function's body comes from.
#[derive(Clone, Debug)]
pub enum FunctionOrigin {
    /// Declared in DSL source.
    Defined {
        /// The `FunctionDefinition` node.
        definition: Arc<Node>,
    },
    /// Provided by the host.
    Native(NativeFunction),
}

/// A resolved function: name plus signature.
///
/// Produced by the analyzer from a function definition, or by the host for a
/// native function; immutable afterwards.
#[derive(Clone, Debug)]
pub struct FunctionSymbol {
    /// Function name.
    pub name: Arc<str>,
    /// Parameter and return types.
    pub function_type: Arc<FunctionType>,
    /// Body source.
    pub origin: FunctionOrigin,
    /// Declaration site.
    pub location: SourceLocation,
}

impl FunctionSymbol {
    /// The type of the first declared parameter.
    #[must_use]
    pub fn first_parameter(&self) -> Option<&Type> {
        self.function_type.first_parameter()
    }

    /// Returns the `FunctionDefinition` node of a DSL function.
    #[must_use]
    pub fn definition(&self) -> Option<&Arc<Node>> {
        match &self.origin {
            FunctionOrigin::Defined { definition } => Some(definition),
            FunctionOrigin::Native(_) => None,
        }
    }

    /// Returns true for host-provided functions.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self.origin, FunctionOrigin::Native(_))
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.function_type == other.function_type
            && self.location == other.location
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}{}", self.name, self.function_type)
    }
}
