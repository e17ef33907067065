//! Error types for taskforge.
//!
//! Uses `thiserror` for ergonomic error definition. Each pipeline stage has its
//! own error type; [`Error`] wraps any of them together with optional context.

use std::fmt;

use thiserror::Error;

use crate::location::SourceLocation;
use crate::types::Type;

/// The main error type for taskforge operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a call frame onto this error's context, creating the context if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Records the content unit this error came from, keeping any call frames.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_source(source));
        self
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(
        location: SourceLocation,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::Parse(ParseError {
            location,
            expected: expected.into(),
            found: found.into(),
        }))
    }

    /// Creates a semantic error.
    #[must_use]
    pub fn semantic(location: SourceLocation, kind: SemanticErrorKind) -> Self {
        Self::new(ErrorKind::Semantic(SemanticError { location, kind }))
    }

    /// Creates an interpretation error.
    #[must_use]
    pub fn interpretation(location: SourceLocation, kind: InterpretationErrorKind) -> Self {
        Self::new(ErrorKind::Interpretation(InterpretationError { location, kind }))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the source location this error points at, if it has one.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match &self.kind {
            ErrorKind::Parse(e) => Some(&e.location),
            ErrorKind::Semantic(e) => Some(&e.location),
            ErrorKind::Interpretation(e) => Some(&e.location),
            ErrorKind::TypeRegistration(_)
            | ErrorKind::Registry(_)
            | ErrorKind::Io(_)
            | ErrorKind::Serialization(_)
            | ErrorKind::Internal(_) => None,
        }
    }

    /// Returns the error message without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::Parse(e) => e.message(),
            ErrorKind::Semantic(e) => e.kind.to_string(),
            ErrorKind::Interpretation(e) => e.kind.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::new(ErrorKind::Parse(e))
    }
}

impl From<TypeRegistrationError> for Error {
    fn from(e: TypeRegistrationError) -> Self {
        Self::new(ErrorKind::TypeRegistration(e))
    }
}

impl From<SemanticError> for Error {
    fn from(e: SemanticError) -> Self {
        Self::new(ErrorKind::Semantic(e))
    }
}

impl From<InterpretationError> for Error {
    fn from(e: InterpretationError) -> Self {
        Self::new(ErrorKind::Interpretation(e))
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::new(ErrorKind::Registry(e))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed DSL source.
    #[error(transparent)]
    Parse(ParseError),

    /// Invalid host type registration.
    #[error(transparent)]
    TypeRegistration(TypeRegistrationError),

    /// Name or type resolution failure.
    #[error(transparent)]
    Semantic(SemanticError),

    /// Evaluation fault.
    #[error(transparent)]
    Interpretation(InterpretationError),

    /// Scenario builder registry misuse.
    #[error(transparent)]
    Registry(RegistryError),

    /// File system failure.
    #[error("io error: {0}")]
    Io(String),

    /// Artifact export failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A syntax error with an expected-vs-found description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: expected {expected}, found {found}")]
pub struct ParseError {
    /// Where the parser gave up on the current construct.
    pub location: SourceLocation,
    /// What the grammar allowed at this point.
    pub expected: String,
    /// What was actually in the source.
    pub found: String,
}

impl ParseError {
    /// The message without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        format!("expected {}, found {}", self.expected, self.found)
    }
}

/// Failures while registering host classes or extension properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRegistrationError {
    /// The same host class was registered twice.
    #[error("origin type `{0}` is already registered")]
    DuplicateOriginType(String),

    /// Another type already uses this DSL name.
    #[error("a type named `{0}` is already registered")]
    DuplicateTypeName(String),

    /// A host class lists the same DSL member name twice.
    #[error("type `{type_name}` declares member `{member}` more than once")]
    DuplicateMember {
        /// The aggregate type being registered.
        type_name: String,
        /// The repeated member name.
        member: String,
    },

    /// An extension property has the name of a declared member.
    #[error("extension property `{property}` on `{type_name}` collides with a declared member")]
    MemberConflict {
        /// The extended aggregate type.
        type_name: String,
        /// The property name.
        property: String,
    },

    /// Two extension properties with the same name on the same type.
    #[error("extension property `{property}` is already registered on `{type_name}`")]
    DuplicateExtension {
        /// The extended aggregate type.
        type_name: String,
        /// The property name.
        property: String,
    },

    /// A member, extension target or type expression names an unknown type.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A type expression could not be parsed.
    #[error("invalid type expression `{0}`")]
    InvalidTypeName(String),

    /// A declared default does not fit the member's type.
    #[error("default for member `{member}` of `{type_name}` does not have type {expected}")]
    InvalidDefault {
        /// The aggregate type being registered.
        type_name: String,
        /// The member whose default is wrong.
        member: String,
        /// The member's declared type.
        expected: Type,
    },
}

/// A name or type resolution failure, tagged with the offending node's location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: {kind}")]
pub struct SemanticError {
    /// Location of the node that failed to resolve.
    pub location: SourceLocation,
    /// What went wrong.
    pub kind: SemanticErrorKind,
}

/// Kinds of semantic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticErrorKind {
    /// An identifier does not resolve in any enclosing scope.
    #[error("unresolved identifier `{0}`")]
    UnresolvedIdentifier(String),

    /// An expression has the wrong type.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// The type required by the context.
        expected: Type,
        /// The type of the expression.
        actual: Type,
    },

    /// A name is declared twice in the same scope.
    #[error("duplicate definition of `{0}` in this scope")]
    DuplicateDefinition(String),

    /// A type expression names no known type.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A member name is neither declared on the type nor an extension property.
    #[error("type `{type_name}` has no member `{member}`")]
    UnknownMember {
        /// The aggregate type.
        type_name: String,
        /// The member that was referenced.
        member: String,
    },

    /// Member access on a value that is not an aggregate.
    #[error("type {0} has no members")]
    NoMembers(Type),

    /// A call through something that is not a function.
    #[error("`{0}` is not a function")]
    NotCallable(String),

    /// A function name used as a value.
    #[error("function `{0}` cannot be used as a value")]
    FunctionAsValue(String),

    /// A type name used as a value.
    #[error("type `{0}` cannot be used as a value")]
    TypeAsValue(String),

    /// Wrong number of call arguments.
    #[error("`{name}` expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// The function called.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// Assignment to something that is not a variable or settable member.
    #[error("cannot assign to {0}")]
    NotAssignable(String),

    /// Operator applied to unsupported operand types.
    #[error("operator `{op}` cannot be applied to {lhs} and {rhs}")]
    InvalidOperands {
        /// The operator symbol.
        op: String,
        /// Left operand type.
        lhs: Type,
        /// Right operand type.
        rhs: Type,
    },

    /// A `for` loop over something that is not a list or set.
    #[error("type {0} is not iterable")]
    NotIterable(Type),

    /// A graph node that is not a task definition.
    #[error("`{0}` is not a task definition")]
    NotATask(String),

    /// A graph attribute with an unknown key or value.
    #[error("invalid graph attribute `{key}={value}`")]
    InvalidAttribute {
        /// Attribute key.
        key: String,
        /// Attribute value.
        value: String,
    },

    /// A definition type that cannot be instantiated from the DSL.
    #[error("type `{0}` cannot be defined as an object")]
    NotInstantiable(String),

    /// A function with a return type can finish without returning.
    #[error("function `{0}` does not return a value on every path")]
    MissingReturn(String),
}

/// An evaluation fault, tagged with the triggering node's location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: {kind}")]
pub struct InterpretationError {
    /// Location of the node being evaluated.
    pub location: SourceLocation,
    /// What went wrong.
    pub kind: InterpretationErrorKind,
}

/// Kinds of interpretation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretationErrorKind {
    /// A name has no runtime binding.
    #[error("unbound reference `{0}`")]
    UnboundReference(String),

    /// A value was provided for a member the type does not have.
    #[error("type `{type_name}` has no member `{member}`")]
    InvalidMember {
        /// The aggregate type.
        type_name: String,
        /// The provided member name.
        member: String,
    },

    /// A member that cannot be written (read-only extension property).
    #[error("member `{member}` of `{type_name}` cannot be assigned")]
    InvalidMemberAssignment {
        /// The aggregate type.
        type_name: String,
        /// The member name.
        member: String,
    },

    /// A member without a default was omitted.
    #[error("member `{member}` of `{type_name}` has no default and was not provided")]
    MissingMember {
        /// The aggregate type.
        type_name: String,
        /// The omitted member.
        member: String,
    },

    /// A runtime value had the wrong kind.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Description of the expected value kind.
        expected: String,
        /// Description of the actual value kind.
        actual: String,
    },

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed.
    #[error("integer overflow in `{0}`")]
    IntegerOverflow(String),

    /// Index outside a list.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: i64,
        /// The length of the list.
        length: usize,
    },

    /// Top-level definitions that depend on each other.
    #[error("cyclic definition of `{0}`")]
    CyclicDefinition(String),

    /// Too many nested calls.
    #[error("call depth limit ({0}) exceeded")]
    CallDepthExceeded(usize),

    /// A `while` loop ran for too long.
    #[error("loop iteration limit ({0}) exceeded")]
    LoopLimitExceeded(usize),

    /// A native function reported a failure.
    #[error("native function `{function}` failed: {message}")]
    Native {
        /// The native function name.
        function: String,
        /// The failure description.
        message: String,
    },
}

/// Misuse of the scenario builder registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A storage slot was initialized twice for the same type.
    #[error("scenario builder storage for type `{0}` is already initialized")]
    DuplicateStorage(String),

    /// The type cannot key the registry because its origin is not a task.
    #[error("type `{0}` is not a task type")]
    NotATaskType(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or content unit name.
    pub source: Option<String>,
    /// Stack of DSL function calls, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        for frame in &self.stack {
            writeln!(f)?;
            write!(f, "  in {frame}")?;
        }
        Ok(())
    }
}

/// An ordered list of errors from one compilation pass.
///
/// Renders as one `location: message` line per entry.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the recorded errors.
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }

    /// Returns the errors as `(location, message)` pairs.
    #[must_use]
    pub fn entries(&self) -> Vec<(Option<SourceLocation>, String)> {
        self.errors
            .iter()
            .map(|e| (e.location().cloned(), e.message()))
            .collect()
    }

    /// Consumes the list, returning the errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }
}

impl From<Error> for Diagnostics {
    fn from(error: Error) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl From<Vec<Error>> for Diagnostics {
    fn from(errors: Vec<Error>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match error.location() {
                Some(location) => write!(f, "{location}: {}", error.message())?,
                None => write!(f, "{}", error.message())?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
