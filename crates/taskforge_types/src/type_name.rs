//! Unresolved type expressions.
//!
//! Host registrations and DSL source both name types textually; a
//! [`TypeName`] is resolved to a [`Type`](taskforge_foundation::Type) by the
//! registry once every aggregate it mentions is known.

use std::fmt;
use std::sync::Arc;

use taskforge_foundation::TypeRegistrationError;

/// A type expression before resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// A built-in or aggregate type name.
    Named(Arc<str>),
    /// `T[]`
    List(Box<TypeName>),
    /// `T<>`
    Set(Box<TypeName>),
    /// `[K -> V]`
    Map(Box<TypeName>, Box<TypeName>),
}

impl TypeName {
    /// Creates a named type.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps this type in a list.
    #[must_use]
    pub fn list_of(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps this type in a set.
    #[must_use]
    pub fn set_of(self) -> Self {
        Self::Set(Box::new(self))
    }

    /// Creates a map type.
    #[must_use]
    pub fn map(key: TypeName, value: TypeName) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Parses a type expression such as `float`, `quest[]` or `[string -> int<>]`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeRegistrationError::InvalidTypeName`] if the text is not a
    /// well-formed type expression.
    pub fn parse(text: &str) -> Result<Self, TypeRegistrationError> {
        let mut cursor = Cursor {
            text,
            chars: text.char_indices().peekable(),
        };
        let ty = cursor.type_expr()?;
        cursor.skip_ws();
        if cursor.chars.peek().is_some() {
            return Err(cursor.invalid());
        }
        Ok(ty)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::List(t) => write!(f, "{t}[]"),
            Self::Set(t) => write!(f, "{t}<>"),
            Self::Map(k, v) => write!(f, "[{k} -> {v}]"),
        }
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

struct Cursor<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Cursor<'_> {
    fn invalid(&self) -> TypeRegistrationError {
        TypeRegistrationError::InvalidTypeName(self.text.to_string())
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        self.chars.next_if(|(_, c)| *c == expected).is_some()
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeRegistrationError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn type_expr(&mut self) -> Result<TypeName, TypeRegistrationError> {
        let mut ty = self.primary()?;
        loop {
            if self.eat('[') {
                self.expect(']')?;
                ty = ty.list_of();
            } else if self.eat('<') {
                self.expect('>')?;
                ty = ty.set_of();
            } else {
                return Ok(ty);
            }
        }
    }

    fn primary(&mut self) -> Result<TypeName, TypeRegistrationError> {
        if self.eat('[') {
            let key = self.type_expr()?;
            self.expect('-')?;
            self.expect('>')?;
            let value = self.type_expr()?;
            self.expect(']')?;
            return Ok(TypeName::map(key, value));
        }
        self.skip_ws();
        let next = self.chars.peek().copied();
        let start = match next {
            Some((i, c)) if c.is_alphabetic() || c == '_' => i,
            _ => return Err(self.invalid()),
        };
        let mut end = start;
        while let Some((i, c)) = self.chars.next_if(|(_, c)| c.is_alphanumeric() || *c == '_') {
            end = i + c.len_utf8();
        }
        Ok(TypeName::named(&self.text[start..end]))
    }
}
