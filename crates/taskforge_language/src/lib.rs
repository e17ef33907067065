//! Lexer, parser, pretty printer and semantic analyzer for the taskforge DSL.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of DSL source
//! - [`parse`] / [`parse_program`] - Parsing tokens into a [`Program`] with error recovery
//! - [`pretty`] - Printing trees back to source that parses to the same tree
//! - [`Environment`] - Host types, native functions and global definitions
//! - [`analyze`] - Name resolution and type checking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod ast;
pub mod environment;
pub mod lexer;
pub mod native;
pub mod parser;
pub mod pretty;
pub mod scope;
pub mod span;
pub mod symbol;
pub mod token;


pub use analyzer::{AnalyzedProgram, SemanticAnalyzer, analyze, analyze_expression};
pub use ast::{BinaryOp, Node, NodeId, NodeKind, Program, UnaryOp};
pub use environment::Environment;
pub use lexer::Lexer;
pub use native::{NativeContext, NativeFn, NativeFunction};
pub use parser::{Parser, parse, parse_expression, parse_program};
pub use scope::{ScopeId, ScopeTree};
pub use span::Span;
pub use symbol::{FunctionOrigin, FunctionSymbol, Symbol, VariableSymbol};
pub use token::{Token, TokenKind};
