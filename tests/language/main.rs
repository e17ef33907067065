//! Integration tests for Layers 1-2: Types and Language
//!
//! Tests for host type registration, the lexer, the parser and pretty
//! printer, and semantic analysis.

mod analyzer;
mod lexer;
mod parser;
mod registration;
