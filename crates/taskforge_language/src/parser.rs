//! Parser for the taskforge DSL.
//!
//! The parser converts a token stream into a [`Program`]. It recovers at
//! definition boundaries: when a definition fails to parse, the error is
//! recorded, tokens are skipped up to the start of the next definition, and
//! parsing continues, so one pass reports every independent syntax error.

use std::sync::Arc;

use taskforge_foundation::{Diagnostics, Error, ParseError};
use taskforge_types::TypeName;
use tracing::{debug, warn};

use crate::ast::{BinaryOp, Node, NodeId, NodeKind, Program, UnaryOp};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

type PResult<T> = std::result::Result<T, ParseError>;

/// Default limit on nested blocks, expressions and types.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser for taskforge source code.
pub struct Parser {
    /// All tokens, ending with `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// File name used in node locations.
    file: Arc<str>,
    /// Next node id to hand out.
    next_id: u32,
    /// Set while parsing an `if`/`while`/`for` header, where `name {` starts the body.
    no_aggregate: bool,
    /// Current nesting of blocks, expressions and types.
    depth: usize,
    /// Nesting beyond this is a syntax error instead of a stack overflow.
    max_depth: usize,
}

impl Parser {
    /// Creates a parser over the given source.
    #[must_use]
    pub fn new(source: &str, file: impl Into<Arc<str>>) -> Self {
        Self {
            tokens: Lexer::tokenize_all(source),
            pos: 0,
            file: file.into(),
            next_id: 0,
            no_aggregate: false,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses every definition in the source, collecting all syntax errors.
    pub fn parse_program(&mut self) -> (Program, Vec<ParseError>) {
        let mut definitions = Vec::new();
        let mut errors = Vec::new();

        while !self.check(&TokenKind::Eof) {
            let start = self.pos;
            match self.definition() {
                Ok(node) => definitions.push(Arc::new(node)),
                Err(error) => {
                    warn!(%error, "syntax error, skipping to next definition");
                    errors.push(error);
                    self.synchronize(start);
                }
            }
        }

        debug!(
            file = %self.file,
            definitions = definitions.len(),
            errors = errors.len(),
            "parsed program"
        );
        let program = Program {
            file: self.file.clone(),
            definitions,
        };
        (program, errors)
    }

    /// Parses a single expression spanning the whole source.
    ///
    /// # Errors
    /// Returns the first syntax error.
    pub fn parse_expression(&mut self) -> PResult<Node> {
        let expr = self.expression()?;
        self.expect(&TokenKind::Eof)?;
        Ok(expr)
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn definition(&mut self) -> PResult<Node> {
        match self.peek().kind {
            TokenKind::EntityType => self.prototype_definition(),
            TokenKind::Fn => self.function_definition(),
            TokenKind::Graph => self.graph_definition(),
            TokenKind::Ident(_) if self.at_object_definition() => self.object_definition(),
            _ => Err(self.unexpected("definition")),
        }
    }

    /// `entity_type goblin { velocity_component { x_velocity: 1.0 }, draw_component }`
    fn prototype_definition(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::EntityType)?;
        let id = self.identifier()?;
        let list_start = self.expect(&TokenKind::LBrace)?;

        let mut components = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            components.push(self.component_definition()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        let list = self.finish(NodeKind::ComponentDefinitionList, components, list_start);
        Ok(self.finish(NodeKind::PrototypeDefinition, vec![id, list], start))
    }

    fn component_definition(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let type_id = self.identifier()?;
        let properties = if self.check(&TokenKind::LBrace) {
            self.braced_properties()?
        } else {
            let here = self.peek().span;
            self.finish(NodeKind::PropertyList, Vec::new(), here)
        };
        Ok(self.finish(
            NodeKind::ComponentDefinition,
            vec![type_id, properties],
            start,
        ))
    }

    /// `dungeon_config crypt { name: "Crypt", dependency_graph: quests }`
    fn object_definition(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let type_id = self.identifier()?;
        let id = self.identifier()?;
        let properties = self.braced_properties()?;
        Ok(self.finish(
            NodeKind::ObjectDefinition,
            vec![type_id, id, properties],
            start,
        ))
    }

    fn function_definition(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::Fn)?;
        let id = self.identifier()?;

        let params_start = self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_start = self.peek().span;
                let ty = self.type_expr()?;
                let name = self.identifier()?;
                params.push(self.finish(NodeKind::Parameter, vec![ty, name], param_start));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let params = self.finish(NodeKind::ParameterList, params, params_start);

        let return_type = if self.eat(&TokenKind::Arrow) {
            self.type_expr()?
        } else {
            self.placeholder()
        };
        let body = self.block()?;

        Ok(self.finish(
            NodeKind::FunctionDefinition,
            vec![id, params, return_type, body],
            start,
        ))
    }

    /// `graph quests { fetch -> deliver [type=seq]; bonus; }`
    fn graph_definition(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::Graph)?;
        let id = self.identifier()?;
        let list_start = self.expect(&TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            statements.push(self.edge_statement()?);
        }
        self.expect(&TokenKind::RBrace)?;

        let list = self.finish(NodeKind::GraphStatementList, statements, list_start);
        Ok(self.finish(NodeKind::GraphDefinition, vec![id, list], start))
    }

    fn edge_statement(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let mut chain = vec![self.identifier()?];
        while self.eat(&TokenKind::Arrow) {
            chain.push(self.identifier()?);
        }
        let chain = self.finish(NodeKind::NodeChain, chain, start);

        let attrs_start = self.peek().span;
        let mut attributes = Vec::new();
        if self.eat(&TokenKind::LBracket) {
            loop {
                let attr_start = self.peek().span;
                let key = self.identifier()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.identifier()?;
                attributes.push(self.finish(NodeKind::Attribute, vec![key, value], attr_start));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBracket)?;
        }
        let attributes = self.finish(NodeKind::AttributeList, attributes, attrs_start);

        self.expect(&TokenKind::Semicolon)?;
        Ok(self.finish(NodeKind::EdgeStatement, vec![chain, attributes], start))
    }

    /// `{ name: value, ... }`
    fn braced_properties(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::LBrace)?;
        let saved = std::mem::replace(&mut self.no_aggregate, false);
        let result = self.property_list(start);
        self.no_aggregate = saved;
        result
    }

    fn property_list(&mut self, start: Span) -> PResult<Node> {
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let prop_start = self.peek().span;
            let id = self.identifier()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.expression()?;
            properties.push(self.finish(NodeKind::Property, vec![id, value], prop_start));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.finish(NodeKind::PropertyList, properties, start))
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn type_expr(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let name = self.type_name()?;
        Ok(self.finish(NodeKind::TypeExpr(name), Vec::new(), start))
    }

    fn type_name(&mut self) -> PResult<TypeName> {
        let mut ty = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let ty = TypeName::named(name.as_str());
                self.advance();
                ty
            }
            TokenKind::EntityType => {
                self.advance();
                TypeName::named("entity_type")
            }
            TokenKind::LBracket => {
                self.advance();
                let key = self.nested(Self::type_name)?;
                self.expect(&TokenKind::Arrow)?;
                let value = self.nested(Self::type_name)?;
                self.expect(&TokenKind::RBracket)?;
                TypeName::map(key, value)
            }
            _ => return Err(self.unexpected("type")),
        };

        loop {
            if self.check(&TokenKind::LBracket) && self.peek_at(1) == &TokenKind::RBracket {
                self.advance();
                self.advance();
                ty = ty.list_of();
            } else if self.check(&TokenKind::Less) && self.peek_at(1) == &TokenKind::Greater {
                self.advance();
                self.advance();
                ty = ty.set_of();
            } else {
                return Ok(ty);
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self) -> PResult<Node> {
        self.nested(Self::block_inner)
    }

    fn block_inner(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            statements.push(self.statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.finish(NodeKind::Block, statements, start))
    }

    fn statement(&mut self) -> PResult<Node> {
        match self.peek().kind {
            TokenKind::Var => self.var_declaration(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::LBrace => self.block(),
            _ => self.expression_statement(),
        }
    }

    fn var_declaration(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::Var)?;
        let id = self.identifier()?;
        let has_type = self.eat(&TokenKind::Colon);
        let ty = if has_type {
            self.type_expr()?
        } else {
            self.placeholder()
        };
        let init = if self.eat(&TokenKind::Assign) {
            self.expression()?
        } else if has_type {
            self.placeholder()
        } else {
            return Err(self.unexpected("':' or '='"));
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.finish(NodeKind::VarDeclaration, vec![id, ty, init], start))
    }

    fn if_statement(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::If)?;
        let condition = self.condition()?;
        let then_block = self.block()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                self.nested(Self::if_statement)?
            } else {
                self.block()?
            }
        } else {
            self.placeholder()
        };
        Ok(self.finish(
            NodeKind::If,
            vec![condition, then_block, else_branch],
            start,
        ))
    }

    fn while_statement(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::While)?;
        let condition = self.condition()?;
        let body = self.block()?;
        Ok(self.finish(NodeKind::While, vec![condition, body], start))
    }

    fn for_statement(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::For)?;
        let ty = self.type_expr()?;
        let id = self.identifier()?;
        self.expect(&TokenKind::In)?;
        let iterable = self.condition()?;
        let body = self.block()?;
        Ok(self.finish(NodeKind::For, vec![ty, id, iterable, body], start))
    }

    fn return_statement(&mut self) -> PResult<Node> {
        let start = self.expect(&TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semicolon) {
            self.placeholder()
        } else {
            self.expression()?
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.finish(NodeKind::Return, vec![value], start))
    }

    fn expression_statement(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let expr = self.expression()?;
        if self.eat(&TokenKind::Assign) {
            let value = self.expression()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(self.finish(NodeKind::Assignment, vec![expr, value], start));
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.finish(NodeKind::ExpressionStatement, vec![expr], start))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parses an expression in a statement header, where `name {` opens the body.
    fn condition(&mut self) -> PResult<Node> {
        let saved = std::mem::replace(&mut self.no_aggregate, true);
        let result = self.expression();
        self.no_aggregate = saved;
        result
    }

    fn expression(&mut self) -> PResult<Node> {
        self.nested(|p| p.binary(BinaryOp::Or.precedence()))
    }

    /// Precedence climbing; all binary operators are left-associative.
    fn binary(&mut self, min_precedence: u8) -> PResult<Node> {
        let start = self.peek().span;
        let mut lhs = self.unary()?;
        while let Some(op) = binary_op(&self.peek().kind) {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.binary(op.precedence() + 1)?;
            lhs = self.finish(NodeKind::Binary(op), vec![lhs, rhs], start);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let op = match self.peek().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.postfix(),
        };
        self.advance();
        let operand = self.nested(Self::unary)?;
        Ok(self.finish(NodeKind::Unary(op), vec![operand], start))
    }

    fn postfix(&mut self) -> PResult<Node> {
        let start = self.peek().span;
        let mut expr = self.primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let member = self.identifier()?;
                expr = self.finish(NodeKind::MemberAccess, vec![expr, member], start);
            } else if self.check(&TokenKind::LParen) {
                let args_start = self.expect(&TokenKind::LParen)?;
                let args = self.delimited(&TokenKind::RParen, Self::expression)?;
                let args = self.finish(NodeKind::ArgumentList, args, args_start);
                expr = self.finish(NodeKind::Call, vec![expr, args], start);
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> PResult<Node> {
        let token = self.peek().clone();
        let literal = match token.kind {
            TokenKind::Int(n) => NodeKind::Int(n),
            TokenKind::Float(n) => NodeKind::Float(n),
            TokenKind::String(s) => NodeKind::String(s.into()),
            TokenKind::True => NodeKind::Bool(true),
            TokenKind::False => NodeKind::Bool(false),
            TokenKind::Ident(_) => {
                let id = self.identifier()?;
                if self.check(&TokenKind::LBrace) && !self.no_aggregate {
                    let properties = self.braced_properties()?;
                    return Ok(self.finish(
                        NodeKind::AggregateLiteral,
                        vec![id, properties],
                        token.span,
                    ));
                }
                return Ok(id);
            }
            TokenKind::LParen => {
                self.advance();
                let saved = std::mem::replace(&mut self.no_aggregate, false);
                let inner = self.expression();
                self.no_aggregate = saved;
                let inner = inner?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.delimited(&TokenKind::RBracket, Self::expression)?;
                return Ok(self.finish(NodeKind::ListLiteral, elements, token.span));
            }
            TokenKind::Less => {
                self.advance();
                // `>` closes the literal, so elements stop short of comparisons.
                let elements = self.delimited(&TokenKind::Greater, |p| {
                    p.nested(|p| p.binary(BinaryOp::Add.precedence()))
                })?;
                return Ok(self.finish(NodeKind::SetLiteral, elements, token.span));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(self.finish(literal, Vec::new(), token.span))
    }

    /// Parses comma-separated items up to and including `close`.
    fn delimited(
        &mut self,
        close: &TokenKind,
        mut item: impl FnMut(&mut Self) -> PResult<Node>,
    ) -> PResult<Vec<Node>> {
        let saved = std::mem::replace(&mut self.no_aggregate, false);
        let mut items = Vec::new();
        let mut result = Ok(());
        while !self.check(close) {
            match item(self) {
                Ok(node) => items.push(node),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.no_aggregate = saved;
        result?;
        self.expect(close)?;
        Ok(items)
    }

    fn identifier(&mut self) -> PResult<Node> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.finish(NodeKind::Identifier(name.into()), Vec::new(), token.span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Returns true at `type_name object_name {`.
    fn at_object_definition(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1), TokenKind::Ident(_))
            && self.peek_at(2) == &TokenKind::LBrace
    }

    /// Returns true if the current token can only begin a top-level definition.
    fn at_definition_start(&self) -> bool {
        match self.peek().kind {
            TokenKind::Fn | TokenKind::Graph => true,
            // `entity_type` is also a type name; only `entity_type name {` is a definition.
            TokenKind::EntityType => {
                matches!(self.peek_at(1), TokenKind::Ident(_))
                    && self.peek_at(2) == &TokenKind::LBrace
            }
            TokenKind::Ident(_) => self.at_object_definition(),
            _ => false,
        }
    }

    /// Skips from the start of a failed definition to the start of the next one.
    fn synchronize(&mut self, start: usize) {
        self.pos = start;
        self.no_aggregate = false;
        self.advance();

        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                }
                _ if self.at_definition_start() => return,
                _ => self.advance(),
            }
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Runs `parse` one nesting level deeper, failing at the depth limit.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.max_depth {
            return Err(self.unexpected(&format!("at most {} levels of nesting", self.max_depth)));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> PResult<Span> {
        if self.check(expected) {
            let span = self.peek().span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(expected.name()))
        }
    }

    /// Creates a parse error at the current token.
    fn unexpected(&self, expected: &str) -> ParseError {
        self.error_at(self.peek(), expected)
    }

    fn error_at(&self, token: &Token, expected: &str) -> ParseError {
        ParseError {
            location: token.span.location(&self.file),
            expected: expected.to_string(),
            found: token.describe(),
        }
    }

    fn finish(&mut self, kind: NodeKind, children: Vec<Node>, start: Span) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let end = self.previous_span();
        let span = if end.start >= start.start {
            start.cover(end)
        } else {
            start
        };
        Node {
            id,
            kind,
            children,
            location: start.location(&self.file),
            span,
        }
    }

    /// A `None` node for an absent optional slot, located at the current token.
    fn placeholder(&mut self) -> Node {
        let here = self.peek().span;
        let span = Span::new(here.start, here.start, here.line, here.column);
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node {
            id,
            kind: NodeKind::None,
            children: Vec::new(),
            location: span.location(&self.file),
            span,
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEq => BinaryOp::LessEq,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEq => BinaryOp::GreaterEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    })
}

/// Parses source into a program plus every syntax error found.
///
/// The returned program holds the definitions that parsed cleanly.
#[must_use]
pub fn parse(source: &str, file: impl Into<Arc<str>>) -> (Program, Vec<ParseError>) {
    Parser::new(source, file).parse_program()
}

/// Parses source into a program.
///
/// # Errors
/// Returns every syntax error in the source.
pub fn parse_program(source: &str, file: impl Into<Arc<str>>) -> Result<Program, Diagnostics> {
    let (program, errors) = parse(source, file);
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors.into_iter().map(Error::from).collect::<Vec<_>>().into())
    }
}

/// Parses a single expression.
///
/// # Errors
/// Returns the first syntax error.
pub fn parse_expression(source: &str) -> Result<Node, ParseError> {
    Parser::new(source, "<expr>").parse_expression()
}
