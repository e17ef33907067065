//! Pretty-printer for AST nodes.
//!
//! Converts a parsed program back into DSL source. The output re-parses to a
//! structurally equal tree: parentheses are inserted wherever operator
//! precedence or the aggregate-literal restriction in statement headers
//! requires them.
//!
//! # Example
//!
//! ```
//! use taskforge_language::{parse_expression, pretty::pretty_print};
//!
//! let ast = parse_expression("(1 + 2) * 3").unwrap();
//! assert_eq!(pretty_print(&ast), "(1 + 2) * 3");
//! ```

use std::fmt::Write;

use crate::ast::{Node, NodeKind, Program, slot};

/// Binding strength of unary operators.
const UNARY_PRECEDENCE: u8 = 7;
/// Binding strength of postfix expressions and atoms.
const POSTFIX_PRECEDENCE: u8 = 8;
/// Set literal elements are parsed at the additive level.
const SET_ELEMENT_PRECEDENCE: u8 = 5;

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Pretty-print an AST node to a string.
#[must_use]
pub fn pretty_print(node: &Node) -> String {
    pretty_print_with_config(node, PrettyConfig::default())
}

/// Pretty-print an AST node with custom configuration.
#[must_use]
pub fn pretty_print_with_config(node: &Node, config: PrettyConfig) -> String {
    let mut printer = PrettyPrinter::new(config);
    printer.print(node);
    printer.output
}

/// Pretty-print every definition of a program, separated by blank lines.
#[must_use]
pub fn pretty_print_program(program: &Program) -> String {
    program
        .definitions
        .iter()
        .map(|d| pretty_print(d))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-printer state.
struct PrettyPrinter {
    config: PrettyConfig,
    output: String,
    indent_level: usize,
}

impl PrettyPrinter {
    fn new(config: PrettyConfig) -> Self {
        Self {
            config,
            output: String::new(),
            indent_level: 0,
        }
    }

    fn print(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::PrototypeDefinition => self.print_prototype(node),
            NodeKind::ComponentDefinition => self.print_component(node),
            NodeKind::ObjectDefinition => {
                self.output.push_str(node.name_in(slot::OBJECT_TYPE));
                self.output.push(' ');
                self.output.push_str(node.name_in(slot::OBJECT_ID));
                self.output.push(' ');
                self.print_properties(node.child(slot::OBJECT_PROPERTIES));
            }
            NodeKind::FunctionDefinition => self.print_function(node),
            NodeKind::GraphDefinition => self.print_graph(node),
            NodeKind::EdgeStatement => self.print_edge(node),
            NodeKind::TypeExpr(ty) => {
                let _ = write!(self.output, "{ty}");
            }
            NodeKind::Block
            | NodeKind::VarDeclaration
            | NodeKind::If
            | NodeKind::While
            | NodeKind::For
            | NodeKind::Return
            | NodeKind::ExpressionStatement
            | NodeKind::Assignment => self.print_statement(node),
            NodeKind::None
            | NodeKind::ComponentDefinitionList
            | NodeKind::PropertyList
            | NodeKind::Property
            | NodeKind::ParameterList
            | NodeKind::Parameter
            | NodeKind::GraphStatementList
            | NodeKind::NodeChain
            | NodeKind::AttributeList
            | NodeKind::Attribute
            | NodeKind::ArgumentList => self.print_fragment(node),
            _ => self.print_expr(node, 0, false),
        }
    }

    // Printable pieces of larger constructs, for debugging output.
    fn print_fragment(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::PropertyList => self.print_properties(node),
            NodeKind::Property => self.print_property(node),
            NodeKind::Parameter => self.print_parameter(node),
            NodeKind::Attribute => self.print_attribute(node),
            NodeKind::NodeChain => self.print_chain(node),
            NodeKind::None => {}
            _ => self.print_separated(&node.children, ", ", |p, c| p.print(c)),
        }
    }

    fn print_prototype(&mut self, node: &Node) {
        self.output.push_str("entity_type ");
        self.output.push_str(node.name_in(slot::PROTOTYPE_ID));
        let components = &node.child(slot::PROTOTYPE_COMPONENTS).children;
        if components.is_empty() {
            self.output.push_str(" {}");
            return;
        }
        self.output.push_str(" {");
        self.push_indent();
        for (i, component) in components.iter().enumerate() {
            self.newline();
            self.print_component(component);
            if i + 1 < components.len() {
                self.output.push(',');
            }
        }
        self.pop_indent();
        self.newline();
        self.output.push('}');
    }

    fn print_component(&mut self, node: &Node) {
        self.output.push_str(node.name_in(slot::COMPONENT_TYPE));
        let properties = node.child(slot::COMPONENT_PROPERTIES);
        if !properties.children.is_empty() {
            self.output.push(' ');
            self.print_properties(properties);
        }
    }

    fn print_properties(&mut self, list: &Node) {
        if list.children.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{ ");
        self.print_separated(&list.children, ", ", Self::print_property);
        self.output.push_str(" }");
    }

    fn print_property(&mut self, node: &Node) {
        self.output.push_str(node.name_in(slot::PROPERTY_ID));
        self.output.push_str(": ");
        self.print_expr(node.child(slot::PROPERTY_VALUE), 0, false);
    }

    fn print_function(&mut self, node: &Node) {
        self.output.push_str("fn ");
        self.output.push_str(node.name_in(slot::FUNCTION_ID));
        self.output.push('(');
        self.print_separated(
            &node.child(slot::FUNCTION_PARAMETERS).children,
            ", ",
            Self::print_parameter,
        );
        self.output.push(')');
        if let Some(ret) = node.optional(slot::FUNCTION_RETURN_TYPE) {
            self.output.push_str(" -> ");
            self.print(ret);
        }
        self.output.push(' ');
        self.print_block(node.child(slot::FUNCTION_BODY));
    }

    fn print_parameter(&mut self, node: &Node) {
        self.print(node.child(slot::PARAMETER_TYPE));
        self.output.push(' ');
        self.output.push_str(node.name_in(slot::PARAMETER_ID));
    }

    fn print_graph(&mut self, node: &Node) {
        self.output.push_str("graph ");
        self.output.push_str(node.name_in(slot::GRAPH_ID));
        let statements = &node.child(slot::GRAPH_STATEMENTS).children;
        if statements.is_empty() {
            self.output.push_str(" {}");
            return;
        }
        self.output.push_str(" {");
        self.push_indent();
        for statement in statements {
            self.newline();
            self.print_edge(statement);
        }
        self.pop_indent();
        self.newline();
        self.output.push('}');
    }

    fn print_edge(&mut self, node: &Node) {
        self.print_chain(node.child(slot::EDGE_CHAIN));
        let attributes = &node.child(slot::EDGE_ATTRIBUTES).children;
        if !attributes.is_empty() {
            self.output.push_str(" [");
            self.print_separated(attributes, ", ", Self::print_attribute);
            self.output.push(']');
        }
        self.output.push(';');
    }

    fn print_chain(&mut self, node: &Node) {
        self.print_separated(&node.children, " -> ", |p, id| {
            p.output.push_str(id.as_identifier().map_or("", |n| &**n));
        });
    }

    fn print_attribute(&mut self, node: &Node) {
        self.output.push_str(node.name_in(slot::ATTRIBUTE_KEY));
        self.output.push('=');
        self.output.push_str(node.name_in(slot::ATTRIBUTE_VALUE));
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn print_block(&mut self, node: &Node) {
        if node.children.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push('{');
        self.push_indent();
        for statement in &node.children {
            self.newline();
            self.print_statement(statement);
        }
        self.pop_indent();
        self.newline();
        self.output.push('}');
    }

    fn print_statement(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Block => self.print_block(node),
            NodeKind::VarDeclaration => {
                self.output.push_str("var ");
                self.output.push_str(node.name_in(slot::VAR_ID));
                if let Some(ty) = node.optional(slot::VAR_TYPE) {
                    self.output.push_str(" : ");
                    self.print(ty);
                }
                if let Some(init) = node.optional(slot::VAR_INIT) {
                    self.output.push_str(" = ");
                    self.print_expr(init, 0, false);
                }
                self.output.push(';');
            }
            NodeKind::If => self.print_if(node),
            NodeKind::While => {
                self.output.push_str("while ");
                self.print_expr(node.child(slot::CONDITION), 0, true);
                self.output.push(' ');
                self.print_block(node.child(slot::BODY));
            }
            NodeKind::For => {
                self.output.push_str("for ");
                self.print(node.child(slot::FOR_TYPE));
                self.output.push(' ');
                self.output.push_str(node.name_in(slot::FOR_ID));
                self.output.push_str(" in ");
                self.print_expr(node.child(slot::FOR_ITERABLE), 0, true);
                self.output.push(' ');
                self.print_block(node.child(slot::FOR_BODY));
            }
            NodeKind::Return => {
                self.output.push_str("return");
                if let Some(value) = node.optional(0) {
                    self.output.push(' ');
                    self.print_expr(value, 0, false);
                }
                self.output.push(';');
            }
            NodeKind::Assignment => {
                self.print_expr(node.child(slot::LHS), 0, false);
                self.output.push_str(" = ");
                self.print_expr(node.child(slot::RHS), 0, false);
                self.output.push(';');
            }
            NodeKind::ExpressionStatement => {
                self.print_expr(node.child(0), 0, false);
                self.output.push(';');
            }
            _ => self.print(node),
        }
    }

    fn print_if(&mut self, node: &Node) {
        self.output.push_str("if ");
        self.print_expr(node.child(slot::CONDITION), 0, true);
        self.output.push(' ');
        self.print_block(node.child(slot::BODY));
        if let Some(branch) = node.optional(slot::ELSE) {
            self.output.push_str(" else ");
            if branch.kind == NodeKind::If {
                self.print_if(branch);
            } else {
                self.print_block(branch);
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Prints an expression, parenthesized if it binds looser than `min`.
    ///
    /// `restricted` marks a statement header, where an aggregate literal must
    /// be parenthesized so its `{` is not taken as the body.
    fn print_expr(&mut self, node: &Node, min: u8, restricted: bool) {
        let parens = precedence(node) < min
            || (restricted && node.kind == NodeKind::AggregateLiteral);
        let restricted = restricted && !parens;
        if parens {
            self.output.push('(');
        }

        match &node.kind {
            NodeKind::Int(n) => {
                let _ = write!(self.output, "{n}");
            }
            NodeKind::Float(n) => {
                let _ = write!(self.output, "{n:?}");
            }
            NodeKind::String(s) => self.print_string(s),
            NodeKind::Bool(b) => {
                let _ = write!(self.output, "{b}");
            }
            NodeKind::Identifier(name) => self.output.push_str(name),
            NodeKind::Binary(op) => {
                self.print_expr(node.child(slot::LHS), op.precedence(), restricted);
                let _ = write!(self.output, " {op} ");
                self.print_expr(node.child(slot::RHS), op.precedence() + 1, restricted);
            }
            NodeKind::Unary(op) => {
                self.output.push_str(op.symbol());
                self.print_expr(node.child(0), UNARY_PRECEDENCE, restricted);
            }
            NodeKind::MemberAccess => {
                self.print_expr(node.child(slot::MEMBER_OBJECT), POSTFIX_PRECEDENCE, restricted);
                self.output.push('.');
                self.output.push_str(node.name_in(slot::MEMBER_ID));
            }
            NodeKind::Call => {
                self.print_expr(node.child(slot::CALL_CALLEE), POSTFIX_PRECEDENCE, restricted);
                self.output.push('(');
                self.print_elements(&node.child(slot::CALL_ARGUMENTS).children, 0);
                self.output.push(')');
            }
            NodeKind::AggregateLiteral => {
                self.output.push_str(node.name_in(slot::AGGREGATE_TYPE));
                self.output.push(' ');
                self.print_properties(node.child(slot::AGGREGATE_PROPERTIES));
            }
            NodeKind::ListLiteral => {
                self.output.push('[');
                self.print_elements(&node.children, 0);
                self.output.push(']');
            }
            NodeKind::SetLiteral => {
                self.output.push('<');
                self.print_elements(&node.children, SET_ELEMENT_PRECEDENCE);
                self.output.push('>');
            }
            _ => self.print(node),
        }

        if parens {
            self.output.push(')');
        }
    }

    fn print_elements(&mut self, elements: &[Node], min: u8) {
        self.print_separated(elements, ", ", |p, e| p.print_expr(e, min, false));
    }

    fn print_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn print_separated(
        &mut self,
        nodes: &[Node],
        separator: &str,
        mut each: impl FnMut(&mut Self, &Node),
    ) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.output.push_str(separator);
            }
            each(self, node);
        }
    }

    fn newline(&mut self) {
        self.output.push('\n');
        let width = self.indent_level * self.config.indent_width;
        self.output.extend(std::iter::repeat_n(' ', width));
    }

    fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}

fn precedence(node: &Node) -> u8 {
    match node.kind {
        NodeKind::Binary(op) => op.precedence(),
        NodeKind::Unary(_) => UNARY_PRECEDENCE,
        _ => POSTFIX_PRECEDENCE,
    }
}
