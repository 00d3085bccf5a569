use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::ast::ArrayElement;
use crate::ast::ClassMember;
use crate::ast::ClassOrObjectMemberKey;
use crate::ast::ClassOrObjectMemberValue;
use crate::ast::ExportNames;
use crate::ast::ForInOfStmtHeaderLhs;
use crate::ast::ForStmtHeader;
use crate::ast::ForThreeInit;
use crate::ast::LiteralTemplatePart;
use crate::ast::Node;
use crate::ast::ObjectMemberType;
use crate::ast::Program;
use crate::ast::Syntax;
use crate::ast::VarDeclMode;
use crate::error::InvariantError;
use crate::num::format_number;
use crate::num::numeral_is_plain_integer;
use crate::operator::assignment_precedence;
use crate::operator::comma_precedence;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::visit::any_node;

#[cfg(test)]
mod tests;

lazy_static! {
    pub static ref BINARY_OPERATOR_SYNTAX: HashMap<OperatorName, &'static str> = {
        let mut map = HashMap::<OperatorName, &'static str>::new();
        // Excluded: Call, Conditional, member accesses.
        map.insert(OperatorName::Addition, "+");
        map.insert(OperatorName::Assignment, "=");
        map.insert(OperatorName::AssignmentAddition, "+=");
        map.insert(OperatorName::AssignmentBitwiseAnd, "&=");
        map.insert(OperatorName::AssignmentBitwiseLeftShift, "<<=");
        map.insert(OperatorName::AssignmentBitwiseOr, "|=");
        map.insert(OperatorName::AssignmentBitwiseRightShift, ">>=");
        map.insert(OperatorName::AssignmentBitwiseUnsignedRightShift, ">>>=");
        map.insert(OperatorName::AssignmentBitwiseXor, "^=");
        map.insert(OperatorName::AssignmentDivision, "/=");
        map.insert(OperatorName::AssignmentExponentiation, "**=");
        map.insert(OperatorName::AssignmentLogicalAnd, "&&=");
        map.insert(OperatorName::AssignmentLogicalOr, "||=");
        map.insert(OperatorName::AssignmentMultiplication, "*=");
        map.insert(OperatorName::AssignmentNullishCoalescing, "??=");
        map.insert(OperatorName::AssignmentRemainder, "%=");
        map.insert(OperatorName::AssignmentSubtraction, "-=");
        map.insert(OperatorName::BitwiseAnd, "&");
        map.insert(OperatorName::BitwiseLeftShift, "<<");
        map.insert(OperatorName::BitwiseOr, "|");
        map.insert(OperatorName::BitwiseRightShift, ">>");
        map.insert(OperatorName::BitwiseUnsignedRightShift, ">>>");
        map.insert(OperatorName::BitwiseXor, "^");
        map.insert(OperatorName::Division, "/");
        map.insert(OperatorName::Equality, "==");
        map.insert(OperatorName::Exponentiation, "**");
        map.insert(OperatorName::GreaterThan, ">");
        map.insert(OperatorName::GreaterThanOrEqual, ">=");
        map.insert(OperatorName::In, "in");
        map.insert(OperatorName::Inequality, "!=");
        map.insert(OperatorName::Instanceof, "instanceof");
        map.insert(OperatorName::LessThan, "<");
        map.insert(OperatorName::LessThanOrEqual, "<=");
        map.insert(OperatorName::LogicalAnd, "&&");
        map.insert(OperatorName::LogicalOr, "||");
        map.insert(OperatorName::Multiplication, "*");
        map.insert(OperatorName::NullishCoalescing, "??");
        map.insert(OperatorName::Remainder, "%");
        map.insert(OperatorName::StrictEquality, "===");
        map.insert(OperatorName::StrictInequality, "!==");
        map.insert(OperatorName::Subtraction, "-");
        map
    };

    pub static ref UNARY_OPERATOR_SYNTAX: HashMap<OperatorName, &'static str> = {
        let mut map = HashMap::<OperatorName, &'static str>::new();
        // Excluded: Postfix{Increment,Decrement}, Yield, New.
        map.insert(OperatorName::Await, "await");
        map.insert(OperatorName::BitwiseNot, "~");
        map.insert(OperatorName::Delete, "delete");
        map.insert(OperatorName::LogicalNot, "!");
        map.insert(OperatorName::PrefixDecrement, "--");
        map.insert(OperatorName::PrefixIncrement, "++");
        map.insert(OperatorName::Typeof, "typeof");
        map.insert(OperatorName::UnaryNegation, "-");
        map.insert(OperatorName::UnaryPlus, "+");
        map.insert(OperatorName::Void, "void");
        map
    };
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Line breaks, indentation and spacing instead of the most compact output.
    pub beautify: bool,
}

type EmitResult = Result<(), InvariantError>;

// Forces parentheses around any expression.
const ALWAYS_WRAP: u8 = u8::MAX;

fn member_precedence() -> u8 {
    OperatorName::MemberAccess.precedence()
}

fn unary_precedence() -> u8 {
    OperatorName::LogicalNot.precedence()
}

fn postfix_precedence() -> u8 {
    OperatorName::PostfixIncrement.precedence()
}

// How tightly an expression binds, or ALWAYS_WRAP for primaries and non-expressions, which never
// need parentheses.
fn expression_precedence(n: &Node) -> u8 {
    match n.stx() {
        Syntax::SequenceExpr { .. } => comma_precedence(),
        Syntax::ArrowFunctionExpr { .. } | Syntax::YieldExpr { .. } => assignment_precedence(),
        Syntax::ConditionalExpr { .. } => OperatorName::Conditional.precedence(),
        Syntax::BinaryExpr { operator, .. } => operator.precedence(),
        Syntax::UnaryExpr { .. } | Syntax::LiteralUndefined {} => unary_precedence(),
        Syntax::UnaryPostfixExpr { .. } => postfix_precedence(),
        Syntax::CallExpr { .. }
        | Syntax::MemberExpr { .. }
        | Syntax::ComputedMemberExpr { .. }
        | Syntax::NewExpr { .. }
        | Syntax::TaggedTemplateExpr { .. }
        | Syntax::ImportExpr { .. } => member_precedence(),
        Syntax::LiteralNumberExpr { value } if !value.0.is_finite() => {
            OperatorName::Division.precedence()
        }
        Syntax::LiteralNumberExpr { value } if value.0.is_sign_negative() => unary_precedence(),
        _ => ALWAYS_WRAP,
    }
}

// Whether a node continues an optional chain from its left, e.g. `a?.b` and `a?.b.c`.
fn continues_optional_chain(n: &Node) -> bool {
    match n.stx() {
        Syntax::MemberExpr {
            optional_chaining,
            parenthesised,
            left,
            ..
        } => !*parenthesised && (*optional_chaining || continues_optional_chain(left)),
        Syntax::ComputedMemberExpr {
            optional_chaining,
            parenthesised,
            object,
            ..
        } => !*parenthesised && (*optional_chaining || continues_optional_chain(object)),
        Syntax::CallExpr {
            optional_chaining,
            parenthesised,
            callee,
            ..
        } => !*parenthesised && (*optional_chaining || continues_optional_chain(callee)),
        _ => false,
    }
}

// Parentheses that end an optional chain, as in `(a?.b).c`, change meaning and must be kept. Others
// are dropped.
fn closes_optional_chain(n: &Node) -> bool {
    match n.stx() {
        Syntax::MemberExpr {
            optional_chaining,
            parenthesised: true,
            left,
            ..
        } => *optional_chaining || continues_optional_chain(left),
        Syntax::ComputedMemberExpr {
            optional_chaining,
            parenthesised: true,
            object,
            ..
        } => *optional_chaining || continues_optional_chain(object),
        Syntax::CallExpr {
            optional_chaining,
            parenthesised: true,
            callee,
            ..
        } => *optional_chaining || continues_optional_chain(callee),
        _ => false,
    }
}

// The node whose first token is also the first token of `n`, when printed without parentheses.
fn leftmost(n: &Node) -> &Node {
    match n.stx() {
        Syntax::BinaryExpr { left, .. } => leftmost(left),
        Syntax::ConditionalExpr { test, .. } => leftmost(test),
        Syntax::SequenceExpr { elements } if !elements.is_empty() => leftmost(&elements[0]),
        Syntax::CallExpr { callee, .. } if !closes_optional_chain(n) => leftmost(callee),
        Syntax::MemberExpr { left, .. } if !closes_optional_chain(n) => leftmost(left),
        Syntax::ComputedMemberExpr { object, .. } if !closes_optional_chain(n) => leftmost(object),
        Syntax::TaggedTemplateExpr { tag, .. } => leftmost(tag),
        Syntax::UnaryPostfixExpr { argument, .. } => leftmost(argument),
        _ => n,
    }
}

// An expression statement starting with one of these would be read as something else: a block,
// a declaration, or a directive.
fn starts_like_statement(expr: &Node) -> bool {
    match leftmost(expr).stx() {
        Syntax::LiteralObjectExpr { .. }
        | Syntax::ObjectPattern { .. }
        | Syntax::FunctionExpr { .. }
        | Syntax::ClassExpr { .. }
        | Syntax::LiteralStringExpr { .. } => true,
        Syntax::IdentifierExpr { name } => name.as_str() == "let",
        _ => false,
    }
}

fn starts_like_block(expr: &Node) -> bool {
    matches!(
        leftmost(expr).stx(),
        Syntax::LiteralObjectExpr { .. } | Syntax::ObjectPattern { .. }
    )
}

// `new` takes the nearest argument list as its own, so a callee containing a call needs
// parentheses: `new (a())()`.
fn callee_contains_call(n: &Node) -> bool {
    match n.stx() {
        Syntax::CallExpr { .. } | Syntax::ImportExpr { .. } => true,
        Syntax::MemberExpr { left, .. } => callee_contains_call(left),
        Syntax::ComputedMemberExpr { object, .. } => callee_contains_call(object),
        Syntax::TaggedTemplateExpr { tag, .. } => callee_contains_call(tag),
        _ => false,
    }
}

fn contains_in_operator(n: &Node) -> bool {
    any_node(n, &mut |n| {
        matches!(n.stx(), Syntax::BinaryExpr {
            operator: OperatorName::In,
            ..
        })
    })
}

fn is_mixed_logical(parent: OperatorName, child: &Node) -> bool {
    let Syntax::BinaryExpr { operator: child, .. } = child.stx() else {
        return false;
    };
    match parent {
        OperatorName::NullishCoalescing => {
            matches!(child, OperatorName::LogicalAnd | OperatorName::LogicalOr)
        }
        OperatorName::LogicalAnd | OperatorName::LogicalOr => {
            *child == OperatorName::NullishCoalescing
        }
        _ => false,
    }
}

fn is_identifier_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c == b'\\' || c >= 0x80
}

// Whether two chunks written back to back would lex differently from the two tokens they are.
fn tokens_would_merge(last: u8, first: u8, after_regex: bool) -> bool {
    (is_identifier_byte(first) && (after_regex || is_identifier_byte(last)))
        || matches!(
            (last, first),
            (b'+', b'+') | (b'-', b'-') | (b'/', b'/') | (b'/', b'*') | (b'<', b'!')
        )
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LeafNodeType {
    EmptyStmt,
    Other,
    Block,
}

fn get_leaf_node_type(n: &Node) -> LeafNodeType {
    match n.stx() {
        Syntax::WhileStmt { body, .. }
        | Syntax::ForStmt { body, .. }
        | Syntax::WithStmt { body, .. } => get_leaf_node_type(body),
        Syntax::LabelStmt { statement, .. } => get_leaf_node_type(statement),
        Syntax::IfStmt {
            consequent,
            alternate,
            ..
        } => match alternate {
            Some(n) => get_leaf_node_type(n),
            None => get_leaf_node_type(consequent),
        },
        Syntax::ExportDeclStmt { declaration, .. } => get_leaf_node_type(declaration),
        Syntax::BlockStmt { .. }
        | Syntax::TryStmt { .. }
        | Syntax::SwitchStmt { .. }
        | Syntax::FunctionDecl { .. }
        | Syntax::ClassDecl { .. } => LeafNodeType::Block,
        Syntax::EmptyStmt {} => LeafNodeType::EmptyStmt,
        _ => LeafNodeType::Other,
    }
}

struct Emitter {
    out: Vec<u8>,
    beautify: bool,
    indent: usize,
    after_regex: bool,
}

impl Emitter {
    fn new(options: &EmitOptions) -> Emitter {
        Emitter {
            out: Vec::new(),
            beautify: options.beautify,
            indent: 0,
            after_regex: false,
        }
    }

    fn finish(self) -> Result<String, InvariantError> {
        String::from_utf8(self.out)
            .map_err(|err| InvariantError::new(format!("printed invalid UTF-8: {}", err)))
    }

    fn write(&mut self, chunk: &[u8]) -> () {
        if let (Some(&last), Some(&first)) = (self.out.last(), chunk.first()) {
            // `a-- > b` must not print as the HTML-like comment `-->`.
            if tokens_would_merge(last, first, self.after_regex)
                || (first == b'>' && self.out.ends_with(b"--"))
            {
                self.out.push(b' ');
            };
        };
        self.after_regex = false;
        self.out.extend_from_slice(chunk);
    }

    // Appends `chunk` as part of the current token, never separated from what precedes it.
    fn write_raw(&mut self, chunk: &[u8]) -> () {
        self.after_regex = false;
        self.out.extend_from_slice(chunk);
    }

    fn write_str(&mut self, chunk: &str) -> () {
        self.write(chunk.as_bytes());
    }

    fn space(&mut self) -> () {
        if self.beautify && !matches!(self.out.last(), None | Some(b' ') | Some(b'\n')) {
            self.out.push(b' ');
        };
    }

    fn newline(&mut self) -> () {
        if self.beautify && !self.out.is_empty() {
            self.out.push(b'\n');
            for _ in 0..self.indent {
                self.out.extend_from_slice(b"    ");
            }
        };
    }

    fn comma(&mut self) -> () {
        self.write(b",");
        self.space();
    }

    // Writes an operator or other separator between two operands, spaced when beautifying.
    fn infix(&mut self, op: &str) -> () {
        self.space();
        self.write_str(op);
        self.space();
    }

    fn emit_string(&mut self, value: &str) -> () {
        let singles = value.matches('\'').count();
        let doubles = value.matches('"').count();
        let quote = if singles < doubles { '\'' } else { '"' };
        let mut lit = String::with_capacity(value.len() + 2);
        lit.push(quote);
        let mut chars = value.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => lit.push_str("\\\\"),
                '\n' => lit.push_str("\\n"),
                '\r' => lit.push_str("\\r"),
                '\u{8}' => lit.push_str("\\b"),
                '\u{b}' => lit.push_str("\\v"),
                '\u{c}' => lit.push_str("\\f"),
                '\u{2028}' => lit.push_str("\\u2028"),
                '\u{2029}' => lit.push_str("\\u2029"),
                '\u{feff}' => lit.push_str("\\ufeff"),
                '\0' => match chars.peek() {
                    Some(n) if n.is_ascii_digit() => lit.push_str("\\x00"),
                    _ => lit.push_str("\\0"),
                },
                '/' if lit.ends_with('<') => lit.push_str("\\/"),
                c if c == quote => {
                    lit.push('\\');
                    lit.push(c);
                }
                c if c < ' ' && c != '\t' => lit.push_str(&format!("\\x{:02x}", c as u32)),
                c => lit.push(c),
            };
        }
        lit.push(quote);
        self.write_str(&lit);
    }

    fn emit_number(&mut self, value: f64) -> () {
        if value.is_nan() {
            self.write(b"0/0");
        } else if value.is_infinite() {
            self.write(if value > 0.0 { b"1/0" } else { b"-1/0" });
        } else if value.is_sign_negative() {
            self.write(b"-");
            self.write_str(&format_number(-value));
        } else {
            self.write_str(&format_number(value));
        };
    }

    fn emit_template_parts(&mut self, parts: &[LiteralTemplatePart]) -> EmitResult {
        self.write(b"`");
        for part in parts {
            match part {
                LiteralTemplatePart::Substitution(expr) => {
                    self.write_raw(b"${");
                    self.emit_js(expr)?;
                    self.write_raw(b"}");
                }
                // A space here would change the template's value.
                LiteralTemplatePart::String(raw) => self.write_raw(raw.as_bytes()),
            };
        }
        self.write_raw(b"`");
        Ok(())
    }

    fn emit_js(&mut self, n: &Node) -> EmitResult {
        self.emit_js_under_operator(n, 0)
    }

    fn emit_js_under_operator(&mut self, n: &Node, min_precedence: u8) -> EmitResult {
        let wrap = expression_precedence(n) < min_precedence || closes_optional_chain(n);
        if wrap {
            self.write(b"(");
        };
        self.emit_syntax(n)?;
        if wrap {
            self.write(b")");
        };
        Ok(())
    }

    fn emit_wrapped(&mut self, n: &Node) -> EmitResult {
        self.write(b"(");
        self.emit_js(n)?;
        self.write(b")");
        Ok(())
    }

    // An expression in an assignment-level position, such as an argument or an initialiser.
    fn emit_assignment_level(&mut self, n: &Node) -> EmitResult {
        self.emit_js_under_operator(n, assignment_precedence())
    }

    fn emit_statements(&mut self, statements: &[Node]) -> EmitResult {
        // Empty statements aren't printed, so track the last one that was.
        let mut last_statement: Option<&Node> = None;
        for n in statements {
            if let Syntax::EmptyStmt {} = n.stx() {
                continue;
            };
            if let Some(prev) = last_statement {
                if !self.beautify && get_leaf_node_type(prev) != LeafNodeType::Block {
                    self.write(b";");
                };
            };
            self.newline();
            self.emit_js(n)?;
            if self.beautify && get_leaf_node_type(n) != LeafNodeType::Block {
                self.write(b";");
            };
            last_statement = Some(n);
        }
        if let Some(n) = last_statement {
            if !self.beautify && get_leaf_node_type(n) == LeafNodeType::EmptyStmt {
                self.write(b";");
            };
        };
        Ok(())
    }

    fn emit_block(&mut self, body: &[Node]) -> EmitResult {
        self.space();
        self.write(b"{");
        if body.iter().any(|s| !matches!(s.stx(), Syntax::EmptyStmt {})) {
            self.indent += 1;
            self.emit_statements(body)?;
            self.indent -= 1;
            self.newline();
        };
        self.write(b"}");
        Ok(())
    }

    // Writes a statement in a single statement position, e.g. the body of a loop.
    fn emit_body(&mut self, body: &Node) -> EmitResult {
        match body.stx() {
            Syntax::BlockStmt { .. } => self.emit_js(body),
            _ => {
                self.space();
                self.emit_js(body)
            }
        }
    }

    fn emit_function(
        &mut self,
        is_async: bool,
        generator: bool,
        name: Option<&Node>,
        signature: &Node,
        body: &Node,
    ) -> EmitResult {
        if is_async {
            self.write(b"async");
        };
        self.write(b"function");
        if generator {
            self.write(b"*");
        };
        if let Some(name) = name {
            self.emit_js(name)?;
        };
        self.emit_wrapped(signature)?;
        self.emit_js(body)
    }

    // True for plain properties, which need a terminator in class bodies.
    fn emit_class_or_object_member(
        &mut self,
        key: &ClassOrObjectMemberKey,
        value: &ClassOrObjectMemberValue,
        value_delimiter: &str,
    ) -> Result<bool, InvariantError> {
        match value {
            ClassOrObjectMemberValue::Getter { .. } => self.write(b"get"),
            ClassOrObjectMemberValue::Setter { .. } => self.write(b"set"),
            ClassOrObjectMemberValue::Method {
                is_async,
                generator,
                ..
            } => {
                if *is_async {
                    self.write(b"async");
                };
                if *generator {
                    self.write(b"*");
                };
            }
            ClassOrObjectMemberValue::Property { .. } => {}
        };
        match key {
            ClassOrObjectMemberKey::Direct(name) => self.write(name.as_slice()),
            ClassOrObjectMemberKey::Computed(expr) => {
                self.write(b"[");
                self.emit_assignment_level(expr)?;
                self.write(b"]");
            }
        };
        match value {
            ClassOrObjectMemberValue::Getter { body } => {
                self.write(b"()");
                self.emit_js(body)?;
            }
            ClassOrObjectMemberValue::Method {
                signature, body, ..
            } => {
                self.emit_wrapped(signature)?;
                self.emit_js(body)?;
            }
            ClassOrObjectMemberValue::Property { initializer } => {
                if let Some(v) = initializer {
                    if value_delimiter == ":" {
                        self.write(b":");
                        self.space();
                    } else {
                        self.infix(value_delimiter);
                    };
                    self.emit_assignment_level(v)?;
                };
            }
            ClassOrObjectMemberValue::Setter { body, parameter } => {
                self.emit_wrapped(parameter)?;
                self.emit_js(body)?;
            }
        };
        Ok(matches!(value, ClassOrObjectMemberValue::Property { .. }))
    }

    fn emit_class(
        &mut self,
        name: Option<&Node>,
        extends: Option<&Node>,
        members: &[ClassMember],
    ) -> EmitResult {
        self.write(b"class");
        if let Some(n) = name {
            self.emit_js(n)?;
        };
        if let Some(s) = extends {
            self.write(b"extends");
            self.emit_js_under_operator(s, member_precedence())?;
        };
        self.space();
        self.write(b"{");
        self.indent += 1;
        let mut last_member_was_property = false;
        for m in members {
            if last_member_was_property {
                self.write(b";");
            };
            self.newline();
            if m.statik {
                self.write(b"static");
            };
            last_member_was_property = self.emit_class_or_object_member(&m.key, &m.value, "=")?;
        }
        if self.beautify && last_member_was_property {
            self.write(b";");
        };
        self.indent -= 1;
        if !members.is_empty() {
            self.newline();
        };
        self.write(b"}");
        Ok(())
    }

    fn emit_import_or_export_statement_trailer(
        &mut self,
        names: Option<&ExportNames>,
        from: Option<&str>,
    ) -> EmitResult {
        match names {
            Some(ExportNames::All(alias)) => {
                self.write(b"*");
                if let Some(alias) = alias {
                    self.write(b"as");
                    self.emit_js(alias)?;
                };
            }
            Some(ExportNames::Specific(names)) => {
                self.write(b"{");
                for (i, e) in names.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    let Syntax::IdentifierPattern { name: alias } = e.alias.stx() else {
                        return Err(e.alias.invariant("export alias is not an identifier"));
                    };
                    if e.target != *alias {
                        self.write(e.target.as_slice());
                        self.write(b"as");
                    };
                    self.emit_js(&e.alias)?;
                }
                self.write(b"}");
            }
            None => {}
        };
        if let Some(from) = from {
            if names.is_some() {
                self.write(b"from");
            };
            self.emit_string(from);
        };
        Ok(())
    }

    fn emit_var_decl(&mut self, decl: &Node, in_for_init: bool) -> EmitResult {
        let Syntax::VarDecl { mode, declarators } = decl.stx() else {
            return Err(decl.invariant("expected a variable declaration"));
        };
        self.write(match mode {
            VarDeclMode::Const => b"const",
            VarDeclMode::Let => b"let",
            VarDeclMode::Var => b"var",
        });
        for (i, d) in declarators.iter().enumerate() {
            if i > 0 {
                self.comma();
            };
            self.emit_js(&d.pattern)?;
            if let Some(init) = &d.initializer {
                self.infix("=");
                // `in` would end the initialiser of a for-loop header.
                if in_for_init && contains_in_operator(init) {
                    self.emit_wrapped(init)?;
                } else {
                    self.emit_assignment_level(init)?;
                };
            };
        }
        Ok(())
    }

    fn emit_binary(&mut self, operator: OperatorName, left: &Node, right: &Node) -> EmitResult {
        let p = operator.precedence();
        let (mut left_min, mut right_min) = match operator.associativity() {
            Associativity::Left => (p, p + 1),
            Associativity::Right => (p + 1, p),
        };
        // A unary operand on the left of `**` is a syntax error.
        if operator == OperatorName::Exponentiation {
            left_min = postfix_precedence();
        };
        if is_mixed_logical(operator, left) {
            left_min = ALWAYS_WRAP;
        };
        if is_mixed_logical(operator, right) {
            right_min = ALWAYS_WRAP;
        };
        self.emit_js_under_operator(left, left_min)?;
        let Some(syntax) = BINARY_OPERATOR_SYNTAX.get(&operator) else {
            return Err(left.invariant(format!("{:?} is not a binary operator", operator)));
        };
        self.infix(syntax);
        self.emit_js_under_operator(right, right_min)
    }

    fn emit_arguments(&mut self, arguments: &[Node]) -> EmitResult {
        self.write(b"(");
        for (i, a) in arguments.iter().enumerate() {
            if i > 0 {
                self.comma();
            };
            self.emit_js(a)?;
        }
        self.write(b")");
        Ok(())
    }

    fn emit_syntax(&mut self, node: &Node) -> EmitResult {
        match node.stx() {
            Syntax::EmptyStmt {} => {}
            Syntax::IdentifierPattern { name }
            | Syntax::IdentifierExpr { name }
            | Syntax::ClassOrFunctionName { name } => self.write(name.as_slice()),
            Syntax::ArrayPattern { elements, rest } => {
                self.write(b"[");
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    if let Some(e) = e {
                        self.emit_js(&e.target)?;
                        if let Some(v) = &e.default_value {
                            self.infix("=");
                            self.emit_assignment_level(v)?;
                        };
                    };
                }
                if let Some(r) = rest {
                    if !elements.is_empty() {
                        self.comma();
                    };
                    self.write(b"...");
                    self.emit_js(r)?;
                } else if matches!(elements.last(), Some(None)) {
                    // A trailing hole needs its own comma.
                    self.write(b",");
                };
                self.write(b"]");
            }
            Syntax::ObjectPattern { properties, rest } => {
                self.write(b"{");
                for (i, e) in properties.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    self.emit_js(e)?;
                }
                if let Some(r) = rest {
                    if !properties.is_empty() {
                        self.comma();
                    };
                    self.write(b"...");
                    self.emit_js(r)?;
                };
                self.write(b"}");
            }
            Syntax::ObjectPatternProperty {
                key,
                target,
                default_value,
                shorthand,
            } => {
                if !*shorthand {
                    match key {
                        ClassOrObjectMemberKey::Direct(name) => self.write(name.as_slice()),
                        ClassOrObjectMemberKey::Computed(expr) => {
                            self.write(b"[");
                            self.emit_assignment_level(expr)?;
                            self.write(b"]");
                        }
                    };
                    self.write(b":");
                    self.space();
                };
                self.emit_js(target)?;
                if let Some(v) = default_value {
                    self.infix("=");
                    self.emit_assignment_level(v)?;
                };
            }
            Syntax::FunctionSignature { parameters } => {
                for (i, p) in parameters.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    self.emit_js(p)?;
                }
            }
            Syntax::ParamDecl {
                rest,
                pattern,
                default_value,
            } => {
                if *rest {
                    self.write(b"...");
                };
                self.emit_js(pattern)?;
                if let Some(v) = default_value {
                    self.infix("=");
                    self.emit_assignment_level(v)?;
                };
            }
            Syntax::ClassDecl {
                name,
                extends,
                members,
            }
            | Syntax::ClassExpr {
                name,
                extends,
                members,
            } => self.emit_class(name.as_ref(), extends.as_ref(), members)?,
            Syntax::FunctionDecl {
                generator,
                is_async,
                name,
                signature,
                body,
            }
            | Syntax::FunctionExpr {
                is_async,
                generator,
                name,
                signature,
                body,
            } => self.emit_function(*is_async, *generator, name.as_ref(), signature, body)?,
            Syntax::VarDecl { .. } => self.emit_var_decl(node, false)?,
            Syntax::ArrowFunctionExpr {
                is_async,
                signature,
                body,
            } => {
                if *is_async {
                    self.write(b"async");
                };
                let can_omit_parentheses = match signature.stx() {
                    Syntax::FunctionSignature { parameters } => {
                        parameters.len() == 1
                            && matches!(parameters[0].stx(), Syntax::ParamDecl {
                                rest: false,
                                default_value: None,
                                pattern,
                            } if matches!(pattern.stx(), Syntax::IdentifierPattern { .. }))
                    }
                    _ => false,
                };
                if can_omit_parentheses {
                    self.emit_js(signature)?;
                } else {
                    self.emit_wrapped(signature)?;
                };
                self.infix("=>");
                match body.stx() {
                    Syntax::BlockStmt { .. } => self.emit_js(body)?,
                    _ if starts_like_block(body) => self.emit_wrapped(body)?,
                    _ => self.emit_assignment_level(body)?,
                };
            }
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } => self.emit_binary(*operator, left, right)?,
            Syntax::CallExpr {
                optional_chaining,
                callee,
                arguments,
                ..
            } => {
                self.emit_js_under_operator(callee, member_precedence())?;
                if *optional_chaining {
                    self.write(b"?.");
                };
                self.emit_arguments(arguments)?;
            }
            Syntax::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => {
                self.emit_js_under_operator(test, OperatorName::Conditional.precedence() + 1)?;
                self.infix("?");
                self.emit_assignment_level(consequent)?;
                self.infix(":");
                self.emit_assignment_level(alternate)?;
            }
            Syntax::ComputedMemberExpr {
                optional_chaining,
                object,
                member,
                ..
            } => {
                self.emit_js_under_operator(object, member_precedence())?;
                if *optional_chaining {
                    self.write(b"?.");
                };
                self.write(b"[");
                self.emit_js(member)?;
                self.write(b"]");
            }
            Syntax::ImportExpr { module } => {
                self.write(b"import(");
                self.emit_assignment_level(module)?;
                self.write(b")");
            }
            Syntax::ImportMeta {} => self.write(b"import.meta"),
            Syntax::NewTarget {} => self.write(b"new.target"),
            Syntax::LiteralArrayExpr { elements } => {
                self.write(b"[");
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    match e {
                        ArrayElement::Single(expr) => self.emit_assignment_level(expr)?,
                        ArrayElement::Rest(expr) => {
                            self.write(b"...");
                            self.emit_assignment_level(expr)?;
                        }
                        ArrayElement::Empty => {}
                    };
                }
                if matches!(elements.last(), Some(ArrayElement::Empty)) {
                    self.write(b",");
                };
                self.write(b"]");
            }
            Syntax::LiteralBigIntExpr { value } => {
                self.write_str(value);
                self.write_raw(b"n");
            }
            Syntax::LiteralBooleanExpr { value } => {
                self.write(if *value { b"true" } else { b"false" });
            }
            Syntax::LiteralNull {} => self.write(b"null"),
            Syntax::LiteralNumberExpr { value } => self.emit_number(value.0),
            Syntax::LiteralObjectExpr { members } => {
                self.write(b"{");
                for (i, e) in members.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    self.emit_js(e)?;
                }
                self.write(b"}");
            }
            Syntax::LiteralRegexExpr { value } => {
                self.write_str(value);
                self.after_regex = true;
            }
            Syntax::LiteralStringExpr { value, raw } => match raw {
                Some(raw) => self.write_str(raw),
                None => self.emit_string(value),
            },
            Syntax::LiteralTemplateExpr { parts } => self.emit_template_parts(parts)?,
            Syntax::LiteralUndefined {} => self.write(b"void 0"),
            Syntax::MemberExpr {
                optional_chaining,
                left,
                right,
                ..
            } => {
                self.emit_js_under_operator(left, member_precedence())?;
                if let Syntax::LiteralNumberExpr { value } = left.stx() {
                    // `1.a` would read as a number with a fraction.
                    if value.0.is_finite()
                        && !value.0.is_sign_negative()
                        && numeral_is_plain_integer(&format_number(value.0))
                    {
                        self.write(b".");
                    };
                };
                self.write(if *optional_chaining { b"?." } else { b"." });
                self.write(right.as_slice());
            }
            Syntax::NewExpr { callee, arguments } => {
                self.write(b"new");
                if callee_contains_call(callee) {
                    self.emit_wrapped(callee)?;
                } else {
                    self.emit_js_under_operator(callee, member_precedence())?;
                };
                self.emit_arguments(arguments)?;
            }
            Syntax::SequenceExpr { elements } => {
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        self.comma();
                    };
                    self.emit_assignment_level(e)?;
                }
            }
            Syntax::SuperExpr {} => self.write(b"super"),
            Syntax::TaggedTemplateExpr { tag, parts } => {
                self.emit_js_under_operator(tag, member_precedence())?;
                self.emit_template_parts(parts)?;
            }
            Syntax::ThisExpr {} => self.write(b"this"),
            Syntax::UnaryExpr { operator, argument } => {
                let Some(syntax) = UNARY_OPERATOR_SYNTAX.get(operator) else {
                    return Err(node.invariant(format!("{:?} is not a unary operator", operator)));
                };
                self.write_str(syntax);
                self.emit_js_under_operator(argument, unary_precedence())?;
            }
            Syntax::UnaryPostfixExpr { operator, argument } => {
                self.emit_js_under_operator(argument, member_precedence())?;
                self.write(match operator {
                    OperatorName::PostfixDecrement => b"--",
                    OperatorName::PostfixIncrement => b"++",
                    _ => return Err(node.invariant("unexpected postfix operator")),
                });
            }
            Syntax::YieldExpr { delegate, argument } => {
                self.write(b"yield");
                if *delegate {
                    self.write(b"*");
                };
                if let Some(argument) = argument {
                    self.space();
                    self.emit_assignment_level(argument)?;
                };
            }
            Syntax::BlockStmt { body } => self.emit_block(body)?,
            Syntax::BreakStmt { label } => {
                self.write(b"break");
                if let Some(label) = label {
                    self.write(label.as_slice());
                };
            }
            Syntax::ContinueStmt { label } => {
                self.write(b"continue");
                if let Some(label) = label {
                    self.write(label.as_slice());
                };
            }
            Syntax::DebuggerStmt {} => self.write(b"debugger"),
            Syntax::DirectiveStmt { raw } => self.write_str(raw),
            Syntax::DoWhileStmt { condition, body } => {
                self.write(b"do");
                self.emit_body(body)?;
                if get_leaf_node_type(body) != LeafNodeType::Block {
                    self.write(b";");
                };
                self.space();
                self.write(b"while");
                self.space();
                self.emit_wrapped(condition)?;
            }
            Syntax::ExportDeclStmt {
                declaration,
                default,
            } => {
                self.write(b"export");
                if *default {
                    self.write(b"default");
                };
                self.emit_js(declaration)?;
            }
            Syntax::ExportDefaultExprStmt { expression } => {
                self.write(b"export");
                self.write(b"default");
                if matches!(
                    leftmost(expression).stx(),
                    Syntax::FunctionExpr { .. } | Syntax::ClassExpr { .. }
                ) {
                    self.emit_wrapped(expression)?;
                } else {
                    self.emit_assignment_level(expression)?;
                };
            }
            Syntax::ExportListStmt { names, from } => {
                self.write(b"export");
                self.emit_import_or_export_statement_trailer(Some(names), from.as_deref())?;
            }
            Syntax::ExpressionStmt { expression } => {
                if starts_like_statement(expression) {
                    self.emit_wrapped(expression)?;
                } else {
                    self.emit_js(expression)?;
                };
            }
            Syntax::IfStmt {
                test,
                consequent,
                alternate,
            } => {
                self.write(b"if");
                self.space();
                self.emit_wrapped(test)?;
                self.emit_body(consequent)?;
                if let Some(alternate) = alternate {
                    if get_leaf_node_type(consequent) != LeafNodeType::Block {
                        self.write(b";");
                    };
                    self.space();
                    self.write(b"else");
                    self.emit_body(alternate)?;
                };
            }
            Syntax::ImportStmt {
                default,
                names,
                module,
            } => {
                self.write(b"import");
                if let Some(default) = default {
                    self.emit_js(default)?;
                    if names.is_some() {
                        self.comma();
                    };
                };
                if default.is_some() && names.is_none() {
                    self.write(b"from");
                };
                self.emit_import_or_export_statement_trailer(names.as_ref(), Some(module.as_str()))?;
            }
            Syntax::ForStmt { header, body } => {
                self.write(b"for");
                if let ForStmtHeader::InOf { is_await: true, .. } = header {
                    self.write(b"await");
                };
                self.space();
                self.write(b"(");
                match header {
                    ForStmtHeader::Three {
                        init,
                        condition,
                        post,
                    } => {
                        match init {
                            ForThreeInit::None => {}
                            ForThreeInit::Expression(n) => {
                                if contains_in_operator(n) {
                                    self.emit_wrapped(n)?;
                                } else {
                                    self.emit_js(n)?;
                                };
                            }
                            ForThreeInit::Declaration(n) => self.emit_var_decl(n, true)?,
                        };
                        self.write(b";");
                        if let Some(n) = condition {
                            self.space();
                            self.emit_js(n)?;
                        };
                        self.write(b";");
                        if let Some(n) = post {
                            self.space();
                            self.emit_js(n)?;
                        };
                    }
                    ForStmtHeader::InOf { of, lhs, rhs, .. } => {
                        match lhs {
                            ForInOfStmtHeaderLhs::Declaration(n) => self.emit_var_decl(n, false)?,
                            ForInOfStmtHeaderLhs::Pattern(n) => {
                                self.emit_js_under_operator(n, member_precedence())?
                            }
                        };
                        if *of {
                            self.write(b"of");
                            self.emit_assignment_level(rhs)?;
                        } else {
                            self.write(b"in");
                            self.emit_js(rhs)?;
                        };
                    }
                };
                self.write(b")");
                self.emit_body(body)?;
            }
            Syntax::LabelStmt { name, statement } => {
                self.write(name.as_slice());
                self.write(b":");
                self.emit_body(statement)?;
            }
            Syntax::ReturnStmt { value } => {
                self.write(b"return");
                if let Some(value) = value {
                    self.space();
                    self.emit_js(value)?;
                };
            }
            Syntax::SwitchStmt { test, branches } => {
                self.write(b"switch");
                self.space();
                self.emit_wrapped(test)?;
                self.space();
                self.write(b"{");
                let mut needs_separator = false;
                for b in branches {
                    if needs_separator && !self.beautify {
                        self.write(b";");
                    };
                    self.newline();
                    self.emit_js(b)?;
                    needs_separator = match b.stx() {
                        Syntax::SwitchBranch { body, .. } => body
                            .iter()
                            .rev()
                            .find(|s| !matches!(s.stx(), Syntax::EmptyStmt {}))
                            .map_or(false, |s| get_leaf_node_type(s) == LeafNodeType::Other),
                        _ => false,
                    };
                }
                self.newline();
                self.write(b"}");
            }
            Syntax::SwitchBranch { case, body } => {
                match case {
                    Some(case) => {
                        self.write(b"case");
                        self.space();
                        self.emit_js(case)?;
                        self.write(b":");
                    }
                    None => self.write(b"default:"),
                };
                self.indent += 1;
                self.emit_statements(body)?;
                self.indent -= 1;
            }
            Syntax::ThrowStmt { value } => {
                self.write(b"throw");
                self.space();
                self.emit_js(value)?;
            }
            Syntax::TryStmt {
                wrapped,
                catch,
                finally,
            } => {
                self.write(b"try");
                self.emit_js(wrapped)?;
                if let Some(c) = catch {
                    self.space();
                    self.emit_js(c)?;
                };
                if let Some(f) = finally {
                    self.space();
                    self.write(b"finally");
                    self.emit_js(f)?;
                };
            }
            Syntax::VarStmt { declaration } => self.emit_var_decl(declaration, false)?,
            Syntax::WhileStmt { condition, body } => {
                self.write(b"while");
                self.space();
                self.emit_wrapped(condition)?;
                self.emit_body(body)?;
            }
            Syntax::WithStmt { object, body } => {
                self.write(b"with");
                self.space();
                self.emit_wrapped(object)?;
                self.emit_body(body)?;
            }
            Syntax::TopLevel { body } => self.emit_statements(body)?,
            Syntax::CallArg { spread, value } => {
                if *spread {
                    self.write(b"...");
                };
                self.emit_assignment_level(value)?;
            }
            Syntax::CatchBlock { parameter, body } => {
                self.write(b"catch");
                if let Some(p) = parameter {
                    self.space();
                    self.emit_wrapped(p)?;
                };
                self.emit_js(body)?;
            }
            Syntax::ObjectMember { typ } => match typ {
                ObjectMemberType::Valued { key, value } => {
                    self.emit_class_or_object_member(key, value, ":")?;
                }
                ObjectMemberType::Shorthand { name } => self.write(name.as_slice()),
                ObjectMemberType::Rest { value } => {
                    self.write(b"...");
                    self.emit_assignment_level(value)?;
                }
            },
            Syntax::_TakenNode {} => return Err(node.invariant("taken node reached the printer")),
        };
        Ok(())
    }
}

/// Prints a program as JavaScript code.
pub fn emit_program(program: &Program, options: &EmitOptions) -> Result<String, InvariantError> {
    emit_node(&program.top_level, options)
}

/// Prints any node, e.g. a single expression.
pub fn emit_node(node: &Node, options: &EmitOptions) -> Result<String, InvariantError> {
    let mut emitter = Emitter::new(options);
    emitter.emit_js(node)?;
    emitter.finish()
}
