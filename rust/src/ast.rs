use std::fmt;
use std::fmt::{Debug, Formatter};
use std::mem;

#[cfg(test)]
use serde::Serialize;

use crate::error::{InvariantError, SyntaxError, SyntaxErrorType};
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::source::SourceRange;

/// A tree node. Every child is owned by exactly one parent slot; nodes are moved, never shared.
pub struct Node {
    loc: SourceRange,
    stx: Box<Syntax>,
}

impl Node {
    pub fn new(loc: SourceRange, stx: Syntax) -> Node {
        Node {
            loc,
            stx: Box::new(stx),
        }
    }

    pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::from_loc(self.loc(), typ)
    }

    pub fn loc(&self) -> &SourceRange {
        &self.loc
    }

    pub fn stx(&self) -> &Syntax {
        &self.stx
    }

    pub fn stx_mut(&mut self) -> &mut Syntax {
        &mut self.stx
    }

    pub fn into_stx(self) -> Syntax {
        *self.stx
    }

    /// Moves this node out, leaving a `_TakenNode` placeholder. The placeholder must be replaced
    /// before the tree is used again.
    pub fn take(&mut self) -> Node {
        let loc = self.loc.clone();
        mem::replace(self, Node::new(loc, Syntax::_TakenNode {}))
    }

    /// A node with the same location but different syntax, e.g. the replacement a rewrite produces.
    pub fn derive(&self, stx: Syntax) -> Node {
        Node::new(self.loc.clone(), stx)
    }

    pub fn invariant<T: Into<String>>(&self, msg: T) -> InvariantError {
        InvariantError::new(format!("{} at {:?}", msg.into(), self.loc))
    }
}

#[cfg(test)]
impl Serialize for Node {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.stx.serialize(serializer)
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:?}", self.stx))
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub enum VarDeclMode {
    Const,
    Let,
    Var,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ArrayElement {
    Single(Node),
    Rest(Node),
    Empty,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(untagged))]
pub enum ClassOrObjectMemberKey {
    // Identifier, keyword, private name, string (with quotes), or number, as written.
    Direct(SourceRange),
    Computed(Node),
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ClassOrObjectMemberValue {
    Getter {
        body: Node,
    },
    Method {
        #[cfg_attr(test, serde(rename = "async"))]
        is_async: bool,
        generator: bool,
        signature: Node,
        body: Node,
    },
    Property {
        // Always Some in object literals; shorthands use ObjectMemberType::Shorthand.
        initializer: Option<Node>,
    },
    Setter {
        body: Node,
        parameter: Node,
    },
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct ClassMember {
    pub key: ClassOrObjectMemberKey,
    #[cfg_attr(test, serde(rename = "static"))]
    pub statik: bool,
    pub value: ClassOrObjectMemberValue,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ObjectMemberType {
    Valued {
        key: ClassOrObjectMemberKey,
        value: ClassOrObjectMemberValue,
    },
    Shorthand {
        name: SourceRange,
    },
    Rest {
        value: Node,
    },
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct ArrayPatternElement {
    pub target: Node,
    pub default_value: Option<Node>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct ExportName {
    // For an import, the name exported by the other module; for an export, the local name.
    pub target: SourceRange,
    // IdentifierPattern. For an import, the local binding; for an export, the exported name. For
    // shorthands, both are the same name.
    pub alias: Node,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ExportNames {
    // `import * as name`
    // `export * from "module"`
    // `export * as name from "module"`
    // IdentifierPattern.
    All(Option<Node>),
    // `import {a as b, c, default as e}`
    // `export {a as default, b as c, d}`
    // `export {default, a as b, c} from "module"`
    // `default` is stored as an ordinary name.
    Specific(Vec<ExportName>),
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct VariableDeclarator {
    pub pattern: Node,
    pub initializer: Option<Node>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ForThreeInit {
    None,
    Expression(Node),
    Declaration(Node),
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum ForInOfStmtHeaderLhs {
    Declaration(Node),
    Pattern(Node),
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "camelCase"))]
pub enum ForStmtHeader {
    Three {
        init: ForThreeInit,
        condition: Option<Node>,
        post: Option<Node>,
    },
    InOf {
        of: bool,
        // `for await (... of ...)`.
        #[cfg_attr(test, serde(rename = "await"))]
        is_await: bool,
        lhs: ForInOfStmtHeaderLhs,
        rhs: Node,
    },
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(rename_all = "lowercase"))]
pub enum LiteralTemplatePart {
    Substitution(Node),
    // Raw text between the delimiters, escapes untouched.
    String(String),
}

#[derive(Debug)]
#[cfg_attr(test, derive(Serialize))]
#[cfg_attr(test, serde(tag = "$t"))]
pub enum Syntax {
    // Patterns.
    IdentifierPattern {
        name: SourceRange,
    },
    ArrayPattern {
        // None for holes, as in `[, a]`.
        elements: Vec<Option<ArrayPatternElement>>,
        rest: Option<Node>,
    },
    // Only an IdentifierPattern may follow `...` here.
    ObjectPattern {
        // List of ObjectPatternProperty nodes.
        properties: Vec<Node>,
        // Always an IdentifierPattern.
        rest: Option<Node>,
    },
    // The name of a class or function declaration or expression, kept apart from other bindings.
    ClassOrFunctionName {
        name: SourceRange,
    },

    // Signatures.
    FunctionSignature {
        // ParamDecl nodes.
        parameters: Vec<Node>,
    },

    // Declarations.
    ClassDecl {
        name: Option<Node>, // Name can only be omitted in a default export.
        extends: Option<Node>,
        members: Vec<ClassMember>,
    },
    FunctionDecl {
        generator: bool,
        #[cfg_attr(test, serde(rename = "async"))]
        is_async: bool,
        name: Option<Node>, // Name can only be omitted in a default export.
        signature: Node,
        body: Node,
    },
    ParamDecl {
        rest: bool,
        pattern: Node,
        default_value: Option<Node>,
    },
    VarDecl {
        mode: VarDeclMode,
        declarators: Vec<VariableDeclarator>,
    },

    // Expressions.
    ArrowFunctionExpr {
        #[cfg_attr(test, serde(rename = "async"))]
        is_async: bool,
        signature: Node,
        // BlockStmt or an expression.
        body: Node,
    },
    BinaryExpr {
        operator: OperatorName,
        left: Node,
        right: Node,
    },
    CallExpr {
        optional_chaining: bool,
        // Parentheses around a call or member access end an optional chain, so they're kept.
        parenthesised: bool,
        callee: Node,
        // CallArg nodes.
        arguments: Vec<Node>,
    },
    ClassExpr {
        name: Option<Node>,
        extends: Option<Node>,
        members: Vec<ClassMember>,
    },
    ConditionalExpr {
        test: Node,
        consequent: Node,
        alternate: Node,
    },
    ComputedMemberExpr {
        optional_chaining: bool,
        parenthesised: bool,
        object: Node,
        member: Node,
    },
    FunctionExpr {
        #[cfg_attr(test, serde(rename = "async"))]
        is_async: bool,
        generator: bool,
        name: Option<Node>,
        signature: Node,
        body: Node,
    },
    IdentifierExpr {
        name: SourceRange,
    },
    ImportExpr {
        module: Node,
    },
    ImportMeta {},
    LiteralArrayExpr {
        elements: Vec<ArrayElement>,
    },
    LiteralBigIntExpr {
        // Digits without separators, including any radix prefix but not the `n` suffix.
        value: String,
    },
    LiteralBooleanExpr {
        value: bool,
    },
    LiteralNull {},
    LiteralNumberExpr {
        value: JsNumber,
    },
    LiteralObjectExpr {
        // List of ObjectMember nodes.
        members: Vec<Node>,
    },
    LiteralRegexExpr {
        value: String,
    },
    LiteralStringExpr {
        value: String,
        // Set when the literal encodes something a Rust string can't hold (a lone surrogate); the
        // literal is then printed as written.
        #[cfg_attr(test, serde(skip))]
        raw: Option<String>,
    },
    LiteralTemplateExpr {
        parts: Vec<LiteralTemplatePart>,
    },
    // Only created by the compressor; printed as `void 0`.
    LiteralUndefined {},
    // A property name, never a variable reference.
    MemberExpr {
        parenthesised: bool,
        optional_chaining: bool,
        left: Node,
        right: SourceRange,
    },
    NewExpr {
        callee: Node,
        // CallArg nodes.
        arguments: Vec<Node>,
    },
    NewTarget {},
    SequenceExpr {
        // At least two.
        elements: Vec<Node>,
    },
    SuperExpr {},
    TaggedTemplateExpr {
        tag: Node,
        parts: Vec<LiteralTemplatePart>,
    },
    ThisExpr {},
    UnaryExpr {
        operator: OperatorName,
        argument: Node,
    },
    UnaryPostfixExpr {
        operator: OperatorName,
        argument: Node,
    },
    YieldExpr {
        delegate: bool,
        // Always Some when delegating.
        argument: Option<Node>,
    },

    // Statements.
    BlockStmt {
        body: Vec<Node>,
    },
    BreakStmt {
        label: Option<SourceRange>,
    },
    ContinueStmt {
        label: Option<SourceRange>,
    },
    DebuggerStmt {},
    // An element of a directive prologue, e.g. `"use strict"`, kept as written.
    DirectiveStmt {
        raw: String,
    },
    DoWhileStmt {
        condition: Node,
        body: Node,
    },
    EmptyStmt {},
    ExportDeclStmt {
        declaration: Node,
        default: bool,
    },
    ExportDefaultExprStmt {
        expression: Node,
    },
    ExportListStmt {
        names: ExportNames,
        from: Option<String>,
    },
    ExpressionStmt {
        expression: Node,
    },
    IfStmt {
        test: Node,
        consequent: Node,
        alternate: Option<Node>,
    },
    ImportStmt {
        // IdentifierPattern.
        default: Option<Node>,
        names: Option<ExportNames>,
        module: String,
    },
    ForStmt {
        header: ForStmtHeader,
        body: Node,
    },
    LabelStmt {
        name: SourceRange,
        statement: Node,
    },
    ReturnStmt {
        value: Option<Node>,
    },
    SwitchStmt {
        test: Node,
        // SwitchBranch nodes.
        branches: Vec<Node>,
    },
    ThrowStmt {
        value: Node,
    },
    TryStmt {
        wrapped: Node,
        // At least one of `catch` and `finally` is set.
        catch: Option<Node>,
        finally: Option<Node>,
    },
    VarStmt {
        declaration: Node,
    },
    WhileStmt {
        condition: Node,
        body: Node,
    },
    WithStmt {
        object: Node,
        body: Node,
    },

    // Others.
    TopLevel {
        body: Vec<Node>,
    },
    CallArg {
        spread: bool,
        value: Node,
    },
    CatchBlock {
        parameter: Option<Node>,
        body: Node,
    },
    // A node so the renamer can swap a shorthand for `key: value` in place.
    ObjectMember {
        typ: ObjectMemberType,
    },
    ObjectPatternProperty {
        key: ClassOrObjectMemberKey,
        // For a shorthand, an IdentifierPattern with the same name as the key.
        target: Node,
        default_value: Option<Node>,
        shorthand: bool,
    },
    SwitchBranch {
        // If None, it's `default`.
        case: Option<Node>,
        body: Vec<Node>,
    },

    // Left behind by `Node::take`. Never seen outside of a rewrite in progress.
    _TakenNode {},
}

impl Syntax {
    pub fn is_taken(&self) -> bool {
        matches!(self, Syntax::_TakenNode {})
    }

    /// Declarations scoped to the enclosing block rather than the function.
    pub fn is_lexical_decl(&self) -> bool {
        match self {
            Syntax::ClassDecl { .. } => true,
            Syntax::VarStmt { declaration } => matches!(
                declaration.stx(),
                Syntax::VarDecl {
                    mode: VarDeclMode::Let | VarDeclMode::Const,
                    ..
                }
            ),
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Syntax::FunctionDecl { .. } | Syntax::FunctionExpr { .. } | Syntax::ArrowFunctionExpr { .. }
        )
    }
}

/// The root of a parsed program.
#[derive(Debug)]
pub struct Program {
    // TopLevel node.
    pub top_level: Node,
    pub mode: crate::parse::toplevel::TopLevelMode,
    // Module code, or a script whose directive prologue includes "use strict".
    pub strict: bool,
}

impl Program {
    pub fn body(&self) -> &[Node] {
        match self.top_level.stx() {
            Syntax::TopLevel { body } => body,
            _ => &[],
        }
    }
}
