use crate::ast::ArrayElement;
use crate::ast::ClassOrObjectMemberKey;
use crate::ast::ClassOrObjectMemberValue;
use crate::ast::ExportNames;
use crate::ast::ForInOfStmtHeaderLhs;
use crate::ast::ForStmtHeader;
use crate::ast::ForThreeInit;
use crate::ast::LiteralTemplatePart;
use crate::ast::Node;
use crate::ast::ObjectMemberType;
use crate::ast::Syntax;

// Pushes every child node of a Syntax, in source order. `$r` is `&` or `&mut`, so the same match
// produces both shared and exclusive children.
macro_rules! push_children {
    (@value $value:expr, $out:ident) => {
        match $value {
            ClassOrObjectMemberValue::Getter { body } => $out.push(body),
            ClassOrObjectMemberValue::Method {
                signature, body, ..
            } => {
                $out.push(signature);
                $out.push(body);
            }
            ClassOrObjectMemberValue::Property { initializer } => {
                if let Some(initializer) = initializer {
                    $out.push(initializer);
                };
            }
            ClassOrObjectMemberValue::Setter { body, parameter } => {
                $out.push(parameter);
                $out.push(body);
            }
        }
    };
    (@parts $parts:expr, $out:ident) => {
        for part in $parts {
            if let LiteralTemplatePart::Substitution(expr) = part {
                $out.push(expr);
            };
        }
    };
    (@names $names:expr, $out:ident, $($r:tt)+) => {
        match $names {
            ExportNames::All(alias) => {
                if let Some(alias) = alias {
                    $out.push(alias);
                };
            }
            ExportNames::Specific(names) => {
                for name in names {
                    $out.push($($r)+ name.alias);
                }
            }
        }
    };
    ($stx:expr, $out:ident, $($r:tt)+) => {
        match $stx {
            Syntax::IdentifierPattern { .. }
            | Syntax::IdentifierExpr { .. }
            | Syntax::ClassOrFunctionName { .. }
            | Syntax::ImportMeta {}
            | Syntax::LiteralBigIntExpr { .. }
            | Syntax::LiteralBooleanExpr { .. }
            | Syntax::LiteralNull {}
            | Syntax::LiteralNumberExpr { .. }
            | Syntax::LiteralRegexExpr { .. }
            | Syntax::LiteralStringExpr { .. }
            | Syntax::LiteralUndefined {}
            | Syntax::NewTarget {}
            | Syntax::SuperExpr {}
            | Syntax::ThisExpr {}
            | Syntax::BreakStmt { .. }
            | Syntax::ContinueStmt { .. }
            | Syntax::DebuggerStmt {}
            | Syntax::DirectiveStmt { .. }
            | Syntax::EmptyStmt {}
            | Syntax::_TakenNode {} => {}
            Syntax::ArrayPattern { elements, rest } => {
                for elem in elements {
                    if let Some(elem) = elem {
                        $out.push($($r)+ elem.target);
                        if let Some(default_value) = $($r)+ elem.default_value {
                            $out.push(default_value);
                        };
                    };
                }
                if let Some(rest) = rest {
                    $out.push(rest);
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for prop in properties {
                    $out.push(prop);
                }
                if let Some(rest) = rest {
                    $out.push(rest);
                };
            }
            Syntax::ObjectPatternProperty {
                key,
                target,
                default_value,
                ..
            } => {
                if let ClassOrObjectMemberKey::Computed(key) = key {
                    $out.push(key);
                };
                $out.push(target);
                if let Some(default_value) = default_value {
                    $out.push(default_value);
                };
            }
            Syntax::FunctionSignature { parameters } => {
                for param in parameters {
                    $out.push(param);
                }
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
            } => {
                if let Some(name) = name {
                    $out.push(name);
                };
                if let Some(extends) = extends {
                    $out.push(extends);
                };
                for member in members {
                    if let ClassOrObjectMemberKey::Computed(key) = $($r)+ member.key {
                        $out.push(key);
                    };
                    push_children!(@value $($r)+ member.value, $out);
                }
            }
            Syntax::FunctionDecl {
                name,
                signature,
                body,
                ..
            }
            | Syntax::FunctionExpr {
                name,
                signature,
                body,
                ..
            } => {
                if let Some(name) = name {
                    $out.push(name);
                };
                $out.push(signature);
                $out.push(body);
            }
            Syntax::ParamDecl {
                pattern,
                default_value,
                ..
            } => {
                $out.push(pattern);
                if let Some(default_value) = default_value {
                    $out.push(default_value);
                };
            }
            Syntax::VarDecl { declarators, .. } => {
                for decl in declarators {
                    $out.push($($r)+ decl.pattern);
                    if let Some(initializer) = $($r)+ decl.initializer {
                        $out.push(initializer);
                    };
                }
            }
            Syntax::ArrowFunctionExpr {
                signature, body, ..
            } => {
                $out.push(signature);
                $out.push(body);
            }
            Syntax::BinaryExpr { left, right, .. } => {
                $out.push(left);
                $out.push(right);
            }
            Syntax::CallExpr {
                callee, arguments, ..
            }
            | Syntax::NewExpr { callee, arguments } => {
                $out.push(callee);
                for arg in arguments {
                    $out.push(arg);
                }
            }
            Syntax::ConditionalExpr {
                test,
                consequent,
                alternate,
            } => {
                $out.push(test);
                $out.push(consequent);
                $out.push(alternate);
            }
            Syntax::ComputedMemberExpr { object, member, .. } => {
                $out.push(object);
                $out.push(member);
            }
            Syntax::ImportExpr { module } => $out.push(module),
            Syntax::LiteralArrayExpr { elements } => {
                for elem in elements {
                    match elem {
                        ArrayElement::Single(value) | ArrayElement::Rest(value) => {
                            $out.push(value)
                        }
                        ArrayElement::Empty => {}
                    };
                }
            }
            Syntax::LiteralObjectExpr { members } => {
                for member in members {
                    $out.push(member);
                }
            }
            Syntax::LiteralTemplateExpr { parts } => {
                push_children!(@parts parts, $out);
            }
            Syntax::TaggedTemplateExpr { tag, parts } => {
                $out.push(tag);
                push_children!(@parts parts, $out);
            }
            Syntax::MemberExpr { left, .. } => $out.push(left),
            Syntax::SequenceExpr { elements } => {
                for elem in elements {
                    $out.push(elem);
                }
            }
            Syntax::UnaryExpr { argument, .. } | Syntax::UnaryPostfixExpr { argument, .. } => {
                $out.push(argument)
            }
            Syntax::YieldExpr { argument, .. } => {
                if let Some(argument) = argument {
                    $out.push(argument);
                };
            }
            Syntax::BlockStmt { body } | Syntax::TopLevel { body } => {
                for stmt in body {
                    $out.push(stmt);
                }
            }
            Syntax::DoWhileStmt { condition, body } => {
                $out.push(body);
                $out.push(condition);
            }
            Syntax::ExportDeclStmt { declaration, .. } => $out.push(declaration),
            Syntax::ExportDefaultExprStmt { expression } => $out.push(expression),
            Syntax::ExportListStmt { names, .. } => {
                push_children!(@names names, $out, $($r)+);
            }
            Syntax::ExpressionStmt { expression } => $out.push(expression),
            Syntax::IfStmt {
                test,
                consequent,
                alternate,
            } => {
                $out.push(test);
                $out.push(consequent);
                if let Some(alternate) = alternate {
                    $out.push(alternate);
                };
            }
            Syntax::ImportStmt { default, names, .. } => {
                if let Some(default) = default {
                    $out.push(default);
                };
                if let Some(names) = names {
                    push_children!(@names names, $out, $($r)+);
                };
            }
            Syntax::ForStmt { header, body } => {
                match header {
                    ForStmtHeader::Three {
                        init,
                        condition,
                        post,
                    } => {
                        match init {
                            ForThreeInit::None => {}
                            ForThreeInit::Expression(n) | ForThreeInit::Declaration(n) => {
                                $out.push(n)
                            }
                        };
                        if let Some(condition) = condition {
                            $out.push(condition);
                        };
                        if let Some(post) = post {
                            $out.push(post);
                        };
                    }
                    ForStmtHeader::InOf { lhs, rhs, .. } => {
                        match lhs {
                            ForInOfStmtHeaderLhs::Declaration(n)
                            | ForInOfStmtHeaderLhs::Pattern(n) => $out.push(n),
                        };
                        $out.push(rhs);
                    }
                };
                $out.push(body);
            }
            Syntax::LabelStmt { statement, .. } => $out.push(statement),
            Syntax::ReturnStmt { value } => {
                if let Some(value) = value {
                    $out.push(value);
                };
            }
            Syntax::SwitchStmt { test, branches } => {
                $out.push(test);
                for branch in branches {
                    $out.push(branch);
                }
            }
            Syntax::ThrowStmt { value } => $out.push(value),
            Syntax::TryStmt {
                wrapped,
                catch,
                finally,
            } => {
                $out.push(wrapped);
                if let Some(catch) = catch {
                    $out.push(catch);
                };
                if let Some(finally) = finally {
                    $out.push(finally);
                };
            }
            Syntax::VarStmt { declaration } => $out.push(declaration),
            Syntax::WhileStmt { condition, body } => {
                $out.push(condition);
                $out.push(body);
            }
            Syntax::WithStmt { object, body } => {
                $out.push(object);
                $out.push(body);
            }
            Syntax::CallArg { value, .. } => $out.push(value),
            Syntax::CatchBlock { parameter, body } => {
                if let Some(parameter) = parameter {
                    $out.push(parameter);
                };
                $out.push(body);
            }
            Syntax::ObjectMember { typ } => match typ {
                ObjectMemberType::Valued { key, value } => {
                    if let ClassOrObjectMemberKey::Computed(key) = key {
                        $out.push(key);
                    };
                    push_children!(@value value, $out);
                }
                ObjectMemberType::Shorthand { .. } => {}
                ObjectMemberType::Rest { value } => $out.push(value),
            },
            Syntax::SwitchBranch { case, body } => {
                if let Some(case) = case {
                    $out.push(case);
                };
                for stmt in body {
                    $out.push(stmt);
                }
            }
        }
    };
}

/// Direct children of a node, in source order.
pub fn children(stx: &Syntax) -> Vec<&Node> {
    let mut out = Vec::new();
    push_children!(stx, out, &);
    out
}

pub fn children_mut(stx: &mut Syntax) -> Vec<&mut Node> {
    let mut out = Vec::new();
    push_children!(stx, out, &mut);
    out
}

/// Whether `pred` holds for `node` or any node beneath it. Function bodies are searched too.
pub fn any_node(node: &Node, pred: &mut impl FnMut(&Node) -> bool) -> bool {
    if pred(node) {
        return true;
    };
    children(node.stx()).into_iter().any(|c| any_node(c, pred))
}

#[derive(Default)]
pub struct JourneyControls {
    skip: bool,
}

impl JourneyControls {
    /// Don't descend into the current node's children. `on_syntax_up` is still called.
    pub fn skip(&mut self) -> () {
        self.skip = true;
    }
}

/// A mutable walk over a tree. `on_syntax_down` sees a node before its children, `on_syntax_up`
/// after; whatever `on_syntax_up` leaves in the slot stays there, so it can replace the node.
pub trait Visitor {
    fn on_syntax_down(&mut self, _node: &mut Node, _ctl: &mut JourneyControls) -> () {}

    fn on_syntax_up(&mut self, _node: &mut Node) -> () {}

    fn visit(&mut self, node: &mut Node) -> ()
    where
        Self: Sized,
    {
        let mut ctl = JourneyControls::default();
        self.on_syntax_down(node, &mut ctl);
        if !ctl.skip {
            for child in children_mut(node.stx_mut()) {
                self.visit(child);
            }
        };
        self.on_syntax_up(node);
    }
}
