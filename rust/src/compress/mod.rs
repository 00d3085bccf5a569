use serde::Deserialize;
use tracing::debug;
use tracing::trace;

use crate::ast::ArrayElement;
use crate::ast::ClassOrObjectMemberKey;
use crate::ast::ClassOrObjectMemberValue;
use crate::ast::LiteralTemplatePart;
use crate::ast::Node;
use crate::ast::ObjectMemberType;
use crate::ast::Program;
use crate::ast::Syntax;
use crate::ast::VarDeclMode;
use crate::error::InvariantError;
use crate::operator::OperatorName;
use crate::visit::any_node;
use crate::visit::children;
use crate::visit::Visitor;

mod conditionals;
mod dead_code;
mod evaluate;
mod properties;
mod sequences;
mod statements;
#[cfg(test)]
mod tests;
mod undefined;

/// Which rewrite rules run, and how many times the whole tree is rewritten. All rules are off by
/// default; `CompressOptions::all` turns every one on.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    pub passes: u32,
    pub max_passes: u32,
    pub sequences: bool,
    pub yield_undefined: bool,
    pub undefined_to_void: bool,
    pub evaluate: bool,
    pub side_effects: bool,
    pub dead_code: bool,
    pub drop_debugger: bool,
    pub conditionals: bool,
    pub if_return: bool,
    pub join_vars: bool,
    pub properties: bool,
    pub loops: bool,
    pub blocks: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            passes: 1,
            max_passes: 10,
            sequences: false,
            yield_undefined: false,
            undefined_to_void: false,
            evaluate: false,
            side_effects: false,
            dead_code: false,
            drop_debugger: false,
            conditionals: false,
            if_return: false,
            join_vars: false,
            properties: false,
            loops: false,
            blocks: false,
        }
    }
}

impl CompressOptions {
    pub fn all() -> CompressOptions {
        CompressOptions {
            passes: 2,
            max_passes: 10,
            sequences: true,
            yield_undefined: true,
            undefined_to_void: true,
            evaluate: true,
            side_effects: true,
            dead_code: true,
            drop_debugger: true,
            conditionals: true,
            if_return: true,
            join_vars: true,
            properties: true,
            loops: true,
            blocks: true,
        }
    }

    fn pass_limit(&self) -> u32 {
        self.passes.max(1).min(self.max_passes.max(1))
    }
}

/// Facts about the whole program that rules may depend on, recomputed before every pass.
pub struct RuleContext {
    // Set if anything declares a binding called `undefined`, or a `with` or `eval` could introduce
    // one.
    pub undefined_is_bound: bool,
}

impl RuleContext {
    fn analyse(top_level: &Node) -> RuleContext {
        let undefined_is_bound = any_node(top_level, &mut |n| match n.stx() {
            Syntax::IdentifierPattern { name } | Syntax::ClassOrFunctionName { name } => {
                name.as_str() == "undefined"
            }
            Syntax::WithStmt { .. } => true,
            Syntax::CallExpr { callee, .. } => {
                matches!(callee.stx(), Syntax::IdentifierExpr { name } if name.as_str() == "eval")
            }
            _ => false,
        });
        RuleContext { undefined_is_bound }
    }
}

/// A rule inspects one node. It returns the replacement when it fires, and returns None with the
/// node untouched otherwise.
pub type RuleFn = fn(&mut Node, &RuleContext) -> Result<Option<Node>, InvariantError>;

struct Rule {
    name: &'static str,
    enabled: fn(&CompressOptions) -> bool,
    apply: RuleFn,
}

// Order matters only for which rewrite is seen first; every enabled rule runs until none fire.
static RULES: &[Rule] = &[
    Rule {
        name: "drop_debugger",
        enabled: |o| o.drop_debugger,
        apply: dead_code::maybe_drop_debugger,
    },
    Rule {
        name: "dead_code",
        enabled: |o| o.dead_code,
        apply: dead_code::maybe_drop_unreachable,
    },
    Rule {
        name: "dead_code",
        enabled: |o| o.dead_code,
        apply: dead_code::maybe_drop_constant_branch,
    },
    Rule {
        name: "yield_undefined",
        enabled: |o| o.yield_undefined,
        apply: undefined::maybe_drop_yield_undefined,
    },
    Rule {
        name: "undefined_to_void",
        enabled: |o| o.undefined_to_void,
        apply: undefined::maybe_undefined_to_void,
    },
    Rule {
        name: "evaluate",
        enabled: |o| o.evaluate,
        apply: evaluate::maybe_evaluate,
    },
    Rule {
        name: "side_effects",
        enabled: |o| o.side_effects,
        apply: sequences::maybe_drop_side_effect_free,
    },
    Rule {
        name: "properties",
        enabled: |o| o.properties,
        apply: properties::maybe_dot_member,
    },
    Rule {
        name: "properties",
        enabled: |o| o.properties,
        apply: properties::maybe_unquote_keys,
    },
    Rule {
        name: "blocks",
        enabled: |o| o.blocks,
        apply: statements::maybe_flatten_blocks,
    },
    Rule {
        name: "blocks",
        enabled: |o| o.blocks,
        apply: statements::maybe_unwrap_single_statement_block,
    },
    Rule {
        name: "join_vars",
        enabled: |o| o.join_vars,
        apply: statements::maybe_join_vars,
    },
    Rule {
        name: "loops",
        enabled: |o| o.loops,
        apply: statements::maybe_loop_forever,
    },
    Rule {
        name: "if_return",
        enabled: |o| o.if_return,
        apply: conditionals::maybe_return_conditional,
    },
    Rule {
        name: "conditionals",
        enabled: |o| o.conditionals,
        apply: conditionals::maybe_if_to_expression,
    },
    Rule {
        name: "sequences",
        enabled: |o| o.sequences,
        apply: sequences::maybe_join_sequences,
    },
];

// A rule set that never settles on one node is a bug, but shouldn't hang the process.
const MAX_REWRITES_PER_NODE: usize = 64;

struct Compressor<'a> {
    rules: Vec<&'a Rule>,
    ctx: &'a RuleContext,
    rewrites: usize,
    error: Option<InvariantError>,
}

impl<'a> Visitor for Compressor<'a> {
    fn on_syntax_up(&mut self, n: &mut Node) -> () {
        if self.error.is_some() {
            return;
        };
        for _ in 0..MAX_REWRITES_PER_NODE {
            let mut fired = false;
            for rule in self.rules.iter() {
                match (rule.apply)(n, self.ctx) {
                    Ok(Some(replacement)) => {
                        trace!(rule = rule.name, "rewrite");
                        *n = replacement;
                        self.rewrites += 1;
                        fired = true;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        self.error = Some(err);
                        return;
                    }
                };
                if n.stx().is_taken() {
                    self.error = Some(n.invariant(format!("rule {} left a taken node", rule.name)));
                    return;
                };
            }
            if !fired {
                break;
            };
        }
    }
}

/// Rewrites the tree bottom-up with the enabled rules, repeating whole passes until one changes
/// nothing or the pass limit is reached.
pub fn compress_program(
    mut program: Program,
    options: &CompressOptions,
) -> Result<Program, InvariantError> {
    let rules: Vec<&Rule> = RULES.iter().filter(|r| (r.enabled)(options)).collect();
    if rules.is_empty() {
        return Ok(program);
    };
    for pass in 0..options.pass_limit() {
        let ctx = RuleContext::analyse(&program.top_level);
        let mut compressor = Compressor {
            rules: rules.clone(),
            ctx: &ctx,
            rewrites: 0,
            error: None,
        };
        compressor.visit(&mut program.top_level);
        if let Some(err) = compressor.error {
            return Err(err);
        };
        debug!(pass, rewrites = compressor.rewrites, "compression pass");
        if compressor.rewrites == 0 {
            break;
        };
    }
    Ok(program)
}

/// The statement list of a block-like node.
pub(crate) fn statement_list_mut(stx: &mut Syntax) -> Option<&mut Vec<Node>> {
    match stx {
        Syntax::BlockStmt { body } | Syntax::TopLevel { body } | Syntax::SwitchBranch { body, .. } => {
            Some(body)
        }
        _ => None,
    }
}

pub(crate) fn is_literal_primitive(n: &Node) -> bool {
    matches!(
        n.stx(),
        Syntax::LiteralBigIntExpr { .. }
            | Syntax::LiteralBooleanExpr { .. }
            | Syntax::LiteralNull {}
            | Syntax::LiteralNumberExpr { .. }
            | Syntax::LiteralStringExpr { .. }
            | Syntax::LiteralUndefined {}
    )
}

/// Whether evaluating `n` can be skipped without any observable difference. Reading a variable
/// counts as a side effect, as it can throw or trigger a getter on the global object.
pub(crate) fn is_pure(n: &Node) -> bool {
    match n.stx() {
        Syntax::LiteralBigIntExpr { .. }
        | Syntax::LiteralBooleanExpr { .. }
        | Syntax::LiteralNull {}
        | Syntax::LiteralNumberExpr { .. }
        | Syntax::LiteralRegexExpr { .. }
        | Syntax::LiteralStringExpr { .. }
        | Syntax::LiteralUndefined {}
        | Syntax::ThisExpr {}
        | Syntax::FunctionExpr { .. }
        | Syntax::ArrowFunctionExpr { .. } => true,
        Syntax::LiteralTemplateExpr { parts } => parts.iter().all(|p| match p {
            LiteralTemplatePart::String(_) => true,
            LiteralTemplatePart::Substitution(expr) => is_literal_primitive(expr),
        }),
        Syntax::UnaryExpr { operator, argument } => match operator {
            OperatorName::LogicalNot | OperatorName::Void | OperatorName::Typeof => {
                is_pure(argument)
            }
            OperatorName::UnaryNegation | OperatorName::UnaryPlus | OperatorName::BitwiseNot => {
                is_literal_primitive(argument)
                    && !matches!(argument.stx(), Syntax::LiteralBigIntExpr { .. })
            }
            _ => false,
        },
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => {
            if operator.is_logical() {
                is_pure(left) && is_pure(right)
            } else if operator.is_assignment() || matches!(operator, OperatorName::In | OperatorName::Instanceof) {
                false
            } else {
                // Mixing a BigInt and a Number throws.
                is_literal_primitive(left)
                    && is_literal_primitive(right)
                    && !matches!(left.stx(), Syntax::LiteralBigIntExpr { .. })
                    && !matches!(right.stx(), Syntax::LiteralBigIntExpr { .. })
            }
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => is_pure(test) && is_pure(consequent) && is_pure(alternate),
        Syntax::SequenceExpr { elements } => elements.iter().all(is_pure),
        Syntax::LiteralArrayExpr { elements } => elements.iter().all(|e| match e {
            ArrayElement::Single(value) => is_pure(value),
            ArrayElement::Rest(_) => false,
            ArrayElement::Empty => true,
        }),
        Syntax::LiteralObjectExpr { members } => members.iter().all(|m| match m.stx() {
            Syntax::ObjectMember {
                typ: ObjectMemberType::Valued { key, value },
            } => {
                matches!(key, ClassOrObjectMemberKey::Direct(_))
                    && match value {
                        ClassOrObjectMemberValue::Property {
                            initializer: Some(init),
                        } => is_pure(init),
                        ClassOrObjectMemberValue::Property { initializer: None } => false,
                        _ => true,
                    }
            }
            _ => false,
        }),
        _ => false,
    }
}

/// Truthiness of a literal, if it's known without evaluating anything.
pub(crate) fn literal_truthiness(n: &Node) -> Option<bool> {
    match n.stx() {
        Syntax::LiteralBooleanExpr { value } => Some(*value),
        Syntax::LiteralNull {} | Syntax::LiteralUndefined {} => Some(false),
        Syntax::LiteralNumberExpr { value } => Some(value.0 != 0.0 && !value.0.is_nan()),
        Syntax::LiteralStringExpr { value, raw: None } => Some(!value.is_empty()),
        Syntax::UnaryExpr {
            operator: OperatorName::Void,
            argument,
        } if is_pure(argument) => Some(false),
        Syntax::UnaryExpr {
            operator: OperatorName::LogicalNot,
            argument,
        } => literal_truthiness(argument).map(|v| !v),
        Syntax::LiteralArrayExpr { .. }
        | Syntax::LiteralObjectExpr { .. }
        | Syntax::FunctionExpr { .. }
        | Syntax::ArrowFunctionExpr { .. }
            if is_pure(n) =>
        {
            Some(true)
        }
        _ => None,
    }
}

/// Whether `n` declares a `var` or function that's hoisted out of it, ignoring nested functions.
pub(crate) fn has_hoisted_declaration(n: &Node) -> bool {
    match n.stx() {
        // Function declarations in blocks also create a function-scoped binding in sloppy code.
        Syntax::FunctionDecl { .. } => true,
        Syntax::FunctionExpr { .. }
        | Syntax::ArrowFunctionExpr { .. }
        | Syntax::ClassExpr { .. }
        | Syntax::ClassDecl { .. } => false,
        Syntax::VarDecl {
            mode: VarDeclMode::Var,
            ..
        } => true,
        _ => children(n.stx()).into_iter().any(has_hoisted_declaration),
    }
}
