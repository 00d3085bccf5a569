use ahash::AHashSet;
use serde::Deserialize;
use tracing::debug;

use crate::ast::ClassMember;
use crate::ast::ClassOrObjectMemberKey;
use crate::ast::ClassOrObjectMemberValue;
use crate::ast::ExportNames;
use crate::ast::ForInOfStmtHeaderLhs;
use crate::ast::ForStmtHeader;
use crate::ast::ForThreeInit;
use crate::ast::Node;
use crate::ast::ObjectMemberType;
use crate::ast::Program;
use crate::ast::Syntax;
use crate::ast::VarDeclMode;
use crate::ast::VariableDeclarator;
use crate::visit::children_mut;

use self::name::MinifiedNameGenerator;
use self::scope::Identifier;
use self::scope::ScopeId;
use self::scope::ScopeMap;
use self::scope::ScopeType;

mod name;
mod scope;
#[cfg(test)]
mod tests;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MangleOptions {
    /// Also rename bindings declared at the top level. Only safe when no other script refers to
    /// them.
    pub top_level: bool,
    /// Names that are never generated.
    pub reserved: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Pass {
    // Creates scopes and records every binding.
    Declare,
    // Records which names each scope uses from its ancestors.
    Resolve,
    // Replaces names with their assigned minified names.
    Rename,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum BindingKind {
    // Hoisted to the nearest closure.
    Var,
    // `let`, `const`, classes, parameters, catch parameters and imports.
    Lexical,
    // Block scoped in strict code, hoisted to the closure otherwise.
    Function,
}

// Every pass walks the tree in the same order, so the nth scope entered is always the same scope.
struct Walker<'a> {
    pass: Pass,
    scopes: &'a mut ScopeMap,
    stack: Vec<ScopeId>,
    entered: usize,
    strict: bool,
    // Set while walking the declaration of an `export` statement.
    exporting: bool,
    // Local names listed in `export {...}` statements.
    exported: Vec<Identifier>,
}

fn has_use_strict(body: &Node) -> bool {
    match body.stx() {
        Syntax::BlockStmt { body } => body
            .iter()
            .map_while(|s| match s.stx() {
                Syntax::DirectiveStmt { raw } => Some(raw),
                _ => None,
            })
            .any(|raw| raw.len() >= 2 && &raw[1..raw.len() - 1] == "use strict"),
        _ => false,
    }
}

fn is_direct_eval(callee: &Node) -> bool {
    matches!(callee.stx(), Syntax::IdentifierExpr { name } if name.as_str() == "eval")
}

impl<'a> Walker<'a> {
    fn new(pass: Pass, scopes: &'a mut ScopeMap, strict: bool) -> Walker<'a> {
        Walker {
            pass,
            scopes,
            stack: Vec::new(),
            entered: 0,
            strict,
            exporting: false,
            exported: Vec::new(),
        }
    }

    fn enter(&mut self, typ: ScopeType) -> () {
        let id = match self.scopes.nth(self.entered) {
            Some(id) => id,
            None => self.scopes.create_scope(self.stack.last().copied(), typ),
        };
        self.entered += 1;
        self.stack.push(id);
    }

    fn leave(&mut self) -> () {
        self.stack.pop();
    }

    fn current(&self) -> ScopeId {
        self.stack[self.stack.len() - 1]
    }

    fn closure(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.scopes[id].typ() == ScopeType::Closure)
            .unwrap_or(self.stack[0])
    }

    fn mark_dynamic_lookup(&mut self) -> () {
        if self.pass == Pass::Declare {
            let scope = self.current();
            self.scopes[scope].uses_dynamic_lookup = true;
        };
    }

    fn bind(&mut self, name: &mut Identifier, kind: BindingKind) -> () {
        let scope = match kind {
            BindingKind::Var => self.closure(),
            BindingKind::Lexical => self.current(),
            BindingKind::Function if self.strict => self.current(),
            BindingKind::Function => self.closure(),
        };
        match self.pass {
            Pass::Declare => {
                let exported = self.exporting && self.stack.len() == 1;
                self.scopes[scope].add_symbol(name.clone(), exported);
            }
            Pass::Resolve => {}
            Pass::Rename => {
                let minified = self.scopes[scope]
                    .get_symbol(name)
                    .and_then(|sym| sym.minified_name.clone());
                if let Some(minified) = minified {
                    *name = minified;
                };
            }
        };
    }

    fn reference(&mut self, name: &mut Identifier) -> () {
        let scope = self.current();
        match self.pass {
            Pass::Declare => {}
            Pass::Resolve => self.scopes.track_variable_usage(scope, name),
            Pass::Rename => {
                let minified = self
                    .scopes
                    .find_symbol(scope, name)
                    .and_then(|sym| sym.minified_name.clone());
                if let Some(minified) = minified {
                    *name = minified;
                };
            }
        };
    }

    fn bind_name(&mut self, n: &mut Node, kind: BindingKind) -> () {
        if let Syntax::ClassOrFunctionName { name } | Syntax::IdentifierPattern { name } =
            n.stx_mut()
        {
            self.bind(name, kind);
        };
    }

    fn walk_pattern(&mut self, stx: &mut Syntax, kind: Option<BindingKind>) -> () {
        match stx {
            Syntax::IdentifierPattern { name } => match kind {
                Some(kind) => self.bind(name, kind),
                None => self.reference(name),
            },
            Syntax::ArrayPattern { elements, rest } => {
                for elem in elements.iter_mut().flatten() {
                    self.walk_pattern(elem.target.stx_mut(), kind);
                    if let Some(default_value) = &mut elem.default_value {
                        self.walk(default_value);
                    };
                }
                if let Some(rest) = rest {
                    self.walk_pattern(rest.stx_mut(), kind);
                };
            }
            Syntax::ObjectPattern { properties, rest } => {
                for prop in properties.iter_mut() {
                    self.walk_pattern(prop.stx_mut(), kind);
                }
                if let Some(rest) = rest {
                    self.walk_pattern(rest.stx_mut(), kind);
                };
            }
            Syntax::ObjectPatternProperty {
                key,
                target,
                default_value,
                shorthand,
            } => {
                if let ClassOrObjectMemberKey::Computed(key) = key {
                    self.walk(key);
                };
                self.walk_pattern(target.stx_mut(), kind);
                if let Some(default_value) = default_value {
                    self.walk(default_value);
                };
                // A renamed shorthand needs its key written out: `{a}` becomes `{a: e}`.
                if let (ClassOrObjectMemberKey::Direct(key), Syntax::IdentifierPattern { name }) =
                    (key, target.stx())
                {
                    if key.as_str() != name.as_str() {
                        *shorthand = false;
                    };
                };
            }
            // Member expressions as assignment targets.
            _ => self.walk_stx(stx),
        };
    }

    fn walk_var_decl(&mut self, mode: VarDeclMode, declarators: &mut [VariableDeclarator]) -> () {
        let kind = match mode {
            VarDeclMode::Var => BindingKind::Var,
            VarDeclMode::Let | VarDeclMode::Const => BindingKind::Lexical,
        };
        for decl in declarators.iter_mut() {
            self.walk_pattern(decl.pattern.stx_mut(), Some(kind));
            if let Some(init) = &mut decl.initializer {
                self.walk(init);
            };
        }
    }

    // Statements of a function body, which share the function's scope, or an arrow function's
    // expression body.
    fn walk_body(&mut self, body: &mut Node) -> () {
        if !matches!(body.stx(), Syntax::BlockStmt { .. }) {
            return self.walk(body);
        };
        for stmt in children_mut(body.stx_mut()) {
            self.walk(stmt);
        }
    }

    fn walk_function(&mut self, signature: &mut Node, body: &mut Node) -> () {
        self.enter(ScopeType::Closure);
        let outer_strict = self.strict;
        self.strict |= has_use_strict(body);
        self.walk(signature);
        self.walk_body(body);
        self.strict = outer_strict;
        self.leave();
    }

    fn walk_member_value(&mut self, value: &mut ClassOrObjectMemberValue) -> () {
        match value {
            ClassOrObjectMemberValue::Getter { body } => {
                self.enter(ScopeType::Closure);
                self.walk_body(body);
                self.leave();
            }
            ClassOrObjectMemberValue::Method {
                signature, body, ..
            } => self.walk_function(signature, body),
            ClassOrObjectMemberValue::Property { initializer } => {
                if let Some(initializer) = initializer {
                    self.walk(initializer);
                };
            }
            ClassOrObjectMemberValue::Setter { body, parameter } => {
                self.enter(ScopeType::Closure);
                self.walk_pattern(parameter.stx_mut(), Some(BindingKind::Lexical));
                self.walk_body(body);
                self.leave();
            }
        };
    }

    fn walk_class(&mut self, extends: &mut Option<Node>, members: &mut [ClassMember]) -> () {
        // Class bodies are always strict.
        let outer_strict = self.strict;
        self.strict = true;
        if let Some(extends) = extends {
            self.walk(extends);
        };
        for member in members.iter_mut() {
            if let ClassOrObjectMemberKey::Computed(key) = &mut member.key {
                self.walk(key);
            };
            self.walk_member_value(&mut member.value);
        }
        self.strict = outer_strict;
    }

    fn walk(&mut self, n: &mut Node) -> () {
        self.walk_stx(n.stx_mut());
    }

    fn walk_stx(&mut self, stx: &mut Syntax) -> () {
        if matches!(
            stx,
            Syntax::IdentifierPattern { .. } | Syntax::ArrayPattern { .. } | Syntax::ObjectPattern { .. }
        ) {
            return self.walk_pattern(stx, None);
        };
        match stx {
            Syntax::IdentifierExpr { name } => self.reference(name),
            Syntax::BinaryExpr {
                operator,
                left,
                right,
            } if operator.is_assignment() => {
                self.walk_pattern(left.stx_mut(), None);
                self.walk(right);
            }
            Syntax::CallExpr {
                callee, arguments, ..
            } => {
                if is_direct_eval(callee) {
                    self.mark_dynamic_lookup();
                };
                self.walk(callee);
                for arg in arguments.iter_mut() {
                    self.walk(arg);
                }
            }
            Syntax::WithStmt { object, body } => {
                self.mark_dynamic_lookup();
                self.walk(object);
                self.walk(body);
            }
            Syntax::VarDecl { mode, declarators } => self.walk_var_decl(*mode, declarators),
            Syntax::ParamDecl {
                pattern,
                default_value,
                ..
            } => {
                self.walk_pattern(pattern.stx_mut(), Some(BindingKind::Lexical));
                if let Some(default_value) = default_value {
                    self.walk(default_value);
                };
            }
            Syntax::FunctionDecl {
                name,
                signature,
                body,
                ..
            } => {
                if let Some(name) = name {
                    self.bind_name(name, BindingKind::Function);
                };
                self.walk_function(signature, body);
            }
            Syntax::FunctionExpr {
                name,
                signature,
                body,
                ..
            } => match name {
                // The name is only visible inside the function.
                Some(name) => {
                    self.enter(ScopeType::Block);
                    self.bind_name(name, BindingKind::Lexical);
                    self.walk_function(signature, body);
                    self.leave();
                }
                None => self.walk_function(signature, body),
            },
            Syntax::ArrowFunctionExpr {
                signature, body, ..
            } => self.walk_function(signature, body),
            Syntax::ClassDecl {
                name,
                extends,
                members,
            } => {
                if let Some(name) = name {
                    self.bind_name(name, BindingKind::Lexical);
                };
                self.walk_class(extends, members);
            }
            Syntax::ClassExpr {
                name,
                extends,
                members,
            } => {
                self.enter(ScopeType::Block);
                if let Some(name) = name {
                    self.bind_name(name, BindingKind::Lexical);
                };
                self.walk_class(extends, members);
                self.leave();
            }
            Syntax::ObjectMember { typ } => {
                let expanded = match typ {
                    ObjectMemberType::Shorthand { name } => {
                        let mut renamed = name.clone();
                        self.reference(&mut renamed);
                        if renamed.as_str() != name.as_str() {
                            Some((name.clone(), renamed))
                        } else {
                            None
                        }
                    }
                    ObjectMemberType::Valued { key, value } => {
                        if let ClassOrObjectMemberKey::Computed(key) = key {
                            self.walk(key);
                        };
                        self.walk_member_value(value);
                        None
                    }
                    ObjectMemberType::Rest { value } => {
                        self.walk(value);
                        None
                    }
                };
                // `{a}` becomes `{a: e}`.
                if let Some((original, renamed)) = expanded {
                    *typ = ObjectMemberType::Valued {
                        key: ClassOrObjectMemberKey::Direct(original.clone()),
                        value: ClassOrObjectMemberValue::Property {
                            initializer: Some(Node::new(original, Syntax::IdentifierExpr {
                                name: renamed,
                            })),
                        },
                    };
                };
            }
            Syntax::BlockStmt { body } => {
                self.enter(ScopeType::Block);
                for stmt in body.iter_mut() {
                    self.walk(stmt);
                }
                self.leave();
            }
            Syntax::ForStmt { header, body } => {
                self.enter(ScopeType::Block);
                match header {
                    ForStmtHeader::Three {
                        init,
                        condition,
                        post,
                    } => {
                        match init {
                            ForThreeInit::None => {}
                            ForThreeInit::Expression(n) | ForThreeInit::Declaration(n) => {
                                self.walk(n)
                            }
                        };
                        if let Some(condition) = condition {
                            self.walk(condition);
                        };
                        if let Some(post) = post {
                            self.walk(post);
                        };
                    }
                    ForStmtHeader::InOf { lhs, rhs, .. } => {
                        match lhs {
                            ForInOfStmtHeaderLhs::Declaration(n) => self.walk(n),
                            ForInOfStmtHeaderLhs::Pattern(n) => self.walk_pattern(n.stx_mut(), None),
                        };
                        self.walk(rhs);
                    }
                };
                self.walk(body);
                self.leave();
            }
            Syntax::SwitchStmt { test, branches } => {
                self.walk(test);
                self.enter(ScopeType::Block);
                for branch in branches.iter_mut() {
                    self.walk(branch);
                }
                self.leave();
            }
            Syntax::CatchBlock { parameter, body } => {
                self.enter(ScopeType::Block);
                if let Some(parameter) = parameter {
                    self.walk_pattern(parameter.stx_mut(), Some(BindingKind::Lexical));
                };
                self.walk_body(body);
                self.leave();
            }
            Syntax::ImportStmt { default, names, .. } => {
                if let Some(default) = default {
                    self.walk_pattern(default.stx_mut(), Some(BindingKind::Lexical));
                };
                match names {
                    Some(ExportNames::All(Some(alias))) => {
                        self.walk_pattern(alias.stx_mut(), Some(BindingKind::Lexical))
                    }
                    Some(ExportNames::Specific(names)) => {
                        // The imported name is kept; only the local alias is a binding.
                        for name in names.iter_mut() {
                            self.walk_pattern(name.alias.stx_mut(), Some(BindingKind::Lexical));
                        }
                    }
                    Some(ExportNames::All(None)) | None => {}
                };
            }
            Syntax::ExportListStmt { names, from } => {
                if let (ExportNames::Specific(names), None) = (names, from) {
                    if self.pass == Pass::Declare {
                        self.exported.extend(names.iter().map(|n| n.target.clone()));
                    };
                };
            }
            Syntax::ExportDeclStmt { declaration, .. } => {
                self.exporting = true;
                self.walk(declaration);
                self.exporting = false;
            }
            _ => {
                for child in children_mut(stx) {
                    self.walk(child);
                }
            }
        };
    }
}

// Scopes whose bindings must keep their names: those where a direct `eval` or `with` could look up
// any name in scope, all of their ancestors, and the top level unless asked otherwise.
fn mark_fixed_scopes(scopes: &mut ScopeMap, options: &MangleOptions) -> () {
    let dynamic: Vec<ScopeId> = scopes
        .iter()
        .filter(|s| s.uses_dynamic_lookup)
        .map(|s| s.id())
        .collect();
    for id in dynamic {
        let mut cur = Some(id);
        while let Some(id) = cur {
            scopes[id].fixed = true;
            cur = scopes[id].parent();
        }
    }
    if !options.top_level {
        if let Some(root) = scopes.nth(0) {
            scopes[root].fixed = true;
        };
    };
}

// Assigns minified names top-down, so the names of ancestor bindings are known before a scope
// avoids them. Returns the number of renamed bindings.
fn assign_names(scopes: &mut ScopeMap, reserved: &AHashSet<Identifier>) -> usize {
    let mut renamed = 0;
    for n in 0..scopes.len() {
        let Some(id) = scopes.nth(n) else {
            break;
        };
        if scopes[id].fixed {
            continue;
        };
        // Inherited names are recorded unrenamed; look up what each was renamed to.
        let mut avoid = AHashSet::new();
        for name in scopes[id].inherited_vars.iter() {
            let declared = scopes[id]
                .parent()
                .and_then(|parent| scopes.find_symbol(parent, name));
            match declared.and_then(|sym| sym.minified_name.as_ref()) {
                Some(minified) => avoid.insert(minified.clone()),
                // Global, or a binding that keeps its name.
                None => avoid.insert(name.clone()),
            };
        }
        for name in scopes[id].symbol_names() {
            if scopes[id].get_symbol(name).map_or(false, |s| s.exported) {
                avoid.insert(name.clone());
            };
        }
        let mut next_min_name = MinifiedNameGenerator::new(reserved);
        let names: Vec<Identifier> = scopes[id].symbol_names().to_vec();
        for name in names {
            let exported = scopes[id].get_symbol(&name).map_or(true, |s| s.exported);
            if exported {
                continue;
            };
            let minified = next_min_name.generate_next_available_minified_name(&avoid);
            if let Some(sym) = scopes[id].get_symbol_mut(&name) {
                sym.minified_name = Some(minified);
                renamed += 1;
            };
        }
    }
    renamed
}

/// Renames bindings to short names. Properties, labels, globals and exported names are untouched.
pub fn mangle_program(program: &mut Program, options: &MangleOptions) -> () {
    let mut scopes = ScopeMap::new();

    let mut declare = Walker::new(Pass::Declare, &mut scopes, program.strict);
    declare.enter(ScopeType::Closure);
    declare.walk_body(&mut program.top_level);
    let exported = declare.exported;
    if let Some(root) = scopes.nth(0) {
        for name in exported {
            if let Some(sym) = scopes[root].get_symbol_mut(&name) {
                sym.exported = true;
            };
        }
    };

    let mut resolve = Walker::new(Pass::Resolve, &mut scopes, program.strict);
    resolve.enter(ScopeType::Closure);
    resolve.walk_body(&mut program.top_level);

    mark_fixed_scopes(&mut scopes, options);
    let reserved: AHashSet<Identifier> = options
        .reserved
        .iter()
        .map(|name| Identifier::anonymous(name.as_str()))
        .collect();
    let renamed = assign_names(&mut scopes, &reserved);
    debug!(scopes = scopes.len(), renamed, "assigned minified names");

    let mut rename = Walker::new(Pass::Rename, &mut scopes, program.strict);
    rename.enter(ScopeType::Closure);
    rename.walk_body(&mut program.top_level);
}
