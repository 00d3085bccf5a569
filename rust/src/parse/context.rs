use crate::source::SourceRange;

#[derive(Clone, Debug)]
pub struct Label {
    pub name: SourceRange,
    // Whether the labelled statement is a loop, possibly through other labels e.g. `a: b: for (;;)`.
    pub is_loop: bool,
}

/// Grammar context for the innermost function, arrow function or class body being parsed. Frames
/// live on `Parser::ctx`; nothing in the tree refers back to them.
#[derive(Clone, Debug, Default)]
pub struct ContextFrame {
    pub is_generator: bool,
    pub is_async: bool,
    // Once set, stays set for every nested frame.
    pub is_strict: bool,
    pub in_function: bool,
    // Inside an iteration statement body, so `continue` and `break` are allowed.
    pub in_loop: bool,
    // Inside a `switch` body, so `break` is allowed.
    pub in_switch: bool,
    // Inside a parameter list, where `yield` expressions are not allowed.
    pub in_params: bool,
    // Inside a method, accessor or class field initialiser, where `super` may be referenced.
    pub allow_super: bool,
    // Labels enclosing the current statement, innermost last. Labels are not visible across
    // function boundaries, so each function starts with none.
    pub labels: Vec<Label>,
    // Number of labels at the end of `labels` that directly label the statement about to be parsed.
    pub direct_labels: usize,
}

impl ContextFrame {
    pub fn top_level(is_strict: bool) -> ContextFrame {
        ContextFrame {
            is_strict,
            ..ContextFrame::default()
        }
    }

    /// The frame for the body and parameters of a function nested in `self`.
    pub fn function(&self, is_generator: bool, is_async: bool) -> ContextFrame {
        ContextFrame {
            is_generator,
            is_async,
            is_strict: self.is_strict,
            in_function: true,
            ..ContextFrame::default()
        }
    }

    pub fn method(&self, is_generator: bool, is_async: bool) -> ContextFrame {
        ContextFrame {
            allow_super: true,
            ..self.function(is_generator, is_async)
        }
    }

    /// Arrow functions are never generators, and `yield` inside one's body is not a yield
    /// expression even when the enclosing function is a generator. `super` carries over.
    pub fn arrow(&self, is_async: bool) -> ContextFrame {
        ContextFrame {
            allow_super: self.allow_super,
            ..self.function(false, is_async)
        }
    }

    /// Class bodies (and heritage clauses) are always strict. Everything else carries over, as
    /// computed keys are evaluated in the enclosing function.
    pub fn class_body(&self) -> ContextFrame {
        ContextFrame {
            is_strict: true,
            direct_labels: 0,
            ..self.clone()
        }
    }

    pub fn find_label(&self, name: &SourceRange) -> Option<&Label> {
        self.labels.iter().rev().find(|l| &l.name == name)
    }
}
