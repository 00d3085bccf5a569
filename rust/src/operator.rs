#[cfg(test)]
use serde::Serialize;

use crate::operator::OperatorName::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub enum OperatorName {
    Addition,
    Assignment,
    AssignmentAddition,
    AssignmentBitwiseAnd,
    AssignmentBitwiseLeftShift,
    AssignmentBitwiseOr,
    AssignmentBitwiseRightShift,
    AssignmentBitwiseUnsignedRightShift,
    AssignmentBitwiseXor,
    AssignmentDivision,
    AssignmentExponentiation,
    AssignmentLogicalAnd,
    AssignmentLogicalOr,
    AssignmentMultiplication,
    AssignmentNullishCoalescing,
    AssignmentRemainder,
    AssignmentSubtraction,
    Await,
    BitwiseAnd,
    BitwiseLeftShift,
    BitwiseNot,
    BitwiseOr,
    BitwiseRightShift,
    BitwiseUnsignedRightShift,
    BitwiseXor,
    Call,
    Comma,
    ComputedMemberAccess,
    Conditional,
    // Only used during parsing, to stop the consequent of a conditional at `:`.
    ConditionalAlternate,
    Delete,
    Division,
    Equality,
    Exponentiation,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Inequality,
    Instanceof,
    LessThan,
    LessThanOrEqual,
    LogicalAnd,
    LogicalNot,
    LogicalOr,
    MemberAccess,
    Multiplication,
    New,
    NullishCoalescing,
    OptionalChainingMemberAccess,
    OptionalChainingComputedMemberAccess,
    OptionalChainingCall,
    PostfixDecrement,
    PostfixIncrement,
    PrefixDecrement,
    PrefixIncrement,
    Remainder,
    StrictEquality,
    StrictInequality,
    Subtraction,
    Typeof,
    UnaryNegation,
    UnaryPlus,
    Void,
    Yield,
    YieldDelegated,
}

impl OperatorName {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Assignment
                | AssignmentAddition
                | AssignmentBitwiseAnd
                | AssignmentBitwiseLeftShift
                | AssignmentBitwiseOr
                | AssignmentBitwiseRightShift
                | AssignmentBitwiseUnsignedRightShift
                | AssignmentBitwiseXor
                | AssignmentDivision
                | AssignmentExponentiation
                | AssignmentLogicalAnd
                | AssignmentLogicalOr
                | AssignmentMultiplication
                | AssignmentNullishCoalescing
                | AssignmentRemainder
                | AssignmentSubtraction
        )
    }

    /// Operators that always produce a boolean.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Equality
                | Inequality
                | StrictEquality
                | StrictInequality
                | LessThan
                | LessThanOrEqual
                | GreaterThan
                | GreaterThanOrEqual
                | In
                | Instanceof
                | LogicalNot
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, LogicalAnd | LogicalOr | NullishCoalescing)
    }

    pub fn is_update(self) -> bool {
        matches!(
            self,
            PrefixIncrement | PrefixDecrement | PostfixIncrement | PostfixDecrement
        )
    }

    /// Higher binds tighter. Comma is 1.
    pub fn precedence(self) -> u8 {
        match self {
            MemberAccess
            | ComputedMemberAccess
            | Call
            | New
            | OptionalChainingMemberAccess
            | OptionalChainingComputedMemberAccess
            | OptionalChainingCall => 18,
            PostfixIncrement | PostfixDecrement => 17,
            LogicalNot | BitwiseNot | UnaryPlus | UnaryNegation | PrefixIncrement
            | PrefixDecrement | Typeof | Void | Delete | Await => 16,
            Exponentiation => 15,
            Multiplication | Division | Remainder => 14,
            Addition | Subtraction => 13,
            BitwiseLeftShift | BitwiseRightShift | BitwiseUnsignedRightShift => 12,
            LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | In | Instanceof => 11,
            Equality | Inequality | StrictEquality | StrictInequality => 10,
            BitwiseAnd => 9,
            BitwiseXor => 8,
            BitwiseOr => 7,
            LogicalAnd => 6,
            LogicalOr | NullishCoalescing => 5,
            Conditional => 4,
            Yield | YieldDelegated => 3,
            // `a, b = c ? d : e = f, g` groups as `a, (b = (c ? d : (e = f))), g`.
            ConditionalAlternate => 2,
            Comma => 1,
            // Assignments.
            _ => 3,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            New | Exponentiation | Conditional | ConditionalAlternate | Yield | YieldDelegated => {
                Associativity::Right
            }
            LogicalNot | BitwiseNot | UnaryPlus | UnaryNegation | PrefixIncrement
            | PrefixDecrement | Typeof | Void | Delete | Await => Associativity::Right,
            op if op.is_assignment() => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// The loosest precedence the operand to the right of this operator may have without
    /// parentheses.
    pub fn operand_min_precedence(self) -> u8 {
        match self.associativity() {
            Associativity::Left => self.precedence() + 1,
            Associativity::Right => self.precedence(),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence of an assignment, arrow function or `yield`, the loosest level a single (non-comma)
/// expression can have.
pub fn assignment_precedence() -> u8 {
    Assignment.precedence()
}

pub fn comma_precedence() -> u8 {
    Comma.precedence()
}
