use crate::operator::OperatorName;
use crate::token::TokenType;

/// The operator a token introduces when it follows an operand: binary and assignment operators,
/// plus calls, member access, `?:` and `,`.
pub fn multary_operator(typ: TokenType) -> Option<OperatorName> {
    use OperatorName::*;
    use TokenType as T;
    let name = match typ {
        T::Ampersand => BitwiseAnd,
        T::AmpersandAmpersand => LogicalAnd,
        T::AmpersandAmpersandEquals => AssignmentLogicalAnd,
        T::AmpersandEquals => AssignmentBitwiseAnd,
        T::Asterisk => Multiplication,
        T::AsteriskAsterisk => Exponentiation,
        T::AsteriskAsteriskEquals => AssignmentExponentiation,
        T::AsteriskEquals => AssignmentMultiplication,
        T::Bar => BitwiseOr,
        T::BarBar => LogicalOr,
        T::BarBarEquals => AssignmentLogicalOr,
        T::BarEquals => AssignmentBitwiseOr,
        T::BracketOpen => ComputedMemberAccess,
        T::Caret => BitwiseXor,
        T::CaretEquals => AssignmentBitwiseXor,
        T::ChevronLeft => LessThan,
        T::ChevronLeftChevronLeft => BitwiseLeftShift,
        T::ChevronLeftChevronLeftEquals => AssignmentBitwiseLeftShift,
        T::ChevronLeftEquals => LessThanOrEqual,
        T::ChevronRight => GreaterThan,
        T::ChevronRightChevronRight => BitwiseRightShift,
        T::ChevronRightChevronRightChevronRight => BitwiseUnsignedRightShift,
        T::ChevronRightChevronRightChevronRightEquals => AssignmentBitwiseUnsignedRightShift,
        T::ChevronRightChevronRightEquals => AssignmentBitwiseRightShift,
        T::ChevronRightEquals => GreaterThanOrEqual,
        T::Comma => Comma,
        T::Dot => MemberAccess,
        T::Equals => Assignment,
        T::EqualsEquals => Equality,
        T::EqualsEqualsEquals => StrictEquality,
        T::ExclamationEquals => Inequality,
        T::ExclamationEqualsEquals => StrictInequality,
        T::Hyphen => Subtraction,
        T::HyphenEquals => AssignmentSubtraction,
        T::KeywordIn => In,
        T::KeywordInstanceof => Instanceof,
        T::ParenthesisOpen => Call,
        T::Percent => Remainder,
        T::PercentEquals => AssignmentRemainder,
        T::Plus => Addition,
        T::PlusEquals => AssignmentAddition,
        T::Question => Conditional,
        T::QuestionDot => OptionalChainingMemberAccess,
        T::QuestionDotBracketOpen => OptionalChainingComputedMemberAccess,
        T::QuestionDotParenthesisOpen => OptionalChainingCall,
        T::QuestionQuestion => NullishCoalescing,
        T::QuestionQuestionEquals => AssignmentNullishCoalescing,
        T::Slash => Division,
        T::SlashEquals => AssignmentDivision,
        _ => return None,
    };
    Some(name)
}

/// The prefix operator a token introduces at the start of an operand. `await`, `new`, `yield` and
/// postfix operators depend on context and are parsed separately.
pub fn unary_operator(typ: TokenType) -> Option<OperatorName> {
    use OperatorName::*;
    use TokenType as T;
    let name = match typ {
        T::Exclamation => LogicalNot,
        T::Hyphen => UnaryNegation,
        T::HyphenHyphen => PrefixDecrement,
        T::KeywordDelete => Delete,
        T::KeywordTypeof => Typeof,
        T::KeywordVoid => Void,
        T::Plus => UnaryPlus,
        T::PlusPlus => PrefixIncrement,
        T::Tilde => BitwiseNot,
        _ => return None,
    };
    Some(name)
}
