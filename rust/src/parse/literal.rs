use std::str::FromStr;

use crate::ast::{ClassOrObjectMemberKey, LiteralTemplatePart};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::lex_template_string_continue;
use crate::num::JsNumber;
use crate::parse::expr::parse_expr;
use crate::parse::parser::Parser;
use crate::source::SourceRange;
use crate::token::{Token, TokenType};

fn parse_radix(raw: &str, radix: u32) -> Option<f64> {
    // Accumulate as f64 so that literals beyond 2^64 still produce the nearest value JS would.
    raw.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

pub fn normalise_literal_number(raw: &SourceRange) -> SyntaxResult<JsNumber> {
    let malformed = || SyntaxError::from_loc(raw, SyntaxErrorType::MalformedLiteralNumber);
    let s = raw.as_str();
    if s.starts_with('_') || s.ends_with('_') || s.contains("__") || s.contains("_.") || s.contains("._") {
        return Err(malformed());
    };
    let s = s.replace('_', "");
    match s.as_str() {
        s if s.starts_with("0b") || s.starts_with("0B") => parse_radix(&s[2..], 2),
        s if s.starts_with("0o") || s.starts_with("0O") => parse_radix(&s[2..], 8),
        s if s.starts_with("0x") || s.starts_with("0X") => parse_radix(&s[2..], 16),
        // Legacy octal e.g. `017`; `018` and `09` are decimal.
        s if s.len() > 1
            && s.starts_with('0')
            && s.bytes().all(|c| c.is_ascii_digit()) =>
        {
            if raw.as_str().contains('_') {
                return Err(malformed());
            };
            parse_radix(&s[1..], 8).or_else(|| f64::from_str(s).ok())
        }
        s => f64::from_str(s).ok(),
    }
    .map(JsNumber)
    .ok_or_else(malformed)
}

pub fn normalise_literal_bigint(raw: &SourceRange) -> SyntaxResult<String> {
    let s = raw.as_str();
    let digits = &s[..s.len() - 1];
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(SyntaxError::from_loc(
            raw,
            SyntaxErrorType::MalformedLiteralNumber,
        ));
    };
    Ok(digits.replace('_', ""))
}

fn hex_digits(raw: &SourceRange, s: &[char], start: usize, len: usize) -> SyntaxResult<u32> {
    s.get(start..start + len)
        .filter(|d| d.iter().all(|c| c.is_ascii_hexdigit()))
        .and_then(|d| u32::from_str_radix(&d.iter().collect::<String>(), 16).ok())
        .ok_or_else(|| SyntaxError::from_loc(raw, SyntaxErrorType::InvalidCharacterEscape))
}

/// Decoded string literal contents. The second value is false when the literal contains a lone
/// surrogate escape, which can't be held in a `String`; such literals are printed as written.
pub fn normalise_literal_string(raw: &SourceRange) -> SyntaxResult<(String, bool)> {
    let chars: Vec<char> = raw.as_str().chars().collect();
    // Strip quotes.
    let chars = &chars[1..chars.len() - 1];
    let mut out = String::with_capacity(chars.len());
    let mut representable = true;
    let mut pending_high_surrogate: Option<u32> = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            if pending_high_surrogate.take().is_some() {
                representable = false;
            };
            out.push(c);
            continue;
        };
        let e = *chars
            .get(i)
            .ok_or_else(|| SyntaxError::from_loc(raw, SyntaxErrorType::InvalidCharacterEscape))?;
        i += 1;
        let code = match e {
            'b' => 0x08,
            'f' => 0x0c,
            'n' => 0x0a,
            'r' => 0x0d,
            't' => 0x09,
            'v' => 0x0b,
            '0' if !chars.get(i).filter(|c| c.is_ascii_digit()).is_some() => 0,
            '1'..='7' | '0' => {
                // Legacy octal escape of up to three digits, at most \377.
                let mut v = e.to_digit(8).unwrap_or(0);
                let max_len = if e <= '3' { 2 } else { 1 };
                let mut n = 0;
                while n < max_len {
                    match chars.get(i).and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            v = v * 8 + d;
                            i += 1;
                            n += 1;
                        }
                        None => break,
                    };
                }
                v
            }
            'x' => {
                let v = hex_digits(raw, chars, i, 2)?;
                i += 2;
                v
            }
            'u' if chars.get(i) == Some(&'{') => {
                let end = chars[i..]
                    .iter()
                    .position(|c| *c == '}')
                    .map(|p| i + p)
                    .ok_or_else(|| SyntaxError::from_loc(raw, SyntaxErrorType::InvalidCharacterEscape))?;
                let v = hex_digits(raw, chars, i + 1, end - i - 1)?;
                if v > 0x10FFFF {
                    return Err(SyntaxError::from_loc(raw, SyntaxErrorType::InvalidCharacterEscape));
                };
                i = end + 1;
                v
            }
            'u' => {
                let v = hex_digits(raw, chars, i, 4)?;
                i += 4;
                v
            }
            // Line continuations.
            '\r' => {
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                };
                continue;
            }
            '\n' | '\u{2028}' | '\u{2029}' => continue,
            c => c as u32,
        };
        match (pending_high_surrogate.take(), code) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let cp = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                out.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            (prev, 0xD800..=0xDBFF) => {
                if prev.is_some() {
                    representable = false;
                };
                pending_high_surrogate = Some(code);
            }
            (prev, code) => {
                if prev.is_some() {
                    representable = false;
                };
                match char::from_u32(code) {
                    Some(c) => out.push(c),
                    // Lone low surrogate.
                    None => representable = false,
                };
            }
        };
    }
    if pending_high_surrogate.is_some() {
        representable = false;
    };
    Ok((out, representable))
}

pub fn parse_and_normalise_literal_string(parser: &mut Parser) -> SyntaxResult<String> {
    let t = parser.require(TokenType::LiteralString)?;
    let (s, _) = normalise_literal_string(t.loc())?;
    Ok(s)
}

/// Raw text of a template token between its delimiters: the opening backtick or `}`, and the
/// closing backtick or `${`.
fn template_part_raw(t: &Token, is_head: bool) -> String {
    let raw = t.loc().as_str();
    let start = is_head as usize;
    let end = match t.typ() {
        TokenType::LiteralTemplatePartStringEnd => raw.len() - 1,
        _ => raw.len() - 2,
    };
    raw[start..end].to_string()
}

/// Parses the rest of a template literal whose first token `head` has already been consumed.
pub fn parse_template_parts(
    parser: &mut Parser,
    head: &Token,
) -> SyntaxResult<(Vec<LiteralTemplatePart>, SourceRange)> {
    let mut loc = head.loc().clone();
    let mut parts = vec![LiteralTemplatePart::String(template_part_raw(head, true))];
    let mut ended = head.typ() == TokenType::LiteralTemplatePartStringEnd;
    while !ended {
        let substitution = parse_expr(parser, TokenType::BraceClose)?;
        parser.require(TokenType::BraceClose)?;
        parts.push(LiteralTemplatePart::Substitution(substitution));
        let string = lex_template_string_continue(parser.lexer_mut(), false)?;
        parser.clear_buffered();
        loc.extend(string.loc());
        parts.push(LiteralTemplatePart::String(template_part_raw(&string, false)));
        ended = string.typ() == TokenType::LiteralTemplatePartStringEnd;
    }
    Ok((parts, loc))
}

/// `010` and `09` are only allowed in sloppy code.
pub fn check_number_in_strict(parser: &Parser, t: &Token) -> SyntaxResult<()> {
    let raw = t.loc().as_str().as_bytes();
    if t.typ() == TokenType::LiteralNumber
        && parser.ctx().is_strict
        && raw.len() > 1
        && raw[0] == b'0'
        && raw[1].is_ascii_digit()
    {
        return Err(t.error(SyntaxErrorType::LegacyOctalInStrictMode));
    };
    Ok(())
}

pub fn parse_class_or_object_member_key(parser: &mut Parser) -> SyntaxResult<ClassOrObjectMemberKey> {
    Ok(if parser.consume_if(TokenType::BracketOpen)?.is_match() {
        let expr = parse_expr(parser, TokenType::BracketClose)?;
        parser.require(TokenType::BracketClose)?;
        ClassOrObjectMemberKey::Computed(expr)
    } else {
        let name = parser.require_predicate(is_property_name_token)?;
        check_number_in_strict(parser, &name)?;
        ClassOrObjectMemberKey::Direct(name.loc_take())
    })
}

/// Tokens that can be written as a non-computed property key.
pub fn is_property_name_token(typ: TokenType) -> bool {
    match typ {
        TokenType::Identifier
        | TokenType::LiteralString
        | TokenType::LiteralNumber
        | TokenType::LiteralBigInt
        | TokenType::LiteralTrue
        | TokenType::LiteralFalse
        | TokenType::LiteralNull
        | TokenType::PrivateMember => true,
        t => t.is_keyword(),
    }
}
