use std::str::FromStr;

use serde::Deserialize;

use crate::ast::{Node, Program, Syntax};
use crate::error::SyntaxResult;
use crate::parse::parser::Parser;
use crate::parse::stmt::{parse_directive_prologue, parse_stmt};
use crate::token::TokenType;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopLevelMode {
    Global,
    Module,
}

impl Default for TopLevelMode {
    fn default() -> Self {
        TopLevelMode::Global
    }
}

impl FromStr for TopLevelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(TopLevelMode::Global),
            "module" => Ok(TopLevelMode::Module),
            _ => Err(format!("unknown top-level mode `{}`", s)),
        }
    }
}

pub fn parse_top_level(parser: &mut Parser) -> SyntaxResult<Program> {
    let mut body: Vec<Node> = parse_directive_prologue(parser)?;
    while !parser.consume_if(TokenType::EOF)?.is_match() {
        body.push(parse_stmt(parser)?);
    }
    let top_level = Node::new(parser.source_range(), Syntax::TopLevel { body });
    Ok(Program {
        top_level,
        mode: parser.mode(),
        strict: parser.ctx().is_strict,
    })
}
