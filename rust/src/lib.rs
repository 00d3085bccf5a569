use serde::Deserialize;
use tracing::debug;

use crate::lex::Lexer;
use crate::parse::parser::Parser;
use crate::parse::toplevel::parse_top_level;

pub mod ast;
mod char;
pub mod compress;
pub mod emit;
pub mod error;
pub mod lex;
pub mod mangle;
pub mod num;
pub mod operator;
pub mod parse;
pub mod source;
#[cfg(test)]
mod tests;
pub mod token;
#[cfg(test)]
mod util;
pub mod visit;

pub use crate::ast::Program;
pub use crate::compress::CompressOptions;
pub use crate::emit::EmitOptions;
pub use crate::error::{InvariantError, MinifyError, SyntaxError, SyntaxErrorType, SyntaxResult};
pub use crate::mangle::MangleOptions;
pub use crate::parse::toplevel::TopLevelMode;

/// Options for the whole pipeline. A missing `compress` or `mangle` disables that stage.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    pub top_level_mode: TopLevelMode,
    pub compress: Option<CompressOptions>,
    pub mangle: Option<MangleOptions>,
    pub emit: EmitOptions,
}

impl Options {
    /// Every rewrite rule, parameter and local renaming, and compact output.
    pub fn recommended() -> Options {
        Options {
            top_level_mode: TopLevelMode::Global,
            compress: Some(CompressOptions::all()),
            mangle: Some(MangleOptions::default()),
            emit: EmitOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minified {
    pub code: String,
}

/// Parses UTF-8 JavaScript code into a tree.
///
/// # Examples
///
/// ```
/// use compact_js::{parse, TopLevelMode};
///
/// let program = parse("let a = 1;", TopLevelMode::Global).unwrap();
/// assert_eq!(program.body().len(), 1);
/// ```
pub fn parse(source: &str, mode: TopLevelMode) -> SyntaxResult<Program> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer, mode);
    parse_top_level(&mut parser)
}

/// Applies the enabled rewrite rules until nothing changes or the pass limit is reached.
pub fn compress(program: Program, options: &CompressOptions) -> Result<Program, InvariantError> {
    compress::compress_program(program, options)
}

/// Renames local bindings to short names.
pub fn mangle(program: &mut Program, options: &MangleOptions) {
    mangle::mangle_program(program, options)
}

/// Prints a tree as JavaScript code. This allows custom introspections and transforms on the tree
/// before emitting it to code.
pub fn emit(program: &Program, options: &EmitOptions) -> Result<String, InvariantError> {
    emit::emit_program(program, options)
}

/// Minifies UTF-8 JavaScript code.
///
/// # Examples
///
/// ```
/// use compact_js::{minify, Options};
///
/// let code = "const main = () => { let my_first_variable = 1; };";
/// let minified = minify(code, &Options::recommended()).unwrap();
/// assert_eq!(minified.code, "const main=()=>{let e=1}");
/// ```
pub fn minify(source: &str, options: &Options) -> Result<Minified, MinifyError> {
    let mut program = parse(source, options.top_level_mode)?;
    debug!(
        statements = program.body().len(),
        strict = program.strict,
        "parsed"
    );
    if let Some(compress_options) = &options.compress {
        program = compress(program, compress_options).map_err(MinifyError::Compress)?;
    };
    if let Some(mangle_options) = &options.mangle {
        mangle(&mut program, mangle_options);
    };
    let code = emit(&program, &options.emit).map_err(MinifyError::Emit)?;
    Ok(Minified { code })
}
