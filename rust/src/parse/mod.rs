pub mod class_or_object;
pub mod context;
pub mod decl;
pub mod expr;
pub mod literal;
pub mod operator;
pub mod parser;
pub mod pattern;
pub mod signature;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod toplevel;
