mod context;
mod expr;
mod stmt;
