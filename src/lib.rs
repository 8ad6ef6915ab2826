//! Kaleidoscope front end
//!
//! Turns Kaleidoscope source into a syntax tree for a downstream code
//! generator: a double-buffered scanner feeding a recursive-descent parser
//! with operator-precedence expressions and per-form error recovery.

pub mod lexer;
pub mod parser;
pub mod symbol;

pub use lexer::*;
pub use parser::*;
pub use symbol::*;
