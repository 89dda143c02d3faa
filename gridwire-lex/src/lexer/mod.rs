//! Lexer module, split the way the grammar's recognition rules (§4.3)
//! are split:
//! - `core` - the `Lexer` struct, lookahead management, and dispatch
//! - `identifier` - identifiers, keywords, refs and symbols
//! - `number` - numbers, dates, times and date-times
//! - `string` - string and URI literal scanning

mod core;
mod identifier;
mod number;
mod string;

pub use core::Lexer;
