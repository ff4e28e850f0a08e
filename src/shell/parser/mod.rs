pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{CommandLine, Stage};
pub use lexer::{tokenize, Lexer, Token};
pub use parser::{parse, Parser, SyntaxError};
