//! Facilities for parsing opcode and token table files.

mod atom;
mod lex;
mod table;
mod types;

pub use lex::{Token, TokenLexer, TokenValue};
pub use table::{
    AddrModeAst, OpcodeDefAst, OpcodeEntryAst, TableDirectiveAst,
    TableFileAst, TokenEntryAst,
};
pub use types::{ParseError, ParseErrorLabel, ParseResult, SrcSpan};

//===========================================================================//
