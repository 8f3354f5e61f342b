//! Facilities for parsing opcode and token table files.

use super::atom::{
    PError, directive, identifier, int_literal, keyword, linebreak,
    parse_tokens, str_literal, symbol, tokenize,
};
use super::lex::{Token, TokenValue};
use super::types::{ParseResult, SrcSpan};
use chumsky::{self, IterParser, Parser};

//===========================================================================//

/// The abstract syntax tree for a table file.
#[derive(Debug)]
pub struct TableFileAst {
    /// Top-level directives in the table file.
    pub directives: Vec<TableDirectiveAst>,
}

impl TableFileAst {
    /// Parses a table file.
    pub fn parse_source(source: &str) -> ParseResult<TableFileAst> {
        let tokens = tokenize(source)?;
        parse_tokens(TableFileAst::parser(), &tokens)
    }

    fn parser<'a>() -> impl Parser<'a, &'a [Token], TableFileAst, PError<'a>>
    {
        symbol(TokenValue::Linebreak)
            .repeated()
            .ignore_then(
                TableDirectiveAst::parser().repeated().collect::<Vec<_>>(),
            )
            .map(|directives| TableFileAst { directives })
    }
}

//===========================================================================//

/// The abstract syntax tree for a single directive block in a table file.
#[derive(Debug)]
pub enum TableDirectiveAst {
    /// An `.OPCODES` directive block.
    Opcodes(SrcSpan, Vec<OpcodeEntryAst>),
    /// A `.TOKENS` directive block.
    Tokens(SrcSpan, Vec<TokenEntryAst>),
}

impl TableDirectiveAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], TableDirectiveAst, PError<'a>> {
        let opcodes_dir = directive(".OPCODES")
            .then(entries_block(OpcodeEntryAst::parser()))
            .map(|(span, entries)| TableDirectiveAst::Opcodes(span, entries));
        let tokens_dir = directive(".TOKENS")
            .then(entries_block(TokenEntryAst::parser()))
            .map(|(span, entries)| TableDirectiveAst::Tokens(span, entries));
        chumsky::prelude::choice((opcodes_dir, tokens_dir))
    }
}

fn entries_block<'a, T>(
    entry: impl Parser<'a, &'a [Token], T, PError<'a>> + Clone,
) -> impl Parser<'a, &'a [Token], Vec<T>, PError<'a>> + Clone {
    symbol(TokenValue::BraceOpen)
        .ignore_then(linebreak())
        .ignore_then(entry.repeated().collect::<Vec<_>>())
        .then_ignore(symbol(TokenValue::BraceClose))
        .then_ignore(linebreak())
}

//===========================================================================//

/// The abstract syntax tree for one entry in an `.OPCODES` block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpcodeEntryAst {
    /// The opcode byte value being described.
    pub opcode: (SrcSpan, u32),
    /// The opcode's definition, or `None` if the entry is `undefined`.
    pub def: Option<OpcodeDefAst>,
}

impl OpcodeEntryAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], OpcodeEntryAst, PError<'a>> + Clone {
        let undefined =
            keyword("undefined").map(|()| None::<OpcodeDefAst>);
        let defined = chumsky::prelude::group((
            str_literal(),
            symbol(TokenValue::Comma).ignore_then(int_literal()),
            symbol(TokenValue::Comma).ignore_then(AddrModeAst::parser()),
        ))
        .map(|(mnemonic, length, mode)| {
            Some(OpcodeDefAst { mnemonic, length, mode })
        });
        int_literal()
            .then_ignore(symbol(TokenValue::Colon))
            .then(chumsky::prelude::choice((undefined, defined)))
            .then_ignore(linebreak())
            .map(|(opcode, def)| OpcodeEntryAst { opcode, def })
    }
}

/// The abstract syntax tree for the definition of a single opcode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpcodeDefAst {
    /// The instruction mnemonic, e.g. `LDA`.
    pub mnemonic: (SrcSpan, String),
    /// The total instruction length in bytes, including the opcode.
    pub length: (SrcSpan, u32),
    /// The addressing mode.
    pub mode: AddrModeAst,
}

/// An addressing mode in a table file, written either as a name or as a
/// numeric mode ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddrModeAst {
    /// A mode name, such as `zero_page_x`.
    Name(SrcSpan, String),
    /// A numeric mode ID.
    Id(SrcSpan, u32),
}

impl AddrModeAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], AddrModeAst, PError<'a>> + Clone {
        chumsky::prelude::choice((
            identifier().map(|(span, name)| AddrModeAst::Name(span, name)),
            int_literal().map(|(span, id)| AddrModeAst::Id(span, id)),
        ))
        .labelled("addressing mode")
    }

    /// Returns the location of this mode in the table file.
    pub fn span(&self) -> SrcSpan {
        match *self {
            AddrModeAst::Name(span, _) => span,
            AddrModeAst::Id(span, _) => span,
        }
    }
}

//===========================================================================//

/// The abstract syntax tree for one entry in a `.TOKENS` block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenEntryAst {
    /// The token code.
    pub code: (SrcSpan, u32),
    /// The keyword text that the token expands to.
    pub keyword: (SrcSpan, String),
}

impl TokenEntryAst {
    fn parser<'a>()
    -> impl Parser<'a, &'a [Token], TokenEntryAst, PError<'a>> + Clone {
        int_literal()
            .then_ignore(symbol(TokenValue::Colon))
            .then(str_literal())
            .then_ignore(linebreak())
            .map(|(code, keyword)| TokenEntryAst { code, keyword })
    }
}

//===========================================================================//


//===========================================================================//
