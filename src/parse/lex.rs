use super::types::{ParseError, SrcSpan};
use logos::{self, Logos};

//===========================================================================//

#[derive(Clone, Debug, Default, PartialEq)]
enum LexerError {
    #[default]
    InvalidToken,
    ParseError(ParseError),
}

impl std::convert::From<ParseError> for LexerError {
    fn from(value: ParseError) -> LexerError {
        LexerError::ParseError(value)
    }
}

//===========================================================================//

fn int_literal(
    lexer: &logos::Lexer<TokenKind>,
    digits: &str,
    radix: u32,
) -> Result<u32, ParseError> {
    u32::from_str_radix(digits, radix).map_err(|_| {
        let span = SrcSpan::from_byte_range(lexer.span());
        let message = format!("integer literal is too large: {}", lexer.slice());
        ParseError::new(span, message)
    })
}

fn binary_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, ParseError> {
    int_literal(lexer, &lexer.slice()[1..], 2)
}

fn decimal_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, ParseError> {
    int_literal(lexer, lexer.slice(), 10)
}

fn hex_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, ParseError> {
    int_literal(lexer, &lexer.slice()[1..], 16)
}

fn str_literal_callback(lexer: &mut logos::Lexer<TokenKind>) -> String {
    let slice = lexer.slice();
    slice[1..slice.len() - 1].to_string()
}

#[derive(Debug, Eq, Logos, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r]+")] // whitespace
#[logos(skip r";[^\n]*")] // comments
enum TokenKind {
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[regex(r"\.[A-Za-z]+")]
    Directive,
    #[regex(r"[_A-Za-z][_A-Za-z0-9]*")]
    Identifier,
    #[regex(r"%[01]+", binary_literal_callback)]
    #[regex(r"[0-9]+", decimal_literal_callback)]
    #[regex(r"\$[0-9A-Fa-f]+", hex_literal_callback)]
    IntLiteral(u32),
    #[token("\n")]
    Linebreak,
    #[regex(r#""[^"\n]*""#, str_literal_callback)]
    StrLiteral(String),
}

impl TokenKind {
    fn into_token(self, lexer: &logos::Lexer<TokenKind>) -> Token {
        let span = SrcSpan::from_byte_range(lexer.span());
        let value = match self {
            TokenKind::BraceOpen => TokenValue::BraceOpen,
            TokenKind::BraceClose => TokenValue::BraceClose,
            TokenKind::Colon => TokenValue::Colon,
            TokenKind::Comma => TokenValue::Comma,
            TokenKind::Directive => {
                TokenValue::Directive(lexer.slice().to_string())
            }
            TokenKind::Identifier => {
                TokenValue::Identifier(lexer.slice().to_string())
            }
            TokenKind::IntLiteral(int) => TokenValue::IntLiteral(int),
            TokenKind::Linebreak => TokenValue::Linebreak,
            TokenKind::StrLiteral(string) => TokenValue::StrLiteral(string),
        };
        Token { span, value }
    }
}

//===========================================================================//

/// The contents of a single lexical token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenValue {
    /// A "`{`" symbol.
    BraceOpen,
    /// A "`}`" symbol.
    BraceClose,
    /// A "`:`" symbol.
    Colon,
    /// A "`,`" symbol.
    Comma,
    /// A directive name, such as `.OPCODES`.
    Directive(String),
    /// An identifier or keyword.
    Identifier(String),
    /// An integer literal.
    IntLiteral(u32),
    /// A linebreak.
    Linebreak,
    /// A double-quoted string literal (without the quotes).
    StrLiteral(String),
}

impl TokenValue {
    /// Returns the human-readable name for this kind of token.
    pub fn name(&self) -> &'static str {
        match &self {
            TokenValue::BraceOpen => "opening brace",
            TokenValue::BraceClose => "closing brace",
            TokenValue::Colon => "colon",
            TokenValue::Comma => "comma",
            TokenValue::Directive(_) => "directive",
            TokenValue::Identifier(_) => "identifier",
            TokenValue::IntLiteral(_) => "int literal",
            TokenValue::Linebreak => "linebreak",
            TokenValue::StrLiteral(_) => "string literal",
        }
    }
}

//===========================================================================//

/// A single lexical token, including location information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// The location in the file of the token.
    pub span: SrcSpan,
    /// The contents of the token.
    pub value: TokenValue,
}

//===========================================================================//

/// A lexer for tokenizing a table source file.
pub struct TokenLexer<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
}

impl<'a> TokenLexer<'a> {
    /// Constructs a new lexer in its initial state.
    pub fn new(input: &'a str) -> TokenLexer<'a> {
        TokenLexer { lexer: TokenKind::lexer(input) }
    }
}

impl<'a> Iterator for TokenLexer<'a> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Result<Token, ParseError>> {
        match self.lexer.next() {
            None => None,
            Some(Err(LexerError::ParseError(error))) => Some(Err(error)),
            Some(Err(LexerError::InvalidToken)) => {
                let span = SrcSpan::from_byte_range(self.lexer.span());
                let message = format!(
                    "invalid character: {}",
                    self.lexer.slice().escape_debug()
                );
                Some(Err(ParseError::new(span, message)))
            }
            Some(Ok(kind)) => Some(Ok(kind.into_token(&self.lexer))),
        }
    }
}

//===========================================================================//


//===========================================================================//
