use super::lex::{Token, TokenLexer, TokenValue};
use super::types::{ParseError, ParseResult, SrcSpan};
use chumsky::{self, Parser};

//===========================================================================//

/// The error type used for `chumsky::Parser`s in this crate.
pub(crate) type PError<'a> =
    chumsky::extra::Err<chumsky::error::Rich<'a, Token>>;

//===========================================================================//

/// Splits source text into tokens.  The returned list always ends with a
/// linebreak, so that the final line of a file needs no trailing newline.
pub(crate) fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut tokens: Vec<Token> = TokenLexer::new(source)
        .collect::<Result<_, _>>()
        .map_err(|error| vec![error])?;
    if tokens.last().map(|token| &token.value) != Some(&TokenValue::Linebreak)
    {
        let end = source.len();
        tokens.push(Token {
            span: SrcSpan::from_byte_range(end..end),
            value: TokenValue::Linebreak,
        });
    }
    Ok(tokens)
}

/// Runs `parser` over `tokens`, converting any errors into `ParseError`s
/// located at the offending token.
pub(crate) fn parse_tokens<'a, T>(
    parser: impl Parser<'a, &'a [Token], T, PError<'a>>,
    tokens: &'a [Token],
) -> ParseResult<T> {
    parser.parse(tokens).into_result().map_err(|errors| {
        errors
            .into_iter()
            .map(|error| {
                let index = error.span().start;
                if index < tokens.len() {
                    let token = &tokens[index];
                    let message = format!("unexpected {}", token.value.name());
                    ParseError::new(token.span, message)
                } else {
                    let span = tokens[tokens.len() - 1].span.end_span();
                    ParseError::new(span, "unexpected end of file".to_string())
                }
            })
            .collect()
    })
}

//===========================================================================//

pub(crate) fn directive<'a>(
    word: &'static str,
) -> impl Parser<'a, &'a [Token], SrcSpan, PError<'a>> + Clone {
    chumsky::prelude::any()
        .try_map(move |token: Token, span| match &token.value {
            TokenValue::Directive(id) if id.eq_ignore_ascii_case(word) => {
                Ok(token.span)
            }
            _ => Err(chumsky::error::Rich::custom(span, "")),
        })
        .labelled(word)
}

pub(crate) fn keyword<'a>(
    word: &'static str,
) -> impl Parser<'a, &'a [Token], (), PError<'a>> + Clone {
    chumsky::prelude::any()
        .filter(move |token: &Token| {
            if let TokenValue::Identifier(id) = &token.value {
                **id == *word
            } else {
                false
            }
        })
        .ignored()
        .labelled(word)
}

pub(crate) fn identifier<'a>()
-> impl Parser<'a, &'a [Token], (SrcSpan, String), PError<'a>> + Clone {
    chumsky::prelude::any()
        .try_map(|token: Token, span| {
            if let TokenValue::Identifier(name) = token.value {
                Ok((token.span, name))
            } else {
                Err(chumsky::error::Rich::custom(span, ""))
            }
        })
        .labelled("identifier")
}

pub(crate) fn int_literal<'a>()
-> impl Parser<'a, &'a [Token], (SrcSpan, u32), PError<'a>> + Clone {
    chumsky::prelude::any()
        .try_map(|token: Token, span| {
            if let TokenValue::IntLiteral(int) = token.value {
                Ok((token.span, int))
            } else {
                Err(chumsky::error::Rich::custom(span, ""))
            }
        })
        .labelled("integer literal")
}

pub(crate) fn str_literal<'a>()
-> impl Parser<'a, &'a [Token], (SrcSpan, String), PError<'a>> + Clone {
    chumsky::prelude::any()
        .try_map(|token: Token, span| {
            if let TokenValue::StrLiteral(string) = token.value {
                Ok((token.span, string))
            } else {
                Err(chumsky::error::Rich::custom(span, ""))
            }
        })
        .labelled("string literal")
}

pub(crate) fn linebreak<'a>()
-> impl Parser<'a, &'a [Token], (), PError<'a>> + Clone {
    symbol(TokenValue::Linebreak).repeated().at_least(1)
}

pub(crate) fn symbol<'a>(
    value: TokenValue,
) -> impl Parser<'a, &'a [Token], Token, PError<'a>> + Clone {
    let name = value.name();
    chumsky::prelude::any()
        .filter(move |token: &Token| token.value == value)
        .labelled(name)
}

//===========================================================================//
