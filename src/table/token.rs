use super::file::TableFile;
use crate::error::TableError;
use lazy_static::lazy_static;
use std::collections::BTreeMap;

//===========================================================================//

const BUILTIN_SOURCE: &str = include_str!("../../tables/applesoft.tbl");

lazy_static! {
    static ref BUILTIN: Result<TokenDictionary, TableError> = {
        let result = TokenDictionary::parse_source(BUILTIN_SOURCE);
        match &result {
            Ok(dict) => log::debug!(
                "loaded built-in AppleSoft token dictionary ({} tokens)",
                dict.len()
            ),
            Err(error) => log::error!("built-in token dictionary: {error}"),
        }
        result
    };
}

//===========================================================================//

/// The lowest token code; bytes below this are literal characters.
pub const MIN_TOKEN: u8 = 0x80;

/// A mapping from BASIC token codes (128 through 255) to keyword text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenDictionary {
    keywords: BTreeMap<u8, String>,
}

impl TokenDictionary {
    /// Returns the built-in AppleSoft token dictionary.  The dictionary is
    /// parsed the first time this is called; if that fails, every call
    /// returns the same error.
    pub fn builtin() -> Result<&'static TokenDictionary, TableError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parses a token dictionary from table-file source text, which must
    /// contain a `.TOKENS` block.
    pub fn parse_source(source: &str) -> Result<TokenDictionary, TableError> {
        TableFile::parse_source(source)?
            .tokens
            .ok_or(TableError::MissingBlock(".TOKENS"))
    }

    pub(crate) fn from_keywords(
        keywords: BTreeMap<u8, String>,
    ) -> TokenDictionary {
        TokenDictionary { keywords }
    }

    /// Returns the keyword for the given token code, if it has one.
    pub fn lookup(&self, token: u8) -> Option<&str> {
        self.keywords.get(&token).map(String::as_str)
    }

    /// Returns the number of tokens in the dictionary.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if the dictionary has no tokens.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

//===========================================================================//


//===========================================================================//
