//! Opcode tables and BASIC token dictionaries.
//!
//! Both kinds of table are read from a small text format (see
//! [`TableFile`]).  Built-in tables for the 65C02 and for AppleSoft BASIC are
//! embedded in the crate and parsed once, on first use.

mod file;
mod opcode;
mod token;

pub use file::TableFile;
pub use opcode::{OpcodeEntry, OpcodeTable};
pub use token::{MIN_TOKEN, TokenDictionary};

use crate::error::TableError;

//===========================================================================//

/// The pair of lookup tables that the decoders consult.
#[derive(Clone, Copy, Debug)]
pub struct Tables<'a> {
    /// The opcode table used for disassembly.
    pub opcodes: &'a OpcodeTable,
    /// The token dictionary used for detokenizing BASIC programs.
    pub tokens: &'a TokenDictionary,
}

impl Tables<'static> {
    /// Returns the built-in 65C02 opcode table and AppleSoft token
    /// dictionary.
    pub fn builtin() -> Result<Tables<'static>, TableError> {
        Ok(Tables {
            opcodes: OpcodeTable::builtin()?,
            tokens: TokenDictionary::builtin()?,
        })
    }
}

impl<'a> Tables<'a> {
    /// Returns these tables, with any block present in `file` replacing the
    /// corresponding table.
    pub fn overridden_by(self, file: &'a TableFile) -> Tables<'a> {
        Tables {
            opcodes: file.opcodes.as_ref().unwrap_or(self.opcodes),
            tokens: file.tokens.as_ref().unwrap_or(self.tokens),
        }
    }
}

//===========================================================================//


//===========================================================================//
