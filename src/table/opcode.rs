use super::file::TableFile;
use crate::dis::m65c02::AddrMode;
use crate::error::TableError;
use lazy_static::lazy_static;

//===========================================================================//

const BUILTIN_SOURCE: &str = include_str!("../../tables/65c02.tbl");

lazy_static! {
    static ref BUILTIN: Result<OpcodeTable, TableError> = {
        let result = OpcodeTable::parse_source(BUILTIN_SOURCE);
        match &result {
            Ok(table) => log::debug!(
                "loaded built-in opcode table ({} defined opcodes)",
                table.num_defined()
            ),
            Err(error) => log::error!("built-in opcode table: {error}"),
        }
        result
    };
}

//===========================================================================//

/// The definition of a single opcode: its mnemonic, total instruction length,
/// and addressing mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpcodeEntry {
    mnemonic: String,
    length: u32,
    addr_mode: AddrMode,
}

impl OpcodeEntry {
    /// Creates an entry, or returns `None` if `length` does not match the
    /// number of operand bytes that `addr_mode` requires.
    pub fn new(
        mnemonic: impl Into<String>,
        length: u32,
        addr_mode: AddrMode,
    ) -> Option<OpcodeEntry> {
        if length != 1 + addr_mode.operand_size() {
            return None;
        }
        Some(OpcodeEntry { mnemonic: mnemonic.into(), length, addr_mode })
    }

    /// Returns the instruction mnemonic, e.g. `"LDA"`.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Returns the total instruction length in bytes (1, 2, or 3).
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the addressing mode.
    pub fn addr_mode(&self) -> AddrMode {
        self.addr_mode
    }
}

//===========================================================================//

/// A mapping from each of the 256 opcode byte values to its definition.  An
/// opcode may be explicitly undefined, in which case it has no entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpcodeTable {
    entries: Box<[Option<OpcodeEntry>; 256]>,
}

impl OpcodeTable {
    /// Returns the built-in 65C02 opcode table.  The table is parsed the
    /// first time this is called; if that fails, every call returns the same
    /// error.
    pub fn builtin() -> Result<&'static OpcodeTable, TableError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parses an opcode table from table-file source text, which must contain
    /// an `.OPCODES` block.
    pub fn parse_source(source: &str) -> Result<OpcodeTable, TableError> {
        TableFile::parse_source(source)?
            .opcodes
            .ok_or(TableError::MissingBlock(".OPCODES"))
    }

    pub(crate) fn from_entries(
        entries: Box<[Option<OpcodeEntry>; 256]>,
    ) -> OpcodeTable {
        OpcodeTable { entries }
    }

    /// Returns the definition of the given opcode, or `None` if the opcode is
    /// undefined.
    pub fn lookup(&self, opcode: u8) -> Option<&OpcodeEntry> {
        self.entries[usize::from(opcode)].as_ref()
    }

    /// Returns the number of opcodes that have a definition.
    pub fn num_defined(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

//===========================================================================//


//===========================================================================//
