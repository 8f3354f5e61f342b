//! Facilities for disassembling 65C02 machine code.

use crate::error::{ListingError, PartialListing};
use crate::hex::hex_dump;
use crate::table::OpcodeTable;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

//===========================================================================//

/// An addressing mode for a 65C02 processor instruction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddrMode {
    /// No additional arguments to the opcode.
    Implied,
    /// No additional arguments; the operation pushes, pulls, or returns via
    /// the stack.
    Stack,
    /// Operate on the A register.
    Accumulator,
    /// Operate on a constant byte immediately following the opcode.
    Immediate,
    /// Operate on an address that is offset (by the signed byte following the
    /// opcode) from the address of the next instruction.
    Relative,
    /// Operate on the absolute 16-bit address following the opcode.
    Absolute,
    /// Treat the 16-bit address following the opcode as a pointer to the
    /// address to operate on.
    AbsoluteIndirect,
    /// Operate on a the absolute 16-bit address following the opcode, offset
    /// by index X.
    XIndexedAbsolute,
    /// Operate on a the absolute 16-bit address following the opcode, offset
    /// by index Y.
    YIndexedAbsolute,
    /// Operate on the 16-bit address stored in memory at the absolute address
    /// following the opcode offset by index X.
    XIndexedAbsoluteIndirect,
    /// Operate on a the 8-bit zero page address following the opcode.
    ZeroPage,
    /// Operate on the 8-bit zero page address following the opcode, offset by
    /// index X.
    XIndexedZeroPage,
    /// Operate on the 8-bit zero page address following the opcode, offset by
    /// index Y.
    YIndexedZeroPage,
    /// Operate on the 16-bit address stored in memory at the 8-bit zero page
    /// address following the opcode.
    ZeroPageIndirect,
    /// Operate on the 16-bit address that is stored in memory, at the 8-bit
    /// zero page address following the opcode offset by index X.
    XIndexedZeroPageIndirect,
    /// Operate on a address equal to the 16-bit address stored at the 8-bit
    /// zero page address following the opcode, offset by index Y.
    ZeroPageIndirectYIndexed,
}

impl AddrMode {
    /// All addressing modes, in numeric mode ID order.
    pub const ALL: [AddrMode; 16] = [
        AddrMode::XIndexedZeroPageIndirect,
        AddrMode::ZeroPage,
        AddrMode::Immediate,
        AddrMode::Absolute,
        AddrMode::ZeroPageIndirectYIndexed,
        AddrMode::XIndexedZeroPage,
        AddrMode::YIndexedAbsolute,
        AddrMode::XIndexedAbsolute,
        AddrMode::Accumulator,
        AddrMode::Relative,
        AddrMode::Implied,
        AddrMode::AbsoluteIndirect,
        AddrMode::YIndexedZeroPage,
        AddrMode::Stack,
        AddrMode::XIndexedAbsoluteIndirect,
        AddrMode::ZeroPageIndirect,
    ];

    /// Returns the addressing mode with the given numeric mode ID, if any.
    pub fn from_id(id: u32) -> Option<AddrMode> {
        AddrMode::ALL.get(usize::try_from(id).ok()?).copied()
    }

    /// Returns the addressing mode with the given table-file name, if any.
    pub fn from_name(name: &str) -> Option<AddrMode> {
        AddrMode::ALL.into_iter().find(|mode| mode.name() == name)
    }

    /// Returns the name used for this addressing mode in table files.
    pub fn name(self) -> &'static str {
        match self {
            AddrMode::Implied => "implied",
            AddrMode::Stack => "stack",
            AddrMode::Accumulator => "accumulator",
            AddrMode::Immediate => "immediate",
            AddrMode::Relative => "relative",
            AddrMode::Absolute => "absolute",
            AddrMode::AbsoluteIndirect => "indirect",
            AddrMode::XIndexedAbsolute => "absolute_x",
            AddrMode::YIndexedAbsolute => "absolute_y",
            AddrMode::XIndexedAbsoluteIndirect => "abs_indexed_indirect",
            AddrMode::ZeroPage => "zero_page",
            AddrMode::XIndexedZeroPage => "zero_page_x",
            AddrMode::YIndexedZeroPage => "zero_page_y",
            AddrMode::ZeroPageIndirect => "zero_page_indirect",
            AddrMode::XIndexedZeroPageIndirect => "indirect_x",
            AddrMode::ZeroPageIndirectYIndexed => "indirect_y",
        }
    }

    /// Returns the number of operand bytes that follow the opcode.
    pub fn operand_size(self) -> u32 {
        match self {
            AddrMode::Implied | AddrMode::Stack | AddrMode::Accumulator => 0,
            AddrMode::Immediate
            | AddrMode::Relative
            | AddrMode::ZeroPage
            | AddrMode::XIndexedZeroPage
            | AddrMode::YIndexedZeroPage
            | AddrMode::ZeroPageIndirect
            | AddrMode::XIndexedZeroPageIndirect
            | AddrMode::ZeroPageIndirectYIndexed => 1,
            AddrMode::Absolute
            | AddrMode::AbsoluteIndirect
            | AddrMode::XIndexedAbsolute
            | AddrMode::YIndexedAbsolute
            | AddrMode::XIndexedAbsoluteIndirect => 2,
        }
    }
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//===========================================================================//

/// An addressing mode and argument value for a 65C02 processor instruction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operand {
    /// No additional arguments to the opcode.
    Implied,
    /// No additional arguments; operates via the stack.
    Stack,
    /// Operate on the A register.
    Accumulator,
    /// Operate on the given constant byte.
    Immediate(u8),
    /// Operate on an address that is offset (by the given signed byte) from
    /// the address of the next instruction.
    Relative(i8),
    /// Operate on the given absolute address.
    Absolute(u16),
    /// Operate on the address in memory that the given absolute address points
    /// to.
    AbsoluteIndirect(u16),
    /// Operate on the given absolute address, offset by index X.
    XIndexedAbsolute(u16),
    /// Operate on the given absolute address, offset by index Y.
    YIndexedAbsolute(u16),
    /// Operate on the address in memory that is offset from the given
    /// absolute address by index X.
    XIndexedAbsoluteIndirect(u16),
    /// Operate on the given zero page address.
    ZeroPage(u8),
    /// Operate on the given zero page address, offset by index X.
    XIndexedZeroPage(u8),
    /// Operate on the given zero page address, offset by index Y.
    YIndexedZeroPage(u8),
    /// Operate on the address in memory that the given zero page address
    /// points to.
    ZeroPageIndirect(u8),
    /// Operate on the address in memory that is offset from the given zero
    /// page address by index X.
    XIndexedZeroPageIndirect(u8),
    /// Operate on an address in memory equal to the address stored at the
    /// given zero page address, offset by index Y.
    ZeroPageIndirectYIndexed(u8),
}

impl Operand {
    /// Decodes the operand bytes that follow an opcode.  `bytes` must hold
    /// exactly `mode.operand_size()` bytes.
    fn decode(mode: AddrMode, bytes: &[u8]) -> Operand {
        match mode {
            AddrMode::Implied => Operand::Implied,
            AddrMode::Stack => Operand::Stack,
            AddrMode::Accumulator => Operand::Accumulator,
            AddrMode::Immediate => Operand::Immediate(bytes[0]),
            AddrMode::Relative => Operand::Relative(bytes[0] as i8),
            AddrMode::Absolute => {
                Operand::Absolute(LittleEndian::read_u16(bytes))
            }
            AddrMode::AbsoluteIndirect => {
                Operand::AbsoluteIndirect(LittleEndian::read_u16(bytes))
            }
            AddrMode::XIndexedAbsolute => {
                Operand::XIndexedAbsolute(LittleEndian::read_u16(bytes))
            }
            AddrMode::YIndexedAbsolute => {
                Operand::YIndexedAbsolute(LittleEndian::read_u16(bytes))
            }
            AddrMode::XIndexedAbsoluteIndirect => {
                let abs = LittleEndian::read_u16(bytes);
                Operand::XIndexedAbsoluteIndirect(abs)
            }
            AddrMode::ZeroPage => Operand::ZeroPage(bytes[0]),
            AddrMode::XIndexedZeroPage => Operand::XIndexedZeroPage(bytes[0]),
            AddrMode::YIndexedZeroPage => Operand::YIndexedZeroPage(bytes[0]),
            AddrMode::ZeroPageIndirect => Operand::ZeroPageIndirect(bytes[0]),
            AddrMode::XIndexedZeroPageIndirect => {
                Operand::XIndexedZeroPageIndirect(bytes[0])
            }
            AddrMode::ZeroPageIndirectYIndexed => {
                Operand::ZeroPageIndirectYIndexed(bytes[0])
            }
        }
    }

    /// Returns the addressing mode of this operand.
    pub fn addr_mode(self) -> AddrMode {
        match self {
            Operand::Implied => AddrMode::Implied,
            Operand::Stack => AddrMode::Stack,
            Operand::Accumulator => AddrMode::Accumulator,
            Operand::Immediate(_) => AddrMode::Immediate,
            Operand::Relative(_) => AddrMode::Relative,
            Operand::Absolute(_) => AddrMode::Absolute,
            Operand::AbsoluteIndirect(_) => AddrMode::AbsoluteIndirect,
            Operand::XIndexedAbsolute(_) => AddrMode::XIndexedAbsolute,
            Operand::YIndexedAbsolute(_) => AddrMode::YIndexedAbsolute,
            Operand::XIndexedAbsoluteIndirect(_) => {
                AddrMode::XIndexedAbsoluteIndirect
            }
            Operand::ZeroPage(_) => AddrMode::ZeroPage,
            Operand::XIndexedZeroPage(_) => AddrMode::XIndexedZeroPage,
            Operand::YIndexedZeroPage(_) => AddrMode::YIndexedZeroPage,
            Operand::ZeroPageIndirect(_) => AddrMode::ZeroPageIndirect,
            Operand::XIndexedZeroPageIndirect(_) => {
                AddrMode::XIndexedZeroPageIndirect
            }
            Operand::ZeroPageIndirectYIndexed(_) => {
                AddrMode::ZeroPageIndirectYIndexed
            }
        }
    }

    /// Formats this operand, or returns `None` if the operand has no text.
    /// `next` gives the address just past the end of the instruction, which
    /// is what relative branches are measured from.
    fn format(self, next: u32) -> Option<String> {
        match self {
            Operand::Implied | Operand::Stack => None,
            Operand::Accumulator => Some("A".to_string()),
            Operand::Immediate(byte) => Some(format!("#${byte:02X}")),
            Operand::Relative(offset) => {
                let dest = next.wrapping_add_signed(i32::from(offset));
                Some(format!("${dest:04X}"))
            }
            Operand::Absolute(abs) => Some(format!("${abs:04X}")),
            Operand::AbsoluteIndirect(abs) => Some(format!("(${abs:04X})")),
            Operand::XIndexedAbsolute(abs) => Some(format!("${abs:04X},X")),
            Operand::YIndexedAbsolute(abs) => Some(format!("${abs:04X},Y")),
            Operand::XIndexedAbsoluteIndirect(abs) => {
                Some(format!("(${abs:04X},X)"))
            }
            Operand::ZeroPage(zp) => Some(format!("${zp:02X}")),
            Operand::XIndexedZeroPage(zp) => Some(format!("${zp:02X},X")),
            Operand::YIndexedZeroPage(zp) => Some(format!("${zp:02X},Y")),
            Operand::ZeroPageIndirect(zp) => Some(format!("(${zp:02X})")),
            Operand::XIndexedZeroPageIndirect(zp) => {
                Some(format!("(${zp:02X},X)"))
            }
            Operand::ZeroPageIndirectYIndexed(zp) => {
                Some(format!("(${zp:02X}),Y"))
            }
        }
    }
}

//===========================================================================//

/// The width of the column holding an instruction's raw bytes in a listing;
/// wide enough for three bytes.
const BYTES_COLUMN_WIDTH: usize = 12;

/// A single decoded 65C02 instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction<'a> {
    /// The address of the instruction's opcode.
    pub address: u32,
    /// The raw instruction bytes, starting with the opcode.
    pub bytes: &'a [u8],
    /// The instruction mnemonic, as given by the opcode table.
    pub mnemonic: &'a str,
    /// The addressing mode parameter value.
    pub operand: Operand,
}

impl<'a> Instruction<'a> {
    /// Returns the opcode byte.
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// Returns the operand bytes (zero to two of them), in memory order.
    pub fn operand_bytes(&self) -> &'a [u8] {
        &self.bytes[1..]
    }

    /// Returns the size of this instruction, in bytes.
    pub fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// Returns the addressing mode of this instruction.
    pub fn addr_mode(&self) -> AddrMode {
        self.operand.addr_mode()
    }

    /// Returns the destination address of a relative branch, or `None` for
    /// other addressing modes.
    pub fn branch_target(&self) -> Option<u32> {
        match self.operand {
            Operand::Relative(offset) => Some(
                self.address
                    .wrapping_add(self.size())
                    .wrapping_add_signed(i32::from(offset)),
            ),
            _ => None,
        }
    }

    /// Formats the mnemonic and operand as conventional assembly, e.g.
    /// `"LDA #$01"`.
    pub fn assembly(&self) -> String {
        match self.operand_text() {
            Some(operand) => format!("{} {}", self.mnemonic, operand),
            None => self.mnemonic.to_string(),
        }
    }

    fn operand_text(&self) -> Option<String> {
        self.operand.format(self.address.wrapping_add(self.size()))
    }
}

/// Formats the instruction as one listing line (without a trailing newline):
/// address, raw bytes, mnemonic, and operand.
impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .bytes
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "${:04X}:   {:<width$}{}",
            self.address,
            bytes,
            self.mnemonic,
            width = BYTES_COLUMN_WIDTH
        )?;
        if let Some(operand) = self.operand_text() {
            write!(f, "   {operand}")?;
        }
        Ok(())
    }
}

//===========================================================================//

/// An iterator that decodes consecutive instructions from a buffer of 65C02
/// machine code.
///
/// Each instruction advances the cursor by exactly the length that the
/// opcode table declares for it.  After yielding an error, the iterator
/// yields nothing more.
pub struct Disassembler<'a> {
    table: &'a OpcodeTable,
    buffer: &'a [u8],
    offset: usize,
    address: u32,
}

impl<'a> Disassembler<'a> {
    /// Creates a disassembler for `buffer`, whose first byte is assumed to be
    /// loaded at `start_address`.
    pub fn new(
        table: &'a OpcodeTable,
        buffer: &'a [u8],
        start_address: u32,
    ) -> Disassembler<'a> {
        Disassembler { table, buffer, offset: 0, address: start_address }
    }

    /// Returns the buffer offset of the next instruction to be decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the address of the next instruction to be decoded.
    pub fn address(&self) -> u32 {
        self.address
    }

    fn fail(
        &mut self,
        error: ListingError,
    ) -> Option<Result<Instruction<'a>, ListingError>> {
        self.offset = self.buffer.len();
        Some(Err(error))
    }
}

impl<'a> Iterator for Disassembler<'a> {
    type Item = Result<Instruction<'a>, ListingError>;

    fn next(&mut self) -> Option<Result<Instruction<'a>, ListingError>> {
        let remaining = self.buffer.len().checked_sub(self.offset)?;
        if remaining == 0 {
            return None;
        }
        let address = self.address;
        let opcode = self.buffer[self.offset];
        let Some(entry) = self.table.lookup(opcode) else {
            return self.fail(ListingError::UnknownOpcode { address, opcode });
        };
        let length = entry.length();
        if length as usize > remaining {
            return self.fail(ListingError::TruncatedInstruction {
                address,
                opcode,
                length,
                remaining,
            });
        }
        let bytes = &self.buffer[self.offset..][..length as usize];
        let instruction = Instruction {
            address,
            bytes,
            mnemonic: entry.mnemonic(),
            operand: Operand::decode(entry.addr_mode(), &bytes[1..]),
        };
        self.offset += length as usize;
        self.address = self.address.wrapping_add(length);
        Some(Ok(instruction))
    }
}

impl std::iter::FusedIterator for Disassembler<'_> {}

//===========================================================================//

/// The two complementary views of a machine code buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Disassembly {
    /// One line per instruction.
    pub listing: String,
    /// A plain hex dump of the same buffer.
    pub hex: String,
}

/// Disassembles `buffer`, whose first byte is assumed to be loaded at
/// `start_address`, into an instruction listing and a hex dump.
///
/// If decoding stops early, the error carries the instruction lines that
/// were produced before the failure; the hex dump can still be produced
/// separately with [`hex_dump`].
pub fn disassemble(
    table: &OpcodeTable,
    buffer: &[u8],
    start_address: u32,
) -> Result<Disassembly, PartialListing> {
    let mut listing = String::new();
    let mut count = 0usize;
    for result in Disassembler::new(table, buffer, start_address) {
        match result {
            Ok(instruction) => {
                listing.push_str(&instruction.to_string());
                listing.push('\n');
                count += 1;
            }
            Err(error) => {
                log::warn!(
                    "disassembly stopped after {count} instructions: {error}"
                );
                return Err(PartialListing { listing, error });
            }
        }
    }
    log::debug!(
        "disassembled {count} instructions from {} bytes at ${start_address:04X}",
        buffer.len()
    );
    Ok(Disassembly { listing, hex: hex_dump(buffer, start_address) })
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{AddrMode, Disassembler, Instruction, disassemble};
    use crate::error::ListingError;
    use crate::table::OpcodeTable;

    fn decode(code: &[u8], address: u32) -> Instruction<'_> {
        let table = OpcodeTable::builtin().unwrap();
        Disassembler::new(table, code, address).next().unwrap().unwrap()
    }

    fn disassemble_one(code: &[u8]) -> String {
        decode(code, 0x0300).assembly()
    }

    #[test]
    fn addr_mode_ids_round_trip() {
        for (id, mode) in AddrMode::ALL.into_iter().enumerate() {
            assert_eq!(AddrMode::from_id(id as u32), Some(mode));
            assert_eq!(AddrMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(AddrMode::from_id(16), None);
        assert_eq!(AddrMode::from_name("bogus"), None);
        assert_eq!(
            AddrMode::from_id(0),
            Some(AddrMode::XIndexedZeroPageIndirect)
        );
        assert_eq!(AddrMode::from_id(13), Some(AddrMode::Stack));
    }

    #[test]
    fn disassemble_addr_mode_implied_and_stack() {
        assert_eq!(disassemble_one(&[0x00]), "BRK");
        assert_eq!(disassemble_one(&[0x18]), "CLC");
        assert_eq!(disassemble_one(&[0xea]), "NOP");
        assert_eq!(disassemble_one(&[0x48]), "PHA");
        assert_eq!(disassemble_one(&[0x5a]), "PHY");
        assert_eq!(disassemble_one(&[0xfa]), "PLX");
        assert_eq!(disassemble_one(&[0x60]), "RTS");
        assert_eq!(decode(&[0x60], 0).addr_mode(), AddrMode::Stack);
    }

    #[test]
    fn disassemble_addr_mode_accumulator() {
        assert_eq!(disassemble_one(&[0x0a]), "ASL A");
        assert_eq!(disassemble_one(&[0x1a]), "INC A");
        assert_eq!(disassemble_one(&[0x3a]), "DEC A");
        assert_eq!(disassemble_one(&[0x6a]), "ROR A");
    }

    #[test]
    fn disassemble_addr_mode_immediate() {
        assert_eq!(disassemble_one(&[0xa9, 0x01]), "LDA #$01");
        assert_eq!(disassemble_one(&[0x89, 0xf0]), "BIT #$F0");
        assert_eq!(disassemble_one(&[0xe0, 0x7f]), "CPX #$7F");
    }

    #[test]
    fn disassemble_addr_mode_absolute() {
        assert_eq!(disassemble_one(&[0x8d, 0x00, 0x02]), "STA $0200");
        assert_eq!(disassemble_one(&[0x20, 0xc4, 0x20]), "JSR $20C4");
        assert_eq!(disassemble_one(&[0x9c, 0x34, 0x12]), "STZ $1234");
        assert_eq!(disassemble_one(&[0xbd, 0x34, 0x12]), "LDA $1234,X");
        assert_eq!(disassemble_one(&[0xbe, 0x34, 0x12]), "LDX $1234,Y");
        assert_eq!(disassemble_one(&[0x6c, 0xf0, 0x03]), "JMP ($03F0)");
        assert_eq!(disassemble_one(&[0x7c, 0x00, 0x90]), "JMP ($9000,X)");
    }

    #[test]
    fn disassemble_addr_mode_zero_page() {
        assert_eq!(disassemble_one(&[0xa5, 0x12]), "LDA $12");
        assert_eq!(disassemble_one(&[0x74, 0x34]), "STZ $34,X");
        assert_eq!(disassemble_one(&[0xb6, 0x56]), "LDX $56,Y");
        assert_eq!(disassemble_one(&[0xb2, 0x78]), "LDA ($78)");
        assert_eq!(disassemble_one(&[0xa1, 0x9a]), "LDA ($9A,X)");
        assert_eq!(disassemble_one(&[0x91, 0xbc]), "STA ($BC),Y");
    }

    #[test]
    fn relative_branch_targets() {
        let forward = decode(&[0xd0, 0x7f], 0x0300);
        assert_eq!(forward.branch_target(), Some(0x0381));
        assert_eq!(forward.assembly(), "BNE $0381");
        let backward = decode(&[0xd0, 0x80], 0x0300);
        assert_eq!(backward.branch_target(), Some(0x0282));
        assert_eq!(backward.assembly(), "BNE $0282");
        assert_eq!(decode(&[0x80, 0xfe], 0x0300).assembly(), "BRA $0300");
        assert_eq!(decode(&[0xea], 0x0300).branch_target(), None);
    }

    #[test]
    fn undocumented_opcodes_skip_their_operands() {
        let instruction = decode(&[0x03, 0xff], 0x0300);
        assert_eq!(instruction.assembly(), "???");
        assert_eq!(instruction.size(), 1);
        for (opcode, size) in [
            (0x02, 2),
            (0x22, 2),
            (0xe2, 2),
            (0x44, 2),
            (0x54, 2),
            (0xf4, 2),
            (0x5c, 3),
            (0xdc, 3),
            (0xfc, 3),
        ] {
            let bytes = [opcode, 0x12, 0x34];
            let instruction = decode(&bytes, 0x0300);
            assert_eq!(instruction.mnemonic, "???");
            assert_eq!(instruction.size(), size, "opcode ${opcode:02X}");
        }
        assert_eq!(decode(&[0x02, 0x12], 0x0300).assembly(), "??? #$12");
        assert_eq!(decode(&[0xdc, 0x34, 0x12], 0x0300).assembly(), "??? $1234");
    }

    #[test]
    fn undocumented_nop_keeps_following_instructions_aligned() {
        let table = OpcodeTable::builtin().unwrap();
        let code = [0x5c, 0xa9, 0x00, 0xa9, 0x01];
        let mnemonics: Vec<String> = Disassembler::new(table, &code, 0x0300)
            .map(|result| result.unwrap().assembly())
            .collect();
        assert_eq!(mnemonics, vec!["??? $00A9", "LDA #$01"]);
    }

    #[test]
    fn listing_line_layout() {
        assert_eq!(
            decode(&[0x00], 0x0300).to_string(),
            "$0300:   00          BRK"
        );
        assert_eq!(
            decode(&[0xa9, 0x01], 0x0300).to_string(),
            "$0300:   A9 01       LDA   #$01"
        );
        assert_eq!(
            decode(&[0x20, 0xc4, 0x20], 0x2000).to_string(),
            "$2000:   20 C4 20    JSR   $20C4"
        );
    }

    #[test]
    fn instruction_accessors() {
        let instruction = decode(&[0x8d, 0x00, 0x02], 0x0302);
        assert_eq!(instruction.address, 0x0302);
        assert_eq!(instruction.opcode(), 0x8d);
        assert_eq!(instruction.operand_bytes(), &[0x00, 0x02]);
        assert_eq!(instruction.mnemonic, "STA");
        assert_eq!(instruction.addr_mode(), AddrMode::Absolute);
    }

    #[test]
    fn truncated_instruction_keeps_prior_lines() {
        let table = OpcodeTable::builtin().unwrap();
        let partial =
            disassemble(table, &[0xea, 0xad, 0x00], 0x0800).unwrap_err();
        assert_eq!(partial.listing, "$0800:   EA          NOP\n");
        assert_eq!(
            partial.error,
            ListingError::TruncatedInstruction {
                address: 0x0801,
                opcode: 0xad,
                length: 3,
                remaining: 2,
            }
        );
    }

    #[test]
    fn disassembler_is_fused_after_error() {
        let table = OpcodeTable::builtin().unwrap();
        let mut dis = Disassembler::new(table, &[0xa9], 0);
        assert!(matches!(dis.next(), Some(Err(_))));
        assert_eq!(dis.next(), None);
        assert_eq!(dis.offset(), 1);
    }

    #[test]
    fn empty_buffer() {
        let table = OpcodeTable::builtin().unwrap();
        let disassembly = disassemble(table, &[], 0x2000).unwrap();
        assert_eq!(disassembly.listing, "");
        assert_eq!(disassembly.hex, "");
    }
}

//===========================================================================//
