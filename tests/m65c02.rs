use a2list::dis::m65c02::{Disassembler, disassemble};
use a2list::error::ListingError;
use a2list::hex::hex_dump;
use a2list::table::{OpcodeTable, Tables};

//===========================================================================//

fn builtin() -> &'static OpcodeTable {
    Tables::builtin().unwrap().opcodes
}

fn table_with_undefined(undefined: &[u8]) -> OpcodeTable {
    let mut source = String::from(".OPCODES {\n");
    for opcode in 0..=255u8 {
        if undefined.contains(&opcode) {
            source.push_str(&format!("  ${opcode:02X}: undefined\n"));
        } else {
            source.push_str(&format!("  ${opcode:02X}: \"NOP\", 1, implied\n"));
        }
    }
    source.push_str("}\n");
    OpcodeTable::parse_source(&source).unwrap()
}

//===========================================================================//

#[test]
fn small_program_listing() {
    let code = [0xa9, 0x01, 0x8d, 0x00, 0x02, 0x00];
    let disassembly = disassemble(builtin(), &code, 0x0300).unwrap();
    assert_eq!(
        disassembly.listing,
        "$0300:   A9 01       LDA   #$01\n\
         $0302:   8D 00 02    STA   $0200\n\
         $0305:   00          BRK\n"
    );
    assert_eq!(disassembly.hex, "0300:A9 01 8D 00 02 00 \n");
}

#[test]
fn instruction_lengths_cover_whole_buffer() {
    let mut code: Vec<u8> = (0..=255).collect();
    code.extend_from_slice(&[0xea, 0xea]);
    let mut total = 0;
    let mut expected_address = 0x1000;
    for result in Disassembler::new(builtin(), &code, 0x1000) {
        let instruction = result.unwrap();
        assert_eq!(instruction.address, expected_address);
        assert!((1..=3).contains(&instruction.size()));
        expected_address += instruction.size();
        total += instruction.bytes.len();
    }
    assert_eq!(total, code.len());
}

#[test]
fn listing_has_one_line_per_instruction() {
    let code = [0x18, 0x69, 0x05, 0x4c, 0x00, 0x03, 0x60];
    let count = Disassembler::new(builtin(), &code, 0x0300).count();
    let disassembly = disassemble(builtin(), &code, 0x0300).unwrap();
    assert_eq!(count, 4);
    assert_eq!(disassembly.listing.lines().count(), count);
    assert!(disassembly.listing.ends_with("RTS\n"));
}

#[test]
fn relative_branches() {
    let forward = disassemble(builtin(), &[0xd0, 0x7f], 0x0300).unwrap();
    assert_eq!(forward.listing, "$0300:   D0 7F       BNE   $0381\n");
    let backward = disassemble(builtin(), &[0xd0, 0x80], 0x0300).unwrap();
    assert_eq!(backward.listing, "$0300:   D0 80       BNE   $0282\n");
}

#[test]
fn unknown_opcode_stops_listing() {
    let table = table_with_undefined(&[0x02]);
    let partial = disassemble(&table, &[0xea, 0xea, 0x02, 0xea], 0x0300)
        .unwrap_err();
    assert_eq!(
        partial.listing,
        "$0300:   EA          NOP\n$0301:   EA          NOP\n"
    );
    assert_eq!(
        partial.error,
        ListingError::UnknownOpcode { address: 0x0302, opcode: 0x02 }
    );
}

#[test]
fn truncated_final_instruction() {
    let partial = disassemble(builtin(), &[0xa9, 0x01, 0x20, 0x00], 0x0300)
        .unwrap_err();
    assert_eq!(partial.listing, "$0300:   A9 01       LDA   #$01\n");
    assert_eq!(
        partial.error,
        ListingError::TruncatedInstruction {
            address: 0x0302,
            opcode: 0x20,
            length: 3,
            remaining: 2,
        }
    );
}

#[test]
fn hex_dump_row_counts() {
    for (len, rows) in [(0, 0), (1, 1), (16, 1), (17, 2), (32, 2), (100, 7)] {
        let data = vec![0x5a; len];
        let dump = hex_dump(&data, 0x2000);
        assert_eq!(dump.lines().count(), rows, "length {len}");
        let bytes: usize =
            dump.lines().map(|line| line[5..].split_whitespace().count()).sum();
        assert_eq!(bytes, len);
    }
}

#[test]
fn hex_dump_addresses_advance_by_row() {
    let data = vec![0u8; 40];
    let dump = hex_dump(&data, 0x0800);
    let prefixes: Vec<&str> = dump.lines().map(|line| &line[..5]).collect();
    assert_eq!(prefixes, vec!["0800:", "0810:", "0820:"]);
}

//===========================================================================//
