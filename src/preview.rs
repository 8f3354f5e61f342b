//! Chooses and runs a decoder based on a file's ProDOS type.

use crate::applesoft::detokenize;
use crate::dis::m65c02::disassemble;
use crate::error::ListingError;
use crate::hex::hex_dump;
use crate::table::Tables;

//===========================================================================//

const FILE_TYPE_TXT: u8 = 0x04;
const FILE_TYPE_BIN: u8 = 0x06;
const FILE_TYPE_TEACH: u8 = 0x50;
const FILE_TYPE_SRC: u8 = 0xb0;
const FILE_TYPE_BAS: u8 = 0xfc;
const FILE_TYPE_SYS: u8 = 0xff;

const AUX_TYPE_TEACH: u16 = 0x5445;

/// The address at which ProDOS loads system files.
pub const SYSTEM_LOAD_ADDRESS: u32 = 0x2000;

//===========================================================================//

/// The kind of listing to produce for a file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileKind {
    /// Plain text, optionally with the high bit of every byte cleared.
    Text {
        /// Whether to clear bit 7 of each byte before display.
        strip_high_bit: bool,
    },
    /// A tokenized AppleSoft BASIC program.
    AppleSoft,
    /// 65C02 machine code loaded at the given address.
    Binary {
        /// The address of the first byte of the file.
        load_address: u32,
    },
}

impl FileKind {
    /// Determines the kind of listing for a file with the given ProDOS file
    /// type and auxiliary type, or `None` if the file has no listing view.
    pub fn from_prodos(file_type: u8, aux_type: u16) -> Option<FileKind> {
        match (file_type, aux_type) {
            (FILE_TYPE_TXT, _) => Some(FileKind::Text { strip_high_bit: true }),
            (FILE_TYPE_SRC, _) | (FILE_TYPE_TEACH, AUX_TYPE_TEACH) => {
                Some(FileKind::Text { strip_high_bit: false })
            }
            (FILE_TYPE_BAS, _) => Some(FileKind::AppleSoft),
            (FILE_TYPE_BIN, _) => {
                Some(FileKind::Binary { load_address: u32::from(aux_type) })
            }
            (FILE_TYPE_SYS, _) => {
                Some(FileKind::Binary { load_address: SYSTEM_LOAD_ADDRESS })
            }
            _ => None,
        }
    }
}

//===========================================================================//

/// The rendered views of a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preview {
    /// The main listing; may be partial if `error` is set.
    pub listing: String,
    /// A hex dump, for kinds that have one.
    pub hex: Option<String>,
    /// The error that stopped the listing early, if any.
    pub error: Option<ListingError>,
}

/// Renders `data` as the given kind of file.  Decoding failures do not
/// discard output: the listing produced so far is kept, alongside the error.
pub fn render(tables: Tables<'_>, kind: FileKind, data: &[u8]) -> Preview {
    match kind {
        FileKind::Text { strip_high_bit } => {
            let listing = if strip_high_bit {
                let ascii: Vec<u8> =
                    data.iter().map(|&byte| byte & 0x7f).collect();
                decode_mac_roman(&ascii)
            } else {
                decode_mac_roman(data)
            };
            Preview { listing, hex: None, error: None }
        }
        FileKind::AppleSoft => match detokenize(tables.tokens, data) {
            Ok(listing) => Preview { listing, hex: None, error: None },
            Err(partial) => Preview {
                listing: partial.listing,
                hex: None,
                error: Some(partial.error),
            },
        },
        FileKind::Binary { load_address } => {
            match disassemble(tables.opcodes, data, load_address) {
                Ok(disassembly) => Preview {
                    listing: disassembly.listing,
                    hex: Some(disassembly.hex),
                    error: None,
                },
                Err(partial) => Preview {
                    listing: partial.listing,
                    hex: Some(hex_dump(data, load_address)),
                    error: Some(partial.error),
                },
            }
        }
    }
}

/// Decodes text bytes as Mac OS Roman, which maps every byte value to a
/// character.
fn decode_mac_roman(data: &[u8]) -> String {
    let (text, had_errors) =
        encoding_rs::MACINTOSH.decode_without_bom_handling(data);
    if had_errors {
        log::warn!("text preview contains undecodable bytes");
    }
    text.into_owned()
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{FileKind, render};
    use crate::error::ListingError;
    use crate::table::Tables;

    #[test]
    fn prodos_type_dispatch() {
        assert_eq!(
            FileKind::from_prodos(0x04, 0),
            Some(FileKind::Text { strip_high_bit: true })
        );
        assert_eq!(
            FileKind::from_prodos(0xb0, 0x0003),
            Some(FileKind::Text { strip_high_bit: false })
        );
        assert_eq!(
            FileKind::from_prodos(0x50, 0x5445),
            Some(FileKind::Text { strip_high_bit: false })
        );
        assert_eq!(FileKind::from_prodos(0x50, 0x8010), None);
        assert_eq!(FileKind::from_prodos(0xfc, 0x0801), Some(FileKind::AppleSoft));
        assert_eq!(
            FileKind::from_prodos(0x06, 0x0300),
            Some(FileKind::Binary { load_address: 0x0300 })
        );
        assert_eq!(
            FileKind::from_prodos(0xff, 0x0000),
            Some(FileKind::Binary { load_address: 0x2000 })
        );
        assert_eq!(FileKind::from_prodos(0x00, 0), None);
        assert_eq!(FileKind::from_prodos(0xfa, 0), None);
    }

    #[test]
    fn text_with_high_bits() {
        let tables = Tables::builtin().unwrap();
        let kind = FileKind::Text { strip_high_bit: true };
        let preview = render(tables, kind, &[0xc8, 0xc9, 0x8d]);
        assert_eq!(preview.listing, "HI\r");
        assert_eq!(preview.hex, None);
    }

    #[test]
    fn source_text_is_mac_roman() {
        let tables = Tables::builtin().unwrap();
        let kind = FileKind::from_prodos(0xb0, 0).unwrap();
        let preview = render(tables, kind, &[0x41, 0x8e, 0xe9, 0xa5]);
        assert_eq!(preview.listing, "A\u{e9}\u{c8}\u{2022}");
        let teach = FileKind::from_prodos(0x50, 0x5445).unwrap();
        let quoted = render(tables, teach, &[0xd2, 0xd3]).listing;
        assert_eq!(quoted, "\u{201c}\u{201d}");
    }

    #[test]
    fn binary_failure_keeps_hex_view() {
        let tables = Tables::builtin().unwrap();
        let kind = FileKind::Binary { load_address: 0x0300 };
        let preview = render(tables, kind, &[0xea, 0x4c, 0x00]);
        assert_eq!(preview.listing, "$0300:   EA          NOP\n");
        assert_eq!(preview.hex.as_deref(), Some("0300:EA 4C 00 \n"));
        assert!(matches!(
            preview.error,
            Some(ListingError::TruncatedInstruction { address: 0x0301, .. })
        ));
    }

    #[test]
    fn applesoft_has_no_hex_view() {
        let tables = Tables::builtin().unwrap();
        let program = [0x07, 0x08, 0x0a, 0x00, 0x80, 0x00, 0x00, 0x00];
        let preview = render(tables, FileKind::AppleSoft, &program);
        assert_eq!(preview.listing, " 10  END \n");
        assert_eq!(preview.hex, None);
        assert_eq!(preview.error, None);
    }
}

//===========================================================================//
