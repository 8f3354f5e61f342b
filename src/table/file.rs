use super::opcode::{OpcodeEntry, OpcodeTable};
use super::token::{MIN_TOKEN, TokenDictionary};
use crate::dis::m65c02::AddrMode;
use crate::error::TableError;
use crate::parse::{
    AddrModeAst, OpcodeEntryAst, ParseError, SrcSpan, TableDirectiveAst,
    TableFileAst, TokenEntryAst,
};
use std::collections::BTreeMap;

//===========================================================================//

const NUM_OPCODES: usize = 256;

//===========================================================================//

/// The validated contents of a table file.  A file may hold an opcode table,
/// a token dictionary, or both.
#[derive(Debug, Default)]
pub struct TableFile {
    /// The table from the `.OPCODES` block, if any.
    pub opcodes: Option<OpcodeTable>,
    /// The dictionary from the `.TOKENS` block, if any.
    pub tokens: Option<TokenDictionary>,
}

impl TableFile {
    /// Parses and validates table-file source text.  All problems found are
    /// reported together.
    pub fn parse_source(source: &str) -> Result<TableFile, TableError> {
        let ast =
            TableFileAst::parse_source(source).map_err(TableError::Parse)?;
        let mut builder = TableBuilder::new();
        for directive in ast.directives {
            builder.visit_directive(directive);
        }
        builder.finish()
    }
}

//===========================================================================//

struct TableBuilder {
    opcodes: Option<(SrcSpan, OpcodeTable)>,
    tokens: Option<(SrcSpan, TokenDictionary)>,
    errors: Vec<ParseError>,
}

impl TableBuilder {
    fn new() -> TableBuilder {
        TableBuilder { opcodes: None, tokens: None, errors: Vec::new() }
    }

    fn finish(self) -> Result<TableFile, TableError> {
        if self.errors.is_empty() {
            Ok(TableFile {
                opcodes: self.opcodes.map(|(_, table)| table),
                tokens: self.tokens.map(|(_, dict)| dict),
            })
        } else {
            Err(TableError::Parse(self.errors))
        }
    }

    fn visit_directive(&mut self, dir_ast: TableDirectiveAst) {
        match dir_ast {
            TableDirectiveAst::Opcodes(span, entries) => {
                if let Some((prev_span, _)) = self.opcodes {
                    self.duplicate_block_error(".OPCODES", span, prev_span);
                } else if let Some(table) =
                    self.visit_opcodes_dir(span, entries)
                {
                    self.opcodes = Some((span, table));
                }
            }
            TableDirectiveAst::Tokens(span, entries) => {
                if let Some((prev_span, _)) = self.tokens {
                    self.duplicate_block_error(".TOKENS", span, prev_span);
                } else {
                    let dict = self.visit_tokens_dir(entries);
                    self.tokens = Some((span, dict));
                }
            }
        }
    }

    fn visit_opcodes_dir(
        &mut self,
        dir_span: SrcSpan,
        entries: Vec<OpcodeEntryAst>,
    ) -> Option<OpcodeTable> {
        let mut slots: Vec<Option<(SrcSpan, Option<OpcodeEntry>)>> =
            vec![None; NUM_OPCODES];
        for entry in entries {
            let (opcode_span, value) = entry.opcode;
            let Some(opcode) = u8::try_from(value).ok() else {
                let message =
                    format!("opcode {value} is out of range (0 to 255)");
                self.errors.push(ParseError::new(opcode_span, message));
                continue;
            };
            let index = usize::from(opcode);
            if let Some((prev_span, _)) = slots[index] {
                let message = format!("opcode ${opcode:02X} is listed twice");
                self.errors.push(
                    ParseError::new(opcode_span, message).with_label(
                        prev_span,
                        "previously listed here".to_string(),
                    ),
                );
                continue;
            }
            let definition = match entry.def {
                None => None,
                Some(def) => {
                    let Some(mode) = self.addr_mode(&def.mode) else {
                        continue;
                    };
                    let (mnemonic_span, mnemonic) = def.mnemonic;
                    if mnemonic.is_empty() {
                        let message = "mnemonic must not be empty".to_string();
                        self.errors.push(ParseError::new(mnemonic_span, message));
                        continue;
                    }
                    let (length_span, length) = def.length;
                    match OpcodeEntry::new(mnemonic, length, mode) {
                        Some(definition) => Some(definition),
                        None => {
                            let message = format!(
                                "opcode ${opcode:02X} with {mode} addressing \
                                 must be {} bytes long, not {length}",
                                1 + mode.operand_size()
                            );
                            self.errors
                                .push(ParseError::new(length_span, message));
                            continue;
                        }
                    }
                }
            };
            slots[index] = Some((opcode_span, definition));
        }
        let missing: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
            .collect();
        if !missing.is_empty() {
            let message = format!(
                "opcode table is missing {} of {NUM_OPCODES} opcodes \
                 (first missing: ${:02X})",
                missing.len(),
                missing[0]
            );
            self.errors.push(ParseError::new(dir_span, message));
            return None;
        }
        let entries: Vec<Option<OpcodeEntry>> = slots
            .into_iter()
            .map(|slot| slot.and_then(|(_, definition)| definition))
            .collect();
        let entries: Box<[Option<OpcodeEntry>; NUM_OPCODES]> =
            entries.into_boxed_slice().try_into().ok()?;
        Some(OpcodeTable::from_entries(entries))
    }

    fn addr_mode(&mut self, mode_ast: &AddrModeAst) -> Option<AddrMode> {
        let mode = match mode_ast {
            AddrModeAst::Name(_, name) => AddrMode::from_name(name),
            AddrModeAst::Id(_, id) => AddrMode::from_id(*id),
        };
        if mode.is_none() {
            let message = match mode_ast {
                AddrModeAst::Name(_, name) => {
                    format!("unknown addressing mode: {name}")
                }
                AddrModeAst::Id(_, id) => {
                    format!("addressing mode ID {id} is out of range (0 to 15)")
                }
            };
            self.errors.push(ParseError::new(mode_ast.span(), message));
        }
        mode
    }

    fn visit_tokens_dir(
        &mut self,
        entries: Vec<TokenEntryAst>,
    ) -> TokenDictionary {
        let mut keywords = BTreeMap::<u8, String>::new();
        let mut spans = BTreeMap::<u8, SrcSpan>::new();
        for entry in entries {
            let (code_span, value) = entry.code;
            let code = match u8::try_from(value) {
                Ok(code) if code >= MIN_TOKEN => code,
                _ => {
                    let message = format!(
                        "token code {value} is out of range ({MIN_TOKEN} to 255)"
                    );
                    self.errors.push(ParseError::new(code_span, message));
                    continue;
                }
            };
            if let Some(&prev_span) = spans.get(&code) {
                let message = format!("token {code} is listed twice");
                self.errors.push(
                    ParseError::new(code_span, message).with_label(
                        prev_span,
                        "previously listed here".to_string(),
                    ),
                );
                continue;
            }
            let (keyword_span, keyword) = entry.keyword;
            if keyword.is_empty() {
                let message = "keyword must not be empty".to_string();
                self.errors.push(ParseError::new(keyword_span, message));
                continue;
            }
            spans.insert(code, code_span);
            keywords.insert(code, keyword);
        }
        TokenDictionary::from_keywords(keywords)
    }

    fn duplicate_block_error(
        &mut self,
        name: &str,
        span: SrcSpan,
        prev_span: SrcSpan,
    ) {
        let message = format!("duplicate {name} block");
        self.errors.push(
            ParseError::new(span, message)
                .with_label(prev_span, "previous block was here".to_string()),
        );
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::TableFile;
    use crate::error::TableError;
    use crate::parse::ParseError;

    fn opcodes_source(overrides: &[&str]) -> String {
        let mut source = ".OPCODES {\n".to_string();
        for opcode in 0..=255u8 {
            let prefix = format!("${opcode:02X}:");
            match overrides.iter().find(|line| line.starts_with(&prefix)) {
                Some(line) => source.push_str(line),
                None => source.push_str(&format!("{prefix} \"NOP\", 1, 10")),
            }
            source.push('\n');
        }
        source.push_str("}\n");
        source
    }

    fn errors(source: &str) -> Vec<String> {
        match TableFile::parse_source(source) {
            Err(TableError::Parse(errors)) => {
                errors.into_iter().map(|error: ParseError| error.message).collect()
            }
            other => panic!("expected parse errors, got {other:?}"),
        }
    }

    #[test]
    fn complete_table_with_undefined_opcode() {
        let file =
            TableFile::parse_source(&opcodes_source(&["$02: undefined"]))
                .unwrap();
        let table = file.opcodes.unwrap();
        assert!(file.tokens.is_none());
        assert_eq!(table.num_defined(), 255);
        assert!(table.lookup(0x02).is_none());
        assert_eq!(table.lookup(0x03).unwrap().mnemonic(), "NOP");
    }

    #[test]
    fn both_blocks_in_one_file() {
        let source = format!("{}\n.TOKENS {{\n200: \"+\"\n}}\n", opcodes_source(&[]));
        let file = TableFile::parse_source(&source).unwrap();
        assert!(file.opcodes.is_some());
        assert_eq!(file.tokens.unwrap().lookup(200), Some("+"));
    }

    #[test]
    fn missing_opcodes() {
        assert_eq!(
            errors(".OPCODES {\n$00: \"BRK\", 1, implied\n}\n"),
            vec!["opcode table is missing 255 of 256 opcodes (first missing: $01)"]
        );
    }

    #[test]
    fn bad_opcode_entries() {
        let source = opcodes_source(&[
            "$A9: \"LDA\", 3, immediate",
            "$AD: \"LDA\", 3, absolutely",
            "$EA: \"\", 1, implied",
        ]);
        assert_eq!(
            errors(&source),
            vec![
                "opcode $A9 with immediate addressing must be 2 bytes long, \
                 not 3",
                "unknown addressing mode: absolutely",
                "mnemonic must not be empty",
                "opcode table is missing 3 of 256 opcodes (first missing: $A9)",
            ]
        );
    }

    #[test]
    fn duplicate_and_out_of_range_opcodes() {
        let mut source = opcodes_source(&[]);
        source = source.replace("}\n", "$EA: \"NOP\", 1, implied\n$100: undefined\n}\n");
        assert_eq!(
            errors(&source),
            vec![
                "opcode $EA is listed twice",
                "opcode 256 is out of range (0 to 255)",
            ]
        );
    }

    #[test]
    fn bad_mode_id() {
        let source = opcodes_source(&["$EA: \"NOP\", 1, 16"]);
        assert_eq!(
            errors(&source),
            vec![
                "addressing mode ID 16 is out of range (0 to 15)",
                "opcode table is missing 1 of 256 opcodes (first missing: $EA)",
            ]
        );
    }

    #[test]
    fn bad_token_entries() {
        let source =
            ".TOKENS {\n127: \"NOPE\"\n128: \"END\"\n128: \"AGAIN\"\n129: \"\"\n}\n";
        assert_eq!(
            errors(source),
            vec![
                "token code 127 is out of range (128 to 255)",
                "token 128 is listed twice",
                "keyword must not be empty",
            ]
        );
    }

    #[test]
    fn duplicate_blocks() {
        let source = ".TOKENS {\n}\n.TOKENS {\n}\n";
        assert_eq!(errors(source), vec!["duplicate .TOKENS block"]);
    }
}

//===========================================================================//
