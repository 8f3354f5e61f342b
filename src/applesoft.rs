//! Facilities for listing tokenized AppleSoft BASIC programs.
//!
//! A program image is a linked list of line records.  Each record holds a
//! little-endian link (the absolute address of the next record, or zero at
//! the end of the program), a little-endian line number, and the line's
//! bytes, terminated by a zero byte.  Bytes of 128 and above are keyword
//! tokens; anything else is a literal character.

use crate::error::{ListingError, PartialListing};
use crate::table::{MIN_TOKEN, TokenDictionary};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Write;

//===========================================================================//

/// The address at which AppleSoft programs are loaded.  Line links are
/// absolute addresses, so they are rebased against this.
pub const LOAD_ADDRESS: u16 = 0x0801;

/// The size of a line record header (the link and the line number).
const HEADER_SIZE: usize = 4;

/// The text emitted in place of a token that has no keyword.
const UNKNOWN_TOKEN_TEXT: &str = " ERROR ";

//===========================================================================//

/// A single line of a BASIC program, as stored in the program image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BasicLine<'a> {
    /// The buffer offset of the line record.
    pub offset: usize,
    /// The BASIC line number.
    pub line_number: u16,
    /// The line's token and character bytes, without the terminating zero.
    pub tokens: &'a [u8],
}

impl BasicLine<'_> {
    /// Renders this line (including a trailing newline) onto `out`.  Tokens
    /// missing from `dict` are rendered as `" ERROR "`.
    pub fn render_into(&self, dict: &TokenDictionary, out: &mut String) {
        let _ = write!(out, " {} ", self.line_number);
        for &byte in self.tokens {
            if byte >= MIN_TOKEN {
                match dict.lookup(byte) {
                    Some(keyword) => {
                        out.push(' ');
                        out.push_str(keyword);
                        out.push(' ');
                    }
                    None => {
                        log::debug!(
                            "line {}: no keyword for token {byte}",
                            self.line_number
                        );
                        out.push_str(UNKNOWN_TOKEN_TEXT);
                    }
                }
            } else {
                out.push(char::from(byte));
            }
        }
        out.push('\n');
    }
}

//===========================================================================//

enum ScanState {
    Scanning(usize),
    Failed(ListingError),
    Done,
}

/// An iterator over the lines of a tokenized BASIC program image, following
/// the chain of line links from the start of the buffer.
///
/// Every link must point strictly forward within the buffer, so iteration
/// always terminates.  After yielding an error, the iterator yields nothing
/// more.
pub struct ProgramLines<'a> {
    buffer: &'a [u8],
    state: ScanState,
}

impl<'a> ProgramLines<'a> {
    /// Creates an iterator over the lines of the program in `buffer`.
    pub fn new(buffer: &'a [u8]) -> ProgramLines<'a> {
        ProgramLines { buffer, state: ScanState::Scanning(0) }
    }

    fn read_u16(&self, offset: usize) -> Result<u16, ListingError> {
        match self.buffer.get(offset..offset + 2) {
            Some(bytes) => Ok(LittleEndian::read_u16(bytes)),
            None => Err(ListingError::TruncatedProgram { offset }),
        }
    }

    fn scan_line(
        &self,
        offset: usize,
    ) -> Result<Option<(BasicLine<'a>, ScanState)>, ListingError> {
        let link = self.read_u16(offset)?;
        if link == 0 {
            return Ok(None);
        }
        let line_number = self.read_u16(offset + 2)?;
        let body = self
            .buffer
            .get(offset + HEADER_SIZE..)
            .ok_or(ListingError::TruncatedProgram { offset })?;
        let length = body
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(ListingError::TruncatedProgram { offset })?;
        let line = BasicLine { offset, line_number, tokens: &body[..length] };
        let next = match link.checked_sub(LOAD_ADDRESS) {
            Some(next) if usize::from(next) > offset => {
                ScanState::Scanning(usize::from(next))
            }
            _ => ScanState::Failed(ListingError::InvalidLineLink {
                offset,
                link,
            }),
        };
        Ok(Some((line, next)))
    }
}

impl<'a> Iterator for ProgramLines<'a> {
    type Item = Result<BasicLine<'a>, ListingError>;

    fn next(&mut self) -> Option<Result<BasicLine<'a>, ListingError>> {
        match std::mem::replace(&mut self.state, ScanState::Done) {
            ScanState::Done => None,
            ScanState::Failed(error) => Some(Err(error)),
            ScanState::Scanning(offset) => match self.scan_line(offset) {
                Ok(None) => None,
                Ok(Some((line, next))) => {
                    self.state = next;
                    Some(Ok(line))
                }
                Err(error) => Some(Err(error)),
            },
        }
    }
}

impl std::iter::FusedIterator for ProgramLines<'_> {}

//===========================================================================//

/// Produces a textual listing of the tokenized AppleSoft program in
/// `buffer`, which is assumed to be loaded at [`LOAD_ADDRESS`].
///
/// Each line is rendered as its line number surrounded by spaces, followed
/// by its contents, with keywords surrounded by spaces.  Tokens that have no
/// keyword are rendered as `" ERROR "` without stopping.  If the chain of
/// line links is broken, the error carries the lines rendered so far.
pub fn detokenize(
    dict: &TokenDictionary,
    buffer: &[u8],
) -> Result<String, PartialListing> {
    let mut listing = String::new();
    let mut count = 0usize;
    for result in ProgramLines::new(buffer) {
        match result {
            Ok(line) => {
                line.render_into(dict, &mut listing);
                count += 1;
            }
            Err(error) => {
                log::warn!("BASIC listing stopped after {count} lines: {error}");
                return Err(PartialListing { listing, error });
            }
        }
    }
    log::debug!("detokenized {count} lines from {} bytes", buffer.len());
    Ok(listing)
}

//===========================================================================//


//===========================================================================//
