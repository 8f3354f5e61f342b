//! Error types for table loading and listing generation.

use crate::parse::ParseError;
use thiserror::Error;

//===========================================================================//

/// An error that stops a decoder before it reaches the end of its input.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ListingError {
    /// The opcode table has no entry for an opcode byte.
    #[error("unknown opcode ${opcode:02X} at ${address:04X}")]
    UnknownOpcode {
        /// The address of the offending opcode.
        address: u32,
        /// The opcode byte.
        opcode: u8,
    },
    /// The buffer ends partway through an instruction.
    #[error(
        "instruction ${opcode:02X} at ${address:04X} needs {length} bytes, \
         but only {remaining} remain"
    )]
    TruncatedInstruction {
        /// The address of the truncated instruction.
        address: u32,
        /// The instruction's opcode byte.
        opcode: u8,
        /// The declared instruction length.
        length: u32,
        /// The number of bytes left in the buffer, including the opcode.
        remaining: usize,
    },
    /// The buffer ends partway through a BASIC line record, or a line link
    /// points past the end of the buffer.
    #[error("BASIC program is truncated at offset {offset}")]
    TruncatedProgram {
        /// The buffer offset of the record that could not be read.
        offset: usize,
    },
    /// A BASIC line link points below the load address, or does not point
    /// past the line that contains it.
    #[error("line at offset {offset} has an invalid link to ${link:04X}")]
    InvalidLineLink {
        /// The buffer offset of the line containing the link.
        offset: usize,
        /// The absolute link address.
        link: u16,
    },
}

//===========================================================================//

/// The listing text produced before a decoder stopped, together with the
/// reason it stopped.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("listing stopped early: {error}")]
pub struct PartialListing {
    /// The text rendered before the error occurred.
    pub listing: String,
    /// The reason decoding stopped.
    #[source]
    pub error: ListingError,
}

//===========================================================================//

/// An error encountered while loading an opcode table or token dictionary.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    /// The table source is malformed.
    #[error("malformed table: {}", describe_errors(.0))]
    Parse(Vec<ParseError>),
    /// The table source has no block of the required kind.
    #[error("table source has no {0} block")]
    MissingBlock(&'static str),
}

fn describe_errors(errors: &[ParseError]) -> String {
    match errors {
        [] => "unknown error".to_string(),
        [error] => error.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

//===========================================================================//


//===========================================================================//
