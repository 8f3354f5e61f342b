//! Listings of Apple II binary files: 65C02 disassembly, AppleSoft BASIC
//! detokenization, and hex dumps.

#![warn(missing_docs)]

pub mod applesoft;
pub mod dis;
pub mod error;
pub mod hex;
pub mod parse;
pub mod preview;
pub mod table;
