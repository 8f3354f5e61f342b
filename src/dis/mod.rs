//! Facilities for disassembling binary code.

pub mod m65c02;

//===========================================================================//
