//! Fixed-width hex dumps of binary data.

use std::fmt::Write;

//===========================================================================//

/// The number of bytes shown on each row of a hex dump.
pub const BYTES_PER_ROW: usize = 16;

/// Formats `buffer` as rows of up to sixteen bytes.  Each row starts with
/// the four-digit address of its first byte (assuming the buffer is loaded at
/// `start_address`) and a colon, followed by each byte in hex with a space
/// after it.  The final row holds only the leftover bytes and is not padded.
pub fn hex_dump(buffer: &[u8], start_address: u32) -> String {
    let mut dump = String::with_capacity(
        buffer.len().div_ceil(BYTES_PER_ROW) * (6 + 3 * BYTES_PER_ROW),
    );
    let mut address = start_address;
    for row in buffer.chunks(BYTES_PER_ROW) {
        let _ = write!(dump, "{address:04X}:");
        for byte in row {
            let _ = write!(dump, "{byte:02X} ");
        }
        dump.push('\n');
        address = address.wrapping_add(BYTES_PER_ROW as u32);
    }
    dump
}

//===========================================================================//


//===========================================================================//
