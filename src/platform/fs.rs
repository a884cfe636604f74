// HerdImport - platform/fs.rs
//
// Input reading. Pasted text may come from a file or from stdin; both are
// decoded lossily so a stray Latin-1 byte never aborts a batch.

use std::io::{self, Read};
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(bytes))
}

/// Read everything from a reader (stdin in practice) as a string.
pub fn read_reader_lossy<R: Read>(mut reader: R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode_lossy(bytes))
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(
                valid_up_to = e.utf8_error().valid_up_to(),
                "Input is not valid UTF-8; decoding lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
