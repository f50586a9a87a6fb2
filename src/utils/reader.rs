//! Export file reading with automatic decompression.
//!
//! Directory exports are often archived compressed; `.gz` and `.zst` files
//! are decompressed on the fly so they can be analyzed directly.
//!
//! # Examples
//!
//! ```no_run
//! use ad_risk_audit::utils::reader::read_export_text;
//!
//! let text = read_export_text("ad_users.csv.gz").unwrap();
//! println!("{} bytes", text.len());
//! ```

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Opens a file, decompressing by extension.
///
/// - `.gz` → Gzip
/// - `.zst` → Zstandard
/// - anything else → plain file
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "gz" => Ok(Box::new(GzDecoder::new(file))),
        "zst" => {
            let decoder = zstd::Decoder::new(file).with_context(|| {
                format!("Failed to create zstd decoder for: {}", path.display())
            })?;
            Ok(Box::new(decoder))
        }
        _ => Ok(Box::new(file)),
    }
}

/// Reads a whole export as UTF-8 text, dropping a leading byte-order mark.
///
/// PowerShell's `Export-Csv` writes a BOM by default, which would otherwise
/// end up in the first header name.
pub fn read_export_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut reader = open_file(path)?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    let text = String::from_utf8(bytes)
        .with_context(|| format!("Export is not valid UTF-8: {}", path.display()))?;

    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
