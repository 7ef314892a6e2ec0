//! Score export ingestion: decoding, decimal-comma normalization, parsing,
//! and the wide-to-long pivot.

pub mod normalize;
pub mod parser;
pub mod pivot;

pub use parser::RawRow;
pub use pivot::LongRecord;

use anyhow::Result;

use crate::ingest::normalize::{decode_text, normalize_decimal_commas};
use crate::ingest::parser::parse_rows;
use crate::ingest::pivot::pivot_rows;

/// Turns the raw bytes of one export into long records.
///
/// # Errors
///
/// Returns an error if the body is not UTF-8 or is not a readable delimited file.
pub fn ingest_source(bytes: &[u8]) -> Result<Vec<LongRecord>> {
    let text = normalize_decimal_commas(decode_text(bytes)?);
    let rows = parse_rows(&text)?;
    Ok(pivot_rows(&rows))
}
