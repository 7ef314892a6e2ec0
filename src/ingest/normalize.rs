use anyhow::{Context, Result};

/// Decodes a source body as UTF-8, dropping a leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).context("source is not valid UTF-8")?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Rewrites every decimal comma in the body to a decimal point.
///
/// Applied to the whole text before field splitting. This only holds because
/// fields are separated by `;`: any comma inside a text field is rewritten too.
pub fn normalize_decimal_commas(text: &str) -> String {
    text.replace(',', ".")
}
