//! EPC text/hex conversions.
//!
//! Tags are addressed by their EPC rendered as uppercase hex. Client
//! payloads may instead be free text; [`text_to_hex`] maps text onto the
//! EPC memory bank with Gen2 word alignment (the air interface writes
//! 16-bit words, so encoded data is padded to a multiple of 4 hex digits).

/// Render raw bytes as an uppercase, zero-padded hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Parse a hex string into bytes.
///
/// Returns `None` for odd-length input or non-hex characters.
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}

/// Encode text as EPC hex: two uppercase hex digits per byte, right-padded
/// with `'0'` until the length is a multiple of 4 (Gen2 word alignment).
pub fn text_to_hex(text: &str) -> String {
    let mut hex = bytes_to_hex(text.as_bytes());
    while !hex.is_empty() && hex.len() % 4 != 0 {
        hex.push('0');
    }
    hex
}

/// Decode EPC hex back to text, keeping only printable ASCII (32..=126).
///
/// Lossy for non-printable content, exact for printable ASCII; running the
/// output through the decoder again is a no-op.
pub fn hex_to_text(hex: &str) -> String {
    hex.as_bytes()
        .chunks_exact(2)
        .filter_map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .filter(|b| (32..=126).contains(b))
        .map(|b| b as char)
        .collect()
}
