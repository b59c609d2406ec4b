// src/hex_codec.rs
//! Display formatting for raw byte fields (serial numbers, record types,
//! identifiers and payloads).

/// Renders bytes the way tag fields are shown to users.
///
/// A single byte becomes `0xHH`, anything longer becomes colon separated
/// groups (`HH:HH:HH`), and an empty slice becomes an empty string.
pub fn encode(bytes: &[u8]) -> String {
    match bytes {
        [byte] => format!("0x{}", hex::encode_upper([*byte])),
        _ => bytes
            .iter()
            .map(|byte| hex::encode_upper([*byte]))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

/// Parses user supplied hex for draft editing. Accepts the output of
/// [`encode`] as well as plain runs of hex digits.
pub fn parse(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let digits: String = trimmed
        .chars()
        .filter(|c| *c != ':' && !c.is_whitespace())
        .collect();

    hex::decode(digits)
}
