//! Hex/UTF-8 codec for message payloads carried in the transaction data field.
//!
//! The entire payload field is the message: no length prefix, no framing,
//! no checksum. A payload that fails to clean up into non-empty text is a
//! routine skip, not an error.

/// Decode a raw transaction payload into message text.
///
/// Strips a leading `0x`, drops every character outside the hex alphabet,
/// left-pads odd-length input with a single zero digit, then decodes the
/// byte pairs as UTF-8 with invalid sequences dropped. Returns `None` when
/// the cleaned hex is shorter than one byte or the decoded text is
/// whitespace-only.
pub fn decode_payload(raw: &str) -> Option<String> {
    let stripped = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    let mut cleaned: String = stripped.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    if cleaned.len() % 2 != 0 {
        cleaned.insert(0, '0');
    }
    if cleaned.len() < 2 {
        return None;
    }

    let bytes: Vec<u8> = cleaned
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            // Both characters are hex digits after the filter above.
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
            let lo = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
            (hi << 4) | lo
        })
        .collect();

    // Invalid byte sequences are dropped rather than surfaced as
    // replacement characters, matching the skip-not-fail contract.
    let text: String = String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();

    if text.trim().is_empty() {
        return None;
    }

    Some(text)
}

/// Encode message text as a `0x`-prefixed hex string of its UTF-8 bytes.
///
/// Exact inverse of [`decode_payload`] for any text that decode can produce.
pub fn encode_payload(text: &str) -> String {
    let mut payload = String::with_capacity(2 + text.len() * 2);
    payload.push_str("0x");
    for byte in text.as_bytes() {
        payload.push_str(&format!("{:02x}", byte));
    }
    payload
}
