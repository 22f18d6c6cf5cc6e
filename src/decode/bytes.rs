//! Byte reconstruction for capture payload text.
//!
//! The capture agent writes each payload as a JSON string. Bytes that form a
//! valid UTF-8 sequence are copied through literally, everything else is
//! written as a `\u00XX` escape. After JSON decoding, a single character can
//! therefore stand for either one raw byte (code point below 256) or a whole
//! multi-byte UTF-8 run (code point 256 and above).
//!
//! [`reconstruct_bytes`] undoes that mapping. [`encode_text`] is the paired
//! encoder used to produce text that is guaranteed to round-trip.

/// Rebuild the captured bytes from payload text.
///
/// Characters below U+0100 become a single byte with that value; every other
/// character is re-encoded as UTF-8. Total over any input.
pub fn reconstruct_bytes(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let cp = c as u32;
        if cp < 0x100 {
            out.push(cp as u8);
        } else {
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    out
}

/// Length of [`reconstruct_bytes`] output without building it.
pub fn reconstructed_len(text: &str) -> usize {
    text.chars().map(byte_width).sum()
}

fn byte_width(c: char) -> usize {
    if (c as u32) < 0x100 {
        1
    } else {
        c.len_utf8()
    }
}

/// Longest prefix of `text` that reconstructs to at most `len` bytes.
///
/// `None` when the whole text reconstructs to fewer than `len` bytes.
pub fn take_reconstructed(text: &str, len: usize) -> Option<&str> {
    let mut total = 0;
    for (idx, c) in text.char_indices() {
        let width = byte_width(c);
        if total + width > len {
            return Some(&text[..idx]);
        }
        total += width;
    }
    (total >= len).then_some(text)
}

/// Encode raw bytes into payload text the way the capture agent does.
///
/// Valid UTF-8 sequences whose scalar value is U+0100 or above are kept as
/// characters. Any other byte maps to the character with the same code
/// point, which includes two-byte sequences for U+0080..U+00FF: those are
/// emitted byte by byte, otherwise they would reconstruct as one byte.
pub fn encode_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b >= 0x80 {
            if let Some((c, len)) = decode_wide_char(&bytes[i..]) {
                out.push(c);
                i += len;
                continue;
            }
        }
        out.push(char::from(b));
        i += 1;
    }
    out
}

/// Decode one UTF-8 sequence at the start of `bytes` if it is valid and
/// encodes a scalar value of at least U+0100.
fn decode_wide_char(bytes: &[u8]) -> Option<(char, usize)> {
    let len = match bytes[0] {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let seq = bytes.get(..len)?;
    let c = std::str::from_utf8(seq).ok()?.chars().next()?;
    if (c as u32) < 0x100 {
        return None;
    }
    Some((c, len))
}
