//! Converting octet sequences from and into hex strings.

use std::fmt;


/// Encodes an octet sequence as a lower-case hex string.
pub fn encode(src: &[u8]) -> String {
    Hex(src).to_string()
}

/// Decodes a hex string into an octet sequence.
///
/// Both lower and upper case digits are accepted. Returns `None` if the
/// string contains anything else or has an odd number of digits.
pub fn decode(src: &str) -> Option<Vec<u8>> {
    let src = src.as_bytes();
    if src.len() % 2 != 0 {
        return None
    }
    src.chunks(2).map(|pair| {
        Some(decode_digit(pair[0])? << 4 | decode_digit(pair[1])?)
    }).collect()
}

fn decode_digit(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None
    }
}


//------------ Hex -----------------------------------------------------------

/// Displays an octet sequence as lower-case hex digits without separators.
#[derive(Clone, Copy, Debug)]
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in self.0 {
            let digits = encode_u8(ch);
            write!(f, "{}{}", char::from(digits[0]), char::from(digits[1]))?;
        }
        Ok(())
    }
}

fn encode_u8(ch: u8) -> [u8; 2] {
    [DIGITS[usize::from(ch >> 4)], DIGITS[usize::from(ch & 0x0F)]]
}

const DIGITS: &[u8] = b"0123456789abcdef";


//============ Tests =========================================================
