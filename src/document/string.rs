//! Character strings.

use std::fmt;
use std::convert::Infallible;
use bcder::{Captured, Tag};
use bcder::decode::DecodeError;


//------------ StringKind ----------------------------------------------------

/// The ASN.1 string type a string value was encoded as.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StringKind {
    Utf8,
    Printable,
    Teletex,
    Universal,
    Bmp,
    Ia5,
    Visible,
    Numeric,
}

impl StringKind {
    /// Returns the kind for a universal tag if it is a string tag.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        if tag == Tag::UTF8_STRING { Some(StringKind::Utf8) }
        else if tag == Tag::PRINTABLE_STRING { Some(StringKind::Printable) }
        else if tag == Tag::TELETEX_STRING { Some(StringKind::Teletex) }
        else if tag == Tag::UNIVERSAL_STRING { Some(StringKind::Universal) }
        else if tag == Tag::BMP_STRING { Some(StringKind::Bmp) }
        else if tag == Tag::IA5_STRING { Some(StringKind::Ia5) }
        else if tag == Tag::VISIBLE_STRING { Some(StringKind::Visible) }
        else if tag == Tag::NUMERIC_STRING { Some(StringKind::Numeric) }
        else { None }
    }

    /// Returns the name used for a node holding a string of this kind.
    pub fn field_name(self) -> &'static str {
        match self {
            StringKind::Utf8 => "utf8String",
            StringKind::Printable => "printableString",
            StringKind::Teletex => "teletexString",
            StringKind::Universal => "universalString",
            StringKind::Bmp => "bmpString",
            StringKind::Ia5 => "ia5String",
            StringKind::Visible => "visibleString",
            StringKind::Numeric => "numericString",
        }
    }

    /// Converts the content octets of a string of this kind.
    ///
    /// Returns `None` if the octets aren’t valid for the kind.
    fn convert(self, octets: &[u8]) -> Option<String> {
        match self {
            StringKind::Utf8 => {
                String::from_utf8(octets.to_vec()).ok()
            }
            StringKind::Printable => {
                ascii(octets, is_printable)
            }
            StringKind::Ia5 => {
                ascii(octets, |ch| ch.is_ascii())
            }
            StringKind::Visible => {
                ascii(octets, |ch| (b' '..=b'~').contains(&ch))
            }
            StringKind::Numeric => {
                ascii(octets, |ch| ch == b' ' || ch.is_ascii_digit())
            }
            StringKind::Teletex => {
                // Treated as Latin-1 like everybody else does.
                Some(octets.iter().map(|&ch| char::from(ch)).collect())
            }
            StringKind::Bmp => {
                if octets.len() % 2 != 0 {
                    return None
                }
                char::decode_utf16(
                    octets.chunks(2).map(|pair| {
                        u16::from_be_bytes([pair[0], pair[1]])
                    })
                ).collect::<Result<String, _>>().ok()
            }
            StringKind::Universal => {
                if octets.len() % 4 != 0 {
                    return None
                }
                octets.chunks(4).map(|quad| {
                    char::from_u32(u32::from_be_bytes(
                        [quad[0], quad[1], quad[2], quad[3]]
                    ))
                }).collect()
            }
        }
    }
}

fn ascii(octets: &[u8], allowed: impl Fn(u8) -> bool) -> Option<String> {
    if octets.iter().all(|&ch| allowed(ch)) {
        Some(octets.iter().map(|&ch| char::from(ch)).collect())
    }
    else {
        None
    }
}

fn is_printable(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(
        ch,
        b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/'
        | b':' | b'=' | b'?'
    )
}


//------------ StringValue ---------------------------------------------------

/// A decoded character string and the type it was encoded as.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StringValue {
    kind: StringKind,
    value: String,
}

impl StringValue {
    /// Creates a string value from the content octets of a string.
    ///
    /// Returns `None` if the octets are not valid for the kind.
    pub fn from_content(kind: StringKind, octets: &[u8]) -> Option<Self> {
        kind.convert(octets).map(|value| StringValue { kind, value })
    }

    /// Decodes a string value from a captured primitive string value.
    ///
    /// Returns `None` if the value isn’t a primitively encoded string of
    /// a known type or if its content is invalid for its type.
    pub fn from_captured(captured: &Captured) -> Option<Self> {
        let res: Result<_, DecodeError<Infallible>> = captured.clone().decode(
            |cons| cons.take_value(|tag, content| {
                let octets = content.as_primitive()?.take_all()?;
                Ok(StringKind::from_tag(tag).and_then(|kind| {
                    Self::from_content(kind, octets.as_ref())
                }))
            })
        );
        res.ok().flatten()
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}


//--- AsRef, Display

impl AsRef<str> for StringValue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}


//============ Tests =========================================================
