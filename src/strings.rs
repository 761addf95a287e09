//! Restricted character string validation and copying.
//!
//! Reference: ITU-T X.690, Section 8.23; ITU-T X.680, Section 41

use crate::{Error, Token, UniversalTag};

fn valid_printable(data: &[u8]) -> bool {
    data.iter().all(|&byte| match byte {
        b' ' => true,
        b'*' | b';' | b'<' | b'>' | b'@' => false,
        0x27..=0x7A => true,
        _ => false,
    })
}

/// IA5String, VisibleString and T61String are all restricted to the
/// printable ASCII range. For IA5 and T61 this is deliberately narrower
/// than the standard: control bytes and T61 code-page shift sequences are
/// not negotiable content for certificate fields.
fn valid_ascii(data: &[u8]) -> bool {
    data.iter().all(|&byte| (0x20..=0x7F).contains(&byte))
}

/// Two-state UTF-8 well-formedness check.
///
/// Leading bytes 0xC2..=0xCF open a two-byte sequence; 0xD0..=0xF4 open a
/// sequence of `(byte >> 4) - 0xC + 1` bytes; 0x80..=0xC1 are stray
/// continuations or over-long leads and rejected outright. The lead ranges
/// are coarser than RFC 3629: surrogate encodings slip through, code points
/// above U+10FFFF do not.
fn valid_utf8(data: &[u8]) -> bool {
    let mut continuation = 0u8;
    for &byte in data {
        if continuation > 0 {
            if !(0x80..=0xBF).contains(&byte) {
                return false;
            }
            continuation -= 1;
        } else if byte < 0x80 {
            // ASCII
        } else if (0xC2..=0xCF).contains(&byte) {
            continuation = 1;
        } else if (0xD0..=0xF4).contains(&byte) {
            continuation = (byte >> 4) - 0xC;
        } else {
            return false;
        }
    }
    // Input ending mid-sequence is truncated, not well-formed.
    continuation == 0
}

fn validate(token: &Token<'_>) -> Result<(), Error> {
    let valid = match token.universal() {
        Some(UniversalTag::PrintableString) => valid_printable(token.data),
        Some(UniversalTag::Ia5String | UniversalTag::VisibleString | UniversalTag::T61String) => {
            valid_ascii(token.data)
        }
        Some(UniversalTag::Utf8String) => valid_utf8(token.data),
        _ => return Err(Error::Invalid),
    };
    if valid { Ok(()) } else { Err(Error::Invalid) }
}

impl<'i> Token<'i> {
    /// Validate a character string token against its tag's charset and copy
    /// the content into `out`.
    pub fn string<'b>(&self, out: &'b mut [u8]) -> Result<&'b [u8], Error> {
        validate(self)?;
        if out.len() < self.data.len() {
            return Err(Error::Memory);
        }
        let out = &mut out[..self.data.len()];
        out.copy_from_slice(self.data);
        Ok(out)
    }

    /// Validate, then compare the content against `expected`. False on any
    /// mismatch, including invalid content or a non-string tag.
    pub fn string_eq(&self, expected: &[u8]) -> bool {
        validate(self).is_ok() && self.data == expected
    }
}
