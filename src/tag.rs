//! Identifier-octet vocabulary: tag classes and the recognized Universal
//! tags.
//!
//! Reference: ITU-T X.690, Section 8.1.2

use core::fmt;

use derive_try_from_primitive::TryFromPrimitive;

/// Tag class, from bits 7-6 of the leading identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Universal (0b00)
    Universal,
    /// Application (0b01)
    Application,
    /// Context-specific (0b10)
    ContextSpecific,
    /// Private (0b11)
    Private,
}

impl Class {
    /// Parse tag class from the upper 2 bits of an identifier octet.
    pub const fn from_bits(byte: u8) -> Self {
        match byte & 0b11_000000 {
            0b00_000000 => Class::Universal,
            0b01_000000 => Class::Application,
            0b10_000000 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Universal => write!(f, "UNIVERSAL"),
            Class::Application => write!(f, "APPLICATION"),
            Class::ContextSpecific => write!(f, "CONTEXT-SPECIFIC"),
            Class::Private => write!(f, "PRIVATE"),
        }
    }
}

/// Universal tag numbers recognized by the value decoders.
///
/// Tokens of any other Universal tag, or of a non-Universal class, are still
/// surfaced by the decoder; they just carry no interpretation here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
#[rustfmt::skip]
pub enum UniversalTag {
  Bool            =  1,
  Int             =  2,
  BitString       =  3,
  OctetString     =  4,
  Null            =  5,
  Oid             =  6,
  Utf8String      = 12,
  Sequence        = 16,
  Set             = 17,
  PrintableString = 19,
  T61String       = 20,
  Ia5String       = 22,
  UtcTime         = 23,
  GeneralizedTime = 24,
  VisibleString   = 26,
}

impl UniversalTag {
    /// Stable short name, suitable for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            UniversalTag::Bool => "BOOL",
            UniversalTag::Int => "INT",
            UniversalTag::BitString => "BITSTRING",
            UniversalTag::OctetString => "OCTETSTRING",
            UniversalTag::Null => "NULL",
            UniversalTag::Oid => "OID",
            UniversalTag::Utf8String => "UTF8STRING",
            UniversalTag::Sequence => "SEQUENCE",
            UniversalTag::Set => "SET",
            UniversalTag::PrintableString => "PRINTABLESTRING",
            UniversalTag::T61String => "T61STRING",
            UniversalTag::Ia5String => "IA5STRING",
            UniversalTag::UtcTime => "UTCTIME",
            UniversalTag::GeneralizedTime => "GENERALIZEDTIME",
            UniversalTag::VisibleString => "VISIBLESTRING",
        }
    }
}

impl fmt::Display for UniversalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable name for a (class, tag) pair.
///
/// Recognized Universal tags map to their short name, any other Universal
/// tag to `"UNKNOWN"`. Non-Universal classes carry no tag vocabulary and map
/// to `"INVALID CLASS"`.
pub fn type_name(class: Class, tag: u32) -> &'static str {
    if class != Class::Universal {
        return "INVALID CLASS";
    }
    match UniversalTag::try_from(tag) {
        Ok(tag) => tag.name(),
        Err(_) => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_bits() {
        assert_eq!(Class::from_bits(0x30), Class::Universal);
        assert_eq!(Class::from_bits(0x60), Class::Application);
        assert_eq!(Class::from_bits(0xA0), Class::ContextSpecific);
        assert_eq!(Class::from_bits(0xC1), Class::Private);
    }

    #[test]
    fn test_universal_tag_from_number() {
        assert_eq!(UniversalTag::try_from(2u32), Ok(UniversalTag::Int));
        assert_eq!(UniversalTag::try_from(16u32), Ok(UniversalTag::Sequence));
        assert_eq!(UniversalTag::try_from(26u32), Ok(UniversalTag::VisibleString));
        assert!(UniversalTag::try_from(7u32).is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(Class::Universal, 16), "SEQUENCE");
        assert_eq!(type_name(Class::Universal, 23), "UTCTIME");
        assert_eq!(type_name(Class::Universal, 9), "UNKNOWN");
        assert_eq!(type_name(Class::ContextSpecific, 0), "INVALID CLASS");
    }
}
