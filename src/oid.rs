//! OBJECT IDENTIFIER decoding.
//!
//! Reference: ITU-T X.690, Section 8.19

use core::fmt;

use crate::{Error, Token, UniversalTag};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Fixed capacity of an [`Oid`], in arcs. Plenty for the X.509 namespace.
pub const MAX_ARCS: usize = 16;

/// A decoded object identifier.
///
/// Arcs are stored in a fixed array whose unused tail is zero, so the
/// derived ordering is the lexicographic order of the arc sequences and
/// well-known identifiers can be kept in a sorted table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Oid {
    arcs: [u32; MAX_ARCS],
    len: usize,
}

impl Oid {
    /// Decode the content of an OID token.
    ///
    /// Rejects empty content, a trailing incomplete subidentifier and
    /// non-canonical `0x80` padding. Fails with [`Error::Memory`] when an
    /// arc overflows 32 bits or more than [`MAX_ARCS`] arcs are present.
    pub fn decode(token: &Token<'_>) -> Result<Self, Error> {
        if token.universal() != Some(UniversalTag::Oid) {
            return Err(Error::Invalid);
        }
        let data = token.raw().ok_or(Error::Invalid)?;
        if data[data.len() - 1] & 0x80 != 0 {
            return Err(Error::Invalid);
        }

        let mut oid = Oid { arcs: [0; MAX_ARCS], len: 0 };
        let mut arc: u32 = 0;
        let mut leading = true;
        let mut first = true;

        for &byte in data {
            if leading && byte == 0x80 {
                // Non-canonical padding (X.690 8.19.2).
                return Err(Error::Invalid);
            }
            leading = false;

            if arc > u32::MAX >> 7 {
                return Err(Error::Memory);
            }
            arc = arc << 7 | u32::from(byte & 0x7F);
            if byte & 0x80 != 0 {
                continue;
            }

            if first {
                // The first subidentifier packs two arcs (X.690 8.19.4).
                let root = arc.min(80) / 40;
                oid.push(root)?;
                oid.push(arc - root * 40)?;
                first = false;
            } else {
                oid.push(arc)?;
            }
            arc = 0;
            leading = true;
        }

        Ok(oid)
    }

    /// Build an identifier from explicit arcs, for fixtures and well-known
    /// constants.
    ///
    /// # Panics
    ///
    /// Panics when fewer than 2 or more than [`MAX_ARCS`] arcs are given;
    /// every `Oid` carries at least the two arcs of the first encoded
    /// subidentifier, no matter how it was built.
    pub fn from_arcs(arcs: &[u32]) -> Self {
        assert!(arcs.len() >= 2, "OID with fewer than 2 arcs");
        assert!(arcs.len() <= MAX_ARCS, "OID with more than {MAX_ARCS} arcs");
        let mut oid = Oid { arcs: [0; MAX_ARCS], len: arcs.len() };
        oid.arcs[..arcs.len()].copy_from_slice(arcs);
        oid
    }

    /// The decoded arcs.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs[..self.len]
    }

    fn push(&mut self, arc: u32) -> Result<(), Error> {
        if self.len == MAX_ARCS {
            return Err(Error::Memory);
        }
        self.arcs[self.len] = arc;
        self.len += 1;
        Ok(())
    }
}

impl PartialEq<[u32]> for Oid {
    fn eq(&self, other: &[u32]) -> bool {
        self.arcs() == other
    }
}

impl<const N: usize> PartialEq<[u32; N]> for Oid {
    fn eq(&self, other: &[u32; N]) -> bool {
        self.arcs() == other
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs().iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
        }
        for arc in arcs {
            write!(f, ".{arc}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid(\"{self}\")")
    }
}

#[cfg(feature = "serde")]
impl Serialize for Oid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
