//! A `no_std` streaming parser for ASN.1 values encoded under the
//! Distinguished/Basic Encoding Rules (DER/BER), restricted to the
//! definite-length form.
//!
//! The crate walks a nested TLV (Tag-Length-Value) tree over an untrusted
//! byte buffer one token at a time. Nothing is allocated and no content is
//! copied: every [`Token`] borrows its bytes from the caller's input, and
//! nesting is tracked with a fixed-size stack of end-of-parent offsets.
//! Value decoders (OID, INTEGER, BOOLEAN, BIT STRING, restricted character
//! strings, UTCTime) are layered on top of the cursor and only ever read the
//! content bytes of the token handed to them.
//!
//! Reference: ITU-T X.690 (08/2015), Sections 8 and 11
//!
//! # Example
//!
//! ```
//! use derwalk::{Class, Decoder, UniversalTag};
//!
//! // SEQUENCE { INTEGER 5, INTEGER 7 }
//! let input = [0x30, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x07];
//! let mut decoder = Decoder::new(&input)?;
//!
//! let sequence = decoder.next()?;
//! assert!(sequence.is(Class::Universal, UniversalTag::Sequence as u32));
//!
//! while decoder.is_within(&sequence) {
//!     let token = decoder.next()?;
//!     assert!(token.int()? == 5 || token.int()? == 7);
//! }
//! # Ok::<(), derwalk::Error>(())
//! ```
//!
//! # Unsupported encodings
//!
//! The indefinite-length form (X.690 8.1.3.6), non-canonical BER
//! reconstructions, GeneralizedTime and REAL/ENUMERATED values are out of
//! scope and rejected.

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

use nom::IResult;

mod bitstring;
mod decoder;
mod oid;
mod strings;
mod tag;
mod time;
mod token;


pub use self::{
    decoder::{Decoder, MAX_DEPTH},
    oid::{MAX_ARCS, Oid},
    tag::{Class, UniversalTag, type_name},
    time::UtcTime,
    token::Token,
};

/// Errors surfaced by the decoder and the value readers.
///
/// Every error is reported synchronously by the call that detects it. After
/// an error the decoder state is indeterminate; the walk over the token tree
/// must be treated as aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The current scope holds no further tokens.
    Eof,
    /// The input violates X.690 or the caller contract.
    Invalid,
    /// A decoded value does not fit its word, or a caller buffer is too
    /// small.
    Memory,
    /// The encoding uses more length octets than a `usize` can carry.
    Unsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Eof => write!(f, "end of scope"),
            Error::Invalid => write!(f, "invalid encoding"),
            Error::Memory => write!(f, "value or buffer too small"),
            Error::Unsupported => write!(f, "unsupported length encoding"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl<I> nom::error::ParseError<I> for Error {
    fn from_error_kind(_input: I, _kind: nom::error::ErrorKind) -> Self {
        Error::Invalid
    }

    fn append(_input: I, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

pub(crate) fn map_nom_error<I, O>(result: IResult<I, O, Error>) -> Result<(I, O), Error> {
    match result {
        Ok(ok) => Ok(ok),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(err),
        // A truncated TLV header. Running out of input is only legal on a
        // token boundary, which the decoder detects before parsing.
        Err(nom::Err::Incomplete(_)) => Err(Error::Invalid),
    }
}
