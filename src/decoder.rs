//! The forward-only TLV cursor with its depth and constraint tracking.
//!
//! Reference: ITU-T X.690, Section 8.1

use nom::{IResult, Parser, number::complete::u8};

use crate::{Class, Error, Token, map_nom_error};

/// Maximum nesting depth of constructed values. The sentinel stack holds
/// one slot beyond this so the push that hits the cap stays in bounds and
/// is rejected afterwards. Deep enough for X.509 structures.
pub const MAX_DEPTH: usize = 12;

/// Forward-only decoder over a borrowed byte slice.
///
/// `next` produces one [`Token`] per call, in input order. Entering a
/// constructed token pushes its content end onto a fixed-size stack of
/// parent sentinels; every subsequent header read is bounds-checked against
/// the innermost sentinel.
///
/// A decoder mutates internal cursor state and is not meant to be shared
/// across threads; distinct decoders over disjoint inputs are independent.
pub struct Decoder<'i> {
    input: &'i [u8],
    /// Offset of the next byte to decode.
    current: usize,
    /// `parents[0]` is the input end; `parents[d]` the content end of the
    /// constructed token entered at depth `d`, for `d` up to `MAX_DEPTH`
    /// inclusive.
    parents: [usize; MAX_DEPTH + 1],
    depth: usize,
    /// Minimum depth pinned by [`Decoder::descend`]. While non-zero, `next`
    /// refuses to decode at any other depth.
    constraint: usize,
}

/// Parse the identifier octets: class, primitive/constructed bit and tag
/// number, including the high-tag form (X.690 8.1.2.4).
fn parse_identifier(input: &[u8]) -> IResult<&[u8], (Class, bool, u32), Error> {
    let (mut input, lead) = u8(input)?;
    let class = Class::from_bits(lead);
    let primitive = lead & 0b0010_0000 == 0;
    let mut tag = u32::from(lead & 0b000_11111);

    if tag == 0b000_11111 {
        tag = 0;
        loop {
            let (rest, byte) = u8(input)?;
            input = rest;
            if tag > u32::MAX >> 7 {
                return Err(nom::Err::Failure(Error::Memory));
            }
            tag = tag << 7 | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                break;
            }
        }
    }

    Ok((input, (class, primitive, tag)))
}

/// Parse the length octets, definite form only (X.690 8.1.3).
fn parse_length(input: &[u8]) -> IResult<&[u8], usize, Error> {
    let (mut input, lead) = u8(input)?;

    if lead & 0x80 == 0 {
        // Short form: the low 7 bits are the length.
        return Ok((input, usize::from(lead)));
    }

    let octets = usize::from(lead & 0x7F);
    if octets == 0 {
        // Indefinite form (X.690 8.1.3.6).
        return Err(nom::Err::Error(Error::Invalid));
    }
    if octets == 0x7F {
        // Reserved marker (X.690 8.1.3.5 c).
        return Err(nom::Err::Error(Error::Invalid));
    }
    if octets > size_of::<usize>() {
        return Err(nom::Err::Failure(Error::Unsupported));
    }

    let mut length = 0usize;
    for _ in 0..octets {
        let (rest, byte) = u8(input)?;
        input = rest;
        length = length << 8 | usize::from(byte);
    }

    Ok((input, length))
}

impl<'i> Decoder<'i> {
    /// Create a decoder over `input`. Empty input is invalid.
    pub fn new(input: &'i [u8]) -> Result<Self, Error> {
        if input.is_empty() {
            return Err(Error::Invalid);
        }
        let mut parents = [0; MAX_DEPTH + 1];
        parents[0] = input.len();
        Ok(Self { input, current: 0, parents, depth: 0, constraint: 0 })
    }

    /// Decode the TLV header at the cursor.
    ///
    /// Returns [`Error::Eof`] when the current scope is exhausted. A
    /// primitive token is consumed whole; a constructed token leaves the
    /// cursor at its first child.
    pub fn next(&mut self) -> Result<Token<'i>, Error> {
        let parent_end = self.parents[self.depth];
        if self.current == parent_end {
            return Err(Error::Eof);
        }
        if self.current > parent_end {
            return Err(Error::Invalid);
        }
        if self.constraint > 0 && self.constraint != self.depth {
            // The caller pinned itself inside a constructed token the
            // cursor is no longer (or not yet) in.
            return Err(Error::Invalid);
        }

        // The window ends at the innermost parent's sentinel; header reads
        // cannot cross it.
        let window = &self.input[self.current..parent_end];
        let (rest, ((class, primitive, tag), length)) =
            map_nom_error((parse_identifier, parse_length).parse(window))?;

        if length > rest.len() {
            return Err(Error::Invalid);
        }
        let data = parent_end - rest.len();
        let end = data + length;

        if self.depth == 0 && end != self.parents[0] {
            // The outermost token must fill the input exactly.
            return Err(Error::Invalid);
        }

        let token = Token { class, tag, primitive, data: &self.input[data..end], end };

        if primitive {
            self.current = end;
        } else {
            if self.depth == MAX_DEPTH {
                // Already at the cap from a previous rejected push.
                return Err(Error::Invalid);
            }
            self.depth += 1;
            self.parents[self.depth] = end;
            if self.depth == MAX_DEPTH {
                return Err(Error::Invalid);
            }
            self.current = data;
        }

        self.update_depth();
        Ok(token)
    }

    /// Advance the cursor past the children of a constructed token. No-op
    /// for primitives.
    pub fn skip_children(&mut self, token: &Token<'i>) {
        if token.primitive {
            return;
        }
        self.current = token.end;
        self.update_depth();
    }

    /// Pin the cursor inside the constructed token it has just entered.
    /// Until released with [`Decoder::ascend`], a `next` that would leave
    /// that scope fails with [`Error::Invalid`].
    pub fn descend(&mut self) -> Result<(), Error> {
        if self.constraint >= MAX_DEPTH {
            return Err(Error::Invalid);
        }
        self.constraint += 1;
        Ok(())
    }

    /// Release `levels` of pinning taken with [`Decoder::descend`].
    pub fn ascend(&mut self, levels: usize) -> Result<(), Error> {
        if levels > self.constraint {
            return Err(Error::Invalid);
        }
        self.constraint -= levels;
        Ok(())
    }

    /// True while the cursor has not passed the end of `token`'s content.
    pub fn is_within(&self, token: &Token<'i>) -> bool {
        self.current < token.end
    }

    /// Pop exhausted parents. Depth 1 is kept as the floor so the outermost
    /// scope stays addressable by `is_within` across iterations.
    fn update_depth(&mut self) {
        while self.depth > 1 && self.current == self.parents[self.depth] {
            self.depth -= 1;
        }
    }
}
