//! The canonical positional wire format.
//!
//! Every value is written as the concatenation of its fields, in declaration
//! order, with no tags:
//! - field elements and addresses: 32 bytes, big endian
//! - `bool`: a single `0` or `1` byte
//! - `u32`: 4 bytes, big endian
//! - sequences of encodable values ("vectors"): `u32` BE element count, then
//!   the elements
//! - opaque bytes ([`Blob`]): `u32` BE byte length, then the bytes
//! - tuples: their elements, in order
//!
//! Records expose `to_wire_fields` / `from_wire_fields` to convert to and from
//! a tuple of their fields, and the
//! [`impl_wire_via_fields!`](crate::impl_wire_via_fields) macro derives
//! [`Encode`] and [`Decode`] from that pair.
//!
//! Decoding never looks past the end of the structure being read, so trailing
//! bytes are left for the caller.

use avm_common::{AztecAddress, Fr, Point, PublicKeys, FIELD_SIZE_IN_BYTES};
use thiserror::Error;
use winnow::{
    binary::{be_u32, length_repeat, length_take},
    combinator::trace,
    error::{FromExternalError, ParserError},
    stream::{Stateful, Stream as _},
    token::{any, take},
    Parser as _,
};

/// Result alias for anything that can go wrong while decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// An error from decoding the canonical wire format.
///
/// A failed decode never yields a partially built value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the structure (or a length prefix) requires.
    #[error("truncated input: needed {needed} bytes but only {remaining} remain")]
    TruncatedInput {
        /// Bytes required by the next read.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },

    /// A length prefix is larger than the configured [`DecodeLimits`].
    #[error("declared length {declared} exceeds the maximum of {max}")]
    MalformedLength {
        /// The length read from the input.
        declared: u32,
        /// The configured bound.
        max: u32,
    },

    /// 32 bytes that are not below the field modulus.
    #[error("non-canonical field element 0x{}", hex::encode(.0))]
    NonCanonicalField([u8; FIELD_SIZE_IN_BYTES]),

    /// A boolean byte other than `0` or `1`.
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    /// A string field that is not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// The textual form is not lowercase, delimiter-free hex.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}

/// Bounds on length prefixes, checked before anything is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest element count accepted for a vector.
    pub max_vector_len: u32,
    /// Largest byte length accepted for a [`Blob`].
    pub max_blob_len: u32,
}

impl DecodeLimits {
    /// No bound at all. A length the input cannot back still fails, as
    /// truncated input.
    pub const UNBOUNDED: DecodeLimits = DecodeLimits {
        max_vector_len: u32::MAX,
        max_blob_len: u32::MAX,
    };
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_vector_len: 1 << 20,
            max_blob_len: 1 << 26,
        }
    }
}

/// The decoder's input: the bytes left to read, and the limits that apply to
/// every length prefix found in them.
pub type Input<'a> = Stateful<&'a [u8], DecodeLimits>;

impl<'a> ParserError<Input<'a>> for DecodeError {
    type Inner = Self;

    // Every read is preceded by `need`, so this only fires for reads that
    // bypass it.
    fn from_input(input: &Input<'a>) -> Self {
        DecodeError::TruncatedInput {
            needed: input.eof_offset() + 1,
            remaining: input.eof_offset(),
        }
    }

    fn into_inner(self) -> Result<Self::Inner, Self> {
        Ok(self)
    }
}

impl<'a> FromExternalError<Input<'a>, DecodeError> for DecodeError {
    fn from_external_error(_: &Input<'a>, e: DecodeError) -> Self {
        e
    }
}

/// Fails unless at least `needed` bytes remain.
fn need(input: &Input<'_>, needed: usize) -> DecodeResult<()> {
    let remaining = input.eof_offset();
    match needed > remaining {
        true => Err(DecodeError::TruncatedInput { needed, remaining }),
        false => Ok(()),
    }
}

fn be_u32_checked(input: &mut Input<'_>) -> DecodeResult<u32> {
    need(input, 4)?;
    be_u32(input)
}

/// A `u32` length prefix, checked against `max`.
fn length(input: &mut Input<'_>, max: u32) -> DecodeResult<usize> {
    let declared = be_u32_checked(input)?;
    match declared > max {
        true => Err(DecodeError::MalformedLength { declared, max }),
        false => Ok(declared as usize),
    }
}

/// Element count of a vector. Nothing is reserved up front on its say-so:
/// [`length_repeat`] caps the initial capacity, so an absurd count only costs
/// the elements that are actually present.
fn vector_len(input: &mut Input<'_>) -> DecodeResult<usize> {
    let max = input.state.max_vector_len;
    length(input, max)
}

/// Byte length of a [`Blob`], which must be backed by the input.
fn blob_len(input: &mut Input<'_>) -> DecodeResult<usize> {
    let max = input.state.max_blob_len;
    let len = length(input, max)?;
    need(input, len)?;
    Ok(len)
}

/// Types with a canonical wire encoding.
///
/// # Panics
///
/// Encoding panics if a vector has more than `u32::MAX` elements, or a
/// [`Blob`] more than `u32::MAX` bytes, since neither length fits its prefix.
pub trait Encode {
    /// Appends the canonical bytes of `self` to `out`.
    fn encode_to(&self, out: &mut Vec<u8>);

    /// The canonical bytes of `self`.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }

    /// The canonical bytes as lowercase hex, without a prefix.
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Types that can be read back from their canonical wire encoding.
pub trait Decode: Sized {
    /// Parses one value from the front of `input`, advancing past it.
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self>;

    /// Decodes a value from the start of `bytes`. Trailing bytes are ignored.
    fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        Self::from_bytes_with_limits(bytes, DecodeLimits::default())
    }

    /// Like [`Decode::from_bytes`], with explicit bounds on length prefixes.
    fn from_bytes_with_limits(bytes: &[u8], limits: DecodeLimits) -> DecodeResult<Self> {
        Self::decode_from(&mut Input {
            input: bytes,
            state: limits,
        })
    }

    /// Inverse of [`Encode::to_hex`]. Only lowercase hex digits are accepted.
    fn from_hex(s: &str) -> DecodeResult<Self> {
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(DecodeError::InvalidHex(s.to_owned()));
        }
        let bytes = hex::decode(s).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

/// Opaque bytes framed by their own `u32` BE length, distinct from a vector
/// since the payload is not a sequence of encodable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blob<B>(pub B);

impl<B: AsRef<[u8]>> Encode for Blob<B> {
    /// # Panics
    ///
    /// If the payload is longer than `u32::MAX` bytes.
    fn encode_to(&self, out: &mut Vec<u8>) {
        let bytes = self.0.as_ref();
        let len = u32::try_from(bytes.len()).expect("blob longer than u32::MAX bytes");
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
    }
}

impl Decode for Blob<Vec<u8>> {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        trace("blob", length_take(blob_len))
            .map(|it: &[u8]| Blob(it.to_vec()))
            .parse_next(input)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode_to(&self, out: &mut Vec<u8>) {
        (**self).encode_to(out)
    }
}

impl<T: Encode> Encode for [T] {
    /// # Panics
    ///
    /// If there are more than `u32::MAX` elements.
    fn encode_to(&self, out: &mut Vec<u8>) {
        let len = u32::try_from(self.len()).expect("vector longer than u32::MAX elements");
        out.extend_from_slice(&len.to_be_bytes());
        for it in self {
            it.encode_to(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.as_slice().encode_to(out)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        trace("vector", length_repeat(vector_len, T::decode_from)).parse_next(input)
    }
}

impl Encode for bool {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }
}

impl Decode for bool {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        need(input, 1)?;
        any.try_map(|b: u8| match b {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        })
        .parse_next(input)
    }
}

impl Encode for u32 {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Decode for u32 {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        be_u32_checked(input)
    }
}

impl Encode for Fr {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl Decode for Fr {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        need(input, FIELD_SIZE_IN_BYTES)?;
        take(FIELD_SIZE_IN_BYTES)
            .try_map(|it: &[u8]| {
                let mut bytes = [0; FIELD_SIZE_IN_BYTES];
                bytes.copy_from_slice(it);
                Fr::from_be_bytes(&bytes).map_err(|_| DecodeError::NonCanonicalField(bytes))
            })
            .parse_next(input)
    }
}

impl Encode for AztecAddress {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.to_field().encode_to(out)
    }
}

impl Decode for AztecAddress {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        Fr::decode_from(input).map(AztecAddress::from_field)
    }
}

impl Encode for Point {
    fn encode_to(&self, out: &mut Vec<u8>) {
        (&self.x, &self.y, &self.is_infinite).encode_to(out)
    }
}

impl Decode for Point {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        let (x, y, is_infinite) = Decode::decode_from(input)?;
        Ok(Point { x, y, is_infinite })
    }
}

impl Encode for PublicKeys {
    fn encode_to(&self, out: &mut Vec<u8>) {
        for point in self.points() {
            point.encode_to(out);
        }
    }
}

impl Decode for PublicKeys {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        let (
            master_nullifier_public_key,
            master_incoming_viewing_public_key,
            master_outgoing_viewing_public_key,
            master_tagging_public_key,
        ) = Decode::decode_from(input)?;
        Ok(PublicKeys {
            master_nullifier_public_key,
            master_incoming_viewing_public_key,
            master_outgoing_viewing_public_key,
            master_tagging_public_key,
        })
    }
}

macro_rules! impl_wire_for_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Encode),+> Encode for ($($ty,)+) {
            fn encode_to(&self, out: &mut Vec<u8>) {
                let ($($var,)+) = self;
                $($var.encode_to(out);)+
            }
        }

        impl<$($ty: Decode),+> Decode for ($($ty,)+) {
            fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
                Ok(($($ty::decode_from(input)?,)+))
            }
        }
    };
}

impl_wire_for_tuple!(A a, B b);
impl_wire_for_tuple!(A a, B b, C c);
impl_wire_for_tuple!(A a, B b, C c, D d);
impl_wire_for_tuple!(A a, B b, C c, D d, E e);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f, G g);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
impl_wire_for_tuple!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);

/// Implements [`Encode`] and [`Decode`] for a record in terms of its
/// `to_wire_fields` / `from_wire_fields` pair.
#[macro_export]
macro_rules! impl_wire_via_fields {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::wire::Encode for $ty {
                fn encode_to(&self, out: &mut Vec<u8>) {
                    $crate::wire::Encode::encode_to(&self.to_wire_fields(), out)
                }
            }

            impl $crate::wire::Decode for $ty {
                fn decode_from(
                    input: &mut $crate::wire::Input<'_>,
                ) -> $crate::wire::DecodeResult<Self> {
                    $crate::wire::Decode::decode_from(input).map(Self::from_wire_fields)
                }
            }
        )+
    };
}
