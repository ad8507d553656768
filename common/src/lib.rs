//! Primitive values shared by the AVM hint codecs: BN254 scalar field
//! elements, addresses, Grumpkin points and the public key bundle of a
//! contract instance.
//!
//! Nothing in here hashes or checks curve membership, these are plain
//! carriers for values computed elsewhere.

use std::fmt;
use std::str::FromStr;

use ethereum_types::U256;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Number of bytes in the canonical encoding of a field element.
pub const FIELD_SIZE_IN_BYTES: usize = 32;

/// The BN254 scalar field modulus.
/// 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001
pub const MODULUS: U256 = U256([
    0x43e1f593f0000001,
    0x2833e84879b97091,
    0xb85045b68181585d,
    0x30644e72e131a029,
]);

/// Errors when building a primitive from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    /// The value is not below [`MODULUS`].
    #[error("value {0} is not a canonical field element")]
    NonCanonical(U256),

    /// The textual form could not be parsed.
    #[error("invalid hex field element: {0}")]
    InvalidHex(String),
}

/// An element of the BN254 scalar field, always reduced.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fr(U256);

impl Fr {
    /// Additive identity.
    pub const ZERO: Fr = Fr(U256([0, 0, 0, 0]));
    /// Multiplicative identity.
    pub const ONE: Fr = Fr(U256([1, 0, 0, 0]));

    /// Returns `None` if `value` is not below the modulus.
    pub fn new(value: U256) -> Option<Self> {
        (value < MODULUS).then_some(Self(value))
    }

    /// Reads 32 big-endian bytes, rejecting values not below [`MODULUS`].
    pub fn from_be_bytes(bytes: &[u8; FIELD_SIZE_IN_BYTES]) -> Result<Self, PrimitiveError> {
        let value = U256::from_big_endian(bytes);
        Self::new(value).ok_or(PrimitiveError::NonCanonical(value))
    }

    /// The 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; FIELD_SIZE_IN_BYTES] {
        let mut out = [0u8; FIELD_SIZE_IN_BYTES];
        self.0.to_big_endian(&mut out);
        out
    }

    /// Whether this is [`Fr::ZERO`].
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The underlying integer, always below [`MODULUS`].
    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<u64> for Fr {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<bool> for Fr {
    fn from(value: bool) -> Self {
        Self::from(value as u64)
    }
}

impl TryFrom<U256> for Fr {
    type Error = PrimitiveError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PrimitiveError::NonCanonical(value))
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl fmt::Debug for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fr({self})")
    }
}

/// Accepts up to 64 hex digits, with or without a leading `0x`.
impl FromStr for Fr {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > FIELD_SIZE_IN_BYTES * 2 {
            return Err(PrimitiveError::InvalidHex(s.to_owned()));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; FIELD_SIZE_IN_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| PrimitiveError::InvalidHex(s.to_owned()))?;
        Self::from_be_bytes(&bytes)
    }
}

impl Serialize for Fr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A contract address. Same representation as [`Fr`], kept as its own type so
/// encoders can tell the two apart.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AztecAddress(Fr);

impl AztecAddress {
    /// The zero address, used for "no address".
    pub const ZERO: AztecAddress = AztecAddress(Fr::ZERO);

    /// Wraps a field element. Every element is a valid address.
    pub const fn from_field(field: Fr) -> Self {
        Self(field)
    }

    /// The wrapped field element.
    pub const fn to_field(self) -> Fr {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for AztecAddress {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<Fr> for AztecAddress {
    fn from(field: Fr) -> Self {
        Self(field)
    }
}

impl fmt::Display for AztecAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AztecAddress {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// An affine Grumpkin point. Coordinates live in the BN254 scalar field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: Fr,
    pub y: Fr,
    pub is_infinite: bool,
}

impl Point {
    pub const ZERO: Point = Point {
        x: Fr::ZERO,
        y: Fr::ZERO,
        is_infinite: false,
    };

    /// A point with the given coordinates.
    pub const fn new(x: Fr, y: Fr, is_infinite: bool) -> Self {
        Self { x, y, is_infinite }
    }

    /// Only looks at the coordinates, not at the infinity flag.
    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

/// The master public keys of a contract instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeys {
    pub master_nullifier_public_key: Point,
    pub master_incoming_viewing_public_key: Point,
    pub master_outgoing_viewing_public_key: Point,
    pub master_tagging_public_key: Point,
}

impl PublicKeys {
    /// All four keys zero.
    pub const fn empty() -> Self {
        Self {
            master_nullifier_public_key: Point::ZERO,
            master_incoming_viewing_public_key: Point::ZERO,
            master_outgoing_viewing_public_key: Point::ZERO,
            master_tagging_public_key: Point::ZERO,
        }
    }

    /// The keys in their wire order.
    pub fn points(&self) -> [&Point; 4] {
        [
            &self.master_nullifier_public_key,
            &self.master_incoming_viewing_public_key,
            &self.master_outgoing_viewing_public_key,
            &self.master_tagging_public_key,
        ]
    }

    /// True if every key has zero coordinates.
    pub fn is_empty(&self) -> bool {
        self.points().iter().all(|p| p.is_zero())
    }
}
