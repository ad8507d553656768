//! The complete input handed to the AVM prover for one transaction.

use avm_common::Fr;
use log::debug;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use winnow::stream::Stream as _;

use crate::{
    execution_hints::ExecutionHints,
    public_inputs::PublicInputs,
    wire::{Blob, Decode, DecodeError, DecodeResult, Encode, Input},
};

/// Function name, calldata, execution hints and public inputs.
///
/// The public inputs are owned by whoever produces them: their encoding is
/// written verbatim after the hints and must be self-delimiting, since
/// nothing frames it. [`PublicInputs`] is the default.
///
/// Serialized through `serde`, this is the lowercase hex string of its wire
/// encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CircuitInputs<P = PublicInputs> {
    /// Name of the public function being proven.
    pub function_name: String,
    /// Calldata of that function.
    pub calldata: Vec<Fr>,
    /// Everything recorded while executing it.
    pub hints: ExecutionHints,
    /// Written after the hints, verbatim.
    pub public_inputs: P,
}

impl<P> CircuitInputs<P> {
    /// Bundles the pieces, converting the name.
    pub fn new(
        function_name: impl Into<String>,
        calldata: Vec<Fr>,
        hints: ExecutionHints,
        public_inputs: P,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            calldata,
            hints,
            public_inputs,
        }
    }
}

impl<P: Encode> Encode for CircuitInputs<P> {
    fn encode_to(&self, out: &mut Vec<u8>) {
        let start = out.len();
        (
            Blob(self.function_name.as_bytes()),
            &self.calldata,
            &self.hints,
            &self.public_inputs,
        )
            .encode_to(out);
        debug!(
            "encoded circuit inputs for `{}` ({} bytes)",
            self.function_name,
            out.len() - start
        );
    }
}

impl<P: Decode> Decode for CircuitInputs<P> {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        let start = input.eof_offset();
        let (Blob(name), calldata, hints, public_inputs) =
            <(Blob<Vec<u8>>, Vec<Fr>, ExecutionHints, P)>::decode_from(input)?;
        let function_name = String::from_utf8(name).map_err(|_| DecodeError::InvalidUtf8)?;
        debug!(
            "decoded circuit inputs for `{function_name}` ({} bytes, {} left unread)",
            start - input.eof_offset(),
            input.eof_offset()
        );
        Ok(Self {
            function_name,
            calldata,
            hints,
            public_inputs,
        })
    }
}

impl<P: Encode> Serialize for CircuitInputs<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, P: Decode> Deserialize<'de> for CircuitInputs<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
