//! A CBOR rendition of [`CircuitInputs`] for the avm2 prover.
//!
//! Unlike the canonical wire format this is self-describing (every record is
//! a map keyed by camelCase field names) and lossy: only the contract data of
//! the bytecode hints, the enqueued calls and the start tree roots are kept.
//! It is not meant to be decoded back.
//!
//! Field elements become 32-byte byte strings, addresses the field element
//! they wrap, and points an `{x, y}` map. A point at infinity has no such
//! form and fails the whole serialization.

use avm_common::{AztecAddress, Fr, Point, PublicKeys};
use ciborium::value::Value;
use log::trace;
use thiserror::Error;

use crate::{
    circuit_inputs::CircuitInputs,
    contract::{ContractBytecodeHint, ContractInstanceHint, EnqueuedCallHint},
    public_inputs::{StartTreeRoots, TreeRoots},
    tree_hints::{
        NullifierLeafPreimage, NullifierReadHint, PublicDataLeafPreimage, PublicDataReadHint,
    },
};

/// Why [`serialize_for_avm2`] produced nothing.
#[derive(Debug, Error)]
pub enum Avm2Error {
    /// A value that has no representation in this format.
    #[error("cannot serialize {0} for avm2")]
    UnsupportedValue(&'static str),

    /// The CBOR writer failed.
    #[error("CBOR serialization failed: {0}")]
    Cbor(String),
}

/// Result alias for the avm2 encoder.
pub type Avm2Result<T> = Result<T, Avm2Error>;

/// How a type is written into the avm2 object tree.
pub trait Avm2Value {
    /// Fails with [`Avm2Error::UnsupportedValue`] if `self` has no avm2 form.
    fn to_avm2_value(&self) -> Avm2Result<Value>;
}

fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Value::Text(k.to_owned()), v))
            .collect(),
    )
}

impl Avm2Value for Fr {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(Value::Bytes(self.to_be_bytes().to_vec()))
    }
}

impl Avm2Value for AztecAddress {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        self.to_field().to_avm2_value()
    }
}

impl Avm2Value for bool {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl<T: Avm2Value> Avm2Value for [T] {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        self.iter()
            .map(Avm2Value::to_avm2_value)
            .collect::<Avm2Result<_>>()
            .map(Value::Array)
    }
}

impl<T: Avm2Value> Avm2Value for Vec<T> {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        self.as_slice().to_avm2_value()
    }
}

impl Avm2Value for Point {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        if self.is_infinite {
            return Err(Avm2Error::UnsupportedValue("a point at infinity"));
        }
        Ok(map([
            ("x", self.x.to_avm2_value()?),
            ("y", self.y.to_avm2_value()?),
        ]))
    }
}

impl Avm2Value for PublicKeys {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            (
                "masterNullifierPublicKey",
                self.master_nullifier_public_key.to_avm2_value()?,
            ),
            (
                "masterIncomingViewingPublicKey",
                self.master_incoming_viewing_public_key.to_avm2_value()?,
            ),
            (
                "masterOutgoingViewingPublicKey",
                self.master_outgoing_viewing_public_key.to_avm2_value()?,
            ),
            (
                "masterTaggingPublicKey",
                self.master_tagging_public_key.to_avm2_value()?,
            ),
        ]))
    }
}

impl Avm2Value for NullifierLeafPreimage {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("nullifier", self.nullifier.to_avm2_value()?),
            ("nextNullifier", self.next_nullifier.to_avm2_value()?),
            ("nextIndex", self.next_index.to_avm2_value()?),
        ]))
    }
}

impl Avm2Value for NullifierReadHint {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("lowLeafPreimage", self.low_leaf.to_avm2_value()?),
            ("lowLeafIndex", self.low_leaf_index.to_avm2_value()?),
            (
                "lowLeafSiblingPath",
                self.low_leaf_sibling_path.to_avm2_value()?,
            ),
        ]))
    }
}

impl Avm2Value for PublicDataLeafPreimage {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("slot", self.slot.to_avm2_value()?),
            ("value", self.value.to_avm2_value()?),
            ("nextIndex", self.next_index.to_avm2_value()?),
            ("nextSlot", self.next_slot.to_avm2_value()?),
        ]))
    }
}

impl Avm2Value for PublicDataReadHint {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("leafPreimage", self.leaf.to_avm2_value()?),
            ("leafIndex", self.leaf_index.to_avm2_value()?),
            ("siblingPath", self.sibling_path.to_avm2_value()?),
        ]))
    }
}

impl Avm2Value for ContractInstanceHint {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("address", self.address.to_avm2_value()?),
            ("exists", self.exists.to_avm2_value()?),
            ("salt", self.salt.to_avm2_value()?),
            ("deployer", self.deployer.to_avm2_value()?),
            (
                "currentContractClassId",
                self.current_class_id.to_avm2_value()?,
            ),
            (
                "originalContractClassId",
                self.original_class_id.to_avm2_value()?,
            ),
            ("initializationHash", self.initialization_hash.to_avm2_value()?),
            ("publicKeys", self.public_keys.to_avm2_value()?),
            (
                "initializationMembershipHint",
                self.initialization_membership.to_avm2_value()?,
            ),
            (
                "updateMembershipHint",
                self.update_membership.to_avm2_value()?,
            ),
            ("updatePreimage", self.update_preimage.to_avm2_value()?),
        ]))
    }
}

/// The class half of a bytecode hint: the id preimage plus the bytecode.
fn contract_class_value(hint: &ContractBytecodeHint) -> Avm2Result<Value> {
    let preimage = &hint.class_preimage;
    Ok(map([
        ("artifactHash", preimage.artifact_hash.to_avm2_value()?),
        (
            "privateFunctionsRoot",
            preimage.private_functions_root.to_avm2_value()?,
        ),
        (
            "publicBytecodeCommitment",
            preimage.public_bytecode_commitment.to_avm2_value()?,
        ),
        ("packedBytecode", Value::Bytes(hint.bytecode.clone())),
    ]))
}

/// Sender and staticness are not recorded in the hint, so every call is
/// written as a non-static call from the zero address.
impl Avm2Value for EnqueuedCallHint {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("contractAddress", self.contract_address.to_avm2_value()?),
            ("sender", Fr::ZERO.to_avm2_value()?),
            ("args", self.calldata.to_avm2_value()?),
            ("isStatic", false.to_avm2_value()?),
        ]))
    }
}

impl Avm2Value for TreeRoots {
    fn to_avm2_value(&self) -> Avm2Result<Value> {
        Ok(map([
            ("publicDataTree", self.public_data_tree.to_avm2_value()?),
            ("nullifierTree", self.nullifier_tree.to_avm2_value()?),
            ("noteHashTree", self.note_hash_tree.to_avm2_value()?),
            (
                "l1ToL2MessageTree",
                self.l1_to_l2_message_tree.to_avm2_value()?,
            ),
        ]))
    }
}

/// Builds the object tree [`serialize_for_avm2`] writes out.
pub fn avm2_value<P: StartTreeRoots>(inputs: &CircuitInputs<P>) -> Avm2Result<Value> {
    let mut contract_instances = Vec::new();
    let mut contract_classes = Vec::new();
    for hint in inputs.hints.bytecode_hints() {
        contract_instances.push(hint.instance.to_avm2_value()?);
        contract_classes.push(contract_class_value(hint)?);
    }

    Ok(map([
        (
            "hints",
            map([
                ("contractInstances", Value::Array(contract_instances)),
                ("contractClasses", Value::Array(contract_classes)),
                (
                    "initialTreeRoots",
                    inputs.public_inputs.start_tree_roots().to_avm2_value()?,
                ),
            ]),
        ),
        ("enqueuedCalls", inputs.hints.enqueued_calls.to_avm2_value()?),
        ("publicInputs", map([("dummy", Value::Array(vec![]))])),
    ]))
}

/// Serializes `inputs` as a CBOR map for the avm2 prover.
///
/// Returns no bytes at all if any value cannot be represented.
pub fn serialize_for_avm2<P: StartTreeRoots>(inputs: &CircuitInputs<P>) -> Avm2Result<Vec<u8>> {
    let value = avm2_value(inputs)?;
    let mut out = Vec::new();
    ciborium::ser::into_writer(&value, &mut out).map_err(|e| Avm2Error::Cbor(e.to_string()))?;
    trace!(
        "serialized {} enqueued calls for avm2 into {} bytes",
        inputs.hints.enqueued_calls.len(),
        out.len()
    );
    Ok(out)
}
