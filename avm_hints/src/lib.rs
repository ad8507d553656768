//! The public part of a transaction executes in a simulator that records,
//! for every tree access and every contract it touches, the data a prover
//! needs to replay it: authentication paths, leaf preimages, contract
//! instances and bytecode. Those records are the _execution hints_.
//!
//! The AVM prover wants [`CircuitInputs`]: the hints, the called function and
//! its calldata, and the public inputs, in one binary blob.
//!
//! This library holds the hint records and writes (and reads back) that blob.
//!
//! # Non-Goals
//! - Checking hints. Paths are not verified against roots, preimages are not
//!   hashed.
//! - Gathering hints. Something else executes the calls, this library only
//!   holds the results.
//!
//! # Formats
//! - The canonical wire format, see [`wire`]. Every hint type implements
//!   [`Encode`] and [`Decode`], and `decode(encode(x)) == x`.
//! - A self-describing CBOR map for the avm2 prover, see
//!   [`avm2::serialize_for_avm2`]. This one is lossy and write-only.
//! - `serde`, for [`CircuitInputs`] only, as the hex string of its wire
//!   encoding.

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

/// Records are built bottom up:
///
/// 1. [`wire`] defines the codec for primitives, vectors, blobs and tuples.
/// 2. Every record exposes `to_wire_fields` / `from_wire_fields`, a pair of
///    functions to and from a tuple of its fields in wire order.
///    [`impl_wire_via_fields!`] turns that pair into [`Encode`] and
///    [`Decode`] impls, so a record's encoder and decoder can't drift apart.
/// 3. [`ExecutionHints`] and [`CircuitInputs`] are records like any other,
///    except that [`ExecutionHints`] deduplicates bytecode by address.
const _DEVELOPER_DOCS: () = ();

pub mod avm2;
mod circuit_inputs;
mod contract;
mod execution_hints;
mod public_inputs;
mod tree_hints;
pub mod wire;

pub use avm_common::{AztecAddress, Fr, Point, PublicKeys};
pub use circuit_inputs::CircuitInputs;
pub use contract::{
    bytecode_hint_for, ContractBytecodeHint, ContractClass, ContractClassIdPreimage,
    ContractInstanceHint, ContractsSource, EnqueuedCallHint,
};
pub use execution_hints::ExecutionHints;
pub use public_inputs::{
    AppendOnlyTreeSnapshot, PublicInputs, StartTreeRoots, TreeRoots, TreeSnapshots,
};
pub use tree_hints::{
    AppendTreeHint, NullifierLeafPreimage, NullifierReadHint, NullifierWriteHint,
    PublicDataLeafPreimage, PublicDataReadHint, PublicDataWriteHint,
};
pub use wire::{Blob, Decode, DecodeError, DecodeLimits, DecodeResult, Encode, Input};
