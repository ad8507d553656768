//! The aggregate of every hint produced while executing a transaction's
//! public calls.

use std::collections::BTreeMap;

use avm_common::AztecAddress;
use log::{debug, trace};

use crate::{
    contract::{ContractBytecodeHint, ContractInstanceHint, EnqueuedCallHint},
    tree_hints::{
        AppendTreeHint, NullifierReadHint, NullifierWriteHint, PublicDataReadHint,
        PublicDataWriteHint,
    },
    wire::{Decode, DecodeResult, Encode, Input},
};

/// All hints for one execution trace, in the order the wire format expects.
///
/// Bytecode is deduplicated by contract address: however many enqueued calls
/// touch a contract, it contributes a single [`ContractBytecodeHint`]. The map
/// is ordered, so bytecode hints are encoded in ascending address order, not
/// in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionHints {
    /// Top-level calls, in execution order.
    pub enqueued_calls: Vec<EnqueuedCallHint>,
    /// Every instance looked up, whether or not it exists.
    pub contract_instances: Vec<ContractInstanceHint>,
    /// Bytecode hints keyed by contract address.
    pub bytecode_by_address: BTreeMap<AztecAddress, ContractBytecodeHint>,
    /// Storage reads.
    pub public_data_reads: Vec<PublicDataReadHint>,
    /// Storage writes.
    pub public_data_writes: Vec<PublicDataWriteHint>,
    /// Nullifier existence checks.
    pub nullifier_reads: Vec<NullifierReadHint>,
    /// Nullifier insertions.
    pub nullifier_writes: Vec<NullifierWriteHint>,
    /// Note hash existence checks.
    pub note_hash_reads: Vec<AppendTreeHint>,
    /// Note hash insertions.
    pub note_hash_writes: Vec<AppendTreeHint>,
    /// L1 to L2 message existence checks.
    pub l1_to_l2_message_reads: Vec<AppendTreeHint>,
}

type ExecutionHintsFields = (
    Vec<EnqueuedCallHint>,
    Vec<ContractInstanceHint>,
    Vec<ContractBytecodeHint>,
    Vec<PublicDataReadHint>,
    Vec<PublicDataWriteHint>,
    Vec<NullifierReadHint>,
    Vec<NullifierWriteHint>,
    Vec<AppendTreeHint>,
    Vec<AppendTreeHint>,
    Vec<AppendTreeHint>,
);

impl ExecutionHints {
    /// No hints at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.enqueued_calls.is_empty()
            && self.contract_instances.is_empty()
            && self.bytecode_by_address.is_empty()
            && self.public_data_reads.is_empty()
            && self.public_data_writes.is_empty()
            && self.nullifier_reads.is_empty()
            && self.nullifier_writes.is_empty()
            && self.note_hash_reads.is_empty()
            && self.note_hash_writes.is_empty()
            && self.l1_to_l2_message_reads.is_empty()
    }

    /// Appends an enqueued call.
    pub fn add_enqueued_call(&mut self, hint: EnqueuedCallHint) {
        self.enqueued_calls.push(hint);
    }

    /// Appends an instance, even one already present.
    pub fn add_contract_instance(&mut self, hint: ContractInstanceHint) {
        self.contract_instances.push(hint);
    }

    /// Keys `hint` by its instance address. A hint already present for that
    /// address is replaced and returned.
    pub fn add_bytecode_hint(&mut self, hint: ContractBytecodeHint) -> Option<ContractBytecodeHint> {
        let address = hint.address();
        let previous = self.bytecode_by_address.insert(address, hint);
        if previous.is_some() {
            debug!("replaced bytecode hint for contract {address}");
        }
        previous
    }

    /// Appends a storage read.
    pub fn add_public_data_read(&mut self, hint: PublicDataReadHint) {
        self.public_data_reads.push(hint);
    }

    /// Appends a storage write.
    pub fn add_public_data_write(&mut self, hint: PublicDataWriteHint) {
        self.public_data_writes.push(hint);
    }

    /// Appends a nullifier read.
    pub fn add_nullifier_read(&mut self, hint: NullifierReadHint) {
        self.nullifier_reads.push(hint);
    }

    /// Appends a nullifier write.
    pub fn add_nullifier_write(&mut self, hint: NullifierWriteHint) {
        self.nullifier_writes.push(hint);
    }

    /// Appends a note hash read.
    pub fn add_note_hash_read(&mut self, hint: AppendTreeHint) {
        self.note_hash_reads.push(hint);
    }

    /// Appends a note hash write.
    pub fn add_note_hash_write(&mut self, hint: AppendTreeHint) {
        self.note_hash_writes.push(hint);
    }

    /// Appends an L1 to L2 message read.
    pub fn add_l1_to_l2_message_read(&mut self, hint: AppendTreeHint) {
        self.l1_to_l2_message_reads.push(hint);
    }

    /// The bytecode hints in encoding order.
    pub fn bytecode_hints(&self) -> impl Iterator<Item = &ContractBytecodeHint> {
        self.bytecode_by_address.values()
    }

    /// The ten collections in wire order, bytecode hints by ascending address.
    #[allow(clippy::type_complexity)]
    pub fn to_wire_fields(
        &self,
    ) -> (
        &[EnqueuedCallHint],
        &[ContractInstanceHint],
        Vec<&ContractBytecodeHint>,
        &[PublicDataReadHint],
        &[PublicDataWriteHint],
        &[NullifierReadHint],
        &[NullifierWriteHint],
        &[AppendTreeHint],
        &[AppendTreeHint],
        &[AppendTreeHint],
    ) {
        (
            &self.enqueued_calls,
            &self.contract_instances,
            self.bytecode_hints().collect(),
            &self.public_data_reads,
            &self.public_data_writes,
            &self.nullifier_reads,
            &self.nullifier_writes,
            &self.note_hash_reads,
            &self.note_hash_writes,
            &self.l1_to_l2_message_reads,
        )
    }

    /// The bytecode vector is folded into the address map, later entries
    /// overwriting earlier ones for the same address.
    pub fn from_wire_fields(
        (
            enqueued_calls,
            contract_instances,
            bytecode_hints,
            public_data_reads,
            public_data_writes,
            nullifier_reads,
            nullifier_writes,
            note_hash_reads,
            note_hash_writes,
            l1_to_l2_message_reads,
        ): ExecutionHintsFields,
    ) -> Self {
        let bytecode_by_address =
            bytecode_hints
                .into_iter()
                .fold(BTreeMap::new(), |mut acc, hint| {
                    if let Some(previous) = acc.insert(hint.address(), hint) {
                        trace!("bytecode hint for {} overwritten", previous.address());
                    }
                    acc
                });
        Self {
            enqueued_calls,
            contract_instances,
            bytecode_by_address,
            public_data_reads,
            public_data_writes,
            nullifier_reads,
            nullifier_writes,
            note_hash_reads,
            note_hash_writes,
            l1_to_l2_message_reads,
        }
    }
}

impl Encode for ExecutionHints {
    fn encode_to(&self, out: &mut Vec<u8>) {
        let start = out.len();
        self.to_wire_fields().encode_to(out);
        trace!(
            "encoded {} enqueued calls and {} bytecode hints into {} bytes",
            self.enqueued_calls.len(),
            self.bytecode_by_address.len(),
            out.len() - start
        );
    }
}

impl Decode for ExecutionHints {
    fn decode_from(input: &mut Input<'_>) -> DecodeResult<Self> {
        Decode::decode_from(input).map(Self::from_wire_fields)
    }
}

#[cfg(test)]
mod tests {
    use avm_common::Fr;

    use super::*;
    use crate::contract::ContractClassIdPreimage;

    fn bytecode_hint(address: u64, bytecode: &[u8]) -> ContractBytecodeHint {
        ContractBytecodeHint::new(
            bytecode.to_vec(),
            ContractInstanceHint {
                address: AztecAddress::from(address),
                exists: true,
                ..ContractInstanceHint::empty()
            },
            ContractClassIdPreimage::default(),
        )
    }

    #[test]
    fn empty_round_trip() {
        let hints = ExecutionHints::empty();
        assert!(hints.is_empty());
        let bytes = hints.to_bytes();
        // ten empty vectors
        assert_eq!(bytes, [0u8; 40]);
        let decoded = ExecutionHints::from_bytes(&bytes).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded, hints);
    }

    #[test]
    fn any_collection_makes_it_non_empty() {
        let mut hints = ExecutionHints::empty();
        hints.add_l1_to_l2_message_read(AppendTreeHint::empty());
        assert!(!hints.is_empty());

        let mut hints = ExecutionHints::empty();
        hints.add_bytecode_hint(ContractBytecodeHint::empty());
        assert!(!hints.is_empty());
    }

    #[test]
    fn collection_order_on_the_wire() {
        let mut hints = ExecutionHints::empty();
        hints.add_note_hash_write(AppendTreeHint::new(Fr::ONE, Fr::ONE, vec![]));
        let bytes = hints.to_bytes();
        // eight leading empty vectors, then one note hash write
        assert!(bytes[..32].iter().all(|b| *b == 0));
        assert_eq!(bytes[32..36], [0, 0, 0, 1]);
        assert_eq!(bytes.len(), 40 + 32 + 32 + 4);
        assert_eq!(bytes[bytes.len() - 4..], [0, 0, 0, 0]);
    }

    #[test]
    fn bytecode_is_keyed_by_instance_address() {
        let mut hints = ExecutionHints::empty();
        assert_eq!(hints.add_bytecode_hint(bytecode_hint(1, b"first")), None);
        assert_eq!(
            hints.add_bytecode_hint(bytecode_hint(1, b"second")),
            Some(bytecode_hint(1, b"first"))
        );
        assert_eq!(hints.bytecode_by_address.len(), 1);

        let decoded = ExecutionHints::from_bytes(&hints.to_bytes()).unwrap();
        assert_eq!(decoded.bytecode_by_address.len(), 1);
        assert_eq!(
            decoded.bytecode_by_address[&AztecAddress::from(1)].bytecode,
            b"second"
        );
    }

    #[test]
    fn duplicate_addresses_on_the_wire_are_last_write_wins() {
        let fields = (
            Vec::<EnqueuedCallHint>::new(),
            Vec::<ContractInstanceHint>::new(),
            vec![
                bytecode_hint(5, b"a"),
                bytecode_hint(2, b"b"),
                bytecode_hint(5, b"c"),
            ],
            Vec::<PublicDataReadHint>::new(),
            Vec::<PublicDataWriteHint>::new(),
            Vec::<NullifierReadHint>::new(),
            Vec::<NullifierWriteHint>::new(),
            Vec::<AppendTreeHint>::new(),
            Vec::<AppendTreeHint>::new(),
            Vec::<AppendTreeHint>::new(),
        );
        let decoded = ExecutionHints::from_bytes(&fields.to_bytes()).unwrap();
        assert_eq!(decoded.bytecode_by_address.len(), 2);
        assert_eq!(
            decoded.bytecode_by_address[&AztecAddress::from(5)].bytecode,
            b"c"
        );

        // re-encoding uses address order
        let addresses = decoded
            .bytecode_hints()
            .map(|it| it.address())
            .collect::<Vec<_>>();
        assert_eq!(addresses, [AztecAddress::from(2), AztecAddress::from(5)]);
    }
}
