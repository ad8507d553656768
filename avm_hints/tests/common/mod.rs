#![allow(dead_code)]

use avm_hints::{
    AppendTreeHint, AztecAddress, ContractBytecodeHint, ContractClassIdPreimage,
    ContractInstanceHint, EnqueuedCallHint, ExecutionHints, Fr, NullifierLeafPreimage,
    NullifierReadHint, NullifierWriteHint, Point, PublicDataLeafPreimage, PublicDataReadHint,
    PublicDataWriteHint, PublicKeys,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn common_setup() {
    let _ = pretty_env_logger::try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A random field element. Clearing the top three bits keeps it below the
/// modulus.
pub fn fr(rng: &mut StdRng) -> Fr {
    let mut bytes: [u8; 32] = rng.gen();
    bytes[0] &= 0x1f;
    Fr::from_be_bytes(&bytes).unwrap()
}

pub fn frs(rng: &mut StdRng, max_len: usize) -> Vec<Fr> {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| fr(rng)).collect()
}

pub fn address(rng: &mut StdRng) -> AztecAddress {
    AztecAddress::from(fr(rng))
}

pub fn point(rng: &mut StdRng) -> Point {
    Point::new(fr(rng), fr(rng), false)
}

pub fn public_keys(rng: &mut StdRng) -> PublicKeys {
    PublicKeys {
        master_nullifier_public_key: point(rng),
        master_incoming_viewing_public_key: point(rng),
        master_outgoing_viewing_public_key: point(rng),
        master_tagging_public_key: point(rng),
    }
}

pub fn append_tree_hint(rng: &mut StdRng) -> AppendTreeHint {
    AppendTreeHint::new(fr(rng), fr(rng), frs(rng, 4))
}

pub fn nullifier_read(rng: &mut StdRng) -> NullifierReadHint {
    NullifierReadHint::new(
        NullifierLeafPreimage::new(fr(rng), fr(rng), fr(rng)),
        fr(rng),
        frs(rng, 4),
    )
}

pub fn nullifier_write(rng: &mut StdRng) -> NullifierWriteHint {
    NullifierWriteHint::new(nullifier_read(rng), frs(rng, 4))
}

pub fn public_data_leaf(rng: &mut StdRng) -> PublicDataLeafPreimage {
    PublicDataLeafPreimage::new(fr(rng), fr(rng), fr(rng), fr(rng))
}

pub fn public_data_read(rng: &mut StdRng) -> PublicDataReadHint {
    PublicDataReadHint::new(public_data_leaf(rng), fr(rng), frs(rng, 4))
}

pub fn public_data_write(rng: &mut StdRng) -> PublicDataWriteHint {
    PublicDataWriteHint::new(public_data_read(rng), public_data_leaf(rng), frs(rng, 4))
}

pub fn enqueued_call(rng: &mut StdRng) -> EnqueuedCallHint {
    EnqueuedCallHint::new(address(rng), frs(rng, 6))
}

pub fn contract_instance(rng: &mut StdRng) -> ContractInstanceHint {
    ContractInstanceHint {
        address: address(rng),
        exists: rng.gen(),
        salt: fr(rng),
        deployer: address(rng),
        current_class_id: fr(rng),
        original_class_id: fr(rng),
        initialization_hash: fr(rng),
        public_keys: public_keys(rng),
        initialization_membership: nullifier_read(rng),
        update_membership: public_data_read(rng),
        update_preimage: frs(rng, 3),
    }
}

pub fn bytecode_hint(rng: &mut StdRng) -> ContractBytecodeHint {
    let len = rng.gen_range(1..64);
    ContractBytecodeHint::new(
        (0..len).map(|_| rng.gen()).collect(),
        contract_instance(rng),
        ContractClassIdPreimage {
            artifact_hash: fr(rng),
            private_functions_root: fr(rng),
            public_bytecode_commitment: fr(rng),
        },
    )
}

fn many<T>(rng: &mut StdRng, f: impl Fn(&mut StdRng) -> T) -> Vec<T> {
    let len = rng.gen_range(0..4);
    (0..len).map(|_| f(rng)).collect()
}

pub fn execution_hints(rng: &mut StdRng) -> ExecutionHints {
    let mut hints = ExecutionHints {
        enqueued_calls: many(rng, enqueued_call),
        contract_instances: many(rng, contract_instance),
        public_data_reads: many(rng, public_data_read),
        public_data_writes: many(rng, public_data_write),
        nullifier_reads: many(rng, nullifier_read),
        nullifier_writes: many(rng, nullifier_write),
        note_hash_reads: many(rng, append_tree_hint),
        note_hash_writes: many(rng, append_tree_hint),
        l1_to_l2_message_reads: many(rng, append_tree_hint),
        ..ExecutionHints::empty()
    };
    for hint in many(rng, bytecode_hint) {
        hints.add_bytecode_hint(hint);
    }
    hints
}
