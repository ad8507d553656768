//! Wire format properties over randomly generated hints.

mod common;

use avm_hints::{
    AppendTreeHint, CircuitInputs, ContractBytecodeHint, ContractInstanceHint, Decode,
    DecodeError, DecodeLimits, Encode, EnqueuedCallHint, ExecutionHints, NullifierReadHint,
    NullifierWriteHint, PublicDataReadHint, PublicDataWriteHint, PublicInputs,
};
use common::*;

fn assert_round_trips<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: &T) {
    let bytes = value.to_bytes();
    assert_eq!(&T::from_bytes(&bytes).unwrap(), value);
    assert_eq!(&T::from_hex(&value.to_hex()).unwrap(), value);
}

#[test]
fn leaf_hints() {
    common_setup();
    let mut rng = rng(1);
    for _ in 0..16 {
        assert_round_trips(&append_tree_hint(&mut rng));
        assert_round_trips(&nullifier_read(&mut rng));
        assert_round_trips(&nullifier_write(&mut rng));
        assert_round_trips(&public_data_read(&mut rng));
        assert_round_trips(&public_data_write(&mut rng));
    }
}

#[test]
fn contract_hints() {
    common_setup();
    let mut rng = rng(2);
    for _ in 0..16 {
        assert_round_trips(&enqueued_call(&mut rng));
        assert_round_trips(&contract_instance(&mut rng));
        assert_round_trips(&bytecode_hint(&mut rng));
    }
}

#[test]
fn execution_and_circuit_inputs() {
    common_setup();
    let mut rng = rng(3);
    for i in 0..8 {
        let hints = execution_hints(&mut rng);
        assert_round_trips(&hints);
        let calldata = frs(&mut rng, 5);
        assert_round_trips(&CircuitInputs::new(
            format!("fn_{i}"),
            calldata,
            hints,
            PublicInputs::empty(),
        ));
    }
}

#[test]
fn empty_values_round_trip_as_empty() {
    common_setup();
    macro_rules! check_empty {
        ($($ty:ty),+) => {$(
            let empty = <$ty>::empty();
            assert!(empty.is_empty(), "{}", stringify!($ty));
            let decoded = <$ty>::from_bytes(&empty.to_bytes()).unwrap();
            assert!(decoded.is_empty(), "{}", stringify!($ty));
            assert_eq!(decoded, empty);
        )+};
    }
    check_empty!(
        AppendTreeHint,
        NullifierReadHint,
        NullifierWriteHint,
        PublicDataReadHint,
        PublicDataWriteHint,
        EnqueuedCallHint,
        ContractInstanceHint,
        ContractBytecodeHint,
        ExecutionHints,
        PublicInputs
    );
}

#[test]
fn every_strict_prefix_is_truncated() {
    common_setup();
    let mut rng = rng(4);
    let inputs = CircuitInputs::new(
        "prefix",
        frs(&mut rng, 3),
        execution_hints(&mut rng),
        PublicInputs::empty(),
    );
    let bytes = inputs.to_bytes();
    for len in 0..bytes.len() {
        match CircuitInputs::<PublicInputs>::from_bytes(&bytes[..len]) {
            Err(DecodeError::TruncatedInput { needed, remaining }) => {
                assert!(needed > remaining, "prefix of {len} bytes")
            }
            other => panic!("prefix of {len} bytes decoded to {other:?}"),
        }
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    common_setup();
    let mut rng = rng(5);
    let hints = execution_hints(&mut rng);
    let mut bytes = hints.to_bytes();
    bytes.extend(std::iter::repeat(0xab).take(17));
    assert_eq!(ExecutionHints::from_bytes(&bytes).unwrap(), hints);
}

#[test]
fn non_canonical_field_is_rejected() {
    common_setup();
    let call = EnqueuedCallHint::new(Default::default(), vec![Default::default()]);
    let mut bytes = call.to_bytes();
    // the single calldata element
    bytes[36..68].fill(0xff);
    assert_eq!(
        EnqueuedCallHint::from_bytes(&bytes),
        Err(DecodeError::NonCanonicalField([0xff; 32]))
    );
}

#[test]
fn oversized_length_prefix_is_malformed() {
    common_setup();
    let mut bytes = ExecutionHints::empty().to_bytes();
    bytes[..4].copy_from_slice(&u32::MAX.to_be_bytes());
    assert_eq!(
        ExecutionHints::from_bytes(&bytes),
        Err(DecodeError::MalformedLength {
            declared: u32::MAX,
            max: DecodeLimits::default().max_vector_len,
        })
    );
    // within the limits, but not backed by any bytes
    assert!(matches!(
        ExecutionHints::from_bytes_with_limits(&bytes, DecodeLimits::UNBOUNDED),
        Err(DecodeError::TruncatedInput { .. })
    ));
}

#[test]
fn unbacked_count_fails_without_reserving_for_it() {
    common_setup();
    // 64Mi hints declared, backed by 16 MiB of zeros. An all-zero hint is
    // well formed, so decoding runs until the bytes run out. Reserving room
    // for the declared count up front would need tens of gigabytes.
    let mut bytes = (64u32 << 20).to_be_bytes().to_vec();
    bytes.resize(4 + (16 << 20), 0);
    match Vec::<ContractBytecodeHint>::from_bytes_with_limits(&bytes, DecodeLimits::UNBOUNDED) {
        Err(DecodeError::TruncatedInput { needed, remaining }) => assert!(needed > remaining),
        other => panic!("expected truncated input, got {:?}", other.map(|it| it.len())),
    }
}

#[test]
fn bytecode_hints_are_written_in_address_order() {
    common_setup();
    let mut rng = rng(6);
    let mut hints = ExecutionHints::empty();
    for _ in 0..8 {
        hints.add_bytecode_hint(bytecode_hint(&mut rng));
    }
    let decoded = ExecutionHints::from_bytes(&hints.to_bytes()).unwrap();
    itertools::assert_equal(
        decoded.bytecode_hints().map(|it| it.address()),
        hints.bytecode_by_address.keys().copied(),
    );
    assert!(decoded
        .bytecode_hints()
        .zip(decoded.bytecode_hints().skip(1))
        .all(|(a, b)| a.address() < b.address()));
}

#[test]
fn read_hint_emptiness_only_considers_the_path() {
    common_setup();
    let mut rng = rng(7);
    let mut hint = nullifier_read(&mut rng);
    hint.low_leaf_sibling_path.clear();
    assert!(hint.is_empty());

    let mut hint = public_data_read(&mut rng);
    hint.sibling_path.clear();
    assert!(hint.is_empty());
}
