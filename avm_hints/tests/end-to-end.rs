//! One enqueued call against one deployed contract, through both formats.

mod common;

use avm_hints::{
    avm2::{self, Avm2Error},
    AztecAddress, CircuitInputs, ContractBytecodeHint, ContractClassIdPreimage,
    ContractInstanceHint, Decode, Encode, EnqueuedCallHint, ExecutionHints, Fr, PublicInputs,
};
use ciborium::value::Value;
use common::common_setup;
use hex_literal::hex;

const CONTRACT: u64 = 0xa;

fn scenario() -> CircuitInputs {
    let mut hints = ExecutionHints::empty();
    hints.add_enqueued_call(EnqueuedCallHint::new(
        AztecAddress::from(CONTRACT),
        vec![Fr::from(1), Fr::from(2)],
    ));
    hints.add_contract_instance(ContractInstanceHint {
        address: AztecAddress::from(CONTRACT),
        exists: true,
        ..ContractInstanceHint::empty()
    });
    CircuitInputs::new("public_dispatch", vec![], hints, PublicInputs::default())
}

#[test]
fn binary_form() {
    common_setup();
    let inputs = scenario();
    let bytes = inputs.to_bytes();

    // name, then no calldata
    assert_eq!(bytes[..4], hex!("0000000f"));
    assert_eq!(&bytes[4..19], b"public_dispatch");
    assert_eq!(bytes[19..23], hex!("00000000"));
    // one enqueued call, to CONTRACT, with two arguments
    assert_eq!(bytes[23..27], hex!("00000001"));
    assert_eq!(bytes[27..59], Fr::from(CONTRACT).to_be_bytes());
    assert_eq!(bytes[59..63], hex!("00000002"));
    // one instance, which exists
    assert_eq!(bytes[127..131], hex!("00000001"));
    assert_eq!(bytes[131..163], Fr::from(CONTRACT).to_be_bytes());
    assert_eq!(bytes[163], 1);

    let decoded = CircuitInputs::<PublicInputs>::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, inputs);
    assert_eq!(decoded.hints.contract_instances.len(), 1);
    assert!(decoded.hints.contract_instances[0].exists);
    assert!(decoded.public_inputs.is_empty());
}

#[test]
fn json_form() {
    common_setup();
    let inputs = scenario();
    let json = serde_json::to_value(&inputs).unwrap();
    assert_eq!(json.as_str(), Some(inputs.to_hex().as_str()));
    assert_eq!(serde_json::from_value::<CircuitInputs>(json).unwrap(), inputs);
}

#[test]
fn avm2_form() {
    common_setup();
    let mut inputs = scenario();
    // avm2 only sees contracts with bytecode
    let instance = inputs.hints.contract_instances[0].clone();
    inputs.hints.add_bytecode_hint(ContractBytecodeHint::new(
        vec![0x01, 0x02, 0x03],
        instance,
        ContractClassIdPreimage::default(),
    ));

    let bytes = avm2::serialize_for_avm2(&inputs).unwrap();
    let value: Value = ciborium::de::from_reader(bytes.as_slice()).unwrap();
    assert_eq!(value, avm2::avm2_value(&inputs).unwrap());

    let calls = value
        .as_map()
        .unwrap()
        .iter()
        .find(|(k, _)| k.as_text() == Some("enqueuedCalls"))
        .and_then(|(_, v)| v.as_array())
        .unwrap();
    assert_eq!(calls.len(), 1);
}

#[test]
fn avm2_refuses_infinity() {
    common_setup();
    let mut inputs = scenario();
    let mut instance = inputs.hints.contract_instances[0].clone();
    instance.public_keys.master_nullifier_public_key.is_infinite = true;
    inputs
        .hints
        .add_bytecode_hint(ContractBytecodeHint::new(vec![0], instance, Default::default()));

    assert!(matches!(
        avm2::serialize_for_avm2(&inputs),
        Err(Avm2Error::UnsupportedValue(_))
    ));
}
