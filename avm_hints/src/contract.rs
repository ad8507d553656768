//! Contract metadata: the enqueued calls, the instances they touch and the
//! bytecode that was executed for them.

use anyhow::{bail, Context as _};
use avm_common::{AztecAddress, Fr, PublicKeys};
use log::trace;

use crate::{
    impl_wire_via_fields,
    tree_hints::{NullifierReadHint, PublicDataReadHint},
    wire::Blob,
};

/// One top-level public call of the transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnqueuedCallHint {
    /// The called contract.
    pub contract_address: AztecAddress,
    /// Arguments of the call.
    pub calldata: Vec<Fr>,
}

impl EnqueuedCallHint {
    /// Hint for a call to `contract_address` with `calldata`.
    pub fn new(contract_address: AztecAddress, calldata: Vec<Fr>) -> Self {
        Self {
            contract_address,
            calldata,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if the address is zero and there is no calldata.
    pub fn is_empty(&self) -> bool {
        self.contract_address.is_zero() && self.calldata.is_empty()
    }

    /// The fields in wire order.
    pub fn to_wire_fields(&self) -> (&AztecAddress, &[Fr]) {
        (&self.contract_address, &self.calldata)
    }

    /// Inverse of [`EnqueuedCallHint::to_wire_fields`].
    pub fn from_wire_fields((contract_address, calldata): (AztecAddress, Vec<Fr>)) -> Self {
        Self::new(contract_address, calldata)
    }
}

/// Snapshot of a contract instance as seen by the executed calls.
///
/// `initialization_membership` proves (non-)existence of the deployment
/// nullifier, `update_membership` proves that `update_preimage` matches the
/// class upgrade data held in public storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContractInstanceHint {
    /// Address the instance is deployed at.
    pub address: AztecAddress,
    /// Whether the instance was found.
    pub exists: bool,
    /// Deployment salt.
    pub salt: Fr,
    /// Account that deployed the instance.
    pub deployer: AztecAddress,
    /// Class in effect at the time of execution.
    pub current_class_id: Fr,
    /// Class the instance was deployed with.
    pub original_class_id: Fr,
    /// Hash of the initializer call, zero if there is none.
    pub initialization_hash: Fr,
    /// The instance's master public keys.
    pub public_keys: PublicKeys,
    /// Membership of the deployment nullifier.
    pub initialization_membership: NullifierReadHint,
    /// Membership of the class upgrade data.
    pub update_membership: PublicDataReadHint,
    /// Preimage of the class upgrade data.
    pub update_preimage: Vec<Fr>,
}

type ContractInstanceFields = (
    AztecAddress,
    bool,
    Fr,
    AztecAddress,
    Fr,
    Fr,
    Fr,
    PublicKeys,
    NullifierReadHint,
    PublicDataReadHint,
    Vec<Fr>,
);

impl ContractInstanceHint {
    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True only if every field, both proofs and the preimage included, is
    /// zero or empty.
    pub fn is_empty(&self) -> bool {
        self.address.is_zero()
            && !self.exists
            && self.salt.is_zero()
            && self.deployer.is_zero()
            && self.current_class_id.is_zero()
            && self.original_class_id.is_zero()
            && self.initialization_hash.is_zero()
            && self.public_keys.is_empty()
            && self.initialization_membership.is_empty()
            && self.update_membership.is_empty()
            && self.update_preimage.is_empty()
    }

    /// The fields in wire order, which is declaration order.
    #[allow(clippy::type_complexity)]
    pub fn to_wire_fields(
        &self,
    ) -> (
        &AztecAddress,
        &bool,
        &Fr,
        &AztecAddress,
        &Fr,
        &Fr,
        &Fr,
        &PublicKeys,
        &NullifierReadHint,
        &PublicDataReadHint,
        &[Fr],
    ) {
        (
            &self.address,
            &self.exists,
            &self.salt,
            &self.deployer,
            &self.current_class_id,
            &self.original_class_id,
            &self.initialization_hash,
            &self.public_keys,
            &self.initialization_membership,
            &self.update_membership,
            &self.update_preimage,
        )
    }

    /// Inverse of [`ContractInstanceHint::to_wire_fields`].
    pub fn from_wire_fields(
        (
            address,
            exists,
            salt,
            deployer,
            current_class_id,
            original_class_id,
            initialization_hash,
            public_keys,
            initialization_membership,
            update_membership,
            update_preimage,
        ): ContractInstanceFields,
    ) -> Self {
        Self {
            address,
            exists,
            salt,
            deployer,
            current_class_id,
            original_class_id,
            initialization_hash,
            public_keys,
            initialization_membership,
            update_membership,
            update_preimage,
        }
    }
}

/// The values a contract class id is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContractClassIdPreimage {
    /// Hash of the contract artifact.
    pub artifact_hash: Fr,
    /// Root of the private functions tree.
    pub private_functions_root: Fr,
    /// Commitment to the packed public bytecode.
    pub public_bytecode_commitment: Fr,
}

impl ContractClassIdPreimage {
    /// The three hashes, in declaration order.
    pub fn to_wire_fields(&self) -> (&Fr, &Fr, &Fr) {
        (
            &self.artifact_hash,
            &self.private_functions_root,
            &self.public_bytecode_commitment,
        )
    }

    /// Inverse of [`ContractClassIdPreimage::to_wire_fields`].
    pub fn from_wire_fields(
        (artifact_hash, private_functions_root, public_bytecode_commitment): (Fr, Fr, Fr),
    ) -> Self {
        Self {
            artifact_hash,
            private_functions_root,
            public_bytecode_commitment,
        }
    }
}

/// The bytecode executed for one contract, with the instance and class data
/// that tie it to the contract's address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContractBytecodeHint {
    /// The packed bytecode.
    pub bytecode: Vec<u8>,
    /// The instance the bytecode was fetched for.
    pub instance: ContractInstanceHint,
    /// Preimage of the instance's current class id.
    pub class_preimage: ContractClassIdPreimage,
}

impl ContractBytecodeHint {
    /// Hint for `bytecode`, executed as `instance`.
    pub fn new(
        bytecode: Vec<u8>,
        instance: ContractInstanceHint,
        class_preimage: ContractClassIdPreimage,
    ) -> Self {
        Self {
            bytecode,
            instance,
            class_preimage,
        }
    }

    /// A hint with no bytecode and a zero instance.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The address this hint is keyed by.
    pub fn address(&self) -> AztecAddress {
        self.instance.address
    }

    /// True when there is no bytecode, whatever the instance holds.
    pub fn is_empty(&self) -> bool {
        self.bytecode.is_empty()
    }

    /// Bytecode, instance, class preimage.
    pub fn to_wire_fields(&self) -> (Blob<&[u8]>, &ContractInstanceHint, &ContractClassIdPreimage) {
        (
            Blob(self.bytecode.as_slice()),
            &self.instance,
            &self.class_preimage,
        )
    }

    /// Inverse of [`ContractBytecodeHint::to_wire_fields`].
    pub fn from_wire_fields(
        (Blob(bytecode), instance, class_preimage): (
            Blob<Vec<u8>>,
            ContractInstanceHint,
            ContractClassIdPreimage,
        ),
    ) -> Self {
        Self::new(bytecode, instance, class_preimage)
    }
}

impl_wire_via_fields!(
    EnqueuedCallHint,
    ContractInstanceHint,
    ContractClassIdPreimage,
    ContractBytecodeHint,
);

/// A class as stored by a contract database.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractClass {
    /// Values the class id is derived from.
    pub preimage: ContractClassIdPreimage,
    /// Public bytecode of the class.
    pub packed_bytecode: Vec<u8>,
}

/// Read access to deployed contracts, as provided by the node's contract
/// database. Only the interface lives here.
pub trait ContractsSource {
    /// The instance hint for `address`. Contracts that were never deployed
    /// still get a hint, with `exists` unset and the non-membership proof.
    fn contract_instance(&self, address: AztecAddress) -> anyhow::Result<ContractInstanceHint>;

    /// The class with id `class_id`, if the database has it.
    fn contract_class(&self, class_id: Fr) -> anyhow::Result<Option<ContractClass>>;
}

/// Assembles the bytecode hint for the contract at `address`, or `None` if no
/// contract is deployed there.
pub fn bytecode_hint_for<S: ContractsSource + ?Sized>(
    source: &S,
    address: AztecAddress,
) -> anyhow::Result<Option<ContractBytecodeHint>> {
    let instance = source
        .contract_instance(address)
        .with_context(|| format!("couldn't fetch contract instance {address}"))?;
    if !instance.exists {
        trace!("no contract deployed at {address}");
        return Ok(None);
    }
    if instance.address != address {
        bail!(
            "contract source returned instance {} when asked for {address}",
            instance.address
        );
    }
    let class_id = instance.current_class_id;
    let Some(class) = source
        .contract_class(class_id)
        .with_context(|| format!("couldn't fetch contract class {class_id}"))?
    else {
        bail!("contract class {class_id} of {address} not found");
    };
    Ok(Some(ContractBytecodeHint::new(
        class.packed_bytecode,
        instance,
        class.preimage,
    )))
}
