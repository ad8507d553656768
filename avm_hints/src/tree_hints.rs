//! Authentication paths for the tree reads and writes performed during
//! execution.
//!
//! The nullifier and public data trees are indexed trees: a key that is not
//! in the tree is proven absent through its "low leaf", the leaf with the
//! largest key below it, and an insertion rewrites that low leaf's `next`
//! pointer. Note hashes and L1 to L2 messages live in append-only trees where
//! a leaf index and sibling path are enough.
//!
//! A write hint always encodes as the read hint of its low leaf followed by
//! the write-specific fields, so the prefix of a write hint decodes as a read
//! hint of the same kind.

use avm_common::Fr;

use crate::impl_wire_via_fields;

/// Membership of a leaf in an append-only tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AppendTreeHint {
    /// Index of the leaf.
    pub leaf_index: Fr,
    /// Value stored at the leaf.
    pub value: Fr,
    /// Siblings from the leaf up to the root.
    pub sibling_path: Vec<Fr>,
}

impl AppendTreeHint {
    /// Hint for `value` at `leaf_index`.
    pub fn new(leaf_index: Fr, value: Fr, sibling_path: Vec<Fr>) -> Self {
        Self {
            leaf_index,
            value,
            sibling_path,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The leaf index is not consulted.
    pub fn is_empty(&self) -> bool {
        self.value.is_zero() && self.sibling_path.is_empty()
    }

    /// The fields in wire order.
    pub fn to_wire_fields(&self) -> (&Fr, &Fr, &[Fr]) {
        (&self.leaf_index, &self.value, &self.sibling_path)
    }

    /// Inverse of [`AppendTreeHint::to_wire_fields`].
    pub fn from_wire_fields((leaf_index, value, sibling_path): (Fr, Fr, Vec<Fr>)) -> Self {
        Self::new(leaf_index, value, sibling_path)
    }
}

/// A leaf of the nullifier tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NullifierLeafPreimage {
    /// The nullifier stored in this leaf.
    pub nullifier: Fr,
    /// Smallest nullifier in the tree above this one, zero if none.
    pub next_nullifier: Fr,
    /// Leaf index of `next_nullifier`.
    pub next_index: Fr,
}

impl NullifierLeafPreimage {
    /// A leaf linking `nullifier` to `next_nullifier`.
    pub fn new(nullifier: Fr, next_nullifier: Fr, next_index: Fr) -> Self {
        Self {
            nullifier,
            next_nullifier,
            next_index,
        }
    }

    /// True if all three fields are zero.
    pub fn is_empty(&self) -> bool {
        self.nullifier.is_zero() && self.next_nullifier.is_zero() && self.next_index.is_zero()
    }

    /// The fields in wire order.
    pub fn to_wire_fields(&self) -> (&Fr, &Fr, &Fr) {
        (&self.nullifier, &self.next_nullifier, &self.next_index)
    }

    /// Inverse of [`NullifierLeafPreimage::to_wire_fields`].
    pub fn from_wire_fields((nullifier, next_nullifier, next_index): (Fr, Fr, Fr)) -> Self {
        Self::new(nullifier, next_nullifier, next_index)
    }
}

/// Proof that a nullifier is not yet in the tree, via its low leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NullifierReadHint {
    /// The low leaf.
    pub low_leaf: NullifierLeafPreimage,
    /// Index of the low leaf.
    pub low_leaf_index: Fr,
    /// Siblings of the low leaf, leaf first.
    pub low_leaf_sibling_path: Vec<Fr>,
}

impl NullifierReadHint {
    /// Hint proving `low_leaf` sits at `low_leaf_index`.
    pub fn new(
        low_leaf: NullifierLeafPreimage,
        low_leaf_index: Fr,
        low_leaf_sibling_path: Vec<Fr>,
    ) -> Self {
        Self {
            low_leaf,
            low_leaf_index,
            low_leaf_sibling_path,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only the sibling path is checked: a hint with a populated low leaf but
    /// no path still counts as empty.
    pub fn is_empty(&self) -> bool {
        self.low_leaf_sibling_path.is_empty()
    }

    /// The fields in wire order.
    pub fn to_wire_fields(&self) -> (&NullifierLeafPreimage, &Fr, &[Fr]) {
        (
            &self.low_leaf,
            &self.low_leaf_index,
            &self.low_leaf_sibling_path,
        )
    }

    /// Inverse of [`NullifierReadHint::to_wire_fields`].
    pub fn from_wire_fields(
        (low_leaf, low_leaf_index, low_leaf_sibling_path): (NullifierLeafPreimage, Fr, Vec<Fr>),
    ) -> Self {
        Self::new(low_leaf, low_leaf_index, low_leaf_sibling_path)
    }
}

/// Insertion of a new nullifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NullifierWriteHint {
    /// Read of the low leaf whose `next` pointer changes.
    pub low_leaf_read: NullifierReadHint,
    /// Sibling path of the slot the new leaf went into.
    pub insertion_path: Vec<Fr>,
}

impl NullifierWriteHint {
    /// Insertion hint built on a low leaf's read hint.
    pub fn new(low_leaf_read: NullifierReadHint, insertion_path: Vec<Fr>) -> Self {
        Self {
            low_leaf_read,
            insertion_path,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Empty when there is no insertion path.
    pub fn is_empty(&self) -> bool {
        self.insertion_path.is_empty()
    }

    /// The read hint first, then the insertion path.
    pub fn to_wire_fields(&self) -> (&NullifierReadHint, &[Fr]) {
        (&self.low_leaf_read, &self.insertion_path)
    }

    /// Inverse of [`NullifierWriteHint::to_wire_fields`].
    pub fn from_wire_fields(
        (low_leaf_read, insertion_path): (NullifierReadHint, Vec<Fr>),
    ) -> Self {
        Self::new(low_leaf_read, insertion_path)
    }
}

/// A leaf of the public data tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PublicDataLeafPreimage {
    /// Storage slot.
    pub slot: Fr,
    /// Value held in the slot.
    pub value: Fr,
    /// Leaf index of `next_slot`.
    pub next_index: Fr,
    /// Smallest slot in the tree above this one, zero if none.
    pub next_slot: Fr,
}

impl PublicDataLeafPreimage {
    /// A leaf for `slot`, linked to `next_slot`.
    pub fn new(slot: Fr, value: Fr, next_index: Fr, next_slot: Fr) -> Self {
        Self {
            slot,
            value,
            next_index,
            next_slot,
        }
    }

    /// True if all four fields are zero.
    pub fn is_empty(&self) -> bool {
        self.slot.is_zero()
            && self.value.is_zero()
            && self.next_index.is_zero()
            && self.next_slot.is_zero()
    }

    /// Slot, value, next index, next slot.
    pub fn to_wire_fields(&self) -> (&Fr, &Fr, &Fr, &Fr) {
        (&self.slot, &self.value, &self.next_index, &self.next_slot)
    }

    /// Inverse of [`PublicDataLeafPreimage::to_wire_fields`].
    pub fn from_wire_fields((slot, value, next_index, next_slot): (Fr, Fr, Fr, Fr)) -> Self {
        Self::new(slot, value, next_index, next_slot)
    }
}

/// The current value of a storage slot, or its absence through the low leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PublicDataReadHint {
    /// The leaf holding the slot, or its low leaf.
    pub leaf: PublicDataLeafPreimage,
    /// Index of `leaf`.
    pub leaf_index: Fr,
    /// Siblings of `leaf`, leaf first.
    pub sibling_path: Vec<Fr>,
}

impl PublicDataReadHint {
    /// Hint proving `leaf` sits at `leaf_index`.
    pub fn new(leaf: PublicDataLeafPreimage, leaf_index: Fr, sibling_path: Vec<Fr>) -> Self {
        Self {
            leaf,
            leaf_index,
            sibling_path,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Same narrow rule as [`NullifierReadHint::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.sibling_path.is_empty()
    }

    /// The fields in wire order.
    pub fn to_wire_fields(&self) -> (&PublicDataLeafPreimage, &Fr, &[Fr]) {
        (&self.leaf, &self.leaf_index, &self.sibling_path)
    }

    /// Inverse of [`PublicDataReadHint::to_wire_fields`].
    pub fn from_wire_fields(
        (leaf, leaf_index, sibling_path): (PublicDataLeafPreimage, Fr, Vec<Fr>),
    ) -> Self {
        Self::new(leaf, leaf_index, sibling_path)
    }
}

/// A storage write: the low leaf read, the new leaf and where it went.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PublicDataWriteHint {
    /// Read of the low leaf, or of the leaf being updated.
    pub low_leaf_read: PublicDataReadHint,
    /// The leaf as written.
    pub new_leaf: PublicDataLeafPreimage,
    /// Sibling path of `new_leaf`.
    pub insertion_path: Vec<Fr>,
}

impl PublicDataWriteHint {
    /// Write hint built on a read hint.
    pub fn new(
        low_leaf_read: PublicDataReadHint,
        new_leaf: PublicDataLeafPreimage,
        insertion_path: Vec<Fr>,
    ) -> Self {
        Self {
            low_leaf_read,
            new_leaf,
            insertion_path,
        }
    }

    /// The all-zero hint.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Empty when there is no insertion path.
    pub fn is_empty(&self) -> bool {
        self.insertion_path.is_empty()
    }

    /// The read hint, then the new leaf and its path.
    pub fn to_wire_fields(&self) -> (&PublicDataReadHint, &PublicDataLeafPreimage, &[Fr]) {
        (&self.low_leaf_read, &self.new_leaf, &self.insertion_path)
    }

    /// Inverse of [`PublicDataWriteHint::to_wire_fields`].
    pub fn from_wire_fields(
        (low_leaf_read, new_leaf, insertion_path): (
            PublicDataReadHint,
            PublicDataLeafPreimage,
            Vec<Fr>,
        ),
    ) -> Self {
        Self::new(low_leaf_read, new_leaf, insertion_path)
    }
}

impl_wire_via_fields!(
    AppendTreeHint,
    NullifierLeafPreimage,
    NullifierReadHint,
    NullifierWriteHint,
    PublicDataLeafPreimage,
    PublicDataReadHint,
    PublicDataWriteHint,
);
