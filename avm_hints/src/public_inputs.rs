//! Tree snapshots bracketing the execution of a transaction's public calls.
//!
//! The prover treats the public inputs as an opaque, self-delimiting trailer
//! of [`CircuitInputs`](crate::CircuitInputs); this module provides the shape
//! used by default.

use avm_common::Fr;
use serde::{Deserialize, Serialize};

use crate::impl_wire_via_fields;

/// Root of an append-only tree, and where its next leaf would go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendOnlyTreeSnapshot {
    /// Current root.
    pub root: Fr,
    /// Index the next appended leaf gets.
    pub next_available_leaf_index: u32,
}

impl AppendOnlyTreeSnapshot {
    /// A snapshot of a tree at `root`.
    pub fn new(root: Fr, next_available_leaf_index: u32) -> Self {
        Self {
            root,
            next_available_leaf_index,
        }
    }

    /// True for the zero root with nothing appended.
    pub fn is_empty(&self) -> bool {
        self.root.is_zero() && self.next_available_leaf_index == 0
    }

    /// Root, then next available leaf index.
    pub fn to_wire_fields(&self) -> (&Fr, &u32) {
        (&self.root, &self.next_available_leaf_index)
    }

    /// Inverse of [`AppendOnlyTreeSnapshot::to_wire_fields`].
    pub fn from_wire_fields((root, next_available_leaf_index): (Fr, u32)) -> Self {
        Self::new(root, next_available_leaf_index)
    }
}

/// One snapshot per tree the public calls can touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshots {
    /// L1 to L2 message tree.
    pub l1_to_l2_message_tree: AppendOnlyTreeSnapshot,
    /// Note hash tree.
    pub note_hash_tree: AppendOnlyTreeSnapshot,
    /// Nullifier tree.
    pub nullifier_tree: AppendOnlyTreeSnapshot,
    /// Public data tree.
    pub public_data_tree: AppendOnlyTreeSnapshot,
}

impl TreeSnapshots {
    /// True if every snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.l1_to_l2_message_tree.is_empty()
            && self.note_hash_tree.is_empty()
            && self.nullifier_tree.is_empty()
            && self.public_data_tree.is_empty()
    }

    /// The four roots, without leaf indices.
    pub fn roots(&self) -> TreeRoots {
        TreeRoots {
            public_data_tree: self.public_data_tree.root,
            nullifier_tree: self.nullifier_tree.root,
            note_hash_tree: self.note_hash_tree.root,
            l1_to_l2_message_tree: self.l1_to_l2_message_tree.root,
        }
    }

    /// The snapshots in declaration order.
    #[allow(clippy::type_complexity)]
    pub fn to_wire_fields(
        &self,
    ) -> (
        &AppendOnlyTreeSnapshot,
        &AppendOnlyTreeSnapshot,
        &AppendOnlyTreeSnapshot,
        &AppendOnlyTreeSnapshot,
    ) {
        (
            &self.l1_to_l2_message_tree,
            &self.note_hash_tree,
            &self.nullifier_tree,
            &self.public_data_tree,
        )
    }

    /// Inverse of [`TreeSnapshots::to_wire_fields`].
    pub fn from_wire_fields(
        (l1_to_l2_message_tree, note_hash_tree, nullifier_tree, public_data_tree): (
            AppendOnlyTreeSnapshot,
            AppendOnlyTreeSnapshot,
            AppendOnlyTreeSnapshot,
            AppendOnlyTreeSnapshot,
        ),
    ) -> Self {
        Self {
            l1_to_l2_message_tree,
            note_hash_tree,
            nullifier_tree,
            public_data_tree,
        }
    }
}

/// Just the roots of [`TreeSnapshots`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreeRoots {
    /// Public data tree root.
    pub public_data_tree: Fr,
    /// Nullifier tree root.
    pub nullifier_tree: Fr,
    /// Note hash tree root.
    pub note_hash_tree: Fr,
    /// L1 to L2 message tree root.
    pub l1_to_l2_message_tree: Fr,
}

/// Public inputs able to report the tree roots execution started from.
///
/// Needed by [`serialize_for_avm2`](crate::avm2::serialize_for_avm2), which
/// seeds the prover's trees from them.
pub trait StartTreeRoots {
    /// Roots of the trees before any public call ran.
    fn start_tree_roots(&self) -> TreeRoots;
}

/// Tree state before and after the public calls ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicInputs {
    /// Before the first public call.
    pub start_tree_snapshots: TreeSnapshots,
    /// After the last public call.
    pub end_tree_snapshots: TreeSnapshots,
}

impl PublicInputs {
    /// Public inputs spanning `start_tree_snapshots` to `end_tree_snapshots`.
    pub fn new(start_tree_snapshots: TreeSnapshots, end_tree_snapshots: TreeSnapshots) -> Self {
        Self {
            start_tree_snapshots,
            end_tree_snapshots,
        }
    }

    /// All snapshots empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.start_tree_snapshots.is_empty() && self.end_tree_snapshots.is_empty()
    }

    /// Start, then end.
    pub fn to_wire_fields(&self) -> (&TreeSnapshots, &TreeSnapshots) {
        (&self.start_tree_snapshots, &self.end_tree_snapshots)
    }

    /// Inverse of [`PublicInputs::to_wire_fields`].
    pub fn from_wire_fields((start, end): (TreeSnapshots, TreeSnapshots)) -> Self {
        Self::new(start, end)
    }
}

impl StartTreeRoots for PublicInputs {
    fn start_tree_roots(&self) -> TreeRoots {
        self.start_tree_snapshots.roots()
    }
}

impl_wire_via_fields!(AppendOnlyTreeSnapshot, TreeSnapshots, PublicInputs);
