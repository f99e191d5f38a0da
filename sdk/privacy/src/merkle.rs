//! Merkle Accumulator for Value Commitments
//!
//! Append-only, fixed-depth tree. Used for proving a commitment is in the set
//! without revealing which one.
//!
//! ```text
//!                    Root
//!                   /    \
//!                 H01    H23
//!                /  \   /   \
//!               C0  C1 C2   d0        d0 = default leaf (0)
//! ```
//!
//! A node with no leaves beneath it is never hashed: it takes the precomputed
//! default of its level, `d[0] = 0`, `d[k+1] = Hash2(d[k], d[k])`.

use ark_bn254::Fr;
use ark_ff::{PrimeField, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commitment::{Commitment, field_to_bytes};
use crate::hasher::{FieldHasher, PoseidonHasher};

/// Tree depth (supports 2^16 commitments)
pub const TREE_DEPTH: usize = 16;

/// Maximum number of leaves
pub const TREE_CAPACITY: u64 = 1 << TREE_DEPTH;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("merkle tree is full ({capacity} leaves)")]
    TreeFull { capacity: u64 },

    #[error("leaf index {index} out of range (tree has {len} leaves)")]
    IndexOutOfRange { index: u64, len: u64 },
}

/// A Merkle path proving inclusion of a leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Sibling hashes from leaf to root
    pub siblings: Vec<[u8; 32]>,
    /// Position bits (0 = left, 1 = right)
    pub path_bits: Vec<bool>,
    /// The leaf position
    pub position: u64,
}

impl MerklePath {
    /// Recombine `leaf` with the path
    pub fn compute_root<H: FieldHasher>(&self, hasher: &H, leaf: &Commitment) -> Fr {
        let mut current = leaf.to_field();

        for (sibling, is_right) in self.to_field_elements().into_iter().zip(&self.path_bits) {
            current = if *is_right {
                hasher.hash2(sibling, current)
            } else {
                hasher.hash2(current, sibling)
            };
        }

        current
    }

    /// Verify that this path proves inclusion of `leaf` in `root`
    pub fn verify<H: FieldHasher>(
        &self,
        hasher: &H,
        leaf: &Commitment,
        root: &Commitment,
    ) -> bool {
        self.siblings.len() == TREE_DEPTH
            && self.path_bits.len() == TREE_DEPTH
            && self.compute_root(hasher, leaf) == root.to_field()
    }

    /// Get the authentication path as field elements (for ZK circuits)
    pub fn to_field_elements(&self) -> Vec<Fr> {
        self.siblings
            .iter()
            .map(|s| Fr::from_le_bytes_mod_order(s))
            .collect()
    }
}

/// Append-only Merkle tree of commitments
pub struct MerkleTree<H: FieldHasher = PoseidonHasher> {
    leaves: Vec<Fr>,
    /// `defaults[level]` is the root of an all-empty subtree of height `level`
    defaults: Vec<Fr>,
    hasher: H,
}

impl MerkleTree<PoseidonHasher> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::with_hasher(PoseidonHasher::new())
    }
}

impl Default for MerkleTree<PoseidonHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: FieldHasher> MerkleTree<H> {
    pub fn with_hasher(hasher: H) -> Self {
        let mut defaults = Vec::with_capacity(TREE_DEPTH + 1);
        let mut current = Fr::zero();
        defaults.push(current);
        for _ in 0..TREE_DEPTH {
            current = hasher.hash2(current, current);
            defaults.push(current);
        }

        Self {
            leaves: Vec::new(),
            defaults,
            hasher,
        }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of leaves inserted so far
    pub fn len(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Default (all-empty subtree) hash at `level`, 0 being the leaf level
    pub fn default_hash(&self, level: usize) -> Fr {
        self.defaults[level]
    }

    /// Get commitment at position
    pub fn leaf(&self, index: u64) -> Option<Commitment> {
        self.leaves
            .get(index as usize)
            .map(|f| Commitment::from_field(*f))
    }

    /// Append a commitment and return its leaf index
    pub fn insert(&mut self, commitment: &Commitment) -> Result<u64, MerkleError> {
        let index = self.len();
        if index >= TREE_CAPACITY {
            return Err(MerkleError::TreeFull {
                capacity: TREE_CAPACITY,
            });
        }
        self.leaves.push(commitment.to_field());
        log::debug!("merkle insert at {index}");
        Ok(index)
    }

    /// Root computed bottom-up, one level at a time.
    pub fn root(&self) -> Commitment {
        let mut level = self.leaves.clone();

        for height in 0..TREE_DEPTH {
            if level.is_empty() {
                return Commitment::from_field(self.defaults[TREE_DEPTH]);
            }
            level = self.next_level(&level, height);
        }

        Commitment::from_field(level[0])
    }

    /// Root computed top-down, recursing only into subtrees that hold leaves.
    pub fn root_optimized(&self) -> Commitment {
        Commitment::from_field(self.node(TREE_DEPTH, 0))
    }

    /// Authentication path for the leaf at `index`
    pub fn proof(&self, index: u64) -> Result<MerklePath, MerkleError> {
        if index >= self.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        let mut path_bits = Vec::with_capacity(TREE_DEPTH);
        let mut level = self.leaves.clone();
        let mut current = index as usize;

        for height in 0..TREE_DEPTH {
            let is_right = current & 1 == 1;
            let sibling = level
                .get(current ^ 1)
                .copied()
                .unwrap_or(self.defaults[height]);

            siblings.push(field_to_bytes(sibling));
            path_bits.push(is_right);

            level = self.next_level(&level, height);
            current /= 2;
        }

        Ok(MerklePath {
            siblings,
            path_bits,
            position: index,
        })
    }

    fn next_level(&self, level: &[Fr], height: usize) -> Vec<Fr> {
        level
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).copied().unwrap_or(self.defaults[height]);
                self.hasher.hash2(pair[0], right)
            })
            .collect()
    }

    fn node(&self, height: usize, index: u64) -> Fr {
        if index << height >= self.len() {
            return self.defaults[height];
        }
        if height == 0 {
            return self.leaves[index as usize];
        }
        let left = self.node(height - 1, 2 * index);
        let right = self.node(height - 1, 2 * index + 1);
        self.hasher.hash2(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheap, order-sensitive stand-in for Poseidon in structural tests
    struct LinearHasher;

    impl FieldHasher for LinearHasher {
        fn hash(&self, inputs: &[Fr]) -> Fr {
            inputs
                .iter()
                .fold(Fr::from(1u64), |acc, x| acc * Fr::from(31u64) + x)
        }
    }

    fn commitment(i: u64) -> Commitment {
        Commitment::from_field(Fr::from(i + 1))
    }

    #[test]
    fn test_empty_tree() {
        let tree = MerkleTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root().to_field(), tree.default_hash(TREE_DEPTH));
        assert_eq!(tree.root(), tree.root_optimized());
    }

    #[test]
    fn test_single_leaf() {
        let mut tree = MerkleTree::new();
        let c = commitment(0);
        assert_eq!(tree.insert(&c).unwrap(), 0);

        assert_eq!(tree.root(), tree.root_optimized());

        let path = tree.proof(0).unwrap();
        assert!(path.verify(tree.hasher(), &c, &tree.root()));
    }

    #[test]
    fn test_insert_and_path() {
        let mut tree = MerkleTree::new();

        let c1 = commitment(1);
        let c2 = commitment(2);
        let c3 = commitment(3);

        assert_eq!(tree.insert(&c1).unwrap(), 0);
        assert_eq!(tree.insert(&c2).unwrap(), 1);
        assert_eq!(tree.insert(&c3).unwrap(), 2);

        let root = tree.root();
        assert_eq!(root, tree.root_optimized());

        for (i, c) in [c1, c2, c3].iter().enumerate() {
            let path = tree.proof(i as u64).unwrap();
            assert_eq!(path.position, i as u64);
            assert!(path.verify(tree.hasher(), c, &root));
        }
    }

    #[test]
    fn test_path_invalid_commitment() {
        let mut tree = MerkleTree::new();
        tree.insert(&commitment(1)).unwrap();

        let path = tree.proof(0).unwrap();
        assert!(!path.verify(tree.hasher(), &commitment(99), &tree.root()));
    }

    #[test]
    fn test_root_changes() {
        let mut tree = MerkleTree::new();
        let root0 = tree.root();

        tree.insert(&commitment(1)).unwrap();
        let root1 = tree.root();
        assert_ne!(root0, root1, "root should change after insert");

        tree.insert(&commitment(2)).unwrap();
        let root2 = tree.root();
        assert_ne!(root1, root2, "root should change after each insert");
    }

    #[test]
    fn test_proof_out_of_range() {
        let mut tree = MerkleTree::with_hasher(LinearHasher);
        tree.insert(&commitment(0)).unwrap();

        assert_eq!(
            tree.proof(1),
            Err(MerkleError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_defaults_ladder() {
        let tree = MerkleTree::with_hasher(LinearHasher);
        assert_eq!(tree.default_hash(0), Fr::zero());
        for level in 0..TREE_DEPTH {
            let d = tree.default_hash(level);
            assert_eq!(tree.default_hash(level + 1), LinearHasher.hash2(d, d));
        }
    }

    #[test]
    fn test_root_equivalence_small_sizes() {
        let mut tree = MerkleTree::with_hasher(LinearHasher);
        for i in 0..70 {
            assert_eq!(tree.root(), tree.root_optimized(), "{i} leaves");
            tree.insert(&commitment(i)).unwrap();
        }
    }

    #[test]
    fn test_nearly_full_tree() {
        let mut tree = MerkleTree::with_hasher(LinearHasher);
        for i in 0..TREE_CAPACITY - 1 {
            tree.insert(&commitment(i)).unwrap();
        }
        assert_eq!(tree.len(), 65535);

        let root = tree.root();
        assert_eq!(root, tree.root_optimized());

        for j in [0, 1, 32768, 65534] {
            let path = tree.proof(j).unwrap();
            assert!(path.verify(tree.hasher(), &commitment(j), &root), "leaf {j}");
        }
    }

    #[test]
    fn test_full_tree_rejects_insert() {
        let mut tree = MerkleTree::with_hasher(LinearHasher);
        for i in 0..TREE_CAPACITY {
            tree.insert(&commitment(i)).unwrap();
        }
        assert_eq!(
            tree.insert(&commitment(0)),
            Err(MerkleError::TreeFull {
                capacity: TREE_CAPACITY
            })
        );
        assert_eq!(tree.root(), tree.root_optimized());
    }
}
