//! Binary SHA-256 Merkle root over an ordered list of hashes.
//!
//! Leaves and inner nodes are domain separated so a leaf can never be
//! reinterpreted as an inner node. A list of `n > 1` items splits into a left
//! subtree of the first `(n + 1) / 2` items and a right subtree of the rest,
//! so the left side is never smaller than the right.

use solana_hash::Hash;

const LEAF_PREFIX: &[u8] = &[0];
const INTERMEDIATE_PREFIX: &[u8] = &[1];

/// Root returned for an empty list.
pub const EMPTY_ROOT: Hash = Hash::new_from_array([0u8; 32]);

fn hash_leaf(item: &Hash) -> Hash {
    solana_sha256_hasher::hashv(&[LEAF_PREFIX, item.as_ref()])
}

fn hash_intermediate(left: &Hash, right: &Hash) -> Hash {
    solana_sha256_hasher::hashv(&[INTERMEDIATE_PREFIX, left.as_ref(), right.as_ref()])
}

/// Merkle root of `items` in the given order.
pub fn merkle_root(items: &[Hash]) -> Hash {
    match items {
        [] => EMPTY_ROOT,
        [item] => hash_leaf(item),
        _ => {
            let (left, right) = items.split_at(items.len().div_ceil(2));
            hash_intermediate(&merkle_root(left), &merkle_root(right))
        }
    }
}
