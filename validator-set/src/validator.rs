//! A single validator: identity, voting power and rotation priority.

use {
    serde::{Deserialize, Serialize},
    solana_hash::Hash,
    solana_pubkey::Pubkey,
    std::{cmp::Ordering, fmt},
};

/// Length in bytes of a validator address.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-length validator address, ordered lexicographically by its bytes.
///
/// Validator sets are sorted by this value, which fixes the index of every
/// member for the lifetime of a height.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new_from_array(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the address of a public key: the first 20 bytes of its SHA-256 digest.
    pub fn from_pubkey(pubkey: &Pubkey) -> Self {
        let digest = solana_sha256_hasher::hash(pubkey.as_ref()).to_bytes();
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// A validator and its proposer-rotation state.
///
/// `accum` is the running priority used by weighted round-robin proposer
/// selection. It grows by `voting_power` every rotation step and is charged
/// the set's total voting power each time the validator is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub address: Address,
    pub pubkey: Pubkey,
    pub voting_power: u64,
    pub accum: i64,
}

impl Validator {
    /// Create a validator whose address is derived from `pubkey`, with zero accum.
    pub fn new(pubkey: Pubkey, voting_power: u64) -> Self {
        Self {
            address: Address::from_pubkey(&pubkey),
            pubkey,
            voting_power,
            accum: 0,
        }
    }

    /// Key used to rank validators for proposer selection.
    pub fn priority_key(&self) -> (i64, Address) {
        (self.accum, self.address)
    }

    /// Returns whichever of `self` and `other` should propose first.
    pub fn compare_accum<'a>(&'a self, other: &'a Validator) -> &'a Validator {
        match compare_priority(&self.priority_key(), &other.priority_key()) {
            Ordering::Less => other,
            _ => self,
        }
    }

    /// Hash committing to this member's identity and weight.
    ///
    /// `accum` is excluded: it changes every round while membership does not.
    pub fn hash(&self) -> Hash {
        solana_sha256_hasher::hashv(&[
            self.address.as_ref(),
            self.pubkey.as_ref(),
            &self.voting_power.to_le_bytes(),
        ])
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validator{{{} {} VP:{} A:{}}}",
            self.address, self.pubkey, self.voting_power, self.accum
        )
    }
}

/// Total order over `(accum, address)` priority keys.
///
/// Higher accum ranks greater; on equal accum the lower address ranks greater.
/// The order never depends on insertion or iteration order, so every node
/// holding the same set picks the same proposer.
pub fn compare_priority(a: &(i64, Address), b: &(i64, Address)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1))
}
