//! Vote and commit types consumed by commit verification.
//!
//! Defines block identifiers, votes, the per-validator precommit commit
//! structure, and the canonical byte encoding validators sign.

use {
    crate::validator::Address,
    serde::{Deserialize, Serialize},
    solana_hash::Hash,
    solana_signature::Signature,
    solana_signer::Signer,
    std::fmt,
};

// ---------------------------------------------------------------------------
// Block identifiers
// ---------------------------------------------------------------------------

/// Header of the part set a block was split into for gossip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: Hash,
}

/// Identifies a block by its hash and the header of its part set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    pub hash: Hash,
    pub parts: PartSetHeader,
}

impl BlockId {
    pub fn new(hash: Hash, parts: PartSetHeader) -> Self {
        Self { hash, parts }
    }

    /// A nil block id, voted when no valid block was seen.
    pub fn is_nil(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hash, self.parts.total, self.parts.hash)
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// Kind of a consensus vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    Prevote,
    Precommit,
}

impl VoteType {
    /// Tag byte used in sign bytes.
    pub fn tag(self) -> u8 {
        match self {
            VoteType::Prevote => 1,
            VoteType::Precommit => 2,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Prevote => write!(f, "Prevote"),
            VoteType::Precommit => write!(f, "Precommit"),
        }
    }
}

/// A signed vote from a single validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub validator_address: Address,
    /// Index of the voter in the address-sorted validator set for `height`.
    pub validator_index: usize,
    pub height: u64,
    pub round: u32,
    pub vote_type: VoteType,
    pub block_id: BlockId,
    pub signature: Signature,
}

impl Vote {
    /// Create an unsigned vote.
    pub fn new(
        validator_address: Address,
        validator_index: usize,
        height: u64,
        round: u32,
        vote_type: VoteType,
        block_id: BlockId,
    ) -> Self {
        Self {
            validator_address,
            validator_index,
            height,
            round,
            vote_type,
            block_id,
            signature: Signature::default(),
        }
    }

    /// Canonical bytes of this vote for `chain_id`.
    pub fn sign_bytes(&self, chain_id: &str) -> Vec<u8> {
        sign_bytes(chain_id, self)
    }

    /// Sign the vote in place with `signer`.
    pub fn sign(&mut self, chain_id: &str, signer: &impl Signer) {
        self.signature = signer.sign_message(&self.sign_bytes(chain_id));
    }

    /// Builder-style variant of [`Vote::sign`].
    pub fn signed(mut self, chain_id: &str, signer: &impl Signer) -> Self {
        self.sign(chain_id, signer);
        self
    }
}

/// Canonical encoding of a vote payload for signing.
///
/// Layout: `chain_id_len: u64-le | chain_id | height: u64-le | round: u32-le |
/// type: u8 | block_hash: 32 | parts_total: u32-le | parts_hash: 32`.
///
/// The voter's address and index are not signed: the verifying set binds the
/// signature to a key through the slot index.
pub fn sign_bytes(chain_id: &str, vote: &Vote) -> Vec<u8> {
    let chain_id = chain_id.as_bytes();
    let mut buf = Vec::with_capacity(chain_id.len().saturating_add(89));
    buf.extend_from_slice(&(chain_id.len() as u64).to_le_bytes());
    buf.extend_from_slice(chain_id);
    buf.extend_from_slice(&vote.height.to_le_bytes());
    buf.extend_from_slice(&vote.round.to_le_bytes());
    buf.push(vote.vote_type.tag());
    buf.extend_from_slice(vote.block_id.hash.as_ref());
    buf.extend_from_slice(&vote.block_id.parts.total.to_le_bytes());
    buf.extend_from_slice(vote.block_id.parts.hash.as_ref());
    buf
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// Precommits gathered for a block, one slot per validator.
///
/// Slot `i` holds the precommit of the validator at index `i` in the
/// address-sorted set for `height`, or `None` if it did not vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub height: u64,
    pub round: u32,
    pub block_id: BlockId,
    pub precommits: Vec<Option<Vote>>,
}

impl Commit {
    /// An empty commit with `size` vacant slots.
    pub fn new(height: u64, round: u32, block_id: BlockId, size: usize) -> Self {
        Self {
            height,
            round,
            block_id,
            precommits: vec![None; size],
        }
    }

    /// Place `vote` in the slot named by its `validator_index`.
    ///
    /// Returns `false` if the index is outside the commit.
    pub fn add_precommit(&mut self, vote: Vote) -> bool {
        match self.precommits.get_mut(vote.validator_index) {
            Some(slot) => {
                *slot = Some(vote);
                true
            }
            None => false,
        }
    }

    pub fn size(&self) -> usize {
        self.precommits.len()
    }

    /// Number of occupied slots.
    pub fn num_votes(&self) -> usize {
        self.precommits.iter().filter(|slot| slot.is_some()).count()
    }
}
