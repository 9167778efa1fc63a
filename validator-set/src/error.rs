//! Error types for validator set construction and commit verification.

use {crate::validator::Address, thiserror::Error};

/// Errors raised while building, decoding, or bounding a validator set.
#[derive(Error, Debug)]
pub enum ValidatorSetError {
    /// Two members share the same address.
    #[error("duplicate validator address: {0}")]
    DuplicateAddress(Address),

    /// A member was supplied with zero voting power.
    #[error("validator {0} has zero voting power")]
    ZeroVotingPower(Address),

    /// The set has more members than the configured limit.
    #[error("too many validators: {count} (max {max})")]
    TooManyValidators {
        /// Actual member count.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The summed voting power is above the configured limit.
    #[error("total voting power {total} exceeds limit {max}")]
    TotalVotingPowerTooLarge {
        /// Actual total voting power.
        total: u64,
        /// Configured maximum.
        max: u64,
    },

    /// A rotation was requested with more steps than allowed.
    #[error("too many rotation steps: {times} (max {max})")]
    TooManyRotationSteps {
        /// Requested step count.
        times: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A checked rotation of `times` steps would push an accum outside `i64`.
    #[error("rotating {times} step(s) would overflow accum of validator {address}")]
    AccumOverflow {
        /// Requested step count.
        times: u32,
        /// First member, in address order, whose accum would overflow.
        address: Address,
    },

    /// Binary encoding or decoding failed.
    #[error("binary serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON encoding or decoding failed.
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a commit fails to prove a quorum for a block.
///
/// Every variant is terminal for the verification call. Only
/// [`CommitError::InsufficientVotingPower`] is commonly retried by callers,
/// once more precommits have been collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// The commit carries a different number of precommit slots than the set has members.
    #[error("invalid commit -- wrong set size: {expected} vs {actual}")]
    WrongSetSize {
        /// Validator set size.
        expected: usize,
        /// Number of precommit slots in the commit.
        actual: usize,
    },

    /// The commit, or one of its precommits, is for another height.
    #[error("invalid commit -- wrong height: {expected} vs {actual}")]
    WrongHeight {
        /// Height being verified.
        expected: u64,
        /// Height found in the commit or precommit.
        actual: u64,
    },

    /// A precommit was cast in a different round than the commit declares.
    #[error("invalid commit -- wrong round: {expected} vs {actual}")]
    WrongRound {
        /// Round declared by the commit.
        expected: u32,
        /// Round found in the precommit.
        actual: u32,
    },

    /// The vote in the slot is not a precommit.
    #[error("invalid commit -- not precommit @ index {index}")]
    NotPrecommit {
        /// Slot index of the offending vote.
        index: usize,
    },

    /// The signature does not verify against the slot's validator key.
    #[error("invalid commit -- invalid signature @ index {index}")]
    InvalidSignature {
        /// Slot index of the offending vote.
        index: usize,
    },

    /// Signers for the block hold two thirds or less of the total voting power.
    #[error("invalid commit -- insufficient voting power: got {tallied}, needed {needed}")]
    InsufficientVotingPower {
        /// Voting power that signed the target block.
        tallied: u64,
        /// Minimum voting power for a quorum.
        needed: u64,
    },
}

/// Convenience result type for validator set operations.
pub type Result<T> = std::result::Result<T, ValidatorSetError>;
