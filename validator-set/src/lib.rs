//! TRv1 BFT validator set
//!
//! The validator registry shared by every node of a BFT consensus network:
//!
//! 1. **Registry** - An address-sorted set of validators with voting power and
//!    a proposer priority ("accum"), with cached total voting power and a
//!    Merkle commitment over its members.
//! 2. **Proposer rotation** - Deterministic weighted round-robin over the set,
//!    so each validator proposes with frequency proportional to its voting
//!    power.
//! 3. **Commit verification** - Checks that a commit carries valid precommits
//!    from strictly more than two thirds of the voting power.
//!
//! Every node must reach the same proposer and the same verdicts from the
//! same inputs, so ordering and tie-breaks are fixed:
//!
//! - validators are ordered by address, ascending;
//! - rotation ranks by highest accum, then lowest address.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ValidatorSet                 │
//! │  ┌───────────┐  ┌────────────┐  ┌─────────┐  │
//! │  │ Validator │  │   Merkle   │  │ Limits  │  │
//! │  │ (sorted)  │  │    hash    │  │         │  │
//! │  └───────────┘  └────────────┘  └─────────┘  │
//! │  ┌──────────────────────┐  ┌──────────────┐  │
//! │  │  Proposer rotation   │  │    Commit    │  │
//! │  │   (PriorityQueue)    │  │ verification │  │
//! │  └──────────────────────┘  └──────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod commit;
pub mod config;
pub mod error;
pub mod merkle;
pub mod priority_queue;
pub mod proposer;
pub mod types;
pub mod validator;
pub mod validator_set;

// Re-exports for convenience
pub use config::{ConfigError, ValidatorSetLimits, MAX_TOTAL_VOTING_POWER};
pub use error::{CommitError, Result, ValidatorSetError};
pub use priority_queue::PriorityQueue;
pub use proposer::is_proposer;
pub use types::{sign_bytes, BlockId, Commit, PartSetHeader, Vote, VoteType};
pub use validator::{compare_priority, Address, Validator, ADDRESS_LEN};
#[cfg(any(test, feature = "dev-context-only-utils"))]
pub use validator_set::random_validator_set;
pub use validator_set::ValidatorSet;
