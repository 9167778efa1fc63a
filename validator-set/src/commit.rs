//! Commit verification.
//!
//! A commit proves a block was decided when validators holding strictly more
//! than two thirds of the total voting power signed precommits for that block
//! at the commit's height and round.

use {
    crate::{
        error::CommitError,
        types::{BlockId, Commit, VoteType},
        validator_set::ValidatorSet,
    },
    log::*,
};

impl ValidatorSet {
    /// Minimum voting power for a quorum: `floor(total * 2 / 3) + 1`.
    pub fn quorum_threshold(&self) -> u64 {
        two_thirds(self.total_voting_power()).saturating_add(1)
    }

    /// Verify that `commit` carries a quorum of valid precommits for
    /// `block_id` at `height` on `chain_id`.
    ///
    /// Slot `i` of the commit is checked against the validator at index `i`.
    /// Empty slots are skipped. A correctly signed precommit for a different
    /// block is skipped without being tallied. Any malformed or badly signed
    /// precommit fails the whole call.
    pub fn verify_commit(
        &self,
        chain_id: &str,
        block_id: &BlockId,
        height: u64,
        commit: &Commit,
    ) -> Result<(), CommitError> {
        if self.len() != commit.precommits.len() {
            return Err(CommitError::WrongSetSize {
                expected: self.len(),
                actual: commit.precommits.len(),
            });
        }
        if height != commit.height {
            return Err(CommitError::WrongHeight {
                expected: height,
                actual: commit.height,
            });
        }

        let round = commit.round;
        let mut tallied: u64 = 0;

        for (index, precommit) in commit.precommits.iter().enumerate() {
            // Validator did not vote.
            let Some(precommit) = precommit else {
                continue;
            };
            if precommit.height != height {
                return Err(CommitError::WrongHeight {
                    expected: height,
                    actual: precommit.height,
                });
            }
            if precommit.round != round {
                return Err(CommitError::WrongRound {
                    expected: round,
                    actual: precommit.round,
                });
            }
            if precommit.vote_type != VoteType::Precommit {
                return Err(CommitError::NotPrecommit { index });
            }

            let (_, validator) = self.get_by_index(index);
            let sign_bytes = precommit.sign_bytes(chain_id);
            if !precommit
                .signature
                .verify(validator.pubkey.as_ref(), &sign_bytes)
            {
                warn!(
                    "invalid precommit signature at index {index} from {} for height {height}",
                    validator.address
                );
                return Err(CommitError::InvalidSignature { index });
            }

            if precommit.block_id != *block_id {
                // Not an error, but doesn't count.
                continue;
            }
            tallied = tallied.saturating_add(validator.voting_power);
        }

        let total = self.total_voting_power();
        if tallied > two_thirds(total) {
            debug!("commit for height {height} round {round} verified with {tallied}/{total}");
            Ok(())
        } else {
            Err(CommitError::InsufficientVotingPower {
                tallied,
                needed: self.quorum_threshold(),
            })
        }
    }
}

/// `floor(total * 2 / 3)`, computed without overflow.
fn two_thirds(total: u64) -> u64 {
    let scaled = u128::from(total).saturating_mul(2) / 3;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
