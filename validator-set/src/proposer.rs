//! Leader / proposer selection.
//!
//! Implements deterministic weighted round-robin proposer rotation following
//! the Tendermint approach. Every validator in the network must agree on who
//! the proposer is after any number of rotation steps, so the algorithm and
//! its tie-break are reproduced exactly on every node.

use {
    crate::{
        config::ValidatorSetLimits,
        error::{Result, ValidatorSetError},
        priority_queue::PriorityQueue,
        validator::{compare_priority, Address},
        validator_set::ValidatorSet,
    },
    log::*,
};

/// Convert a non-negative amount to `i64`, saturating at `i64::MAX`.
fn to_accum(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl ValidatorSet {
    /// Advance proposer rotation by `times` steps.
    ///
    /// # Algorithm
    ///
    /// 1. Every validator gains `voting_power * times` accum.
    /// 2. All validators are queued by `(accum, address)`: highest accum
    ///    first, lowest address first among equals.
    /// 3. `times` times, the front validator is charged the total voting
    ///    power and re-queued. The one charged on the final step becomes the
    ///    proposer.
    ///
    /// Over many steps each validator proposes with frequency proportional to
    /// its share of the total voting power.
    ///
    /// Accum arithmetic saturates at the `i64` bounds. Use
    /// [`ValidatorSet::increment_accum_checked`] to stay within limits where
    /// saturation cannot occur. `times == 0` is a no-op.
    pub fn increment_accum(&mut self, times: u32) {
        if times == 0 {
            return;
        }
        let total = to_accum(self.total_voting_power());
        let times_accum = i64::from(times);

        let mut queue = PriorityQueue::with_capacity(self.len(), compare_priority);
        for (index, validator) in self.validators_mut().iter_mut().enumerate() {
            let gain = to_accum(validator.voting_power).saturating_mul(times_accum);
            validator.accum = validator.accum.saturating_add(gain);
            queue.push(index, validator.priority_key());
        }

        let last_step = times.saturating_sub(1);
        let mut proposer = None;
        for step in 0..times {
            let Some(&index) = queue.peek_max() else {
                break;
            };
            if step == last_step {
                proposer = Some(index);
            }
            let validator = &mut self.validators_mut()[index];
            validator.accum = validator.accum.saturating_sub(total);
            trace!(
                "rotation step {step}: charged {} to accum {}",
                validator.address,
                validator.accum
            );
            queue.update_key(&index, validator.priority_key());
        }

        self.set_proposer(proposer);
        if let Some(proposer) = self.proposer() {
            debug!(
                "rotated {times} step(s), proposer {} accum {}",
                proposer.address, proposer.accum
            );
        }
    }

    /// [`ValidatorSet::increment_accum`] bounded by `limits`.
    ///
    /// Rejects `times` above `limits.max_increment_times`, sets that break the
    /// size or voting-power limits, and any rotation that could take an accum
    /// outside `i64`, all without mutating the set. When this returns `Ok`
    /// no accum arithmetic saturated.
    pub fn increment_accum_checked(
        &mut self,
        times: u32,
        limits: &ValidatorSetLimits,
    ) -> Result<()> {
        if times > limits.max_increment_times {
            return Err(ValidatorSetError::TooManyRotationSteps {
                times,
                max: limits.max_increment_times,
            });
        }
        self.check_limits(limits)?;
        if let Some(address) = self.first_accum_overflow(times) {
            return Err(ValidatorSetError::AccumOverflow { times, address });
        }
        self.increment_accum(times);
        Ok(())
    }

    /// First member whose accum could leave `i64` during `times` steps.
    ///
    /// A member gains `voting_power * times` and is charged the total at most
    /// `times` times, so both ends are checked exactly in `i128`.
    fn first_accum_overflow(&self, times: u32) -> Option<Address> {
        let times = i128::from(times);
        let max_charge = i128::from(self.total_voting_power()).saturating_mul(times);
        let accum_range = i128::from(i64::MIN)..=i128::from(i64::MAX);
        let in_range = |value: i128| accum_range.contains(&value);
        self.iter()
            .find(|validator| {
                let gained = i128::from(validator.accum)
                    .saturating_add(i128::from(validator.voting_power).saturating_mul(times));
                !in_range(gained) || !in_range(gained.saturating_sub(max_charge))
            })
            .map(|validator| validator.address)
    }
}

/// Check if `address` is the current proposer of `validator_set`.
pub fn is_proposer(validator_set: &ValidatorSet, address: &Address) -> bool {
    validator_set
        .proposer()
        .map(|p| p.address == *address)
        .unwrap_or(false)
}
