//! Caller-side bounds for validator sets and proposer rotation.
//!
//! Accum arithmetic saturates instead of wrapping, but a saturated accum no
//! longer rotates fairly. These limits bound set size, total voting power and
//! steps per rotation, and are checked by
//! [`ValidatorSet::check_limits`](crate::ValidatorSet::check_limits) and
//! [`ValidatorSet::increment_accum_checked`](crate::ValidatorSet::increment_accum_checked).
//! The limits alone do not bound accum: a large total voting power rotated
//! many steps at once still overflows `i64`, so the checked rotation also
//! rejects any call whose accums could leave that range.

/// Upper bound on total voting power.
///
/// Keeps a single step, which moves an accum by at most the total, far from
/// `i64` saturation.
pub const MAX_TOTAL_VOTING_POWER: u64 = (i64::MAX as u64) / 8;

/// Limits applied to a validator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSetLimits {
    /// Maximum number of members.
    /// Default: 10_000.
    pub max_validators: usize,

    /// Maximum sum of member voting power.
    /// Default: [`MAX_TOTAL_VOTING_POWER`].
    pub max_total_voting_power: u64,

    /// Maximum `times` accepted by a single checked rotation.
    /// Default: 1_000_000.
    pub max_increment_times: u32,
}

impl Default for ValidatorSetLimits {
    fn default() -> Self {
        Self {
            max_validators: 10_000,
            max_total_voting_power: MAX_TOTAL_VOTING_POWER,
            max_increment_times: 1_000_000,
        }
    }
}

impl ValidatorSetLimits {
    /// Validate the limits themselves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_validators == 0 {
            return Err(ConfigError::InvalidMaxValidators);
        }
        if self.max_total_voting_power == 0 || self.max_total_voting_power > MAX_TOTAL_VOTING_POWER
        {
            return Err(ConfigError::InvalidMaxTotalVotingPower(
                self.max_total_voting_power,
            ));
        }
        if self.max_increment_times == 0 {
            return Err(ConfigError::InvalidMaxIncrementTimes);
        }
        Ok(())
    }
}

/// Errors in validator set limits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_validators must be > 0")]
    InvalidMaxValidators,
    #[error("max_total_voting_power must be in [1, i64::MAX / 8], got {0}")]
    InvalidMaxTotalVotingPower(u64),
    #[error("max_increment_times must be > 0")]
    InvalidMaxIncrementTimes,
}
