//! Address-sorted validator set registry.
//!
//! Validators are kept strictly sorted by address with no duplicates, so the
//! index of every member is fixed for all rounds of a height. Votes and
//! commits refer to validators by that index.
//!
//! Two derived values are cached lazily: total voting power and the current
//! proposer. Every mutation clears both caches; rotation overwrites the
//! proposer cache with the validator it selected. The caches are
//! [`OnceLock`]s, so an unset cache is distinct from a cached zero and
//! concurrent readers never race on recomputation.
//!
//! All accessors hand out clones. Nothing returned by the set aliases its
//! internal storage.

use {
    crate::{
        config::ValidatorSetLimits,
        error::{Result, ValidatorSetError},
        merkle,
        validator::{compare_priority, Address, Validator},
    },
    log::*,
    serde::{Deserialize, Serialize},
    solana_hash::Hash,
    std::{fmt, sync::OnceLock},
};

/// A set of validators at a given height.
///
/// Not safe for concurrent mutation: mutators take `&mut self`, and the
/// caller serializes them, typically per height.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Validator>", try_from = "Vec<Validator>")]
pub struct ValidatorSet {
    /// Members sorted by address, ascending, no duplicates.
    validators: Vec<Validator>,
    /// Cached sum of member voting power.
    total_voting_power: OnceLock<u64>,
    /// Cached index of the current proposer.
    proposer: OnceLock<usize>,
}

impl ValidatorSet {
    /// Build a set from `validators` and rotate once so a proposer is defined.
    ///
    /// The input is copied and sorted by address. Duplicate addresses and
    /// zero voting power are rejected.
    pub fn new(validators: Vec<Validator>) -> Result<Self> {
        let mut validator_set = Self::from_unsorted(validators)?;
        if !validator_set.is_empty() {
            validator_set.increment_accum(1);
        }
        Ok(validator_set)
    }

    /// Sort and validate without rotating. Used when restoring persisted sets,
    /// whose accums are already advanced.
    fn from_unsorted(mut validators: Vec<Validator>) -> Result<Self> {
        validators.sort_by(|a, b| a.address.cmp(&b.address));
        for pair in validators.windows(2) {
            if pair[0].address == pair[1].address {
                return Err(ValidatorSetError::DuplicateAddress(pair[0].address));
            }
        }
        if let Some(zero) = validators.iter().find(|v| v.voting_power == 0) {
            return Err(ValidatorSetError::ZeroVotingPower(zero.address));
        }
        Ok(Self {
            validators,
            total_voting_power: OnceLock::new(),
            proposer: OnceLock::new(),
        })
    }

    /// Returns the number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if the validator set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    fn search(&self, address: &Address) -> std::result::Result<usize, usize> {
        self.validators.binary_search_by(|v| v.address.cmp(address))
    }

    /// Check whether a validator with `address` is in the set.
    pub fn has_address(&self, address: &Address) -> bool {
        self.search(address).is_ok()
    }

    /// Look up a validator by address, returning its index and a copy.
    pub fn get_by_address(&self, address: &Address) -> Option<(usize, Validator)> {
        let index = self.search(address).ok()?;
        Some((index, self.validators[index].clone()))
    }

    /// Address and copy of the validator at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Callers bound-check; commit
    /// verification does so by matching the commit size to the set size first.
    pub fn get_by_index(&self, index: usize) -> (Address, Validator) {
        let validator = &self.validators[index];
        (validator.address, validator.clone())
    }

    /// Checked variant of [`ValidatorSet::get_by_index`].
    pub fn get(&self, index: usize) -> Option<Validator> {
        self.validators.get(index).cloned()
    }

    /// Sum of member voting power, computed on first use after a mutation.
    pub fn total_voting_power(&self) -> u64 {
        *self.total_voting_power.get_or_init(|| {
            self.validators
                .iter()
                .fold(0u64, |total, v| total.saturating_add(v.voting_power))
        })
    }

    /// Copy of the current proposer, or `None` for an empty set.
    ///
    /// After a rotation this is the validator the rotation selected. After a
    /// membership change it is recomputed as the member with the highest
    /// accum, lowest address first on ties.
    pub fn proposer(&self) -> Option<Validator> {
        if self.validators.is_empty() {
            return None;
        }
        let index = *self.proposer.get_or_init(|| {
            let index = self.highest_priority_index();
            debug!(
                "recomputed proposer {} from {} validators",
                self.validators[index].address,
                self.validators.len()
            );
            index
        });
        self.validators.get(index).cloned()
    }

    fn highest_priority_index(&self) -> usize {
        self.validators
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| compare_priority(&a.priority_key(), &b.priority_key()))
            .map(|(index, _)| index)
            .unwrap_or_default()
    }

    /// Insert a copy of `validator` at its sorted position.
    ///
    /// Returns `false` without touching the set if its address is present or
    /// it has zero voting power.
    pub fn add(&mut self, validator: Validator) -> bool {
        if validator.voting_power == 0 {
            return false;
        }
        match self.search(&validator.address) {
            Ok(_) => false,
            Err(index) => {
                self.validators.insert(index, validator);
                self.invalidate_caches();
                true
            }
        }
    }

    /// Replace the member with the same address by a copy of `validator`.
    ///
    /// Returns `false` if no member has that address or `validator` has zero
    /// voting power. Members are removed with [`ValidatorSet::remove`].
    pub fn update(&mut self, validator: Validator) -> bool {
        if validator.voting_power == 0 {
            return false;
        }
        match self.search(&validator.address) {
            Ok(index) => {
                self.validators[index] = validator;
                self.invalidate_caches();
                true
            }
            Err(_) => false,
        }
    }

    /// Remove the member with `address`, returning it if present.
    pub fn remove(&mut self, address: &Address) -> Option<Validator> {
        let index = self.search(address).ok()?;
        let removed = self.validators.remove(index);
        self.invalidate_caches();
        Some(removed)
    }

    /// Visit a copy of each member in address order until `visitor` returns `true`.
    pub fn iterate<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, Validator) -> bool,
    {
        for (index, validator) in self.validators.iter().enumerate() {
            if visitor(index, validator.clone()) {
                break;
            }
        }
    }

    /// Iterator over copies of the members in address order.
    pub fn iter(&self) -> impl Iterator<Item = Validator> + '_ {
        self.validators.iter().cloned()
    }

    /// Returns all member addresses in address order.
    pub fn addresses(&self) -> Vec<Address> {
        self.validators.iter().map(|v| v.address).collect()
    }

    /// Merkle root over the hash of each member in address order.
    ///
    /// This is the value block headers commit to. The empty set hashes to
    /// [`merkle::EMPTY_ROOT`].
    pub fn hash(&self) -> Hash {
        let leaves: Vec<Hash> = self.validators.iter().map(Validator::hash).collect();
        merkle::merkle_root(&leaves)
    }

    /// Check the set against `limits`.
    pub fn check_limits(&self, limits: &ValidatorSetLimits) -> Result<()> {
        if self.len() > limits.max_validators {
            return Err(ValidatorSetError::TooManyValidators {
                count: self.len(),
                max: limits.max_validators,
            });
        }
        let total = self.total_voting_power();
        if total > limits.max_total_voting_power {
            return Err(ValidatorSetError::TotalVotingPowerTooLarge {
                total,
                max: limits.max_total_voting_power,
            });
        }
        Ok(())
    }

    /// Serialize to the bincode persistence format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a set persisted with [`ValidatorSet::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }

    /// Serialize to JSON as the list of validator records.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore a set from the JSON list produced by [`ValidatorSet::to_json`].
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    // -- Crate-internal access for rotation --

    pub(crate) fn validators_mut(&mut self) -> &mut [Validator] {
        &mut self.validators
    }

    /// Record `index` as the proposer chosen by rotation, or clear it.
    pub(crate) fn set_proposer(&mut self, index: Option<usize>) {
        self.proposer = index.map(OnceLock::from).unwrap_or_default();
    }

    fn invalidate_caches(&mut self) {
        self.total_voting_power.take();
        self.proposer.take();
    }
}

impl From<ValidatorSet> for Vec<Validator> {
    fn from(validator_set: ValidatorSet) -> Self {
        validator_set.validators
    }
}

impl TryFrom<Vec<Validator>> for ValidatorSet {
    type Error = ValidatorSetError;

    /// Re-sorts and re-validates: stored order is never trusted.
    fn try_from(validators: Vec<Validator>) -> Result<Self> {
        Self::from_unsorted(validators)
    }
}

impl fmt::Display for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ValidatorSet{{")?;
        match self.proposer() {
            Some(proposer) => writeln!(f, "  Proposer: {proposer}")?,
            None => writeln!(f, "  Proposer: nil")?,
        }
        writeln!(f, "  Validators:")?;
        for validator in &self.validators {
            writeln!(f, "    {validator}")?;
        }
        write!(f, "}}")
    }
}

/// Build a set of `num_validators` fresh keypairs, each with `voting_power`.
///
/// The returned keypairs are ordered like the set, so keypair `i` signs for
/// validator `i`.
#[cfg(any(test, feature = "dev-context-only-utils"))]
pub fn random_validator_set(
    num_validators: usize,
    voting_power: u64,
) -> (ValidatorSet, Vec<solana_keypair::Keypair>) {
    use {solana_keypair::Keypair, solana_signer::Signer};

    let mut keypairs: Vec<Keypair> = (0..num_validators).map(|_| Keypair::new()).collect();
    keypairs.sort_by_key(|keypair| Address::from_pubkey(&keypair.pubkey()));
    let validators = keypairs
        .iter()
        .map(|keypair| Validator::new(keypair.pubkey(), voting_power))
        .collect();
    let validator_set =
        ValidatorSet::new(validators).expect("fresh keypairs have distinct addresses");
    (validator_set, keypairs)
}
