//! Property-based tests for proposer rotation invariants.
//!
//! Properties tested:
//! 1. Determinism: the proposer sequence depends only on the members.
//! 2. Conservation: rotation never creates or destroys accum.
//! 3. Fairness: proposal counts track voting power share.

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        solana_pubkey::Pubkey,
        std::collections::HashMap,
        trv1_validator_set::{is_proposer, Address, Validator, ValidatorSet},
    };

    // ── Helpers ──

    fn make_validators(powers: &[u64]) -> Vec<Validator> {
        powers
            .iter()
            .enumerate()
            .map(|(i, power)| {
                let mut bytes = [0u8; 32];
                bytes[..8].copy_from_slice(&(i as u64).to_le_bytes());
                bytes[31] = 0xCC;
                Validator::new(Pubkey::new_from_array(bytes), *power)
            })
            .collect()
    }

    fn accum_sum(vs: &ValidatorSet) -> i64 {
        vs.iter().map(|v| v.accum).sum()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Determinism
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Two nodes building the set from differently ordered input agree on
        /// every proposer.
        #[test]
        fn proposer_sequence_independent_of_input_order(
            validators in prop::collection::vec(1..=100u64, 1..=12)
                .prop_map(|powers| make_validators(&powers)),
            rotation in any::<prop::sample::Index>(),
            steps in 1..=100usize,
        ) {
            let mut shuffled = validators.clone();
            let mid = rotation.index(shuffled.len());
            shuffled.rotate_left(mid);
            shuffled.reverse();

            let mut a = ValidatorSet::new(validators).unwrap();
            let mut b = ValidatorSet::new(shuffled).unwrap();
            for _ in 0..steps {
                prop_assert_eq!(
                    a.proposer(),
                    b.proposer(),
                    "Proposer selection is non-deterministic"
                );
                a.increment_accum(1);
                b.increment_accum(1);
            }
        }

        /// The proposer is always a member of the set.
        #[test]
        fn proposer_is_member(
            powers in prop::collection::vec(1..=100u64, 1..=12),
            steps in 0..=200u32,
        ) {
            let mut vs = ValidatorSet::new(make_validators(&powers)).unwrap();
            vs.increment_accum(steps);
            let proposer = vs.proposer().unwrap();
            prop_assert!(vs.has_address(&proposer.address), "Proposer not in validator set");
            prop_assert!(is_proposer(&vs, &proposer.address));

            let others: Vec<Address> = vs
                .addresses()
                .into_iter()
                .filter(|address| *address != proposer.address)
                .collect();
            for address in others {
                prop_assert!(!is_proposer(&vs, &address));
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Accum conservation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Starting from zero accums, the accum sum stays zero across both
        /// single and batched rotations.
        #[test]
        fn accum_sum_conserved(
            powers in prop::collection::vec(1..=1_000u64, 1..=16),
            batches in prop::collection::vec(0..=64u32, 1..=8),
        ) {
            let mut vs = ValidatorSet::new(make_validators(&powers)).unwrap();
            prop_assert_eq!(accum_sum(&vs), 0);
            for times in batches {
                vs.increment_accum(times);
                prop_assert_eq!(accum_sum(&vs), 0);
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Fairness
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Over `T` single steps each validator proposes within `n` of
        /// `T * power / total` times.
        ///
        /// A proposer is charged from a positive accum, so every accum stays
        /// above `-total`. With a zero sum that caps every accum below
        /// `(n - 1) * total`, and the accum is `power * T - total * count`.
        #[test]
        fn proposal_frequency_tracks_voting_power(
            powers in prop::collection::vec(1..=20u64, 1..=8),
            rounds in 1..=400u64,
        ) {
            let mut vs = ValidatorSet::new(make_validators(&powers)).unwrap();
            let total = i128::from(vs.total_voting_power());
            let n = vs.len() as i128;

            let mut counts: HashMap<Address, i128> = HashMap::new();
            *counts.entry(vs.proposer().unwrap().address).or_default() += 1;
            for _ in 1..rounds {
                vs.increment_accum(1);
                *counts.entry(vs.proposer().unwrap().address).or_default() += 1;
            }

            let rounds = i128::from(rounds);
            for validator in vs.iter() {
                let count = counts.get(&validator.address).copied().unwrap_or(0);
                let deviation = count * total - i128::from(validator.voting_power) * rounds;
                prop_assert!(
                    deviation.abs() < n * total,
                    "{} proposed {} times in {} rounds with power {}/{}",
                    validator.address,
                    count,
                    rounds,
                    validator.voting_power,
                    total
                );
                prop_assert!(i128::from(validator.accum) > -total);
            }
        }

        /// With equal power every validator proposes once per `n` rounds.
        #[test]
        fn equal_power_round_robin(num_validators in 1..=10usize, cycles in 1..=5usize) {
            let mut vs = ValidatorSet::new(make_validators(&vec![7; num_validators])).unwrap();
            let mut counts: HashMap<Address, usize> = HashMap::new();
            *counts.entry(vs.proposer().unwrap().address).or_default() += 1;
            for _ in 1..num_validators * cycles {
                vs.increment_accum(1);
                *counts.entry(vs.proposer().unwrap().address).or_default() += 1;
            }
            prop_assert_eq!(counts.len(), num_validators);
            for count in counts.values() {
                prop_assert_eq!(*count, cycles);
            }
        }
    }
}
