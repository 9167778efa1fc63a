//! Validator set benchmarks.
//!
//! Measures:
//! - Proposer rotation, single and batched steps
//! - Commit verification at quorum and with every validator signing
//! - Set hashing and persistence
//! - Validator set sizes: 50, 100, 200

use {
    criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput},
    std::hint::black_box,
    trv1_bench::helpers::{
        make_block_id, make_commit, make_validator_set, make_weighted_validator_set, CHAIN_ID,
    },
    trv1_validator_set::ValidatorSet,
};

const SET_SIZES: [usize; 3] = [50, 100, 200];

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

fn bench_increment_accum(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation/increment_accum");

    for &n_validators in &SET_SIZES {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("validators", n_validators),
            &n_validators,
            |b, &n| {
                let (mut vs, _keypairs) = make_weighted_validator_set(n);
                b.iter(|| {
                    vs.increment_accum(black_box(1));
                    vs.proposer()
                });
            },
        );
    }
    group.finish();
}

fn bench_increment_accum_batched(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation/increment_accum_batched");

    for &times in &[10u32, 100, 1_000] {
        group.throughput(Throughput::Elements(u64::from(times)));
        group.bench_with_input(BenchmarkId::new("times", times), &times, |b, &times| {
            let (vs, _keypairs) = make_weighted_validator_set(100);
            b.iter_batched(
                || vs.clone(),
                |mut vs| {
                    vs.increment_accum(times);
                    vs
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_proposer_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotation/proposer_after_update");

    for &n_validators in &SET_SIZES {
        group.bench_with_input(
            BenchmarkId::new("validators", n_validators),
            &n_validators,
            |b, &n| {
                let (mut vs, _keypairs) = make_weighted_validator_set(n);
                let (_, mut validator) = vs.get_by_index(n / 2);
                b.iter(|| {
                    validator.voting_power = validator.voting_power.wrapping_add(1).max(1);
                    vs.update(validator.clone());
                    vs.proposer()
                });
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Commit verification
// ---------------------------------------------------------------------------

fn bench_verify_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit/verify");

    for &n_validators in &SET_SIZES {
        let (vs, keypairs) = make_validator_set(n_validators);
        let block_id = make_block_id(1);

        let quorum = n_validators * 2 / 3 + 1;
        let quorum_commit = make_commit(&vs, &keypairs, 1, block_id, quorum);
        group.throughput(Throughput::Elements(quorum as u64));
        group.bench_with_input(
            BenchmarkId::new("quorum", n_validators),
            &quorum_commit,
            |b, commit| {
                b.iter(|| vs.verify_commit(CHAIN_ID, &block_id, 1, black_box(commit)));
            },
        );

        let full_commit = make_commit(&vs, &keypairs, 1, block_id, n_validators);
        group.throughput(Throughput::Elements(n_validators as u64));
        group.bench_with_input(
            BenchmarkId::new("all_signed", n_validators),
            &full_commit,
            |b, commit| {
                b.iter(|| vs.verify_commit(CHAIN_ID, &block_id, 1, black_box(commit)));
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Hashing and persistence
// ---------------------------------------------------------------------------

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("validator_set/hash");

    for &n_validators in &SET_SIZES {
        group.bench_with_input(
            BenchmarkId::new("validators", n_validators),
            &n_validators,
            |b, &n| {
                let (vs, _keypairs) = make_validator_set(n);
                b.iter(|| black_box(&vs).hash());
            },
        );
    }
    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("validator_set/persistence");

    for &n_validators in &SET_SIZES {
        let (vs, _keypairs) = make_weighted_validator_set(n_validators);
        let bytes = vs.to_bytes().expect("serialize");
        group.bench_with_input(
            BenchmarkId::new("to_bytes", n_validators),
            &vs,
            |b, vs| b.iter(|| vs.to_bytes()),
        );
        group.bench_with_input(
            BenchmarkId::new("from_bytes", n_validators),
            &bytes,
            |b, bytes| b.iter(|| ValidatorSet::from_bytes(black_box(bytes))),
        );
    }
    group.finish();
}

criterion_group!(
    rotation_benches,
    bench_increment_accum,
    bench_increment_accum_batched,
    bench_proposer_recompute,
);
criterion_group!(commit_benches, bench_verify_commit);
criterion_group!(validator_set_benches, bench_hash, bench_persistence);
criterion_main!(rotation_benches, commit_benches, validator_set_benches);
