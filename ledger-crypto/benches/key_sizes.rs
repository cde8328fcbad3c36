use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ledger_crypto::{KeyPair, LedgerConfig, cipher};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_key_sizes(c: &mut Criterion) {
    let config = LedgerConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let plaintext = BigUint::from(123_456u32);

    let mut group = c.benchmark_group("Paillier key sizes");
    group.sample_size(10);

    for bits in [64u64, 128, 256, 512] {
        let key_pair = KeyPair::generate(bits, &config, &mut rng).expect("generate key pair");
        // precompute ciphertext for the decrypt bench
        let ciphertext =
            cipher::encrypt(&key_pair.public_key, &plaintext, &mut rng).expect("encrypt");

        group.bench_with_input(BenchmarkId::new("keygen", bits), &bits, |b, &bits| {
            b.iter(|| {
                let _k = KeyPair::generate(black_box(bits), &config, &mut rng).expect("generate");
            });
        });

        group.bench_with_input(BenchmarkId::new("encrypt", bits), &plaintext, |b, m| {
            b.iter(|| {
                let _c = cipher::encrypt(black_box(&key_pair.public_key), black_box(m), &mut rng)
                    .expect("encrypt");
            });
        });

        group.bench_with_input(BenchmarkId::new("decrypt", bits), &ciphertext, |b, ctext| {
            b.iter(|| {
                let _p = cipher::decrypt(&key_pair.private_key, black_box(ctext)).expect("decrypt");
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_sizes);
criterion_main!(benches);
