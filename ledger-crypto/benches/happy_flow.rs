use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ledger_crypto::{
    DeclaredTotal, DeclaredTotals, DualEncryptionProtocol, KeyPair, PartyRegistry,
    ReconciliationEngine, cipher,
};
use num_bigint::BigUint;

fn bench_happy_flow(c: &mut Criterion) {
    // one-time setup
    let key_pair = KeyPair::from_primes(&1009u32.into(), &1013u32.into()).expect("toy key pair");
    let m1 = BigUint::from(1500u32);
    let m2 = BigUint::from(2500u32);
    let mut rng = rand::rng();

    c.bench_function("encrypt_add_decrypt", |b| {
        b.iter(|| {
            let c1 = cipher::encrypt(&key_pair.public_key, &m1, &mut rng).expect("encrypt");
            let c2 = cipher::encrypt(&key_pair.public_key, &m2, &mut rng).expect("encrypt");
            let sum = cipher::homomorphic_add(&key_pair.public_key, &c1, &c2).expect("add");

            black_box(cipher::decrypt(&key_pair.private_key, &sum).expect("decrypt"));
        })
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let mut registry = PartyRegistry::new();
    registry
        .register_key_pair("A", KeyPair::from_primes(&1009u32.into(), &1013u32.into()).expect("A"))
        .expect("register A");
    registry
        .register_key_pair("B", KeyPair::from_primes(&1019u32.into(), &1021u32.into()).expect("B"))
        .expect("register B");

    let protocol = DualEncryptionProtocol::new(&registry);
    let transactions: Vec<_> = (0..100)
        .map(|i| {
            let (from, to) = if i % 2 == 0 { ("A", "B") } else { ("B", "A") };
            protocol.record(format!("tx-{}", i), 10.0, from, to).expect("record")
        })
        .collect();
    let declared = DeclaredTotals::from([
        ("A".to_string(), DeclaredTotal::new(500.0, 500.0)),
        ("B".to_string(), DeclaredTotal::new(500.0, 500.0)),
    ]);
    let engine = ReconciliationEngine::new(&registry);

    c.bench_function("reconcile_100_transactions", |b| {
        b.iter(|| {
            let report = engine
                .reconcile(black_box(&transactions), black_box(&declared))
                .expect("reconcile");
            black_box(report.is_clean());
        })
    });
}

criterion_group!(benches, bench_happy_flow, bench_reconcile);
criterion_main!(benches);
