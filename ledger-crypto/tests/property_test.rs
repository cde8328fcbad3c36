use ledger_crypto::{KeyPair, cipher};

use num_bigint::BigUint;

use num_integer::Integer;
use num_traits::One;

use quickcheck::{TestResult, quickcheck};

use std::sync::LazyLock;

static KEY_PAIR: LazyLock<KeyPair> = LazyLock::new(|| {
    KeyPair::from_primes(&1009u32.into(), &1013u32.into()).expect("toy primes are valid")
});

#[quickcheck_macros::quickcheck]
fn decrypt_inverts_encrypt(m: u32) -> bool {
    let key_pair = &*KEY_PAIR;
    let m = BigUint::from(m) % key_pair.public_key.n();
    let mut rng = rand::rng();

    let c = cipher::encrypt(&key_pair.public_key, &m, &mut rng).expect("encrypt");
    cipher::decrypt(&key_pair.private_key, &c).expect("decrypt") == m
}

#[quickcheck_macros::quickcheck]
fn addition_is_homomorphic_mod_n(a: u32, b: u32) -> bool {
    let key_pair = &*KEY_PAIR;
    let n = key_pair.public_key.n();
    let a = BigUint::from(a) % n;
    let b = BigUint::from(b) % n;
    let mut rng = rand::rng();

    let ca = cipher::encrypt(&key_pair.public_key, &a, &mut rng).expect("encrypt a");
    let cb = cipher::encrypt(&key_pair.public_key, &b, &mut rng).expect("encrypt b");
    let sum = cipher::homomorphic_add(&key_pair.public_key, &ca, &cb).expect("add");

    cipher::decrypt(&key_pair.private_key, &sum).expect("decrypt") == (a + b) % n
}

#[quickcheck_macros::quickcheck]
fn sum_of_many_terms_matches(terms: Vec<u16>) -> bool {
    if terms.is_empty() {
        return true;
    }

    let key_pair = &*KEY_PAIR;
    let n = key_pair.public_key.n();
    let mut rng = rand::rng();

    let mut ciphertexts = terms.iter().map(|t| {
        cipher::encrypt(&key_pair.public_key, &BigUint::from(*t), &mut rng).expect("encrypt")
    });
    let first = ciphertexts.next().expect("non-empty");
    let total = ciphertexts.fold(first, |acc, c| {
        cipher::homomorphic_add(&key_pair.public_key, &acc, &c).expect("add")
    });

    let expected = terms.iter().map(|t| BigUint::from(*t)).sum::<BigUint>() % n;
    cipher::decrypt(&key_pair.private_key, &total).expect("decrypt") == expected
}

quickcheck! {
    fn fixed_randomness_is_deterministic(m: u32, r: u32) -> TestResult {
        let key_pair = &*KEY_PAIR;
        let n = key_pair.public_key.n();
        let m = BigUint::from(m) % n;
        let r = BigUint::from(r) % n;
        if r == BigUint::ZERO || !r.gcd(n).is_one() {
            return TestResult::discard();
        }

        let first = cipher::encrypt_with_randomness(&key_pair.public_key, &m, &r).expect("encrypt");
        let second = cipher::encrypt_with_randomness(&key_pair.public_key, &m, &r).expect("encrypt");
        let decrypted = cipher::decrypt(&key_pair.private_key, &first).expect("decrypt");

        TestResult::from_bool(first == second && decrypted == m)
    }
}
