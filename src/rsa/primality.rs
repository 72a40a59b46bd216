// Primality Testing
// Oracle consulted by the prime search, plus the default Miller-Rabin test

use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::thread_rng;

use super::bigint::{mod_pow, RsaBigInt};

/// Default Miller-Rabin rounds. Error probability is at most 4^-rounds.
pub const DEFAULT_MR_ROUNDS: u32 = 32;

const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Decides whether an integer is (probably) prime.
///
/// Implementations are shared by reference between the search workers, so
/// they must be callable from several threads at once.
pub trait PrimalityTester: Send + Sync {
    fn is_prime(&self, n: &RsaBigInt) -> bool;
}

/// Miller-Rabin probabilistic primality test with small-prime trial division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    pub rounds: u32,
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_MR_ROUNDS,
        }
    }
}

impl MillerRabin {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }
}

impl PrimalityTester for MillerRabin {
    fn is_prime(&self, n: &RsaBigInt) -> bool {
        is_probable_prime(n, self.rounds)
    }
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, iterations: u32) -> bool {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Everything below 97^2 that survived trial division is prime
    if n.to_u32().map_or(false, |small| small < 97 * 97) {
        return true;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let mut rng = thread_rng();

    'witness: for _ in 0..iterations {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}
