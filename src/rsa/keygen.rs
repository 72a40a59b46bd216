// RSA Key Generation
// Derives modulus, totient and both exponents from two searched primes

use num_integer::Integer;
use num_traits::One;
use tracing::{debug, info, warn};

use super::bigint::{from_u64, gcd, mod_inverse, random_bits, to_unsigned, RsaBigInt};
use super::decrypt::decrypt_value;
use super::encrypt::encrypt_value;
use super::prime_search::ParallelPrimeSearch;
use super::primality::{MillerRabin, PrimalityTester};
use crate::config::KeygenConfig;
use crate::error::{Result, RsaError};

/// Prime pairs tried before a fixed exponent is declared unusable.
const MAX_PAIR_ATTEMPTS: usize = 64;

/// Generated RSA numbers. The generator keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub encrypt_exponent: RsaBigInt,
    pub decrypt_exponent: RsaBigInt,
    pub modulus: RsaBigInt,
}

impl KeyMaterial {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }

    /// Raw encryption with the public exponent; passes through values >= modulus
    pub fn encrypt(&self, message: &RsaBigInt) -> RsaBigInt {
        encrypt_value(message, &self.encrypt_exponent, &self.modulus)
    }

    /// Raw decryption with the private exponent; passes through values >= modulus
    pub fn decrypt(&self, ciphertext: &RsaBigInt) -> RsaBigInt {
        decrypt_value(ciphertext, &self.decrypt_exponent, &self.modulus)
    }
}

/// Builds RSA key material on top of a parallel prime search.
pub struct KeyGenerator {
    config: KeygenConfig,
    search: ParallelPrimeSearch,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(KeygenConfig::default(), Box::new(MillerRabin::default()))
    }
}

impl KeyGenerator {
    pub fn new(config: KeygenConfig, tester: Box<dyn PrimalityTester>) -> Self {
        let search = ParallelPrimeSearch::new(config.search.clone(), tester);
        Self { config, search }
    }

    pub fn config(&self) -> &KeygenConfig {
        &self.config
    }

    /// Prime `p` with `2^bits <= p <= 2^(bits+1) - 1`
    pub fn generate_prime(&self, bits: usize) -> Result<RsaBigInt> {
        self.search.search(bits)
    }

    /// Generate RSA key material for `bit_count`
    ///
    /// Each prime is searched with bit length `bit_count / 2`. With
    /// `use_fixed_exponent` the public exponent is the configured fixed value
    /// (65537 by default); otherwise it is drawn at random from
    /// `[2, 2^(bit_count-1) - 1]`, must be odd and not 3, and is then stepped
    /// by two until it is coprime to the totient.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn generate_keys(
        &self,
        bit_count: usize,
        use_fixed_exponent: bool,
    ) -> Result<KeyMaterial> {
        self.validate(bit_count, use_fixed_exponent)?;

        let half_bits = bit_count / 2;

        for attempt in 1..=MAX_PAIR_ATTEMPTS {
            let (p, q) = self.generate_prime_pair(half_bits)?;

            let modulus = &p * &q;
            let totient = (&p - 1u8) * (&q - 1u8);

            let e = if use_fixed_exponent {
                let e = from_u64(self.config.fixed_exponent);
                if !gcd(&e, &totient).is_one() {
                    debug!(attempt, "fixed exponent shares a factor with the totient");
                    continue;
                }
                e
            } else {
                random_exponent(bit_count, &totient)
            };

            let d = mod_inverse(&e, &totient)
                .as_ref()
                .and_then(to_unsigned)
                .ok_or(RsaError::NoInverse)?;

            info!(modulus_bits = modulus.bits(), "key material generated");

            return Ok(KeyMaterial {
                encrypt_exponent: e,
                decrypt_exponent: d,
                modulus,
            });
        }

        warn!(
            exponent = self.config.fixed_exponent,
            "no prime pair compatible with the fixed exponent"
        );
        Err(RsaError::NoInverse)
    }

    fn validate(&self, bit_count: usize, use_fixed_exponent: bool) -> Result<()> {
        if bit_count < 2 {
            return Err(RsaError::InvalidParameter {
                name: "bit_count",
                value: bit_count as u64,
                reason: "bit count must be at least 2",
            });
        }
        if use_fixed_exponent {
            let e = self.config.fixed_exponent;
            if e < 3 || e % 2 == 0 {
                return Err(RsaError::InvalidParameter {
                    name: "fixed_exponent",
                    value: e,
                    reason: "fixed exponent must be odd and at least 3",
                });
            }
        } else if bit_count < 4 {
            // [2, 2^(bit_count-1) - 1] holds no odd value above 3
            return Err(RsaError::InvalidParameter {
                name: "bit_count",
                value: bit_count as u64,
                reason: "a random exponent needs a bit count of at least 4",
            });
        }
        Ok(())
    }

    /// Two primes searched one after the other, distinct whenever the bounds
    /// hold more than one prime
    fn generate_prime_pair(&self, bits: usize) -> Result<(RsaBigInt, RsaBigInt)> {
        let p = self.search.search(bits)?;
        debug!("first prime generated");

        let mut q = self.search.search(bits)?;
        // [2, 3] is the only interval with a single prime
        while bits >= 2 && q == p {
            q = self.search.search(bits)?;
        }
        debug!("second prime generated");

        Ok((p, q))
    }
}

/// Random odd public exponent in `[5, 2^(bit_count-1) - 1]`, then stepped to
/// the first value coprime to `totient`
fn random_exponent(bit_count: usize, totient: &RsaBigInt) -> RsaBigInt {
    let min = from_u64(2);
    let max = (RsaBigInt::one() << (bit_count - 1)) - 1u8;
    let range = &max - &min + 1u8;
    let three = from_u64(3);

    let mut e = loop {
        let mut candidate = random_bits(bit_count as u64 + 1) % &range + &min;
        if candidate.is_even() {
            candidate += 1u8;
        }
        // 3 is too small to be safe as a general-purpose exponent
        if candidate > min && candidate != three {
            break candidate;
        }
    };

    while !gcd(&e, totient).is_one() {
        e += 2u8;
    }

    e
}

/// Generate key material with the default generator (4 workers, Miller-Rabin)
pub fn generate_keys(bit_count: usize, use_fixed_exponent: bool) -> Result<KeyMaterial> {
    KeyGenerator::default().generate_keys(bit_count, use_fixed_exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use rstest::rstest;

    /// Trial division, good enough for the small moduli used here
    fn factor(n: &RsaBigInt) -> (RsaBigInt, RsaBigInt) {
        let mut p = from_u64(2);
        while &p * &p <= *n {
            if (n % &p) == from_u64(0) {
                return (p.clone(), n / &p);
            }
            p += 1u8;
        }
        panic!("{} has no small factor", n);
    }

    fn totient_of(keys: &KeyMaterial) -> RsaBigInt {
        let (p, q) = factor(&keys.modulus);
        (p - 1u8) * (q - 1u8)
    }

    #[rstest(bit_count, case(0), case(1))]
    fn test_rejects_tiny_bit_count(bit_count: usize) {
        for fixed in [true, false] {
            let result = generate_keys(bit_count, fixed);
            assert!(matches!(
                result,
                Err(RsaError::InvalidParameter { name: "bit_count", .. })
            ));
        }
    }

    #[test]
    fn test_smallest_fixed_key() {
        let keys = generate_keys(2, true).unwrap();
        assert_eq!(keys.encrypt_exponent, from_u64(65537));
        // Both primes come from [2, 3]
        assert_eq!(keys.modulus, from_u64(9));
    }

    #[test]
    fn test_random_exponent_needs_four_bits() {
        assert!(matches!(
            generate_keys(3, false),
            Err(RsaError::InvalidParameter { name: "bit_count", value: 3, .. })
        ));
        assert!(generate_keys(4, false).is_ok());
    }

    #[test]
    fn test_rejects_even_fixed_exponent() {
        let config = KeygenConfig {
            fixed_exponent: 4,
            ..KeygenConfig::default()
        };
        let generator = KeyGenerator::new(config, Box::new(MillerRabin::default()));
        assert!(matches!(
            generator.generate_keys(16, true),
            Err(RsaError::InvalidParameter { name: "fixed_exponent", .. })
        ));
    }

    #[rstest(bit_count, case(2), case(3), case(8), case(16), case(64), case(256))]
    fn test_fixed_exponent(bit_count: usize) {
        let keys = generate_keys(bit_count, true).unwrap();
        assert_eq!(keys.encrypt_exponent, from_u64(65537));
    }

    #[rstest]
    fn test_key_properties(
        #[values(4, 6, 16, 24, 32)] bit_count: usize,
        #[values(true, false)] fixed: bool,
    ) {
        let keys = generate_keys(bit_count, fixed).unwrap();
        let totient = totient_of(&keys);
        let one = from_u64(1);

        // Verify gcd(e, φ(n)) = 1 and e * d ≡ 1 (mod φ(n))
        assert_eq!(gcd(&keys.encrypt_exponent, &totient), one);
        assert_eq!(
            (&keys.encrypt_exponent * &keys.decrypt_exponent) % &totient,
            one
        );
        assert!(keys.decrypt_exponent < totient);
    }

    #[rstest(bit_count, case(4), case(8), case(16), case(64), case(128))]
    fn test_random_exponent_is_safe(bit_count: usize) {
        for _ in 0..8 {
            let keys = generate_keys(bit_count, false).unwrap();
            let e = &keys.encrypt_exponent;
            assert!(e.is_odd());
            assert!(*e > from_u64(2));
            assert_ne!(*e, from_u64(3));
        }
    }

    #[test]
    fn test_factors_bounded_for_sixteen_bits() {
        let keys = generate_keys(16, true).unwrap();
        let (p, q) = factor(&keys.modulus);
        for prime in [&p, &q] {
            assert!(*prime >= from_u64(1 << 8));
            assert!(*prime < from_u64(1 << 9));
        }
        assert_ne!(p, q);
        assert!(keys.modulus >= from_u64(1 << 16));
        assert!(keys.modulus < from_u64(1 << 18));
    }

    // totient of p = 61, q = 53
    #[rstest(bit_count, case(4), case(12), case(64))]
    fn test_random_exponent_odd_and_coprime(bit_count: usize) {
        let totient = from_u64(3120);
        for _ in 0..32 {
            let e = random_exponent(bit_count, &totient);
            assert!(e.is_odd());
            assert!(e >= from_u64(5));
            assert_eq!(gcd(&e, &totient), from_u64(1));
        }
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let keys = generate_keys(16, true).unwrap();
        let message = from_u64(42);

        let ciphertext = keys.encrypt(&message);
        assert_eq!(keys.decrypt(&ciphertext), message);
    }

    #[test]
    fn test_custom_worker_count() {
        let config = KeygenConfig::default().with_search(SearchConfig::default().with_workers(1));
        let generator = KeyGenerator::new(config, Box::new(MillerRabin::new(8)));
        assert_eq!(generator.config().search.workers, 1);

        let prime = generator.generate_prime(20).unwrap();
        assert!(prime >= from_u64(1 << 20) && prime < from_u64(1 << 21));

        let keys = generator.generate_keys(64, false).unwrap();
        assert!(keys.bit_length() >= 64);
    }
}
