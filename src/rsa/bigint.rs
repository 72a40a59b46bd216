// RSA Big Integer Operations
// Wrapper around num-bigint for the operations key generation relies on

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::thread_rng;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Signed counterpart used by the extended Euclidean algorithm
pub type RsaSignedInt = BigInt;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Random integer representable in `bits` bits, i.e. in `[0, 2^bits)`
pub fn random_bits(bits: u64) -> RsaBigInt {
    thread_rng().gen_biguint(bits)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(
    a: &RsaSignedInt,
    b: &RsaSignedInt,
) -> (RsaSignedInt, RsaSignedInt, RsaSignedInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (RsaSignedInt::one(), RsaSignedInt::zero());
    let (mut old_y, mut y) = (RsaSignedInt::zero(), RsaSignedInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    if old_r.is_negative() {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
/// Returns None if the inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaSignedInt> {
    if m.is_zero() {
        return None;
    }

    let a = RsaSignedInt::from_biguint(Sign::Plus, a.clone());
    let m = RsaSignedInt::from_biguint(Sign::Plus, m.clone());
    let (gcd, x, _) = extended_gcd(&a, &m);

    if !gcd.is_one() {
        return None;
    }

    // x lies in (-m, m); bring it into [0, m)
    let mut result = x % &m;
    if result.is_negative() {
        result += &m;
    }

    Some(result)
}

/// Convert a non-negative signed value back to the unsigned representation
pub fn to_unsigned(n: &RsaSignedInt) -> Option<RsaBigInt> {
    n.to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_pow_unit_modulus() {
        assert_eq!(mod_pow(&from_u64(9), &from_u64(4), &from_u64(1)), from_u64(0));
    }

    #[rstest(a, m, expected,
        case(3, 7, 5),
        case(17, 3120, 2753),
        case(65537, 4, 1),
        case(7, 40, 23),
    )]
    fn test_mod_inverse(a: u64, m: u64, expected: u64) {
        let inv = mod_inverse(&from_u64(a), &from_u64(m)).unwrap();
        assert!(!inv.is_negative());
        assert_eq!(to_unsigned(&inv).unwrap(), from_u64(expected));
        assert_eq!((from_u64(a) * from_u64(expected)) % from_u64(m), from_u64(1));
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert!(mod_inverse(&from_u64(6), &from_u64(9)).is_none());
        assert!(mod_inverse(&from_u64(5), &from_u64(0)).is_none());
    }

    #[test]
    fn test_extended_gcd_bezout() {
        let a = RsaSignedInt::from(240);
        let b = RsaSignedInt::from(46);
        let (g, x, y) = extended_gcd(&a, &b);
        assert_eq!(g, RsaSignedInt::from(2));
        assert_eq!(&a * &x + &b * &y, g);
    }

    #[test]
    fn test_random_bits_fit() {
        let limit = from_u64(1) << 12;
        for _ in 0..64 {
            assert!(random_bits(12) < limit);
        }
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(&from_u64(48), &from_u64(18)), from_u64(6));
        assert_eq!(gcd(&from_u64(65537), &from_u64(3120)), from_u64(1));
    }
}
