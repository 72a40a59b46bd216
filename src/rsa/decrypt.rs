// RSA Decryption Implementation
// Raw textbook RSA: m = c^d mod n

use tracing::trace;

use super::bigint::{mod_pow, RsaBigInt};
use crate::error::{Result, RsaError};

/// Decrypt `ciphertext` in place with exponent `d` and modulus `n`.
/// A ciphertext that is not below `n` is left untouched.
pub fn decrypt(ciphertext: &mut RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) {
    if *ciphertext >= *n {
        trace!("ciphertext is not below the modulus, left unchanged");
        return;
    }
    *ciphertext = mod_pow(ciphertext, d, n);
}

pub fn decrypt_value(ciphertext: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    let mut plaintext = ciphertext.clone();
    decrypt(&mut plaintext, d, n);
    plaintext
}

/// Decrypt `ciphertext`, failing with [`RsaError::OutOfRange`] when `ciphertext >= n`
pub fn try_decrypt(ciphertext: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> Result<RsaBigInt> {
    if ciphertext >= n {
        return Err(RsaError::OutOfRange);
    }
    Ok(mod_pow(ciphertext, d, n))
}
