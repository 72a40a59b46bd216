// RSA Encryption Implementation
// Raw textbook RSA: c = m^e mod n, no padding

use tracing::trace;

use super::bigint::{mod_pow, RsaBigInt};
use crate::error::{Result, RsaError};

/// Encrypt `message` in place with exponent `e` and modulus `n`.
///
/// Textbook RSA is only defined for `0 <= message < n`; a message outside
/// that range is left untouched. Use [`try_encrypt`] to get an error instead.
pub fn encrypt(message: &mut RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) {
    if *message >= *n {
        trace!("message is not below the modulus, left unchanged");
        return;
    }
    *message = mod_pow(message, e, n);
}

/// Encrypt a copy of `message`, with the same passthrough rule as [`encrypt`]
pub fn encrypt_value(message: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    let mut ciphertext = message.clone();
    encrypt(&mut ciphertext, e, n);
    ciphertext
}

/// Encrypt `message`, failing with [`RsaError::OutOfRange`] when `message >= n`
pub fn try_encrypt(message: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> Result<RsaBigInt> {
    if message >= n {
        return Err(RsaError::OutOfRange);
    }
    Ok(mod_pow(message, e, n))
}
